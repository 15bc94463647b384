//! Search results and their ordering.

use std::cmp::Ordering;

use crate::game_repr::{Move, Team};

/// Value of a forced mate, positive when White delivers it.
pub const MATE_VALUE: f64 = 1000.0;

/// Score of a line: the value of the position it ends in, the ply depth of
/// that position below the search root, and the moves leading there.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub depth: u32,
    pub path: Vec<Move>,
}

impl Evaluation {
    pub fn new(value: f64, depth: u32, path: Vec<Move>) -> Self {
        Self { value, depth, path }
    }

    /// Whether the value is a forced mate for `team`.
    pub fn is_mate_for(&self, team: Team) -> bool {
        self.value * team.sign() as f64 >= MATE_VALUE
    }

    pub fn is_mate(&self) -> bool {
        self.value.abs() >= MATE_VALUE
    }
}

/// Orders two evaluations from the point of view of `mode`: `Greater` means
/// `mode` prefers `a`.
///
/// Higher value (for `mode`) wins. Between equal values a winning mate prefers
/// the shallower line; anything else prefers the deeper one, so losses are
/// postponed and quiet scores come from the longest look ahead.
pub fn compare(a: &Evaluation, b: &Evaluation, mode: Team) -> Ordering {
    let sign = mode.sign() as f64;
    let by_value = (a.value * sign).total_cmp(&(b.value * sign));
    if by_value != Ordering::Equal {
        return by_value;
    }
    if a.is_mate_for(mode) {
        b.depth.cmp(&a.depth)
    } else {
        a.depth.cmp(&b.depth)
    }
}

/// The evaluation `mode` prefers most. The first of several equal ones is returned.
pub fn max<'a, I>(evaluations: I, mode: Team) -> Option<&'a Evaluation>
where
    I: IntoIterator<Item = &'a Evaluation>,
{
    evaluations.into_iter().fold(None, |best, e| match best {
        Some(b) if compare(e, b, mode) != Ordering::Greater => Some(b),
        _ => Some(e),
    })
}
