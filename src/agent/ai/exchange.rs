//! Approximate static exchange on a single square.
//!
//! Captures alternate, weakest piece first. After each capture the line
//! behind the capturer is probed once for a slider it was screening. Pins and
//! checks are not modelled, apart from a king refusing to capture onto a
//! square the other side still covers.
//!
//! A king only joins as the last capturer when nothing of the other side is
//! left to recapture: the piece it would take plus any remaining capturer is
//! more than one opponent piece, and taking would leave the king in check.

use smallvec::{smallvec, SmallVec};

use crate::game_repr::piece_moves::steps_to_edge;
use crate::game_repr::{aligned, direction, BoardView, Capabilities, Piece, Square, Type};

type Capturers = SmallVec<[Piece; 8]>;

/// Ordering weight. Kings go last in every exchange.
fn exchange_value(piece: &Piece) -> i32 {
    match piece.piece_type() {
        Type::King => 100,
        t => t.value(),
    }
}

/// Material the opponent of the occupant of `target` can expect to win by
/// starting an exchange there (0 when it should not start one).
///
/// `controllers` are all pieces, of either side, that strike `target`.
pub fn static_exchange<B: BoardView + ?Sized>(board: &B, target: Square, controllers: &[Piece]) -> i32 {
    let Some(occupant) = board.piece_at(target) else {
        return 0;
    };

    let mut sides: [Capturers; 2] = [Capturers::new(), Capturers::new()];
    for piece in controllers.iter().filter(|p| p.square != target) {
        sides[piece.team.index()].push(*piece);
    }
    for side in sides.iter_mut() {
        side.sort_by_key(exchange_value);
    }

    let mut side = occupant.team.opponent();
    let Some(mut capturer) = next_capturer(&mut sides, side.index()) else {
        return 0;
    };

    let mut gone: SmallVec<[Square; 16]> = SmallVec::new();
    let mut gain: SmallVec<[i32; 32]> = smallvec![exchange_value(occupant)];

    loop {
        let previous = gain[gain.len() - 1];
        gain.push(exchange_value(&capturer) - previous);

        gone.push(capturer.square);
        if let Some(xray) = uncovered(board, target, capturer.square, &gone) {
            let slot = &mut sides[xray.team.index()];
            let at = slot.partition_point(|p| exchange_value(p) <= exchange_value(&xray));
            slot.insert(at, xray);
        }

        side = side.opponent();
        match next_capturer(&mut sides, side.index()) {
            Some(next) => capturer = next,
            None => break,
        }
    }

    // The last entry assumed a recapture that never came. Folding back from
    // the end lets either side stop as soon as the next capture would cost it.
    gain.pop();
    while gain.len() > 1 {
        let deeper = gain.pop().unwrap_or_default();
        let last = gain.len() - 1;
        gain[last] = -(-gain[last]).max(deeper);
    }
    gain[0].max(0)
}

/// Weakest remaining capturer of `side`, unless it is a king walking into a
/// square the other side still covers.
fn next_capturer(sides: &mut [Capturers; 2], side: usize) -> Option<Piece> {
    let first = sides[side].first()?;
    if first.is(Type::King) && !sides[1 - side].is_empty() {
        return None;
    }
    Some(sides[side].remove(0))
}

/// First slider behind `vacated` (seen from `target`) that now strikes `target`.
fn uncovered<B: BoardView + ?Sized>(board: &B, target: Square, vacated: Square, gone: &[Square]) -> Option<Piece> {
    if !aligned(target, vacated) {
        return None;
    }
    let dir = direction(target, vacated);
    let needed = if dir.0 != 0 && dir.1 != 0 { Capabilities::DIAGONAL } else { Capabilities::ORTHOGONAL };

    let mut sq = vacated;
    for _ in 0..steps_to_edge(vacated, dir) {
        sq = sq.offset(dir.0, dir.1)?;
        if gone.contains(&sq) {
            continue;
        }
        return match board.piece_at(sq) {
            None => continue,
            Some(p) if p.capabilities().contains(needed) => Some(*p),
            Some(_) => None,
        };
    }
    None
}
