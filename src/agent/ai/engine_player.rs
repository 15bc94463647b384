//! EnginePlayer - the AI decision layer
//!
//! On every turn the player snapshots the legal moves of the side to move and grows
//! one independent search tree per candidate on the rayon pool. All trees share one
//! evaluation cache and one cancellation token; nothing else crosses between them.
//!
//! # Selection
//!
//! The best evaluation for the side to move wins. Candidates that tie exactly on value
//! and depth are chosen between uniformly at random, so games against the engine vary
//! while a fixed seed keeps them reproducible.
//!
//! # Forced plans
//!
//! When the winning evaluation is a mate for the side to move, the rest of its line is
//! kept as a [`ForcedPlan`]. Later turns play the planned move without searching as
//! long as the opponent keeps answering as the plan expects.
//!
//! # Examples
//!
//! ```
//! use chess_core::agent::ai::EnginePlayer;
//! use chess_core::agent::Player;
//! use chess_core::config::Difficulty;
//! use chess_core::game_repr::Position;
//!
//! let mut engine = EnginePlayer::with_difficulty(Difficulty::Easy, Some(7));
//! let position = Position::default();
//! let mv = engine.get_move(&position, None).unwrap();
//! assert!(position.legal_moves().contains(&mv));
//! ```

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::context::SearchContext;
use super::evaluation_cache::EvaluationCache;
use super::plan::ForcedPlan;
use super::score::{self, compare, Evaluation};
use super::search_tree::evaluate_move;
use crate::agent::player::{GameResult, Player};
use crate::config::{Difficulty, SearchLimits};
use crate::game_repr::{Move, Position};

/// What one thinking episode produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub mv: Move,
    pub evaluation: Evaluation,
    /// Number of root moves searched
    pub candidates: usize,
    /// Number of root moves that tied with the chosen one
    pub tied: usize,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Searches every legal move of `position` concurrently and picks the best.
///
/// # Returns
///
/// * `Some(SearchOutcome)` - the chosen move and the line behind it
/// * `None` - the position has no legal moves, or `ctx` was cancelled before every
///   candidate finished
pub fn choose_move<R: Rng + ?Sized>(position: &Position, ctx: &SearchContext, rng: &mut R) -> Option<SearchOutcome> {
    let started = Instant::now();
    let candidates = position.legal_moves();
    if candidates.is_empty() {
        return None;
    }

    let results: Vec<(Move, Evaluation)> = candidates
        .par_iter()
        .map(|&mv| evaluate_move(ctx, position, mv).map(|evaluation| (mv, evaluation)))
        .collect::<Option<Vec<_>>>()?;

    assert_eq!(results.len(), candidates.len(), "every root move must produce an evaluation");

    let side = position.to_move();
    let best = score::max(results.iter().map(|(_, e)| e), side)?.clone();
    let tied: Vec<&(Move, Evaluation)> = results
        .iter()
        .filter(|(_, e)| compare(e, &best, side) == Ordering::Equal)
        .collect();

    let (mv, evaluation) = tied[rng.gen_range(0..tied.len())].clone();
    Some(SearchOutcome {
        mv,
        evaluation,
        candidates: results.len(),
        tied: tied.len(),
        nodes: ctx.stats.nodes(),
        elapsed: started.elapsed(),
    })
}

/// AI player growing one pruned search tree per candidate move.
///
/// # Thread Safety
///
/// The player itself is driven from one thread; the search inside `get_move()` runs on
/// its own rayon pool (or the global one if the pool could not be built).
pub struct EnginePlayer {
    /// Depth bounds and optional think time per move
    limits: SearchLimits,

    /// Display name for this AI player
    name: String,

    /// Evaluations shared by all trees, cleared when the full move number changes
    cache: Arc<EvaluationCache>,
    cached_move_number: Option<u32>,

    /// Tie-break source
    rng: StdRng,

    plan: ForcedPlan,

    pool: Option<rayon::ThreadPool>,

    last_outcome: Option<SearchOutcome>,
}

impl EnginePlayer {
    /// Create a new EnginePlayer.
    ///
    /// # Arguments
    ///
    /// * `limits` - Minimum and maximum depth and optional think time
    /// * `seed` - Seed for the tie-break generator; `None` seeds from entropy
    /// * `name` - Display name for this player
    pub fn new(limits: SearchLimits, seed: Option<u64>, name: String) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            limits,
            name,
            cache: Arc::new(EvaluationCache::new()),
            cached_move_number: None,
            rng,
            plan: ForcedPlan::default(),
            pool: build_pool(num_cpus::get()),
            last_outcome: None,
        }
    }

    /// Create an EnginePlayer for a difficulty level, named "AI ({difficulty})".
    pub fn with_difficulty(difficulty: Difficulty, seed: Option<u64>) -> Self {
        Self::new(difficulty.limits(), seed, format!("AI ({})", difficulty.name()))
    }

    /// Use `threads` worker threads for the search.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.pool = build_pool(threads);
        self
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// The forced line the player is currently following, if any.
    pub fn plan(&self) -> &ForcedPlan {
        &self.plan
    }

    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    /// Runs a full search of `position` without consulting or updating the plan.
    pub fn search(&mut self, position: &Position, budget: Option<Duration>) -> Option<SearchOutcome> {
        if self.cached_move_number != Some(position.fullmove_number()) {
            self.cache.clear();
            self.cached_move_number = Some(position.fullmove_number());
        }

        let mut limits = self.limits;
        limits.think_time = match (limits.think_time, budget) {
            (Some(own), Some(budget)) => Some(own.min(budget)),
            (own, budget) => own.or(budget),
        };
        let ctx = SearchContext::new(Arc::clone(&self.cache), limits);

        let rng = &mut self.rng;
        let outcome = match &self.pool {
            Some(pool) => pool.install(|| choose_move(position, &ctx, rng)),
            None => choose_move(position, &ctx, rng),
        };

        match &outcome {
            Some(outcome) => log::debug!(
                "[{}] {} from {} candidates ({} tied): value {:.2} at depth {}, {} nodes, {} pruned, {:?}",
                self.name,
                outcome.mv,
                outcome.candidates,
                outcome.tied,
                outcome.evaluation.value,
                outcome.evaluation.depth,
                outcome.nodes,
                ctx.stats.pruned(),
                outcome.elapsed,
            ),
            None => log::debug!("[{}] search produced no move", self.name),
        }
        outcome
    }

    /// Next move of the forced plan, if there is one and it is still legal here.
    fn planned_move(&mut self, position: &Position) -> Option<Move> {
        let mv = self.plan.take_own()?;
        if position.legal_moves().contains(&mv) {
            log::debug!("[{}] following forced plan: {} ({} moves left)", self.name, mv, self.plan.len());
            Some(mv)
        } else {
            log::warn!("[{}] planned move {} is not legal here, searching instead", self.name, mv);
            self.plan.clear();
            None
        }
    }
}

fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    match rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            log::warn!("could not build search pool ({err}), using the global pool");
            None
        }
    }
}

impl Player for EnginePlayer {
    fn get_move(&mut self, position: &Position, budget: Option<Duration>) -> Option<Move> {
        if let Some(mv) = self.planned_move(position) {
            return Some(mv);
        }

        let outcome = self.search(position, budget)?;
        let side = position.to_move();
        if outcome.evaluation.is_mate_for(side) {
            self.plan = ForcedPlan::from_path(&outcome.evaluation.path);
            log::info!(
                "[{}] forced mate found in {} plies: {}",
                self.name,
                outcome.evaluation.depth,
                self.plan.serialize()
            );
        }

        let mv = outcome.mv;
        self.last_outcome = Some(outcome);
        Some(mv)
    }

    fn opponent_moved(&mut self, mv: Move) {
        if self.plan.is_empty() {
            return;
        }
        let expected = self.plan.expects();
        if !self.plan.consume_opponent(mv) {
            log::warn!(
                "[{}] opponent played {} instead of {:?}, dropping forced plan",
                self.name,
                mv,
                expected.map(|m| m.to_string())
            );
        }
    }

    fn game_ended(&mut self, result: GameResult) {
        log::info!("[{}] game over: {:?}", self.name, result);
        self.plan.clear();
        self.cache.clear();
        self.cached_move_number = None;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
