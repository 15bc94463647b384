// AI Agent - pruned tree search over a heuristic evaluator
//
// This module implements the engine side of the core: a static evaluator
// (material, mobility, square control with static exchange, king safety and
// pawn structure), a depth-bounded search tree extended along forcing lines
// and pruned against its parent's bound, and a player that searches every
// root move concurrently.
//
// Key features:
// - Evaluations are memoized by short key in a cache shared by all trees
// - Cooperative cancellation, polled once per node
// - Random tie-break between equal root moves, reproducible with a seed
// - Forced mates are remembered and replayed without searching

mod board_control;
mod context;
mod engine_player;
mod evaluation;
mod evaluation_cache;
mod exchange;
mod pawn_structure;
mod plan;
mod score;
mod search_tree;

#[cfg(test)]
mod tests;

pub use board_control::{board_control, ControlMap};
pub use context::{CancellationToken, SearchContext, SearchStats};
pub use engine_player::{choose_move, EnginePlayer, SearchOutcome};
pub use evaluation::{evaluate, full_evaluation, is_endgame};
pub use evaluation_cache::EvaluationCache;
pub use exchange::static_exchange;
pub use pawn_structure::pawn_structure;
pub use plan::ForcedPlan;
pub use score::{compare, max, Evaluation, MATE_VALUE};
pub use search_tree::{evaluate_move, Node, NodeId, SearchTree};
