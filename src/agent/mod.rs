pub mod player;
pub use player::*;

pub mod human_player;
pub use human_player::*;

pub mod scripted_player;
pub use scripted_player::*;

pub mod ai;
pub use ai::{EnginePlayer, SearchOutcome};
