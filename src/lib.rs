//! Chess rules core and search engine.
//!
//! - [`game_repr`]: board model, move generation, check detection and positions
//! - [`arbiter`]: terminal states and repetition counting
//! - [`agent`]: the player abstraction, scripted and click-driven players, and the engine
//! - [`board`] and [`orchestrator`]: live game progression with events and clocks

pub mod agent;
pub mod arbiter;
pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod game_repr;
pub mod orchestrator;

pub use error::{ChessError, ChessResult};
