mod square;
mod piece;
mod moves;
mod view;
mod position;
pub mod fen;
pub mod piece_moves;
pub mod threats;

#[cfg(test)]
mod tests;

pub use square::*;
pub use piece::*;
pub use moves::*;
pub use view::*;
pub use position::*;
pub use threats::{Threat, Threats};
