use super::*;

mod starting_position;
mod kiwipete;
mod endgame;
mod promotions;
mod middle_game;
