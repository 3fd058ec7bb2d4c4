//! Implementation of Shatranj rules: the board, piece movement, legality and
//! game termination.

pub mod board;
pub mod catalog;
pub mod core;
pub mod game;
mod movegen;
mod rules;
