//! # Chess API
//! This module contains everything chess related: pieces and squares, the board
//! state, move generation, check detection and the game state machine.

pub mod action;
pub mod attacks;
pub mod castling_rights;
pub mod colour;
pub mod error;
pub mod fen;
pub mod history;
pub mod movegen;
#[cfg(feature = "perft")]
pub mod perft;
pub mod piece;
pub mod position;
pub mod square;
mod state;
pub mod status;
mod zobrist;

pub use state::Game;
