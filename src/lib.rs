//! # Knightwatch
//! A chess rules core over a 64-cell board: legal move generation, check
//! detection, move application with undo, and game status evaluation
//! (checkmate, stalemate, fifty-move and repetition draws).
//!
//! It is usable as both a library to embed into your own projects (GUIs, engines,
//! analysis tools) and a small standalone binary to inspect positions.
//! ```
//! # use knightwatch::game::{Game, status::GameStatus};
//! let mut game = Game::new();
//! for mv in ["f2f3", "e7e5", "g2g4"] {
//!     game.play_uci(mv.parse().unwrap()).unwrap();
//! }
//! assert_eq!(game.play_uci("d8h4".parse().unwrap()), Ok(GameStatus::Checkmate));
//! ```

pub mod game;
