//! Errors raised by the rules core.

use thiserror::Error;

use super::{piece::PieceKind, status::GameStatus};

/// Rule violations and invalid requests. None of these are transient: retrying
/// the same call on the same state fails the same way.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum ChessError {
    #[error("Square ({file}, {rank}) is off the board, files and ranks go from 1 to 8")]
    OutOfRangeSquare { file: u8, rank: u8 },
    #[error("Illegal move: {0}")]
    IllegalMove(String),
    #[error("No move to undo")]
    EmptyHistory,
    #[error("Cannot promote to {0:?}")]
    InvalidPromotionTarget(PieceKind),
    #[error("The game is over ({0})")]
    GameOver(GameStatus),
}
