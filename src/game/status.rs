//! Game-level states.

/// Status of a game after the last move played.
///
/// Every status but [`InProgress`](GameStatus::InProgress) and
/// [`Check`](GameStatus::Check) is terminal.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
    DrawFiftyMove,
    DrawRepetition,
}
impl GameStatus {
    /// Checks if no more moves can be played.
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::InProgress | Self::Check => false,
            Self::Checkmate | Self::Stalemate | Self::DrawFiftyMove | Self::DrawRepetition => true,
        }
    }

    /// Checks if the game ended in a draw.
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            Self::Stalemate | Self::DrawFiftyMove | Self::DrawRepetition
        )
    }
}
impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::InProgress => "in progress",
                Self::Check => "check",
                Self::Checkmate => "checkmate",
                Self::Stalemate => "stalemate",
                Self::DrawFiftyMove => "draw by the fifty-move rule",
                Self::DrawRepetition => "draw by threefold repetition",
            }
        )
    }
}
