//! # Game state machine
//! A [`Game`] owns a [`Position`] and the stack of moves played on it, which
//! gives it linear undo and the knowledge needed for repetition draws.

use super::{
    action::{Move, MoveList, UciMove},
    error::ChessError,
    history::HistoryEntry,
    position::Position,
    status::GameStatus,
};

/// A game in progress: the current position plus everything played to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,
    history: Vec<HistoryEntry>,
}
impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
impl Game {
    /// Starts a game from the initial position.
    pub fn new() -> Self {
        Self::from_position(Position::initial())
    }

    /// Starts a game from an arbitrary position, with an empty history.
    pub fn from_position(position: Position) -> Self {
        Self {
            position,
            history: Vec::with_capacity(128),
        }
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Moves played so far, oldest first, with the state they overwrote.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Moves played so far, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|entry| entry.played)
    }

    /// Legal moves in the current position. Empty once the game is over, even
    /// when the game ended by a draw rule.
    pub fn legal_moves(&self) -> MoveList {
        if self.status().is_terminal() {
            MoveList::new()
        } else {
            self.position.legal_moves()
        }
    }

    /// Checks if the current position occurred twice before since the last
    /// capture or pawn move.
    pub fn threefold_repetition(&self) -> bool {
        let hash = self.position.zobrist_hash();
        let reversible = (self.position.halfmove_clock() as usize).min(self.history.len());
        self.history[self.history.len() - reversible..]
            .iter()
            .filter(|entry| entry.hash == hash)
            .count()
            >= 2
    }

    /// Status of the game in its current position.
    ///
    /// A side without legal moves is checkmated or stalemated even when a draw
    /// rule also applies; the fifty-move rule is checked before repetitions.
    pub fn status(&self) -> GameStatus {
        self.position
            .status_given_repetition(self.threefold_repetition())
    }

    /// Plays a move, returning the status of the game after it.
    /// # Errors
    /// - [`ChessError::GameOver`] if the game already ended.
    /// - [`ChessError::InvalidPromotionTarget`] if a non-promoting move carries a
    ///   promotion piece.
    /// - [`ChessError::IllegalMove`] if the move is not legal in the current position.
    pub fn play(&mut self, mv: Move) -> Result<GameStatus, ChessError> {
        self.ensure_in_progress()?;
        let entry = self
            .position
            .make(mv)
            .inspect_err(|err| log::warn!("Rejected move {mv}: {err}"))?;
        self.history.push(entry);
        log::debug!("Played {mv}, {} to move", self.position.side_to_move());

        let status = self.status();
        if status.is_terminal() {
            log::info!("Game over after {} plies: {status}", self.history.len());
        }
        Ok(status)
    }

    /// Resolves a coordinate move against the legal moves and plays it.
    /// # Errors
    /// Same as [`play`](Self::play), plus [`ChessError::InvalidPromotionTarget`]
    /// when a promotion piece is given for a move that does not promote.
    pub fn play_uci(&mut self, uci: UciMove) -> Result<GameStatus, ChessError> {
        self.ensure_in_progress()?;
        let mv = self
            .position
            .find_move(uci)
            .inspect_err(|err| log::warn!("Rejected move {uci}: {err}"))?;
        self.play(mv)
    }

    /// Takes back the last move, returning it. Undoing is allowed after the
    /// game ended and puts it back in progress.
    /// # Errors
    /// Fails with [`ChessError::EmptyHistory`] if no move was played.
    pub fn undo(&mut self) -> Result<Move, ChessError> {
        let entry = self.history.pop().ok_or(ChessError::EmptyHistory)?;
        self.position.unmake(entry);
        log::debug!("Undid {}", entry.played);
        Ok(entry.played)
    }

    fn ensure_in_progress(&self) -> Result<(), ChessError> {
        let status = self.status();
        if status.is_terminal() {
            log::warn!("Move rejected, the game is over ({status})");
            Err(ChessError::GameOver(status))
        } else {
            Ok(())
        }
    }
}
impl From<Position> for Game {
    fn from(position: Position) -> Self {
        Self::from_position(position)
    }
}
impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}\n", self.position)?;
        write!(f, "{} to move: {}", self.position.side_to_move(), self.status())
    }
}
