//! # Representation, parsing and formatting of chess moves.
//! [`Move`] is the fully described move produced by the move generator and
//! consumed by [`Position::make_legal`](super::position::Position::make_legal).
//! [`UciMove`] is the bare coordinate form (`e2e4`, `e7e8q`) a user or a GUI
//! types, which is resolved against the legal moves of a position.

use thiserror::Error;

use super::{
    error::ChessError,
    piece::{Piece, PieceKind, PromotionTarget},
    square::Square,
};

/// Move list used by the generator. No chess position has more than 218 legal
/// moves; 256 leaves room for pseudo-legal ones.
pub type MoveList = heapless::Vec<Move, 256>;

/// What a move does beyond relocating the moving piece.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum MoveKind {
    /// Move to an empty square, including pawn double pushes.
    Quiet,
    Capture,
    /// King move of two squares, the rook is relocated alongside it.
    Castle,
    /// Pawn capture onto the en passant target, the captured pawn sits behind it.
    EnPassant,
    /// Pawn reaching the far rank, capturing or not.
    Promotion,
}

/// A fully described chess move.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct Move {
    pub origin: Square,
    pub target: Square,
    /// The piece standing on `origin` before the move.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    pub promotion: Option<PromotionTarget>,
}
impl Move {
    /// Creates a new quiet move.
    #[inline(always)]
    pub const fn new_quiet(origin: Square, target: Square, piece: Piece) -> Self {
        Self {
            origin,
            target,
            piece,
            captured: None,
            kind: MoveKind::Quiet,
            promotion: None,
        }
    }

    /// Creates a new capture.
    #[inline(always)]
    pub const fn new_capture(origin: Square, target: Square, piece: Piece, captured: Piece) -> Self {
        Self {
            origin,
            target,
            piece,
            captured: Some(captured),
            kind: MoveKind::Capture,
            promotion: None,
        }
    }

    /// Creates an en passant capture. The captured pawn is the opponent's.
    #[inline(always)]
    pub const fn new_en_passant(origin: Square, target: Square, piece: Piece) -> Self {
        Self {
            origin,
            target,
            piece,
            captured: Some(Piece::new(PieceKind::Pawn, piece.colour.inverse())),
            kind: MoveKind::EnPassant,
            promotion: None,
        }
    }

    /// Creates a castling move, described by the king's displacement.
    #[inline(always)]
    pub const fn new_castle(origin: Square, target: Square, king: Piece) -> Self {
        Self {
            origin,
            target,
            piece: king,
            captured: None,
            kind: MoveKind::Castle,
            promotion: None,
        }
    }

    /// Creates a promotion to the given piece kind.
    /// # Errors
    /// Fails with [`ChessError::InvalidPromotionTarget`] if `promoting_to` is a
    /// pawn or a king.
    pub fn new_promotion(
        origin: Square,
        target: Square,
        piece: Piece,
        captured: Option<Piece>,
        promoting_to: PieceKind,
    ) -> Result<Self, ChessError> {
        Ok(Self {
            origin,
            target,
            piece,
            captured,
            kind: MoveKind::Promotion,
            promotion: Some(PromotionTarget::try_from(promoting_to)?),
        })
    }

    /// Checks if this move captures a piece.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Checks if this move resets the half-move clock (pawn moves and captures).
    #[inline(always)]
    pub const fn is_irreversible(&self) -> bool {
        self.is_capture() || matches!(self.piece.kind, PieceKind::Pawn)
    }

    /// Square of the captured piece, which differs from the target for en passant.
    pub fn capture_square(&self) -> Option<Square> {
        match self.kind {
            MoveKind::EnPassant => Some(Square::new(self.target.file(), self.origin.rank())),
            _ if self.is_capture() => Some(self.target),
            _ => None,
        }
    }

    /// The piece standing on `target` once the move is made.
    pub fn placed_piece(&self) -> Piece {
        match self.promotion {
            Some(to) => Piece::new(to.to_piece_kind(), self.piece.colour),
            None => self.piece,
        }
    }
}
impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", UciMove::from(self))
    }
}

/// Pure coordinate notation move, mainly used for parsing user input.
///
/// These can be passed to a [`Position`](super::position::Position) to find the
/// matching [`Move`], which is then usable for making moves.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct UciMove {
    pub origin: Square,
    pub target: Square,
    pub promoting_to: Option<PieceKind>,
}
impl From<&Move> for UciMove {
    fn from(value: &Move) -> Self {
        Self {
            origin: value.origin,
            target: value.target,
            promoting_to: value.promotion.map(PromotionTarget::to_piece_kind),
        }
    }
}
impl From<Move> for UciMove {
    fn from(value: Move) -> Self {
        Self::from(&value)
    }
}
impl std::fmt::Display for UciMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.origin, self.target)?;
        if let Some(kind) = self.promoting_to {
            write!(f, "{kind}")?
        }
        Ok(())
    }
}

/// Errors that may arise when parsing UCI moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum UciParseError {
    #[error("Invalid origin square")]
    InvalidOriginSquare,
    #[error("Invalid target square")]
    InvalidTargetSquare,
    #[error("Cannot promote to {0:?}")]
    InvalidPromotion(Option<PieceKind>),
    #[error("UCI moves are at least 4 characters, got {0}")]
    TooLittleChars(usize),
    #[error("UCI moves are at most 5 characters, got {0}")]
    TooManyChars(usize),
}

impl std::str::FromStr for UciMove {
    type Err = UciParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err(UciParseError::TooLittleChars(s.len()));
        } else if s.len() > 5 {
            return Err(UciParseError::TooManyChars(s.len()));
        }
        if !s.is_ascii() {
            return Err(UciParseError::InvalidOriginSquare);
        }

        let origin = s[0..2]
            .parse()
            .map_err(|_| UciParseError::InvalidOriginSquare)?;
        let target = s[2..4]
            .parse()
            .map_err(|_| UciParseError::InvalidTargetSquare)?;
        let promoting_to = if s.len() == 5 {
            match s[4..5].parse::<Piece>() {
                Ok(piece) if piece.kind.is_valid_promotion_target() => Some(piece.kind),
                Ok(piece) => Err(UciParseError::InvalidPromotion(Some(piece.kind)))?,
                Err(_) => Err(UciParseError::InvalidPromotion(None))?,
            }
        } else {
            None
        };

        Ok(Self {
            origin,
            target,
            promoting_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn uci_parse() {
        assert_eq!(
            "e4e5".parse(),
            Ok(UciMove {
                origin: square("e4"),
                target: square("e5"),
                promoting_to: None
            })
        );
    }

    #[test]
    fn uci_parse_promotion() {
        assert_eq!(
            "e7e8b".parse(),
            Ok(UciMove {
                origin: square("e7"),
                target: Square::E8,
                promoting_to: Some(PieceKind::Bishop)
            })
        );
    }

    #[test]
    fn uci_parse_invalid_origin() {
        assert_eq!(
            "l3e5".parse::<UciMove>(),
            Err(UciParseError::InvalidOriginSquare)
        );
    }

    #[test]
    fn uci_parse_invalid_target() {
        assert_eq!(
            "e3i6".parse::<UciMove>(),
            Err(UciParseError::InvalidTargetSquare)
        );
    }

    #[test]
    fn uci_parse_invalid_promotion() {
        assert_eq!(
            "e4e5p".parse::<UciMove>(),
            Err(UciParseError::InvalidPromotion(Some(PieceKind::Pawn)))
        );
        assert_eq!(
            "e4e5k".parse::<UciMove>(),
            Err(UciParseError::InvalidPromotion(Some(PieceKind::King)))
        );
        assert_eq!(
            "e4e5l".parse::<UciMove>(),
            Err(UciParseError::InvalidPromotion(None))
        );
    }

    #[test]
    fn uci_parse_wrong_length() {
        assert_eq!(
            "e4e".parse::<UciMove>(),
            Err(UciParseError::TooLittleChars(3))
        );
        assert_eq!(
            "e4e5bk".parse::<UciMove>(),
            Err(UciParseError::TooManyChars(6))
        );
    }

    #[test]
    fn promotion_constructor_rejects_kings() {
        assert_eq!(
            Move::new_promotion(
                square("a7"),
                Square::A8,
                Piece::WHITE_PAWN,
                None,
                PieceKind::King
            ),
            Err(ChessError::InvalidPromotionTarget(PieceKind::King))
        );
        let mv = Move::new_promotion(
            square("a7"),
            Square::B8,
            Piece::WHITE_PAWN,
            Some(Piece::BLACK_KNIGHT),
            PieceKind::Queen,
        )
        .unwrap();
        assert_eq!(mv.placed_piece(), Piece::WHITE_QUEEN);
        assert_eq!(mv.to_string(), "a7b8q");
        assert_eq!(mv.capture_square(), Some(Square::B8));
    }

    #[test]
    fn en_passant_captures_behind_target() {
        let mv = Move::new_en_passant(square("e5"), square("d6"), Piece::WHITE_PAWN);
        assert_eq!(mv.captured, Some(Piece::BLACK_PAWN));
        assert_eq!(mv.capture_square(), Some(square("d5")));
        assert!(mv.is_irreversible());
    }
}
