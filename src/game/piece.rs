//! Piece types encoding and movement geometry.

use std::str::FromStr;

use thiserror::Error;

use super::{colour::Colour, error::ChessError};

/// Total number of different piece kinds (6).
pub const NUM_PIECES: usize = 6;

const PIECE_SYMBOLS: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];

/// Complete set of information for identifying a piece (colour and kind).
///
/// Empty squares are represented as `Option::<Piece>::None` rather than a
/// colourless piece.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}
impl Piece {
    pub const WHITE_PAWN: Self = Self::new(PieceKind::Pawn, Colour::White);
    pub const WHITE_KNIGHT: Self = Self::new(PieceKind::Knight, Colour::White);
    pub const WHITE_BISHOP: Self = Self::new(PieceKind::Bishop, Colour::White);
    pub const WHITE_ROOK: Self = Self::new(PieceKind::Rook, Colour::White);
    pub const WHITE_QUEEN: Self = Self::new(PieceKind::Queen, Colour::White);
    pub const WHITE_KING: Self = Self::new(PieceKind::King, Colour::White);
    pub const BLACK_PAWN: Self = Self::new(PieceKind::Pawn, Colour::Black);
    pub const BLACK_KNIGHT: Self = Self::new(PieceKind::Knight, Colour::Black);
    pub const BLACK_BISHOP: Self = Self::new(PieceKind::Bishop, Colour::Black);
    pub const BLACK_ROOK: Self = Self::new(PieceKind::Rook, Colour::Black);
    pub const BLACK_QUEEN: Self = Self::new(PieceKind::Queen, Colour::Black);
    pub const BLACK_KING: Self = Self::new(PieceKind::King, Colour::Black);

    /// Creates a new `kind` piece of the given `colour`.
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    /// Returns the piece's FEN symbol, uppercase for white.
    /// # Example
    /// ```
    /// # use knightwatch::game::piece::*;
    /// assert_eq!(Piece::BLACK_PAWN.symbol(), 'p');
    /// assert_eq!(Piece::WHITE_KNIGHT.symbol(), 'N');
    /// ```
    pub const fn symbol(&self) -> char {
        PIECE_SYMBOLS[self.colour as usize * 6 + self.kind as usize]
    }

    /// Reads a FEN symbol, uppercase for white.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let index = PIECE_SYMBOLS.iter().position(|&c| c == symbol)?;
        Some(Self::new(
            PieceKind::PIECE_KINDS[index % 6],
            Colour::from(index >= 6),
        ))
    }

    /// Three character cell used when drawing the board: `" K "` for a white
    /// king, `"_K_"` for a black one.
    pub const fn board_symbol(&self) -> &'static str {
        match (self.colour, self.kind) {
            (Colour::White, PieceKind::King) => " K ",
            (Colour::White, PieceKind::Queen) => " Q ",
            (Colour::White, PieceKind::Rook) => " R ",
            (Colour::White, PieceKind::Bishop) => " B ",
            (Colour::White, PieceKind::Knight) => " N ",
            (Colour::White, PieceKind::Pawn) => " P ",
            (Colour::Black, PieceKind::King) => "_K_",
            (Colour::Black, PieceKind::Queen) => "_Q_",
            (Colour::Black, PieceKind::Rook) => "_R_",
            (Colour::Black, PieceKind::Bishop) => "_B_",
            (Colour::Black, PieceKind::Knight) => "_N_",
            (Colour::Black, PieceKind::Pawn) => "_P_",
        }
    }
}
impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Error)]
pub enum PieceParseError {
    #[error("{0} is not a valid piece symbol")]
    InvalidPieceSymbol(char),
    #[error("Empty input")]
    EmptyInput,
    #[error("A piece can only be one character long")]
    InputTooLong,
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let symbol = chars.next().ok_or(PieceParseError::EmptyInput)?;
        if chars.next().is_some() {
            return Err(PieceParseError::InputTooLong);
        }
        Self::from_symbol(symbol).ok_or(PieceParseError::InvalidPieceSymbol(symbol))
    }
}

/// The kind of a piece, one of Pawn, Knight, Bishop, Rook, Queen or King.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}
impl PieceKind {
    /// All piece kinds.
    pub const PIECE_KINDS: [Self; NUM_PIECES] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Iterator over all piece kinds.
    pub fn iter() -> impl Iterator<Item = Self> {
        Self::PIECE_KINDS.into_iter()
    }

    /// Checks if this piece kind can be promoted to.
    ///
    /// Returns true for all pieces but pawns and kings.
    pub const fn is_valid_promotion_target(&self) -> bool {
        !matches!(self, PieceKind::Pawn | PieceKind::King)
    }

    /// Movement geometry of this piece kind, oriented for white.
    ///
    /// Pawn captures are not part of the pattern, see [`PAWN_CAPTURES`].
    pub const fn pattern(self) -> MovePattern {
        match self {
            PieceKind::Pawn => MovePattern {
                directions: &PAWN_PUSH,
                sliding: false,
                max_steps: 2,
            },
            PieceKind::Knight => MovePattern {
                directions: &KNIGHT_DIRECTIONS,
                sliding: false,
                max_steps: 1,
            },
            PieceKind::Bishop => MovePattern {
                directions: &DIAGONAL_DIRECTIONS,
                sliding: true,
                max_steps: 7,
            },
            PieceKind::Rook => MovePattern {
                directions: &ORTHOGONAL_DIRECTIONS,
                sliding: true,
                max_steps: 7,
            },
            PieceKind::Queen => MovePattern {
                directions: &ROYAL_DIRECTIONS,
                sliding: true,
                max_steps: 7,
            },
            PieceKind::King => MovePattern {
                directions: &ROYAL_DIRECTIONS,
                sliding: false,
                max_steps: 1,
            },
        }
    }
}
impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", PIECE_SYMBOLS[*self as usize + 6])
    }
}

/// A (file, rank) displacement.
pub type Direction = (i8, i8);

/// Single forward step of a pawn.
pub const PAWN_PUSH: [Direction; 1] = [(0, 1)];
/// Diagonal capture steps of a pawn, west first.
pub const PAWN_CAPTURES: [Direction; 2] = [(-1, 1), (1, 1)];
pub const ORTHOGONAL_DIRECTIONS: [Direction; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL_DIRECTIONS: [Direction; 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];
pub const ROYAL_DIRECTIONS: [Direction; 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];
pub const KNIGHT_DIRECTIONS: [Direction; 8] = [
    (1, -2),
    (2, -1),
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (-1, -2),
    (-2, -1),
];

/// Direction vectors of a piece plus how far along each it may travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovePattern {
    pub directions: &'static [Direction],
    /// Sliders walk each direction until blocked, other pieces stop after
    /// `max_steps` and pawns only take a second step from their starting rank.
    pub sliding: bool,
    pub max_steps: u8,
}

/// Orients a white-relative direction for `colour` by mirroring its rank component.
#[inline]
pub const fn orient((file_delta, rank_delta): Direction, colour: Colour) -> Direction {
    (file_delta, rank_delta * colour.forward())
}

/// Pieces a pawn may promote to: knight, bishop, rook and queen.
///
/// Using this type rather than [`PieceKind`] keeps promotion to a pawn or a
/// king unrepresentable.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum PromotionTarget {
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
}
impl PromotionTarget {
    /// Promotion choices in move generation order.
    pub const TARGETS: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Converts this promotion target to the corresponding piece kind.
    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            Self::Knight => PieceKind::Knight,
            Self::Bishop => PieceKind::Bishop,
            Self::Rook => PieceKind::Rook,
            Self::Queen => PieceKind::Queen,
        }
    }
}
impl TryFrom<PieceKind> for PromotionTarget {
    type Error = ChessError;

    fn try_from(value: PieceKind) -> Result<Self, Self::Error> {
        match value {
            PieceKind::Knight => Ok(Self::Knight),
            PieceKind::Bishop => Ok(Self::Bishop),
            PieceKind::Rook => Ok(Self::Rook),
            PieceKind::Queen => Ok(Self::Queen),
            PieceKind::Pawn | PieceKind::King => Err(ChessError::InvalidPromotionTarget(value)),
        }
    }
}
impl From<PromotionTarget> for PieceKind {
    fn from(value: PromotionTarget) -> Self {
        value.to_piece_kind()
    }
}
impl std::fmt::Display for PromotionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_piece_kind())
    }
}
