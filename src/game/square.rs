//! Files, ranks and squares of the chessboard.
//!
//! Squares are indexed from A1 (0) to H8 (63), rank by rank. The public
//! coordinate API is 1-indexed, matching how files and ranks are named over
//! the board: file 1 is A, rank 1 is white's back rank.

use thiserror::Error;

use super::error::ChessError;

/// Files of a chessboard (A-H).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}
impl File {
    /// All files, from A to H.
    pub const FILES: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// A file from a given index.
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::FILES.get(index as usize).copied()
    }

    /// The 1-indexed number of this file (A is 1).
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Uppercase letter of the file, used for board labels.
    pub const fn letter(self) -> char {
        (b'A' + self as u8) as char
    }
}
impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter().to_ascii_lowercase())
    }
}
impl std::str::FromStr for File {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c @ ('a'..='h' | 'A'..='H')), None) => {
                Ok(Self::FILES[(c.to_ascii_lowercase() as u8 - b'a') as usize])
            }
            _ => Err(SquareParseError::InvalidFile(s.to_string())),
        }
    }
}

/// Ranks of a chessboard (1-8).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}
impl Rank {
    /// All ranks, from 1 to 8.
    pub const RANKS: [Self; 8] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// A rank from a given index.
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::RANKS.get(index as usize).copied()
    }

    /// The 1-indexed number of this rank.
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }
}
impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}
impl std::str::FromStr for Rank {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(Self::from_index)
            .ok_or_else(|| SquareParseError::InvalidRank(s.to_string()))
    }
}

/// Errors that may arise when parsing files, ranks or squares.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum SquareParseError {
    #[error("Invalid file: {0:?}")]
    InvalidFile(String),
    #[error("Invalid rank: {0:?}")]
    InvalidRank(String),
    #[error("Squares are two characters long, got {0:?}")]
    InvalidLength(String),
}

/// A square of the board, guaranteed to be on the board.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Square(u8);
impl Square {
    pub const A1: Self = Self::new(File::A, Rank::One);
    pub const B1: Self = Self::new(File::B, Rank::One);
    pub const C1: Self = Self::new(File::C, Rank::One);
    pub const D1: Self = Self::new(File::D, Rank::One);
    pub const E1: Self = Self::new(File::E, Rank::One);
    pub const F1: Self = Self::new(File::F, Rank::One);
    pub const G1: Self = Self::new(File::G, Rank::One);
    pub const H1: Self = Self::new(File::H, Rank::One);
    pub const A8: Self = Self::new(File::A, Rank::Eight);
    pub const B8: Self = Self::new(File::B, Rank::Eight);
    pub const C8: Self = Self::new(File::C, Rank::Eight);
    pub const D8: Self = Self::new(File::D, Rank::Eight);
    pub const E8: Self = Self::new(File::E, Rank::Eight);
    pub const F8: Self = Self::new(File::F, Rank::Eight);
    pub const G8: Self = Self::new(File::G, Rank::Eight);
    pub const H8: Self = Self::new(File::H, Rank::Eight);

    /// Instantiates a new square based on file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self((rank as u8) << 3 | file as u8)
    }

    /// Instantiates a square from 1-indexed file and rank numbers.
    /// # Errors
    /// Returns [`ChessError::OutOfRangeSquare`] if either coordinate is outside 1-8.
    /// ```
    /// # use knightwatch::game::square::Square;
    /// assert_eq!(Square::from_coords(5, 1), Ok(Square::E1));
    /// assert!(Square::from_coords(0, 4).is_err());
    /// ```
    pub fn from_coords(file: u8, rank: u8) -> Result<Self, ChessError> {
        match (
            file.checked_sub(1).and_then(File::from_index),
            rank.checked_sub(1).and_then(Rank::from_index),
        ) {
            (Some(f), Some(r)) => Ok(Self::new(f, r)),
            _ => Err(ChessError::OutOfRangeSquare { file, rank }),
        }
    }

    /// Instantiates a new square from its index.
    ///
    /// Returns `None` if the index is more than 63.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Linear index of the square, `(rank - 1) * 8 + (file - 1)`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the rank of the square.
    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::RANKS[(self.0 >> 3) as usize]
    }

    /// Returns the file of the square.
    #[inline]
    pub const fn file(self) -> File {
        File::FILES[(self.0 & 7) as usize]
    }

    /// Translates this square by a file and rank delta.
    ///
    /// Returns `None` if the translation would go out of the board.
    #[inline]
    pub fn offset(self, (file_delta, rank_delta): (i8, i8)) -> Option<Self> {
        let file = (self.file() as i8).checked_add(file_delta)?;
        let rank = (self.rank() as i8).checked_add(rank_delta)?;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Self((rank as u8) << 3 | file as u8))
        } else {
            None
        }
    }

    /// An iterator over all squares, ordered from A1 to H8.
    pub fn squares_iter() -> impl Iterator<Item = Self> {
        (0..64).map(Self)
    }

    /// An iterator over all squares in FEN order: rank 8 to 1, file A to H.
    pub fn squares_fen_iter() -> impl Iterator<Item = Self> {
        Rank::RANKS
            .into_iter()
            .rev()
            .flat_map(|rank| File::FILES.into_iter().map(move |file| Self::new(file, rank)))
    }
}
impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
impl std::str::FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 || !s.is_ascii() {
            return Err(SquareParseError::InvalidLength(s.to_string()));
        }
        Ok(Self::new(s[0..1].parse()?, s[1..2].parse()?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn coords_match_linear_index() {
        for rank in 1..=8 {
            for file in 1..=8 {
                let square = Square::from_coords(file, rank).unwrap();
                assert_eq!(
                    square.index(),
                    (rank as usize - 1) * 8 + (file as usize - 1)
                );
                assert_eq!(square.file().number(), file);
                assert_eq!(square.rank().number(), rank);
            }
        }
    }

    #[test]
    fn out_of_range_coords_are_rejected() {
        for (file, rank) in [(0, 1), (9, 1), (1, 0), (1, 9), (0, 0), (255, 255)] {
            assert_eq!(
                Square::from_coords(file, rank),
                Err(ChessError::OutOfRangeSquare { file, rank })
            );
        }
    }

    #[test]
    fn offset_does_not_wrap() {
        assert_eq!(Square::H1.offset((1, 0)), None);
        assert_eq!(Square::A1.offset((-1, 1)), None);
        assert_eq!(Square::A8.offset((0, 1)), None);
        assert_eq!(Square::E1.offset((1, 2)), "f3".parse().ok());
        assert_eq!(Square::E8.offset((-1, -1)), "d7".parse().ok());
    }

    #[test]
    fn parse_and_display() {
        let square: Square = "e4".parse().unwrap();
        assert_eq!(square, Square::new(File::E, Rank::Four));
        assert_eq!(square.to_string(), "e4");
        assert_eq!("E4".parse::<Square>(), Ok(square));
        assert!(matches!(
            "i4".parse::<Square>(),
            Err(SquareParseError::InvalidFile(_))
        ));
        assert!(matches!(
            "a9".parse::<Square>(),
            Err(SquareParseError::InvalidRank(_))
        ));
        assert!(matches!(
            "a10".parse::<Square>(),
            Err(SquareParseError::InvalidLength(_))
        ));
    }

    #[test]
    fn fen_order_starts_at_a8() {
        let squares: Vec<_> = Square::squares_fen_iter().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], Square::A8);
        assert_eq!(squares[7], Square::H8);
        assert_eq!(squares[63], Square::H1);
    }
}
