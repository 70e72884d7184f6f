//! Castling rights, four independent flags packed in a byte.

use std::str::FromStr;

use thiserror::Error;

use super::{colour::Colour, square::Square, zobrist::ZOBRIST_KEYS};

/// Efficient representation of castling rights.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CastlingRights(u8);
impl CastlingRights {
    const KINGSIDE_WHITE: u8 = 0b0001;
    const QUEENSIDE_WHITE: u8 = 0b0010;
    const KINGSIDE_BLACK: u8 = 0b0100;
    const QUEENSIDE_BLACK: u8 = 0b1000;
    const FULL: u8 =
        Self::KINGSIDE_BLACK | Self::KINGSIDE_WHITE | Self::QUEENSIDE_BLACK | Self::QUEENSIDE_WHITE;
    const EMPTY: u8 = 0;

    /// Full castling rights for both sides.
    pub const fn full() -> Self {
        Self(Self::FULL)
    }

    /// No castling rights for any sides.
    pub const fn none() -> Self {
        Self(Self::EMPTY)
    }

    /// Returns `true` if none of the sides can castle.
    pub const fn is_none(self) -> bool {
        self.0 == Self::EMPTY
    }

    /// Checks if kingside castling is allowed for a certain colour.
    #[inline(always)]
    pub const fn kingside_castle_allowed(self, colour: Colour) -> bool {
        self.0 & Self::kingside_flag(colour) != 0
    }

    /// Checks if queenside castling is allowed for a certain colour.
    #[inline(always)]
    pub const fn queenside_castle_allowed(self, colour: Colour) -> bool {
        self.0 & Self::queenside_flag(colour) != 0
    }

    /// Disallows kingside castling for a given side.
    #[inline(always)]
    pub fn disallow_kingside_castle(&mut self, colour: Colour) {
        self.0 &= !Self::kingside_flag(colour)
    }

    /// Disallows queenside castling for a given side.
    #[inline(always)]
    pub fn disallow_queenside_castle(&mut self, colour: Colour) {
        self.0 &= !Self::queenside_flag(colour)
    }

    /// Disallows both castling moves for a given side.
    pub fn disallow(&mut self, colour: Colour) {
        self.0 &= !(Self::kingside_flag(colour) | Self::queenside_flag(colour))
    }

    /// Allows kingside castling for a given side.
    #[inline(always)]
    pub fn allow_kingside_castle(&mut self, colour: Colour) {
        self.0 |= Self::kingside_flag(colour)
    }

    /// Allows queenside castling for a given side.
    #[inline(always)]
    pub fn allow_queenside_castle(&mut self, colour: Colour) {
        self.0 |= Self::queenside_flag(colour)
    }

    /// Drops whichever right depends on a piece standing on `square`.
    ///
    /// Called with both squares of every move: a king or rook leaving its home
    /// square, or a rook being captured on it, loses the matching right for good.
    pub fn update_for_square(&mut self, square: Square) {
        match square {
            Square::E1 => self.disallow(Colour::White),
            Square::A1 => self.disallow_queenside_castle(Colour::White),
            Square::H1 => self.disallow_kingside_castle(Colour::White),
            Square::E8 => self.disallow(Colour::Black),
            Square::A8 => self.disallow_queenside_castle(Colour::Black),
            Square::H8 => self.disallow_kingside_castle(Colour::Black),
            _ => (),
        }
    }

    /// Returns the Zobrist hash of these castling rights.
    #[inline(always)]
    pub(crate) fn zobrist_hash(self) -> u64 {
        let mut hash = 0;
        for i in 0..4 {
            if self.0 & (1 << i) != 0 {
                hash ^= ZOBRIST_KEYS.castling(i)
            }
        }
        hash
    }

    const fn kingside_flag(colour: Colour) -> u8 {
        match colour {
            Colour::White => Self::KINGSIDE_WHITE,
            Colour::Black => Self::KINGSIDE_BLACK,
        }
    }

    const fn queenside_flag(colour: Colour) -> u8 {
        match colour {
            Colour::White => Self::QUEENSIDE_WHITE,
            Colour::Black => Self::QUEENSIDE_BLACK,
        }
    }
}
impl Default for CastlingRights {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum CastlingRightsParseError {
    #[error("Unexpected castling rights character: {0}")]
    UnexpectedToken(char),
    #[error("Castling right {0} is repeated")]
    Repeated(char),
    #[error("Empty castling rights, use '-' for none")]
    Empty,
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Self::none());
        }
        if s.is_empty() {
            return Err(CastlingRightsParseError::Empty);
        }

        let mut rights = Self::EMPTY;
        for c in s.chars() {
            let flag = match c {
                'K' => Self::KINGSIDE_WHITE,
                'Q' => Self::QUEENSIDE_WHITE,
                'k' => Self::KINGSIDE_BLACK,
                'q' => Self::QUEENSIDE_BLACK,
                _ => return Err(CastlingRightsParseError::UnexpectedToken(c)),
            };
            if rights & flag != 0 {
                return Err(CastlingRightsParseError::Repeated(c));
            }
            rights |= flag
        }
        Ok(Self(rights))
    }
}
impl std::fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            return write!(f, "-");
        }

        if self.kingside_castle_allowed(Colour::White) {
            write!(f, "K")?
        }
        if self.queenside_castle_allowed(Colour::White) {
            write!(f, "Q")?
        }
        if self.kingside_castle_allowed(Colour::Black) {
            write!(f, "k")?
        }
        if self.queenside_castle_allowed(Colour::Black) {
            write!(f, "q")?
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_are_independent() {
        let mut rights = CastlingRights::full();
        rights.disallow_kingside_castle(Colour::White);
        assert!(!rights.kingside_castle_allowed(Colour::White));
        assert!(rights.queenside_castle_allowed(Colour::White));
        assert!(rights.kingside_castle_allowed(Colour::Black));
        assert!(rights.queenside_castle_allowed(Colour::Black));

        rights.disallow(Colour::Black);
        assert_eq!(rights.to_string(), "Q");

        rights.allow_kingside_castle(Colour::Black);
        assert_eq!(rights.to_string(), "Qk");
    }

    #[test]
    fn home_squares_clear_rights() {
        let mut rights = CastlingRights::full();
        rights.update_for_square(Square::H8);
        assert_eq!(rights.to_string(), "KQq");
        rights.update_for_square(Square::E1);
        assert_eq!(rights.to_string(), "q");
        rights.update_for_square("d4".parse().unwrap());
        assert_eq!(rights.to_string(), "q");
    }

    #[test]
    fn parse_round_trip() {
        for s in ["KQkq", "Kq", "k", "-"] {
            assert_eq!(s.parse::<CastlingRights>().unwrap().to_string(), s);
        }
        assert_eq!(
            "KK".parse::<CastlingRights>(),
            Err(CastlingRightsParseError::Repeated('K'))
        );
        assert_eq!(
            "KX".parse::<CastlingRights>(),
            Err(CastlingRightsParseError::UnexpectedToken('X'))
        );
        assert_eq!(
            "".parse::<CastlingRights>(),
            Err(CastlingRightsParseError::Empty)
        );
    }
}
