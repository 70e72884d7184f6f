//! Colours for each players and their pieces.

/// Number of different colours (2).
pub const NUM_COLOURS: usize = 2;

/// Colour enumeration.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum Colour {
    White = 0,
    Black = 1,
}
impl Colour {
    /// Both colours, white first.
    pub const COLOURS: [Self; NUM_COLOURS] = [Colour::White, Colour::Black];

    /// Inverts the colour in place.
    /// # Example
    /// ```
    /// # use knightwatch::game::colour::Colour;
    /// let mut side_to_move = Colour::White;
    /// side_to_move.invert();
    /// assert_eq!(side_to_move, Colour::Black);
    /// ```
    #[inline]
    pub fn invert(&mut self) {
        *self = self.inverse()
    }

    /// Returns the inverse of this colour.
    #[inline]
    pub const fn inverse(&self) -> Self {
        match self {
            Colour::White => Colour::Black,
            Colour::Black => Colour::White,
        }
    }

    /// Checks if the colour variant is white.
    #[inline]
    pub const fn is_white(&self) -> bool {
        matches!(self, Colour::White)
    }

    /// Checks if the colour variant is black.
    #[inline]
    pub const fn is_black(&self) -> bool {
        matches!(self, Colour::Black)
    }

    /// Rank direction in which this side's pawns advance (+1 for white, -1 for black).
    #[inline]
    pub const fn forward(&self) -> i8 {
        match self {
            Colour::White => 1,
            Colour::Black => -1,
        }
    }
}
impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.is_black() { "Black" } else { "White" })
    }
}
impl From<bool> for Colour {
    fn from(value: bool) -> Self {
        if value {
            Self::Black
        } else {
            Self::White
        }
    }
}
