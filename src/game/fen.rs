//! # FEN string utilities

use thiserror::Error;

use super::{
    colour::Colour,
    piece::{Piece, PieceKind},
    position::Position,
    square::{File, Rank, Square},
};

/// FEN parsing errors.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Error)]
pub enum FenError {
    #[error("Found a non-ASCII character")]
    NonAscii,
    #[error("FEN string missing the {0} section")]
    Incomplete(&'static str),
    #[error("Unexpected character at index {index}: {val}")]
    UnexpectedToken { index: usize, val: char },
    #[error("A rank of the piece section only defines {0} squares out of 8")]
    IncompletePieceSection(u8),
    #[error("The piece section only defines {0} squares out of 64")]
    TooFewSquares(usize),
    #[error("The piece section defines too many squares")]
    TooManySquares,
    #[error("Invalid side to move: {0:?}")]
    InvalidSideToMove(String),
    #[error("Invalid castling rights: {0:?}")]
    InvalidCastlingRights(String),
    #[error("Invalid en passant square: {0:?}")]
    InvalidEnPassant(String),
    #[error("Invalid move counter: {0:?}")]
    InvalidCounter(String),
    #[error("{colour} has {count} kings, expected exactly one")]
    KingCount { colour: Colour, count: usize },
    #[error("Pawn on back rank square {0}")]
    PawnOnBackRank(Square),
}

/// FEN of the initial position.
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parses a position from a FEN string.
    ///
    /// The half-move clock and full-move number may be omitted, in which case
    /// they default to 0 and 1.
    /// # Errors
    /// Fails with a [`FenError`] describing the first problem found. Positions
    /// without exactly one king per side, with pawns on the first or last rank,
    /// or with an en passant target that no pawn was pushed past, are rejected.
    /// ```
    /// # use knightwatch::game::{position::Position, fen::INITIAL_FEN};
    /// assert_eq!(Position::from_fen(INITIAL_FEN), Ok(Position::initial()));
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        if !fen.is_ascii() {
            return Err(FenError::NonAscii);
        }

        let mut position = Self::empty();
        let mut sections = fen.split_ascii_whitespace();

        let pieces = sections.next().ok_or(FenError::Incomplete("pieces"))?;
        parse_pieces(&mut position, pieces)?;

        let side_to_move = match sections.next().ok_or(FenError::Incomplete("side to move"))? {
            "w" => Colour::White,
            "b" => Colour::Black,
            s => return Err(FenError::InvalidSideToMove(s.to_string())),
        };
        position.set_side_to_move(side_to_move);

        let castling_rights = sections
            .next()
            .ok_or(FenError::Incomplete("castling rights"))?;
        position.set_castling_rights(
            castling_rights
                .parse()
                .map_err(|_| FenError::InvalidCastlingRights(castling_rights.to_string()))?,
        );

        let en_passant = match sections.next().ok_or(FenError::Incomplete("en passant"))? {
            "-" => None,
            s => {
                // The target sits behind a pawn that was just pushed by the other side.
                let expected_rank = match side_to_move {
                    Colour::White => Rank::Six,
                    Colour::Black => Rank::Three,
                };
                match s.parse::<Square>() {
                    Ok(square) if square.rank() == expected_rank => Some(square),
                    _ => return Err(FenError::InvalidEnPassant(s.to_string())),
                }
            }
        };
        position.set_en_passant(en_passant);

        let halfmove_clock = parse_counter(sections.next(), 0)?;
        let fullmove_number = parse_counter(sections.next(), 1)?;
        position.set_clocks(halfmove_clock, fullmove_number);

        validate(&position)?;
        Ok(position)
    }

    /// Writes the position as a FEN string.
    /// ```
    /// # use knightwatch::game::{position::Position, fen::INITIAL_FEN};
    /// assert_eq!(Position::initial().fen(), INITIAL_FEN);
    /// ```
    pub fn fen(&self) -> String {
        let mut fen = String::new();

        let mut skip = 0;
        for sq in Square::squares_fen_iter() {
            match self.piece_on(sq) {
                Some(piece) => {
                    if skip != 0 {
                        fen.push_str(&skip.to_string());
                        skip = 0
                    }
                    fen.push(piece.symbol())
                }
                None => skip += 1,
            }

            if sq.file() == File::H {
                if skip != 0 {
                    fen.push_str(&skip.to_string());
                    skip = 0
                }
                if sq.rank() != Rank::One {
                    fen.push('/')
                }
            }
        }

        format!(
            "{fen} {} {} {} {} {}",
            if self.side_to_move().is_black() {
                'b'
            } else {
                'w'
            },
            self.castling_rights(),
            if let Some(ep) = self.en_passant() {
                ep.to_string()
            } else {
                String::from("-")
            },
            self.halfmove_clock(),
            self.fullmove_number()
        )
    }
}
impl std::str::FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

fn parse_pieces(position: &mut Position, pieces: &str) -> Result<(), FenError> {
    let mut squares = Square::squares_fen_iter();
    let mut defined = 0;
    let mut rank_squares = 0;

    for (index, c) in pieces.char_indices() {
        match c {
            '/' => {
                if rank_squares != 8 {
                    return Err(FenError::IncompletePieceSection(rank_squares));
                }
                rank_squares = 0
            }
            '1'..='8' => {
                let skip = c as u8 - b'0';
                for _ in 0..skip {
                    squares.next().ok_or(FenError::TooManySquares)?;
                }
                rank_squares += skip;
                defined += skip as usize
            }
            c => {
                let piece = Piece::from_symbol(c).ok_or(FenError::UnexpectedToken { index, val: c })?;
                let square = squares.next().ok_or(FenError::TooManySquares)?;
                position.set_piece_on(square, Some(piece));
                rank_squares += 1;
                defined += 1
            }
        }
        if rank_squares > 8 {
            return Err(FenError::TooManySquares);
        }
    }

    if defined < 64 {
        return Err(FenError::TooFewSquares(defined));
    }
    Ok(())
}

fn parse_counter(section: Option<&str>, default: u16) -> Result<u16, FenError> {
    section.map_or(Ok(default), |s| {
        s.parse().map_err(|_| FenError::InvalidCounter(s.to_string()))
    })
}

/// Rejects piece placements that cannot occur in a game.
fn validate(position: &Position) -> Result<(), FenError> {
    for colour in Colour::COLOURS {
        let count = position
            .pieces()
            .filter(|(_, piece)| piece.kind == PieceKind::King && piece.colour == colour)
            .count();
        if count != 1 {
            return Err(FenError::KingCount { colour, count });
        }
    }

    if let Some((square, _)) = position.pieces().find(|(square, piece)| {
        piece.kind == PieceKind::Pawn && matches!(square.rank(), Rank::One | Rank::Eight)
    }) {
        return Err(FenError::PawnOnBackRank(square));
    }

    // An en passant target is empty, with the pawn that was just pushed behind it.
    if let Some(target) = position.en_passant() {
        let us = position.side_to_move();
        let pushed = Piece::new(PieceKind::Pawn, us.inverse());
        let behind = target.offset((0, -us.forward()));
        if position.piece_on(target).is_some()
            || behind.and_then(|square| position.piece_on(square)) != Some(pushed)
        {
            return Err(FenError::InvalidEnPassant(target.to_string()));
        }
    }

    Ok(())
}
