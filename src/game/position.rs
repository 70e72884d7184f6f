//! Main API to represent and interact with a chess position.
//!
//! This includes reading and writing the board through 1-indexed coordinates,
//! making and unmaking moves, and evaluating the status of the position.

use super::{
    action::{Move, MoveKind, MoveList, UciMove},
    attacks::is_king_in_check,
    castling_rights::CastlingRights,
    colour::Colour,
    error::ChessError,
    history::HistoryEntry,
    movegen::legal_moves,
    piece::{Piece, PieceKind, PromotionTarget},
    square::{File, Rank, Square},
    status::GameStatus,
    zobrist::ZOBRIST_KEYS,
};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Represents a chess position and defines an API to interact with it
/// (making, unmaking, generating moves, etc).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Position {
    // One cell per square, indexed from A1 to H8.
    pieces: [Option<Piece>; 64],

    // Metadata
    side_to_move: Colour,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}
impl Default for Position {
    /// A position with no pieces.
    fn default() -> Self {
        Self {
            pieces: [None; 64],
            side_to_move: Colour::White,
            castling_rights: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }
}
impl Position {
    /// A position with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The initial position of chess.
    pub fn initial() -> Self {
        let mut position = Self::empty();
        position.set_rank(
            Rank::One,
            BACK_RANK.map(|kind| Some(Piece::new(kind, Colour::White))),
        );
        position.set_rank(Rank::Two, [Some(Piece::WHITE_PAWN); 8]);
        position.set_rank(Rank::Seven, [Some(Piece::BLACK_PAWN); 8]);
        position.set_rank(
            Rank::Eight,
            BACK_RANK.map(|kind| Some(Piece::new(kind, Colour::Black))),
        );
        position.set_castling_rights(CastlingRights::full());
        position
    }

    /// Removes every piece from the board, leaving the metadata untouched.
    pub fn clear(&mut self) {
        for square in Square::squares_iter() {
            self.take(square);
        }
    }

    /// Fills a whole rank, from file A to file H.
    pub fn set_rank(&mut self, rank: Rank, pieces: [Option<Piece>; 8]) {
        for (file, piece) in File::FILES.into_iter().zip(pieces) {
            self.set_piece_on(Square::new(file, rank), piece)
        }
    }

    /// Returns the piece on the given 1-indexed file and rank, if any.
    /// # Errors
    /// Fails with [`ChessError::OutOfRangeSquare`] if the coordinates are off the board.
    /// ```
    /// # use knightwatch::game::{position::Position, piece::Piece};
    /// let position = Position::initial();
    /// assert_eq!(position.piece_at(5, 1), Ok(Some(Piece::WHITE_KING)));
    /// assert_eq!(position.piece_at(5, 4), Ok(None));
    /// assert!(position.piece_at(9, 1).is_err());
    /// ```
    pub fn piece_at(&self, file: u8, rank: u8) -> Result<Option<Piece>, ChessError> {
        Ok(self.piece_on(Square::from_coords(file, rank)?))
    }

    /// Places (or clears, with `None`) a piece on the given 1-indexed file and rank.
    /// # Errors
    /// Fails with [`ChessError::OutOfRangeSquare`] if the coordinates are off the board.
    pub fn set_piece(&mut self, file: u8, rank: u8, piece: Option<Piece>) -> Result<(), ChessError> {
        self.set_piece_on(Square::from_coords(file, rank)?, piece);
        Ok(())
    }

    /// Returns the piece sitting on a given square if any.
    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.pieces[square.index()]
    }

    /// Replaces whatever sits on `square`.
    pub fn set_piece_on(&mut self, square: Square, piece: Option<Piece>) {
        self.take(square);
        if let Some(piece) = piece {
            self.put(square, piece)
        }
    }

    /// Iterator over all occupied squares and their pieces, from A1 to H8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::squares_iter().filter_map(|sq| self.piece_on(sq).map(|piece| (sq, piece)))
    }

    pub fn side_to_move(&self) -> Colour {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, colour: Colour) {
        if colour != self.side_to_move {
            self.side_to_move = colour;
            self.hash ^= ZOBRIST_KEYS.side_to_move()
        }
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.hash ^= self.castling_rights.zobrist_hash() ^ rights.zobrist_hash();
        self.castling_rights = rights
    }

    /// Square a pawn may capture onto en passant, set only right after a double push.
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn set_en_passant(&mut self, square: Option<Square>) {
        if let Some(previous) = self.en_passant {
            self.hash ^= ZOBRIST_KEYS.en_passant_file(previous.file())
        }
        if let Some(square) = square {
            self.hash ^= ZOBRIST_KEYS.en_passant_file(square.file())
        }
        self.en_passant = square
    }

    /// Number of half-moves since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Number of the current move, starting at 1 and incremented after black plays.
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub fn set_clocks(&mut self, halfmove_clock: u16, fullmove_number: u16) {
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number
    }

    /// Returns the Zobrist hash of the position.
    #[inline(always)]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Recomputes the hash from scratch.
    pub(crate) fn compute_hash(&self) -> u64 {
        let mut hash = self
            .pieces()
            .fold(0, |hash, (sq, piece)| hash ^ ZOBRIST_KEYS.piece(piece, sq));
        if self.side_to_move.is_black() {
            hash ^= ZOBRIST_KEYS.side_to_move()
        }
        if let Some(square) = self.en_passant {
            hash ^= ZOBRIST_KEYS.en_passant_file(square.file())
        }
        hash ^ self.castling_rights.zobrist_hash()
    }

    #[inline(always)]
    fn put(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.pieces[square.index()].is_none());
        self.pieces[square.index()] = Some(piece);
        self.hash ^= ZOBRIST_KEYS.piece(piece, square)
    }

    #[inline(always)]
    fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.pieces[square.index()].take();
        if let Some(piece) = piece {
            self.hash ^= ZOBRIST_KEYS.piece(piece, square)
        }
        piece
    }

    /// Makes a move known to be legal on the board, modifying the position.
    ///
    /// Returns the record needed to [`unmake`](Self::unmake) the move. Playing a
    /// move that is not part of [`legal_moves`](Self::legal_moves) leaves the
    /// position in an unspecified (but memory safe) state.
    pub fn make_legal(&mut self, mv: Move) -> HistoryEntry {
        let entry = HistoryEntry {
            played: mv,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        };
        let us = self.side_to_move;

        // Lift the moving piece and whatever it captures, then drop the result
        // on the target.
        self.take(mv.origin);
        if let Some(captured_on) = mv.capture_square() {
            self.take(captured_on);
        }
        if mv.kind == MoveKind::Castle {
            let (rook_origin, rook_target) = castle_rook_squares(mv.target);
            if let Some(rook) = self.take(rook_origin) {
                self.put(rook_target, rook)
            }
        }
        self.put(mv.target, mv.placed_piece());

        let mut castling_rights = self.castling_rights;
        castling_rights.update_for_square(mv.origin);
        castling_rights.update_for_square(mv.target);
        self.set_castling_rights(castling_rights);

        let double_push = mv.piece.kind == PieceKind::Pawn
            && (mv.origin.rank() as u8).abs_diff(mv.target.rank() as u8) == 2;
        self.set_en_passant(if double_push {
            mv.origin.offset((0, us.forward()))
        } else {
            None
        });

        self.halfmove_clock = if mv.is_irreversible() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if us.is_black() {
            self.fullmove_number = self.fullmove_number.saturating_add(1)
        }
        self.set_side_to_move(us.inverse());

        entry
    }

    /// Makes a move on the board, modifying the position.
    /// # Errors
    /// - [`ChessError::InvalidPromotionTarget`] if the move carries a promotion
    ///   piece without being a promotion.
    /// - [`ChessError::IllegalMove`] if the move is not legal here.
    pub fn make(&mut self, mv: Move) -> Result<HistoryEntry, ChessError> {
        match mv.promotion {
            Some(target) if mv.kind != MoveKind::Promotion => {
                return Err(ChessError::InvalidPromotionTarget(target.to_piece_kind()))
            }
            _ => (),
        }
        if self.legal_moves().contains(&mv) {
            Ok(self.make_legal(mv))
        } else {
            Err(ChessError::IllegalMove(mv.to_string()))
        }
    }

    /// Undoes the effects of a move, restoring the position exactly as it was
    /// before [`make_legal`](Self::make_legal) returned `entry`.
    pub fn unmake(&mut self, entry: HistoryEntry) {
        let mv = entry.played;

        self.take(mv.target);
        if mv.kind == MoveKind::Castle {
            let (rook_origin, rook_target) = castle_rook_squares(mv.target);
            if let Some(rook) = self.take(rook_target) {
                self.put(rook_origin, rook)
            }
        }
        if let (Some(captured), Some(captured_on)) = (mv.captured, mv.capture_square()) {
            self.put(captured_on, captured)
        }
        self.put(mv.origin, mv.piece);

        self.side_to_move = mv.piece.colour;
        self.castling_rights = entry.castling_rights;
        self.en_passant = entry.en_passant;
        self.halfmove_clock = entry.halfmove_clock;
        self.fullmove_number = entry.fullmove_number;
        self.hash = entry.hash;
    }

    /// Returns the position reached after playing `mv`, leaving this one untouched.
    /// # Errors
    /// Fails with [`ChessError::IllegalMove`] if the move is not legal here.
    pub fn after(&self, mv: Move) -> Result<Self, ChessError> {
        let mut next = self.clone();
        next.make(mv)?;
        Ok(next)
    }

    /// Resolves a coordinate move to the matching legal move.
    /// # Errors
    /// - [`ChessError::InvalidPromotionTarget`] if a promotion piece is given for a
    ///   move that does not promote, or if it is a pawn or a king.
    /// - [`ChessError::IllegalMove`] if no legal move matches.
    pub fn find_move(&self, uci: UciMove) -> Result<Move, ChessError> {
        let moves = self.legal_moves();
        let mut candidates = moves
            .iter()
            .filter(|mv| mv.origin == uci.origin && mv.target == uci.target)
            .peekable();
        let illegal = || ChessError::IllegalMove(uci.to_string());

        match uci.promoting_to {
            Some(kind) => {
                let target = PromotionTarget::try_from(kind)?;
                if candidates.peek().is_some_and(|mv| mv.promotion.is_none()) {
                    return Err(ChessError::InvalidPromotionTarget(kind));
                }
                candidates
                    .find(|mv| mv.promotion == Some(target))
                    .copied()
                    .ok_or_else(illegal)
            }
            None => candidates
                .find(|mv| mv.promotion.is_none())
                .copied()
                .ok_or_else(illegal),
        }
    }

    /// Generates the legal moves of the side to move.
    pub fn legal_moves(&self) -> MoveList {
        legal_moves(self)
    }

    /// Checks if the side to move is in check.
    pub fn is_check(&self) -> bool {
        is_king_in_check(self, self.side_to_move)
    }

    /// Checks if the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    /// Checks if the side to move is stalemated.
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// Checks if this position is drawn by the fifty-move rule.
    pub fn fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Status of the position on its own, without knowledge of the moves that led to it.
    ///
    /// Repetitions need the game history, see [`Game::status`](super::Game::status).
    pub fn status(&self) -> GameStatus {
        self.status_given_repetition(false)
    }

    pub(crate) fn status_given_repetition(&self, repeated: bool) -> GameStatus {
        let in_check = self.is_check();
        if self.legal_moves().is_empty() {
            if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            }
        } else if self.fifty_move_draw() {
            GameStatus::DrawFiftyMove
        } else if repeated {
            GameStatus::DrawRepetition
        } else if in_check {
            GameStatus::Check
        } else {
            GameStatus::InProgress
        }
    }
}

/// Rook origin and target squares for a castling king landing on `king_target`.
pub(crate) fn castle_rook_squares(king_target: Square) -> (Square, Square) {
    let rank = king_target.rank();
    if king_target.file() == File::G {
        (Square::new(File::H, rank), Square::new(File::F, rank))
    } else {
        (Square::new(File::A, rank), Square::new(File::D, rank))
    }
}

impl std::hash::Hash for Position {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state)
    }
}
/// Draws the board from white's side: rank 8 on the first line and rank 1 last,
/// as on a diagram, followed by a blank line and the file labels. Output starts
/// directly with rank 8, without a leading newline.
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in Rank::RANKS.into_iter().rev() {
            write!(f, "{rank} | ")?;
            for file in File::FILES {
                let cell = match self.piece_on(Square::new(file, rank)) {
                    Some(piece) => piece.board_symbol(),
                    None => " . ",
                };
                write!(f, "{cell}")?
            }
            writeln!(f)?
        }
        write!(f, "\n     A  B  C  D  E  F  G  H")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn square(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn play(position: &mut Position, uci: &str) -> HistoryEntry {
        let mv = position.find_move(uci.parse().unwrap()).unwrap();
        position.make_legal(mv)
    }

    #[test]
    fn initial_setup() {
        let position = Position::initial();
        assert_eq!(position.pieces().count(), 32);
        assert_eq!(position.piece_at(1, 1), Ok(Some(Piece::WHITE_ROOK)));
        assert_eq!(position.piece_at(4, 1), Ok(Some(Piece::WHITE_QUEEN)));
        assert_eq!(position.piece_at(5, 8), Ok(Some(Piece::BLACK_KING)));
        assert_eq!(position.piece_at(7, 8), Ok(Some(Piece::BLACK_KNIGHT)));
        for file in 1..=8 {
            assert_eq!(position.piece_at(file, 2), Ok(Some(Piece::WHITE_PAWN)));
            assert_eq!(position.piece_at(file, 7), Ok(Some(Piece::BLACK_PAWN)));
            for rank in 3..=6 {
                assert_eq!(position.piece_at(file, rank), Ok(None));
            }
        }
        assert_eq!(position.side_to_move(), Colour::White);
        assert_eq!(position.castling_rights(), CastlingRights::full());
        assert_eq!(position.en_passant(), None);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(position.zobrist_hash(), position.compute_hash());
    }

    #[test]
    fn accessors_reject_off_board_coordinates() {
        let mut position = Position::empty();
        assert_eq!(
            position.piece_at(0, 3),
            Err(ChessError::OutOfRangeSquare { file: 0, rank: 3 })
        );
        assert_eq!(
            position.set_piece(3, 9, Some(Piece::WHITE_KING)),
            Err(ChessError::OutOfRangeSquare { file: 3, rank: 9 })
        );
        position.set_piece(3, 8, Some(Piece::WHITE_KING)).unwrap();
        assert_eq!(position.piece_on(Square::C8), Some(Piece::WHITE_KING));
        position.set_piece(3, 8, None).unwrap();
        assert_eq!(position.pieces().count(), 0);
        assert_eq!(position.zobrist_hash(), position.compute_hash());
    }

    #[test]
    fn clear_empties_the_board() {
        let mut position = Position::initial();
        position.clear();
        assert_eq!(position.pieces().count(), 0);
        assert_eq!(position.zobrist_hash(), position.compute_hash());
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let mut position = Position::initial();
        play(&mut position, "e2e4");
        assert_eq!(position.en_passant(), Some(square("e3")));
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.side_to_move(), Colour::Black);
        assert_eq!(position.fullmove_number(), 1);

        play(&mut position, "g8f6");
        assert_eq!(position.en_passant(), None);
        assert_eq!(position.halfmove_clock(), 1);
        assert_eq!(position.fullmove_number(), 2);
        assert_eq!(position.zobrist_hash(), position.compute_hash());
    }

    #[test]
    fn make_unmake_round_trip() {
        let original = Position::initial();
        let mut position = original.clone();
        let mut entries = Vec::new();
        for uci in ["e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "g1f3", "c8g4"] {
            entries.push(play(&mut position, uci));
            assert_eq!(position.zobrist_hash(), position.compute_hash());
        }
        while let Some(entry) = entries.pop() {
            position.unmake(entry);
            assert_eq!(position.zobrist_hash(), position.compute_hash());
        }
        assert_eq!(position, original);
    }

    #[test]
    fn castling_moves_the_rook_and_unmakes() {
        let mut position =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let before = position.clone();
        let entry = play(&mut position, "e1g1");
        assert_eq!(position.piece_on(Square::G1), Some(Piece::WHITE_KING));
        assert_eq!(position.piece_on(Square::F1), Some(Piece::WHITE_ROOK));
        assert_eq!(position.piece_on(Square::H1), None);
        assert_eq!(position.piece_on(Square::E1), None);
        assert_eq!(position.castling_rights().to_string(), "kq");
        assert_eq!(position.zobrist_hash(), position.compute_hash());

        position.unmake(entry);
        assert_eq!(position, before);

        let entry = play(&mut position, "e1c1");
        assert_eq!(position.piece_on(Square::C1), Some(Piece::WHITE_KING));
        assert_eq!(position.piece_on(Square::D1), Some(Piece::WHITE_ROOK));
        assert_eq!(position.piece_on(Square::A1), None);
        position.unmake(entry);
        assert_eq!(position, before);
    }

    #[test]
    fn rook_capture_on_home_square_clears_right() {
        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq - 0 1").unwrap();
        play(&mut position, "g2a8");
        assert_eq!(position.castling_rights().to_string(), "KQk");
        play(&mut position, "h8h1");
        assert_eq!(position.castling_rights().to_string(), "Q");
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let mut position = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 3 40").unwrap();
        let before = position.clone();
        let entry = play(&mut position, "a7b8n");
        assert_eq!(position.piece_on(Square::B8), Some(Piece::WHITE_KNIGHT));
        assert_eq!(position.piece_on(square("a7")), None);
        assert_eq!(position.halfmove_clock(), 0);
        position.unmake(entry);
        assert_eq!(position, before);
    }

    #[test]
    fn en_passant_removes_the_pawn_behind() {
        let mut position =
            Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let before = position.clone();
        let entry = play(&mut position, "e5d6");
        assert_eq!(position.piece_on(square("d6")), Some(Piece::WHITE_PAWN));
        assert_eq!(position.piece_on(square("d5")), None);
        assert_eq!(position.zobrist_hash(), position.compute_hash());
        position.unmake(entry);
        assert_eq!(position, before);
    }

    #[test]
    fn find_move_checks_promotion_pieces() {
        let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(matches!(
            position.find_move("a7a8".parse().unwrap()),
            Err(ChessError::IllegalMove(_))
        ));
        assert_eq!(
            position
                .find_move("a7a8r".parse().unwrap())
                .unwrap()
                .promotion,
            Some(PromotionTarget::Rook)
        );
        assert_eq!(
            Position::initial().find_move("e2e4q".parse().unwrap()),
            Err(ChessError::InvalidPromotionTarget(PieceKind::Queen))
        );
    }

    #[test]
    fn make_rejects_promotion_pieces_on_other_moves() {
        let mut position = Position::initial();
        let mut mv = position.find_move("e2e4".parse().unwrap()).unwrap();
        mv.promotion = Some(PromotionTarget::Queen);
        assert_eq!(
            position.make(mv),
            Err(ChessError::InvalidPromotionTarget(PieceKind::Queen))
        );
        assert_eq!(position, Position::initial());
    }

    #[test]
    fn after_leaves_the_original_untouched() {
        let position = Position::initial();
        let mv = position.find_move("g1f3".parse().unwrap()).unwrap();
        let next = position.after(mv).unwrap();
        assert_eq!(position, Position::initial());
        assert_eq!(next.piece_on(square("f3")), Some(Piece::WHITE_KNIGHT));
        assert!(matches!(next.after(mv), Err(ChessError::IllegalMove(_))));
    }

    #[test]
    fn display_draws_ranks_and_files() {
        let rendered = Position::initial().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "8 | _R__N__B__Q__K__B__N__R_");
        assert_eq!(lines[1], "7 | _P__P__P__P__P__P__P__P_");
        assert_eq!(lines[4], "4 |  .  .  .  .  .  .  .  . ");
        assert_eq!(lines[7], "1 |  R  N  B  Q  K  B  N  R ");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "     A  B  C  D  E  F  G  H");
    }
}
