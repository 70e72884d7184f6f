//! # Move generation
//! Moves are generated from the direction table of each piece kind, walking
//! every direction from the piece's square. [`pseudo_legal_moves`] follows piece
//! movement only, [`legal_moves`] additionally drops the moves leaving the
//! mover's king attacked.
//!
//! Moves come out ordered by origin square (A1 to H8), then in the order the
//! directions of the moving piece are declared. Promotions are generated as
//! queen, rook, bishop then knight, and castles follow the king's steps,
//! kingside first.

use super::{
    action::{Move, MoveKind, MoveList},
    attacks::{is_king_in_check, is_square_attacked},
    colour::Colour,
    piece::{orient, Piece, PieceKind, PromotionTarget, PAWN_CAPTURES},
    position::Position,
    square::{File, Rank, Square},
};

// No position has enough moves to overflow a `MoveList`.
#[inline(always)]
fn push(moves: &mut MoveList, mv: Move) {
    let pushed = moves.push(mv);
    debug_assert!(pushed.is_ok(), "move list overflow")
}

/// Generates every move of the side to move that follows piece movement rules,
/// without checking if it leaves its own king attacked.
///
/// Castles are the exception: they are only generated when the king's start,
/// transit and destination squares are not attacked.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move();

    for (origin, piece) in position.pieces().filter(|(_, piece)| piece.colour == us) {
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(position, &mut moves, origin, piece),
            PieceKind::King => {
                generate_piece_moves(position, &mut moves, origin, piece);
                generate_castles(position, &mut moves, origin, piece)
            }
            _ => generate_piece_moves(position, &mut moves, origin, piece),
        }
    }

    moves
}

/// Generates the legal moves of the side to move.
///
/// If this returns an empty list, the side to move is either checkmated or
/// stalemated.
pub fn legal_moves(position: &Position) -> MoveList {
    let us = position.side_to_move();
    let mut scratch = position.clone();
    let mut moves = MoveList::new();

    for mv in pseudo_legal_moves(position) {
        let entry = scratch.make_legal(mv);
        if !is_king_in_check(&scratch, us) {
            push(&mut moves, mv)
        }
        scratch.unmake(entry);
    }

    log::trace!("{} legal moves for {us}", moves.len());
    moves
}

/// Knights, bishops, rooks, queens and single king steps.
fn generate_piece_moves(position: &Position, moves: &mut MoveList, origin: Square, piece: Piece) {
    let pattern = piece.kind.pattern();
    for &direction in pattern.directions {
        let mut current = origin;
        for _ in 0..pattern.max_steps {
            let Some(target) = current.offset(direction) else {
                break;
            };
            match position.piece_on(target) {
                None => push(moves, Move::new_quiet(origin, target, piece)),
                Some(other) => {
                    if other.colour != piece.colour {
                        push(moves, Move::new_capture(origin, target, piece, other))
                    }
                    break;
                }
            }
            if !pattern.sliding {
                break;
            }
            current = target
        }
    }
}

/// Rank pawns of `colour` start from.
const fn pawn_start_rank(colour: Colour) -> Rank {
    match colour {
        Colour::White => Rank::Two,
        Colour::Black => Rank::Seven,
    }
}

/// Rank pawns of `colour` promote on.
const fn pawn_promotion_rank(colour: Colour) -> Rank {
    match colour {
        Colour::White => Rank::Eight,
        Colour::Black => Rank::One,
    }
}

fn generate_pawn_moves(position: &Position, moves: &mut MoveList, origin: Square, pawn: Piece) {
    let colour = pawn.colour;
    let pattern = PieceKind::Pawn.pattern();
    let steps = if origin.rank() == pawn_start_rank(colour) {
        pattern.max_steps
    } else {
        1
    };

    // Pushes, only onto empty squares.
    for &direction in pattern.directions {
        let direction = orient(direction, colour);
        let mut current = origin;
        for _ in 0..steps {
            let Some(target) = current.offset(direction) else {
                break;
            };
            if position.piece_on(target).is_some() {
                break;
            }
            push_pawn_move(moves, origin, target, pawn, None);
            current = target
        }
    }

    // Captures, including en passant.
    for direction in PAWN_CAPTURES {
        let Some(target) = origin.offset(orient(direction, colour)) else {
            continue;
        };
        match position.piece_on(target) {
            Some(other) if other.colour != colour => {
                push_pawn_move(moves, origin, target, pawn, Some(other))
            }
            None if position.en_passant() == Some(target) => {
                // The pushed pawn stands beside us, on the target's file.
                let pushed = Piece::new(PieceKind::Pawn, colour.inverse());
                if position.piece_on(Square::new(target.file(), origin.rank())) == Some(pushed) {
                    push(moves, Move::new_en_passant(origin, target, pawn))
                }
            }
            _ => (),
        }
    }
}

/// Pushes a pawn move, expanded to the four promotions when reaching the last rank.
fn push_pawn_move(
    moves: &mut MoveList,
    origin: Square,
    target: Square,
    pawn: Piece,
    captured: Option<Piece>,
) {
    if target.rank() == pawn_promotion_rank(pawn.colour) {
        for promotion in PromotionTarget::TARGETS {
            push(
                moves,
                Move {
                    origin,
                    target,
                    piece: pawn,
                    captured,
                    kind: MoveKind::Promotion,
                    promotion: Some(promotion),
                },
            )
        }
    } else {
        match captured {
            Some(captured) => push(moves, Move::new_capture(origin, target, pawn, captured)),
            None => push(moves, Move::new_quiet(origin, target, pawn)),
        }
    }
}

fn generate_castles(position: &Position, moves: &mut MoveList, origin: Square, king: Piece) {
    let colour = king.colour;
    let home_rank = pawn_promotion_rank(colour.inverse());
    if origin != Square::new(File::E, home_rank) {
        return;
    }
    let rights = position.castling_rights();
    let them = colour.inverse();
    let rook = Piece::new(PieceKind::Rook, colour);

    let can_castle = |rook_file: File, between: &[File], king_path: &[File]| {
        position.piece_on(Square::new(rook_file, home_rank)) == Some(rook)
            && between
                .iter()
                .all(|&file| position.piece_on(Square::new(file, home_rank)).is_none())
            && king_path
                .iter()
                .all(|&file| !is_square_attacked(position, Square::new(file, home_rank), them))
    };

    if rights.kingside_castle_allowed(colour)
        && can_castle(File::H, &[File::F, File::G], &[File::E, File::F, File::G])
    {
        push(
            moves,
            Move::new_castle(origin, Square::new(File::G, home_rank), king),
        )
    }
    if rights.queenside_castle_allowed(colour)
        && can_castle(
            File::A,
            &[File::B, File::C, File::D],
            &[File::E, File::D, File::C],
        )
    {
        push(
            moves,
            Move::new_castle(origin, Square::new(File::C, home_rank), king),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn square(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn ucis(moves: &MoveList) -> Vec<String> {
        moves.iter().map(|mv| mv.to_string()).collect()
    }

    #[test]
    fn initial_position_has_twenty_moves() {
        let moves = legal_moves(&Position::initial());
        assert_eq!(moves.len(), 20);
        assert_eq!(moves.iter().filter(|mv| mv.piece.kind == PieceKind::Knight).count(), 4);
        assert!(moves.iter().all(|mv| !mv.is_capture()));
    }

    #[test]
    fn moves_are_ordered_by_origin() {
        let moves = legal_moves(&Position::initial());
        assert!(moves.windows(2).all(|w| w[0].origin <= w[1].origin));
        // b1 knight comes first, its jumps in declaration order.
        assert_eq!(ucis(&moves)[..2], ["b1c3", "b1a3"]);
    }

    #[test]
    fn black_has_twenty_replies_to_every_first_move() {
        let initial = Position::initial();
        for mv in legal_moves(&initial) {
            let position = initial.after(mv).unwrap();
            let replies = legal_moves(&position);
            assert_eq!(replies.len(), 20, "after {mv}");
            assert!(replies.iter().all(|reply| reply.piece.colour == Colour::Black));
        }
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let position = position("4k3/8/8/8/3p4/8/8/R2QK3 w - - 0 1");
        let queen_moves: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(|mv| mv.origin == Square::D1)
            .collect();
        assert!(queen_moves
            .iter()
            .any(|mv| mv.target == square("d4") && mv.kind == MoveKind::Capture));
        assert!(!queen_moves.iter().any(|mv| mv.target == square("d5")));
        assert!(!queen_moves.iter().any(|mv| mv.target == Square::A1));
        assert!(!queen_moves.iter().any(|mv| mv.target == Square::E1));
        assert_eq!(queen_moves.len(), 3 + 2 + 4 + 3);
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let blocked = position("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(!legal_moves(&blocked)
            .iter()
            .any(|mv| mv.origin == square("e2")));

        let half_blocked = position("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(
            ucis(&legal_moves(&half_blocked))
                .into_iter()
                .filter(|uci| uci.starts_with("e2"))
                .collect::<Vec<_>>(),
            ["e2e3"]
        );
    }

    #[test]
    fn promotions_come_in_order() {
        let position = position("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let promotions: Vec<_> = ucis(&legal_moves(&position))
            .into_iter()
            .filter(|uci| uci.starts_with("a7"))
            .collect();
        assert_eq!(
            promotions,
            ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"]
        );
    }

    #[test]
    fn en_passant_is_generated() {
        let position = position("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let moves = legal_moves(&position);
        let ep: Vec<_> = moves
            .iter()
            .filter(|mv| mv.kind == MoveKind::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_string(), "e5d6");
        assert_eq!(ep[0].captured, Some(Piece::BLACK_PAWN));
    }

    #[test]
    fn en_passant_needs_a_pawn_to_capture() {
        let mut position = position("4k3/8/8/4P3/8/8/8/4K3 w - - 0 2");
        position.set_en_passant(Some(square("d6")));
        let before = position.clone();

        let moves = legal_moves(&position);
        assert!(!moves.iter().any(|mv| mv.kind == MoveKind::EnPassant));
        assert_eq!(position, before);
        for mv in moves {
            let mut next = position.clone();
            let entry = next.make_legal(mv);
            next.unmake(entry);
            assert_eq!(next, before, "{mv}");
        }
    }

    #[test]
    fn en_passant_exposing_the_king_is_illegal() {
        // Both pawns leave the fifth rank, uncovering the rook.
        let position = position("8/8/8/K2pP2r/8/8/8/4k3 w - d6 0 2");
        assert!(pseudo_legal_moves(&position)
            .iter()
            .any(|mv| mv.kind == MoveKind::EnPassant));
        assert!(!legal_moves(&position)
            .iter()
            .any(|mv| mv.kind == MoveKind::EnPassant));
    }

    #[test]
    fn castles_both_sides() {
        let position = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles: Vec<_> = legal_moves(&position)
            .into_iter()
            .filter(|mv| mv.kind == MoveKind::Castle)
            .map(|mv| mv.to_string())
            .collect();
        assert_eq!(castles, ["e1g1", "e1c1"]);
    }

    #[test]
    fn castling_needs_rights_empty_and_safe_squares() {
        let castles = |fen: &str| {
            legal_moves(&position(fen))
                .into_iter()
                .filter(|mv| mv.kind == MoveKind::Castle)
                .map(|mv| mv.to_string())
                .collect::<Vec<_>>()
        };
        // No rights.
        assert!(castles("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").is_empty());
        // Blocked by a knight on b1: only the queenside path is obstructed.
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1"), ["e1g1"]);
        // f1 attacked by the rook on f8.
        assert_eq!(castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1"), ["e1c1"]);
        // In check: no castling at all.
        assert!(castles("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").is_empty());
        // b1 attacked does not prevent queenside castling.
        assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1"), ["e1c1"]);
    }

    #[test]
    fn pinned_pieces_stay_on_the_pin() {
        let position = position("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(!legal_moves(&position)
            .iter()
            .any(|mv| mv.origin == square("e2")));
    }

    #[test]
    fn legal_moves_never_leave_the_king_attacked() {
        let position =
            position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for mv in legal_moves(&position) {
            let next = position.after(mv).unwrap();
            assert!(!is_king_in_check(&next, Colour::White), "{mv}");
        }
    }
}
