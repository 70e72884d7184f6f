//! # Attack and check detection
//! Attacks are found by casting rays outward from the attacked square and
//! looking for a piece able to travel back along that ray, rather than by
//! generating every move of the attacking side.

use super::{
    colour::Colour,
    piece::{
        orient, Direction, PieceKind, DIAGONAL_DIRECTIONS, KNIGHT_DIRECTIONS, ORTHOGONAL_DIRECTIONS,
        PAWN_CAPTURES, ROYAL_DIRECTIONS,
    },
    position::Position,
    square::Square,
};

/// Checks if any piece of colour `by` attacks `square`.
///
/// The piece standing on `square`, if any, does not matter: attacks onto an
/// empty square or onto one of `by`'s own pieces are still reported.
pub fn is_square_attacked(position: &Position, square: Square, by: Colour) -> bool {
    let attacker_on = |delta: Direction, kinds: &[PieceKind]| {
        square
            .offset(delta)
            .and_then(|sq| position.piece_on(sq))
            .is_some_and(|piece| piece.colour == by && kinds.contains(&piece.kind))
    };

    // Pawns attacking `square` stand one step behind it from their own point of view.
    if PAWN_CAPTURES.into_iter().any(|capture| {
        let (file_delta, rank_delta) = orient(capture, by);
        attacker_on((-file_delta, -rank_delta), &[PieceKind::Pawn])
    }) {
        return true;
    }

    if KNIGHT_DIRECTIONS
        .into_iter()
        .any(|delta| attacker_on(delta, &[PieceKind::Knight]))
    {
        return true;
    }

    if ROYAL_DIRECTIONS
        .into_iter()
        .any(|delta| attacker_on(delta, &[PieceKind::King]))
    {
        return true;
    }

    ORTHOGONAL_DIRECTIONS
        .into_iter()
        .any(|direction| slider_on_ray(position, square, direction, by, PieceKind::Rook))
        || DIAGONAL_DIRECTIONS
            .into_iter()
            .any(|direction| slider_on_ray(position, square, direction, by, PieceKind::Bishop))
}

/// Walks from `square` along `direction` and checks if the first piece met is
/// an enemy `slider` or queen.
fn slider_on_ray(
    position: &Position,
    square: Square,
    direction: Direction,
    by: Colour,
    slider: PieceKind,
) -> bool {
    let mut current = square;
    while let Some(next) = current.offset(direction) {
        if let Some(piece) = position.piece_on(next) {
            return piece.colour == by
                && (piece.kind == slider || piece.kind == PieceKind::Queen);
        }
        current = next
    }
    false
}

/// Returns the square of `colour`'s king, if it has one.
pub fn king_square(position: &Position, colour: Colour) -> Option<Square> {
    position
        .pieces()
        .find(|(_, piece)| piece.kind == PieceKind::King && piece.colour == colour)
        .map(|(square, _)| square)
}

/// Checks if `colour`'s king is attacked. A side without a king is never in check.
pub fn is_king_in_check(position: &Position, colour: Colour) -> bool {
    king_square(position, colour)
        .is_some_and(|square| is_square_attacked(position, square, colour.inverse()))
}
