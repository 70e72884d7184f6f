//! # Perft
//! Counts the leaves of the legal move tree down to a fixed depth. Known totals
//! for well studied positions make this the reference check of move generation.

use super::{action::Move, position::Position};

/// Number of leaf nodes reached after `depth` plies from `position`.
///
/// With `bulk` set, the last ply counts legal moves instead of playing each of
/// them. The position is restored before returning.
pub fn perft(position: &mut Position, depth: u8, bulk: bool) -> u64 {
    match depth {
        0 => 1,
        1 if bulk => position.legal_moves().len() as u64,
        _ => divide(position, depth, bulk)
            .into_iter()
            .map(|(_, nodes)| nodes)
            .sum(),
    }
}

/// Leaf counts below each legal move of `position`, in generation order.
///
/// Empty at depth 0 or when the side to move has no legal move.
pub fn divide(position: &mut Position, depth: u8, bulk: bool) -> Vec<(Move, u64)> {
    let Some(below) = depth.checked_sub(1) else {
        return Vec::new();
    };
    position
        .legal_moves()
        .into_iter()
        .map(|mv| {
            let entry = position.make_legal(mv);
            let nodes = perft(position, below, bulk);
            position.unmake(entry);
            (mv, nodes)
        })
        .collect()
}
