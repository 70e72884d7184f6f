//! # Zobrist hashing keys
//! Positions are hashed by XOR-ing one key per (piece, square) pair, plus keys
//! for the side to move, each castling right and the en passant file. Hashes are
//! only compared for repetition detection.

use std::sync::LazyLock;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{piece::Piece, square::File, square::Square};

// We need :
// - one number for each piece on each square (64 * 12)
// - one number for side to move
// - four numbers for castling rights
// - eight numbers for en passant file
const NUM_KEYS: usize = 64 * 12 + 1 + 4 + 8;
const SIDE_TO_MOVE_OFFSET: usize = 64 * 12;
const CASTLING_RIGHTS_OFFSET: usize = SIDE_TO_MOVE_OFFSET + 1;
const EN_PASSANT_OFFSET: usize = CASTLING_RIGHTS_OFFSET + 4;

// Fixed so that hashes are stable from one run to the next.
const SEED: u64 = 0x6b6e_6967_6874_7761;

pub(crate) struct ZobristKeys([u64; NUM_KEYS]);
impl ZobristKeys {
    #[inline(always)]
    pub fn piece(&self, piece: Piece, square: Square) -> u64 {
        self.0[(piece.colour as usize * 6 + piece.kind as usize) * 64 + square.index()]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> u64 {
        self.0[SIDE_TO_MOVE_OFFSET]
    }

    #[inline(always)]
    pub fn castling(&self, right: usize) -> u64 {
        self.0[CASTLING_RIGHTS_OFFSET + right]
    }

    #[inline(always)]
    pub fn en_passant_file(&self, file: File) -> u64 {
        self.0[EN_PASSANT_OFFSET + file as usize]
    }
}

pub(crate) static ZOBRIST_KEYS: LazyLock<ZobristKeys> = LazyLock::new(|| {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut keys = [0; NUM_KEYS];
    for key in &mut keys {
        *key = rng.gen()
    }
    ZobristKeys(keys)
});
