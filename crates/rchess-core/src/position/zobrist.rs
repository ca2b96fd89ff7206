//! Zobrist hash keys
//!
//! Generated once from a fixed seed so keys (and therefore transposition
//! table contents) are reproducible across runs.

use std::sync::OnceLock;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::{Color, PieceType, Square};

const ZOBRIST_SEED: u64 = 0x2D35_8DCC_AA6C_78A5;

/// Random keys per board feature
pub struct Zobrist {
    /// `[color][piece type][square]` (piece type 0 unused)
    pub psq: [[[u64; Square::NUM]; PieceType::NUM]; Color::NUM],
    /// Indexed by the whole castling-rights nibble
    pub castling: [u64; 16],
    /// En-passant file
    pub ep_file: [u64; 8],
    /// Black to move
    pub side: u64,
}

static ZOBRIST: OnceLock<Zobrist> = OnceLock::new();

/// The process-wide key table
#[inline]
pub fn zobrist() -> &'static Zobrist {
    ZOBRIST.get_or_init(Zobrist::new)
}

impl Zobrist {
    fn new() -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(ZOBRIST_SEED);
        let mut psq = [[[0u64; Square::NUM]; PieceType::NUM]; Color::NUM];
        for color in psq.iter_mut() {
            for piece in color.iter_mut().skip(1) {
                for key in piece.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.next_u64();
        }
        let mut ep_file = [0u64; 8];
        for key in ep_file.iter_mut() {
            *key = rng.next_u64();
        }
        let side = rng.next_u64();

        Zobrist { psq, castling, ep_file, side }
    }

    #[inline]
    pub fn piece(&self, color: Color, pt: PieceType, sq: Square) -> u64 {
        self.psq[color.index()][pt.index()][sq.index()]
    }
}
