//! Sliding attacks (bishop, rook, queen) via magic multiplication
//!
//! For each square the relevant occupancy (the piece's rays minus the board
//! edge) is multiplied by a 64-bit magic and shifted down to an index into a
//! shared attack table. The magics are searched once at first use with a
//! fixed-seed generator, so the tables are identical on every run.

use std::sync::OnceLock;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::Square;

use super::Bitboard;
use super::tables::{BISHOP_DIRECTIONS, ROOK_DIRECTIONS, ray_attacks};

const MAGIC_SEED: u64 = 0x5EED_C4E5_5B17_B0A7;

/// Perfect-hash parameters for one square
#[derive(Clone, Copy, Debug, Default)]
struct Magic {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl Magic {
    #[inline]
    fn index(&self, occupied: u64) -> usize {
        self.offset + ((occupied & self.mask).wrapping_mul(self.magic) >> self.shift) as usize
    }
}

struct SliderTables {
    rook: [Magic; Square::NUM],
    bishop: [Magic; Square::NUM],
    attacks: Vec<Bitboard>,
}

static SLIDER_ATTACKS: OnceLock<SliderTables> = OnceLock::new();

fn slider_tables() -> &'static SliderTables {
    SLIDER_ATTACKS.get_or_init(SliderTables::new)
}

impl SliderTables {
    fn new() -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(MAGIC_SEED);
        let mut attacks = Vec::with_capacity(102_400 + 5_248);
        let mut rook = [Magic::default(); Square::NUM];
        let mut bishop = [Magic::default(); Square::NUM];

        for sq in 0..Square::NUM {
            rook[sq] = find_magic(sq, &ROOK_DIRECTIONS, &mut rng, &mut attacks);
        }
        for sq in 0..Square::NUM {
            bishop[sq] = find_magic(sq, &BISHOP_DIRECTIONS, &mut rng, &mut attacks);
        }
        log::debug!("magic tables built: {} attack sets", attacks.len());

        SliderTables { rook, bishop, attacks }
    }
}

/// Relevant occupancy: the rays from `sq` without the outermost square of each ray
fn relevant_mask(sq: usize, directions: &[(i8, i8); 4]) -> u64 {
    let file = (sq % 8) as u8;
    let rank = (sq / 8) as u8;
    let edges = ((Bitboard::RANK_1 | Bitboard::RANK_8) & !Bitboard::rank(rank))
        | ((Bitboard::FILE_A | Bitboard::FILE_H) & !Bitboard::file(file));
    ray_attacks(sq, 0, directions) & !edges.0
}

/// Sparse random candidate (few bits set)
#[inline]
fn sparse_random(rng: &mut Xoshiro256PlusPlus) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// Search a collision-free magic for `sq` and append its attack sets to `attacks`
fn find_magic(
    sq: usize,
    directions: &[(i8, i8); 4],
    rng: &mut Xoshiro256PlusPlus,
    attacks: &mut Vec<Bitboard>,
) -> Magic {
    let mask = relevant_mask(sq, directions);
    let bits = mask.count_ones();
    let size = 1usize << bits;

    // Enumerate every subset of the mask (carry-rippler) with its true attack set
    let mut occupancies = Vec::with_capacity(size);
    let mut reference = Vec::with_capacity(size);
    let mut subset = 0u64;
    loop {
        occupancies.push(subset);
        reference.push(ray_attacks(sq, subset, directions));
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    let mut used = vec![0u64; size];
    let mut epoch = vec![0u32; size];
    let mut attempt = 0u32;
    let shift = 64 - bits;

    loop {
        let magic = sparse_random(rng);
        if (mask.wrapping_mul(magic) >> 56).count_ones() < 6 {
            continue;
        }
        attempt += 1;

        let collision_free = occupancies.iter().zip(&reference).all(|(&occ, &att)| {
            let idx = (occ.wrapping_mul(magic) >> shift) as usize;
            if epoch[idx] < attempt {
                epoch[idx] = attempt;
                used[idx] = att;
                true
            } else {
                used[idx] == att
            }
        });

        if collision_free {
            let offset = attacks.len();
            attacks.extend(used.iter().map(|&bb| Bitboard(bb)));
            return Magic { mask, magic, shift, offset };
        }
    }
}

const fn init_pseudo(directions: &[(i8, i8); 4]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = Bitboard(ray_attacks(sq, 0, directions));
        sq += 1;
    }
    table
}

static ROOK_PSEUDO: [Bitboard; 64] = init_pseudo(&ROOK_DIRECTIONS);
static BISHOP_PSEUDO: [Bitboard; 64] = init_pseudo(&BISHOP_DIRECTIONS);

/// Build the magic tables now instead of on first lookup
pub fn init_slider_tables() {
    slider_tables();
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let t = slider_tables();
    t.attacks[t.rook[sq.index()].index(occupied.0)]
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let t = slider_tables();
    t.attacks[t.bishop[sq.index()].index(occupied.0)]
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Rook rays on an empty board
#[inline]
pub fn rook_pseudo_attacks(sq: Square) -> Bitboard {
    ROOK_PSEUDO[sq.index()]
}

/// Bishop rays on an empty board
#[inline]
pub fn bishop_pseudo_attacks(sq: Square) -> Bitboard {
    BISHOP_PSEUDO[sq.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_mask_sizes() {
        assert_eq!(relevant_mask(Square::A1.index(), &ROOK_DIRECTIONS).count_ones(), 12);
        assert_eq!(relevant_mask(Square::E4.index(), &ROOK_DIRECTIONS).count_ones(), 10);
        assert_eq!(relevant_mask(Square::D4.index(), &BISHOP_DIRECTIONS).count_ones(), 9);
        assert_eq!(relevant_mask(Square::A1.index(), &BISHOP_DIRECTIONS).count_ones(), 6);
    }

    #[test]
    fn test_magic_matches_ray_walk() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for sq in Square::all() {
            for _ in 0..64 {
                let occ = rng.next_u64() & rng.next_u64();
                assert_eq!(
                    rook_attacks(sq, Bitboard(occ)).0,
                    ray_attacks(sq.index(), occ, &ROOK_DIRECTIONS),
                    "rook {sq}"
                );
                assert_eq!(
                    bishop_attacks(sq, Bitboard(occ)).0,
                    ray_attacks(sq.index(), occ, &BISHOP_DIRECTIONS),
                    "bishop {sq}"
                );
            }
        }
    }

    #[test]
    fn test_queen_attacks_blocked() {
        let occ = Bitboard::from_square(Square::D5) | Bitboard::from_square(Square::F4);
        let q = queen_attacks(Square::D4, occ);
        assert!(q.contains(Square::D5));
        assert!(!q.contains(Square::D6));
        assert!(q.contains(Square::F4));
        assert!(!q.contains(Square::G4));
        assert!(q.contains(Square::A1) && q.contains(Square::H8));
        assert_eq!(rook_pseudo_attacks(Square::D4).count(), 14);
        assert_eq!(bishop_pseudo_attacks(Square::D4).count(), 13);
    }
}
