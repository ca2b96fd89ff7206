//! Precomputed step-attack and line tables
//!
//! Everything here is evaluated at compile time.

use crate::types::{Color, Square};

use super::Bitboard;

/// (file delta, rank delta) for rook rays
pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
/// (file delta, rank delta) for bishop rays
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_DELTAS: [(i8, i8); 8] =
    [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_DELTAS: [(i8, i8); 8] =
    [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

const fn on_board(file: i8, rank: i8) -> bool {
    file >= 0 && file < 8 && rank >= 0 && rank < 8
}

const fn step_attacks(sq: usize, deltas: &[(i8, i8)]) -> u64 {
    let file = (sq % 8) as i8;
    let rank = (sq / 8) as i8;
    let mut bb = 0u64;
    let mut i = 0;
    while i < deltas.len() {
        let (f, r) = (file + deltas[i].0, rank + deltas[i].1);
        if on_board(f, r) {
            bb |= 1u64 << (r * 8 + f);
        }
        i += 1;
    }
    bb
}

/// Sliding attacks by walking each ray until it leaves the board or hits a blocker
/// (the blocker square is included)
pub(crate) const fn ray_attacks(sq: usize, occupied: u64, directions: &[(i8, i8); 4]) -> u64 {
    let mut bb = 0u64;
    let mut d = 0;
    while d < 4 {
        let (df, dr) = directions[d];
        let mut f = (sq % 8) as i8 + df;
        let mut r = (sq / 8) as i8 + dr;
        while on_board(f, r) {
            let bit = 1u64 << (r * 8 + f);
            bb |= bit;
            if occupied & bit != 0 {
                break;
            }
            f += df;
            r += dr;
        }
        d += 1;
    }
    bb
}

const fn init_step_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = Bitboard(step_attacks(sq, deltas));
        sq += 1;
    }
    table
}

const fn init_pawn_attacks() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        table[0][sq] = Bitboard(step_attacks(sq, &[(-1, 1), (1, 1)]));
        table[1][sq] = Bitboard(step_attacks(sq, &[(-1, -1), (1, -1)]));
        sq += 1;
    }
    table
}

const fn signum(v: i8) -> i8 {
    if v > 0 {
        1
    } else if v < 0 {
        -1
    } else {
        0
    }
}

/// Unit step from `a` towards `b` if both lie on a common rank, file or diagonal
const fn direction(a: usize, b: usize) -> Option<(i8, i8)> {
    if a == b {
        return None;
    }
    let df = (b % 8) as i8 - (a % 8) as i8;
    let dr = (b / 8) as i8 - (a / 8) as i8;
    if df == 0 || dr == 0 || df == dr || df == -dr {
        Some((signum(df), signum(dr)))
    } else {
        None
    }
}

const fn init_between() -> [[Bitboard; 64]; 64] {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut a = 0;
    while a < 64 {
        let mut b = 0;
        while b < 64 {
            if let Some((df, dr)) = direction(a, b) {
                let mut bb = 0u64;
                let mut f = (a % 8) as i8 + df;
                let mut r = (a / 8) as i8 + dr;
                while (r * 8 + f) as usize != b {
                    bb |= 1u64 << (r * 8 + f);
                    f += df;
                    r += dr;
                }
                table[a][b] = Bitboard(bb);
            }
            b += 1;
        }
        a += 1;
    }
    table
}

const fn init_line() -> [[Bitboard; 64]; 64] {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut a = 0;
    while a < 64 {
        let mut b = 0;
        while b < 64 {
            if let Some((df, dr)) = direction(a, b) {
                let mut bb = 1u64 << a;
                let mut sign = 0;
                while sign < 2 {
                    let (sf, sr) = if sign == 0 { (df, dr) } else { (-df, -dr) };
                    let mut f = (a % 8) as i8 + sf;
                    let mut r = (a / 8) as i8 + sr;
                    while on_board(f, r) {
                        bb |= 1u64 << (r * 8 + f);
                        f += sf;
                        r += sr;
                    }
                    sign += 1;
                }
                table[a][b] = Bitboard(bb);
            }
            b += 1;
        }
        a += 1;
    }
    table
}

pub static KNIGHT_ATTACKS: [Bitboard; 64] = init_step_table(&KNIGHT_DELTAS);
pub static KING_ATTACKS: [Bitboard; 64] = init_step_table(&KING_DELTAS);
/// Squares attacked by a pawn of `[color][square]`
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = init_pawn_attacks();

static BETWEEN_BB: [[Bitboard; 64]; 64] = init_between();
static LINE_BB: [[Bitboard; 64]; 64] = init_line();

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

/// Squares strictly between `a` and `b` (empty when not aligned)
#[inline]
pub fn between_bb(a: Square, b: Square) -> Bitboard {
    BETWEEN_BB[a.index()][b.index()]
}

/// The whole rank, file or diagonal through `a` and `b` (empty when not aligned)
#[inline]
pub fn line_bb(a: Square, b: Square) -> Bitboard {
    LINE_BB[a.index()][b.index()]
}

/// Squares a piece on `piece_sq` pinned to the king on `king_sq` may still move to
#[inline]
pub fn pinned_movement_bb(piece_sq: Square, king_sq: Square) -> Bitboard {
    line_bb(piece_sq, king_sq)
}

/// `a`, `b` and `c` lie on one line
#[inline]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    line_bb(a, b).contains(c)
}
