//! King and pawn against king bitbase
//!
//! Every placement with the pawn on files a-d (other files are mirrored) is
//! classified by retrograde iteration: positions that promote safely are won,
//! stalemates and pawn captures are drawn, and the rest are resolved from
//! their successors until nothing changes. Unresolved positions are draws.

use std::sync::OnceLock;

use crate::bitboard::{king_attacks, pawn_attacks};
use crate::types::{Color, Square};

/// Pawn files a-d, ranks 2-7
const PAWN_SQUARES: usize = 24;
const MAX_INDEX: usize = Color::NUM * PAWN_SQUARES * Square::NUM * Square::NUM;

const INVALID: u8 = 0;
const UNKNOWN: u8 = 1;
const DRAW: u8 = 2;
const WIN: u8 = 4;

static BITBASE: OnceLock<Box<[u64]>> = OnceLock::new();

/// `strong_to_move` is the side with the pawn, squares normalised to a white
/// pawn on files a-d
fn index(strong_to_move: bool, strong_king: Square, pawn: Square, weak_king: Square) -> usize {
    strong_king.index()
        | weak_king.index() << 6
        | (!strong_to_move as usize) << 12
        | (pawn.file() as usize) << 13
        | (6 - pawn.rank() as usize) << 15
}

fn distance(a: Square, b: Square) -> u8 {
    a.file().abs_diff(b.file()).max(a.rank().abs_diff(b.rank()))
}

/// Decode an index back into `(strong_to_move, strong_king, pawn, weak_king)`
fn decode(idx: usize) -> (bool, Square, Square, Square) {
    let strong_king = Square::from_index(idx & 0x3F);
    let weak_king = Square::from_index((idx >> 6) & 0x3F);
    let strong_to_move = (idx >> 12) & 1 == 0;
    let file = ((idx >> 13) & 3) as u8;
    let rank = 6 - ((idx >> 15) & 7) as u8;
    (strong_to_move, strong_king, Square::new(file, rank), weak_king)
}

fn initial(idx: usize) -> u8 {
    let (strong_to_move, sk, pawn, wk) = decode(idx);
    let push = pawn.offset(8);

    if distance(sk, wk) <= 1
        || sk == pawn
        || wk == pawn
        || (strong_to_move && pawn_attacks(Color::White, pawn).contains(wk))
    {
        return INVALID;
    }

    if strong_to_move
        && pawn.rank() == 6
        && sk != push
        && wk != push
        && (distance(wk, push) > 1 || distance(sk, push) == 1)
    {
        return WIN;
    }

    if !strong_to_move {
        let escapes = king_attacks(wk) & !(king_attacks(sk) | pawn_attacks(Color::White, pawn));
        if escapes.is_empty() || (king_attacks(wk) & !king_attacks(sk)).contains(pawn) {
            return DRAW;
        }
    }
    UNKNOWN
}

fn classify(db: &[u8], idx: usize) -> u8 {
    let (strong_to_move, sk, pawn, wk) = decode(idx);
    let (good, bad) = if strong_to_move { (WIN, DRAW) } else { (DRAW, WIN) };

    let mut r = INVALID;
    if strong_to_move {
        for to in king_attacks(sk) {
            r |= db[index(false, to, pawn, wk)];
        }
        if pawn.rank() < 6 {
            let push = pawn.offset(8);
            r |= db[index(false, sk, push, wk)];
            if pawn.rank() == 1 && push != sk && push != wk {
                r |= db[index(false, sk, push.offset(8), wk)];
            }
        }
    } else {
        for to in king_attacks(wk) {
            r |= db[index(true, sk, pawn, to)];
        }
    }

    if r & good != 0 {
        good
    } else if r & UNKNOWN != 0 {
        UNKNOWN
    } else {
        bad
    }
}

fn build() -> Box<[u64]> {
    let mut db: Vec<u8> = (0..MAX_INDEX).map(initial).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for idx in 0..MAX_INDEX {
            if db[idx] == UNKNOWN {
                let result = classify(&db, idx);
                if result != UNKNOWN {
                    db[idx] = result;
                    changed = true;
                }
            }
        }
    }

    let mut bits = vec![0u64; MAX_INDEX / 64].into_boxed_slice();
    for (idx, _) in db.iter().enumerate().filter(|&(_, &r)| r == WIN) {
        bits[idx / 64] |= 1 << (idx % 64);
    }
    log::debug!("KPK bitbase: {} won positions", bits.iter().map(|w| w.count_ones()).sum::<u32>());
    bits
}

/// Whether the side with the pawn wins with best play
pub fn is_win(strong: Color, strong_king: Square, pawn: Square, weak_king: Square, side_to_move: Color) -> bool {
    let flip_rank = |sq: Square| if strong == Color::White { sq } else { sq.flip_rank() };
    let (mut sk, mut p, mut wk) = (flip_rank(strong_king), flip_rank(pawn), flip_rank(weak_king));
    if p.file() >= 4 {
        let flip_file = |sq: Square| Square::new(7 - sq.file(), sq.rank());
        (sk, p, wk) = (flip_file(sk), flip_file(p), flip_file(wk));
    }
    debug_assert!((1..=6).contains(&p.rank()));

    let idx = index(side_to_move == strong, sk, p, wk);
    let bits = BITBASE.get_or_init(build);
    bits[idx / 64] & (1 << (idx % 64)) != 0
}

/// Drawn with best play (the pawn side cannot force promotion)
#[inline]
pub fn is_draw(strong: Color, strong_king: Square, pawn: Square, weak_king: Square, side_to_move: Color) -> bool {
    !is_win(strong, strong_king, pawn, weak_king, side_to_move)
}
