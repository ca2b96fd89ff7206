//! `Position`: board arrays, incremental keys and scores

use std::fmt;

use crate::bitboard::Bitboard;
use crate::eval::material::PHASE;
use crate::eval::psqt::psq_score;
use crate::types::{Color, PieceType, Square};

use super::state::{ALL_CASTLING, StateInfo};
use super::zobrist::zobrist;

/// Standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Preallocated history depth; covers a long game plus the deepest search line
const HISTORY_CAPACITY: usize = 1024;

/// Bit offset of a piece count inside the material signature
#[inline]
pub const fn material_shift(color: Color, pt: PieceType) -> u32 {
    color.index() as u32 * 32 + (pt.index() as u32 - 1) * 4
}

/// Chess position
#[derive(Clone)]
pub struct Position {
    /// `[color][piece type]`; slot 0 holds every piece of that color
    pub(super) by_type: [[Bitboard; PieceType::NUM]; Color::NUM],
    pub(super) occupied: Bitboard,
    pub(super) board: [Option<PieceType>; Square::NUM],
    pub(super) side_to_move: Color,
    pub(super) king_sq: [Square; Color::NUM],

    /// 4 bits per (color, piece type) count; kings are not counted
    pub(super) material_key: u64,
    /// Sum of `PHASE` over all pieces
    pub(super) phase: i32,
    /// White-relative PSQT sums
    pub(super) psq_mg: i32,
    pub(super) psq_eg: i32,

    /// Plies since the game start: full-move number * 2, +1 with black to move
    pub(super) move_counter: u32,

    pub(super) st: StateInfo,
    pub(super) history: Vec<StateInfo>,
}

impl Position {
    pub(super) fn empty() -> Position {
        Position {
            by_type: [[Bitboard::EMPTY; PieceType::NUM]; Color::NUM],
            occupied: Bitboard::EMPTY,
            board: [None; Square::NUM],
            side_to_move: Color::White,
            king_sq: [Square::E1, Square::E8],
            material_key: 0,
            phase: 0,
            psq_mg: 0,
            psq_eg: 0,
            move_counter: 2,
            st: StateInfo::default(),
            history: Vec::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Initial position
    pub fn startpos() -> Position {
        match Position::from_fen(START_FEN) {
            Ok(pos) => pos,
            Err(e) => unreachable!("start FEN rejected: {e}"),
        }
    }

    /// Assemble a position from a validated piece placement and computed fields.
    /// Keys are computed from scratch and the check caches are filled.
    pub(super) fn from_parts(
        pieces: &[Option<(Color, PieceType)>; Square::NUM],
        side_to_move: Color,
        castling: u8,
        ep_square: Option<Square>,
        halfmove_clock: u32,
        move_counter: u32,
    ) -> Position {
        let mut pos = Position::empty();
        for sq in Square::all() {
            if let Some((color, pt)) = pieces[sq.index()] {
                pos.put_piece(color, pt, sq);
            }
        }
        pos.side_to_move = side_to_move;
        pos.move_counter = move_counter;
        pos.st.castling = castling & ALL_CASTLING;
        pos.st.halfmove_clock = halfmove_clock;
        pos.st.plies_from_null = halfmove_clock;
        pos.st.ep_square = ep_square.filter(|&ep| pos.ep_capturable(ep));
        pos.st.key = pos.compute_key();
        pos.st.pawn_key = pos.compute_pawn_key();
        pos.update_check_info();
        pos
    }

    // ---- accessors ----

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn pieces_of(&self, color: Color) -> Bitboard {
        self.by_type[color.index()][0]
    }

    #[inline]
    pub fn pieces(&self, color: Color, pt: PieceType) -> Bitboard {
        self.by_type[color.index()][pt.index()]
    }

    /// Both colors' pieces of one type
    #[inline]
    pub fn pieces_by_type(&self, pt: PieceType) -> Bitboard {
        self.by_type[0][pt.index()] | self.by_type[1][pt.index()]
    }

    /// Rooks and queens of `color`
    #[inline]
    pub fn rook_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceType::Rook) | self.pieces(color, PieceType::Queen)
    }

    /// Bishops and queens of `color`
    #[inline]
    pub fn bishop_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceType::Bishop) | self.pieces(color, PieceType::Queen)
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<PieceType> {
        self.board[sq.index()]
    }

    #[inline]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        if self.by_type[0][0].contains(sq) {
            Some(Color::White)
        } else if self.by_type[1][0].contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_sq[color.index()]
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.st.key
    }

    #[inline]
    pub fn pawn_key(&self) -> u64 {
        self.st.pawn_key
    }

    #[inline]
    pub fn material_key(&self) -> u64 {
        self.material_key
    }

    /// Piece count read from the material signature
    #[inline]
    pub fn material_count(&self, color: Color, pt: PieceType) -> u32 {
        ((self.material_key >> material_shift(color, pt)) & 0xF) as u32
    }

    #[inline]
    pub fn phase(&self) -> i32 {
        self.phase
    }

    /// White-relative (middle game, end game) PSQT sums
    #[inline]
    pub fn psq_score(&self) -> (i32, i32) {
        (self.psq_mg, self.psq_eg)
    }

    #[inline]
    pub fn castling_rights(&self) -> u8 {
        self.st.castling
    }

    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.st.ep_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.st.halfmove_clock
    }

    #[inline]
    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }

    #[inline]
    pub fn checkers(&self) -> Bitboard {
        self.st.checkers
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.st.checkers.is_not_empty()
    }

    #[inline]
    pub fn pinned(&self) -> Bitboard {
        self.st.pinned
    }

    #[inline]
    pub fn discovered(&self) -> Bitboard {
        self.st.discovered
    }

    /// Number of moves made since the position was loaded
    #[inline]
    pub fn game_ply(&self) -> usize {
        self.history.len()
    }

    /// The side has something other than pawns and king
    #[inline]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        (self.pieces_of(color)
            ^ self.pieces(color, PieceType::Pawn)
            ^ self.pieces(color, PieceType::King))
        .is_not_empty()
    }

    /// Piece-index table for round-trip comparisons
    pub fn board_array(&self) -> [Option<PieceType>; Square::NUM] {
        self.board
    }

    // ---- incremental piece operations ----

    pub(super) fn put_piece(&mut self, color: Color, pt: PieceType, sq: Square) {
        let bit = Bitboard::from_square(sq);
        debug_assert!(self.board[sq.index()].is_none(), "square {sq} occupied");
        self.by_type[color.index()][pt.index()] |= bit;
        self.by_type[color.index()][0] |= bit;
        self.occupied |= bit;
        self.board[sq.index()] = Some(pt);

        let z = zobrist().piece(color, pt, sq);
        self.st.key ^= z;
        if pt == PieceType::Pawn {
            self.st.pawn_key ^= z;
        }
        if pt == PieceType::King {
            self.king_sq[color.index()] = sq;
        } else {
            self.material_key += 1 << material_shift(color, pt);
        }
        self.phase += PHASE[pt.index()];
        let (mg, eg) = psq_score(color, pt, sq);
        self.psq_mg += mg;
        self.psq_eg += eg;
    }

    pub(super) fn remove_piece(&mut self, color: Color, pt: PieceType, sq: Square) {
        let bit = Bitboard::from_square(sq);
        debug_assert!(self.board[sq.index()] == Some(pt), "no {pt:?} on {sq}");
        self.by_type[color.index()][pt.index()] ^= bit;
        self.by_type[color.index()][0] ^= bit;
        self.occupied ^= bit;
        self.board[sq.index()] = None;

        let z = zobrist().piece(color, pt, sq);
        self.st.key ^= z;
        if pt == PieceType::Pawn {
            self.st.pawn_key ^= z;
        }
        if pt != PieceType::King {
            self.material_key -= 1 << material_shift(color, pt);
        }
        self.phase -= PHASE[pt.index()];
        let (mg, eg) = psq_score(color, pt, sq);
        self.psq_mg -= mg;
        self.psq_eg -= eg;
    }

    pub(super) fn move_piece(&mut self, color: Color, pt: PieceType, from: Square, to: Square) {
        let from_to = Bitboard::from_square(from) | Bitboard::from_square(to);
        debug_assert!(self.board[to.index()].is_none(), "square {to} occupied");
        self.by_type[color.index()][pt.index()] ^= from_to;
        self.by_type[color.index()][0] ^= from_to;
        self.occupied ^= from_to;
        self.board[from.index()] = None;
        self.board[to.index()] = Some(pt);

        let z = zobrist();
        let delta = z.piece(color, pt, from) ^ z.piece(color, pt, to);
        self.st.key ^= delta;
        if pt == PieceType::Pawn {
            self.st.pawn_key ^= delta;
        }
        if pt == PieceType::King {
            self.king_sq[color.index()] = to;
        }
        let (from_mg, from_eg) = psq_score(color, pt, from);
        let (to_mg, to_eg) = psq_score(color, pt, to);
        self.psq_mg += to_mg - from_mg;
        self.psq_eg += to_eg - from_eg;
    }

    // ---- from-scratch recomputation ----

    /// Zobrist key hashed from the board and state fields
    pub fn compute_key(&self) -> u64 {
        let z = zobrist();
        let mut key = 0u64;
        for sq in self.occupied {
            if let (Some(pt), Some(color)) = (self.piece_on(sq), self.color_on(sq)) {
                key ^= z.piece(color, pt, sq);
            }
        }
        key ^= z.castling[self.st.castling as usize];
        if let Some(ep) = self.st.ep_square {
            key ^= z.ep_file[ep.file() as usize];
        }
        if self.side_to_move == Color::Black {
            key ^= z.side;
        }
        key
    }

    pub fn compute_pawn_key(&self) -> u64 {
        let z = zobrist();
        let mut key = 0u64;
        for color in Color::ALL {
            for sq in self.pieces(color, PieceType::Pawn) {
                key ^= z.piece(color, PieceType::Pawn, sq);
            }
        }
        key
    }

    /// En-passant target is only recorded when the side to move can capture onto it
    pub(super) fn ep_capturable(&self, ep: Square) -> bool {
        let us = self.side_to_move;
        (crate::bitboard::pawn_attacks(us.opponent(), ep) & self.pieces(us, PieceType::Pawn))
            .is_not_empty()
    }

    /// Check every cached field against a recomputation from the board
    pub fn validate(&self) -> Result<(), &'static str> {
        for color in Color::ALL {
            let mut union = Bitboard::EMPTY;
            for pt in PieceType::ALL {
                let bb = self.pieces(color, pt);
                if (union & bb).is_not_empty() {
                    return Err("piece bitboards overlap");
                }
                union |= bb;
            }
            if union != self.pieces_of(color) {
                return Err("color aggregate differs from piece union");
            }
            let kings = self.pieces(color, PieceType::King);
            if kings.count() != 1 || kings.lsb() != self.king_square(color) {
                return Err("cached king square mismatch");
            }
        }
        if (self.pieces_of(Color::White) & self.pieces_of(Color::Black)).is_not_empty() {
            return Err("colors overlap");
        }
        if self.pieces_of(Color::White) | self.pieces_of(Color::Black) != self.occupied {
            return Err("occupancy differs from color union");
        }
        let mut material_key = 0u64;
        let mut phase = 0;
        let (mut mg, mut eg) = (0, 0);
        for sq in Square::all() {
            let pt = self.piece_on(sq);
            if pt.is_some() != self.occupied.contains(sq) {
                return Err("piece index differs from occupancy");
            }
            if let (Some(pt), Some(color)) = (pt, self.color_on(sq)) {
                if !self.pieces(color, pt).contains(sq) {
                    return Err("piece index differs from piece bitboards");
                }
                if pt != PieceType::King {
                    material_key += 1 << material_shift(color, pt);
                }
                phase += PHASE[pt.index()];
                let (m, e) = psq_score(color, pt, sq);
                mg += m;
                eg += e;
            }
        }
        if material_key != self.material_key {
            return Err("material signature drift");
        }
        if phase != self.phase {
            return Err("phase drift");
        }
        if (mg, eg) != (self.psq_mg, self.psq_eg) {
            return Err("PSQT drift");
        }
        if self.compute_key() != self.st.key {
            return Err("Zobrist key drift");
        }
        if self.compute_pawn_key() != self.st.pawn_key {
            return Err("pawn key drift");
        }
        Ok(())
    }

    /// Colors swapped and board flipped vertically
    pub fn mirrored(&self) -> Position {
        let mut pieces = [None; Square::NUM];
        for sq in self.occupied {
            if let (Some(pt), Some(color)) = (self.piece_on(sq), self.color_on(sq)) {
                pieces[sq.flip_rank().index()] = Some((color.opponent(), pt));
            }
        }
        let c = self.st.castling;
        let castling = ((c & 3) << 2) | (c >> 2);
        let move_counter = (self.move_counter & !1) | (self.side_to_move.opponent().index() as u32);
        Position::from_parts(
            &pieces,
            self.side_to_move.opponent(),
            castling,
            self.st.ep_square.map(Square::flip_rank),
            self.st.halfmove_clock,
            move_counter,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = Square::new(file, rank);
                let c = match (self.piece_on(sq), self.color_on(sq)) {
                    (Some(pt), Some(color)) => pt.to_char(color),
                    _ => '.',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  abcdefgh")?;
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}
