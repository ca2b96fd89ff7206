//! Per-thread search state
//!
//! Move buffer shared by all plies (one frame per node, no allocation while
//! searching), killer slots, counter moves, the history/butterfly tables and
//! the evaluation caches.

use crate::eval::EvalCaches;
use crate::movegen::MoveSink;
use crate::types::{Bound, Color, Depth, MAX_MOVE_BUFFER, MAX_PLY, Move, MoveKind, PieceType, Square, Value};

use super::pv::PvLine;
#[cfg(feature = "search-stats")]
use super::stats::SearchStats;

/// Frames available to one thread; quiescence may go deeper than `MAX_PLY`
pub const MAX_FRAMES: usize = MAX_PLY * 2;

const FROM_TO: usize = Square::NUM * Square::NUM;

pub struct ThreadData {
    id: usize,

    moves: Box<[Move]>,
    scores: Box<[i32]>,
    next_to_generate: [usize; MAX_FRAMES + 1],
    next_to_move: [usize; MAX_FRAMES + 1],
    frame: usize,

    /// Move played at each search ply (`NONE` for a null move)
    played: [Move; MAX_FRAMES + 1],
    killer1: [Move; MAX_PLY],
    killer2: [Move; MAX_PLY],
    /// `[color][piece][to]` of the opponent's last move
    counter: [[[Move; Square::NUM]; PieceType::NUM]; Color::NUM],
    /// Depth-squared credit for quiet moves that caused a cutoff, by `[color][from * 64 + to]`
    history: Box<[[u64; FROM_TO]]>,
    /// Depth-squared credit for every quiet move searched
    butterfly: Box<[[u64; FROM_TO]]>,

    pub(crate) eval_caches: EvalCaches,
    #[cfg(feature = "search-stats")]
    pub(crate) stats: SearchStats,

    pub(crate) nodes: u64,
    pub(crate) seldepth: i32,

    /// Root result of the main thread
    pub(crate) pv: PvLine,
    pub(crate) best_score: Value,
    pub(crate) best_depth: Depth,
    pub(crate) best_bound: Bound,
}

impl ThreadData {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            moves: vec![Move::NONE; MAX_MOVE_BUFFER].into_boxed_slice(),
            scores: vec![0; MAX_MOVE_BUFFER].into_boxed_slice(),
            next_to_generate: [0; MAX_FRAMES + 1],
            next_to_move: [0; MAX_FRAMES + 1],
            frame: 0,
            played: [Move::NONE; MAX_FRAMES + 1],
            killer1: [Move::NONE; MAX_PLY],
            killer2: [Move::NONE; MAX_PLY],
            counter: [[[Move::NONE; Square::NUM]; PieceType::NUM]; Color::NUM],
            history: vec![[1; FROM_TO]; Color::NUM].into_boxed_slice(),
            butterfly: vec![[1; FROM_TO]; Color::NUM].into_boxed_slice(),
            eval_caches: EvalCaches::new(),
            #[cfg(feature = "search-stats")]
            stats: SearchStats::default(),
            nodes: 0,
            seldepth: 0,
            pv: PvLine::new(),
            best_score: Value::ZERO,
            best_depth: 0,
            best_bound: Bound::None,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn is_main(&self) -> bool {
        self.id == 0
    }

    /// Best root move found so far (main thread)
    #[inline]
    pub fn best_move(&self) -> Move {
        self.pv.first().copied().unwrap_or(Move::NONE)
    }

    #[inline]
    pub fn ponder_move(&self) -> Move {
        self.pv.get(1).copied().unwrap_or(Move::NONE)
    }

    /// Statistics summary (empty without the `search-stats` feature)
    #[cfg(feature = "search-stats")]
    pub fn stats_report(&self) -> String {
        self.stats.format_report(&self.eval_caches)
    }

    #[cfg(not(feature = "search-stats"))]
    pub fn stats_report(&self) -> String {
        String::new()
    }

    pub fn clear_history(&mut self) {
        for table in self.history.iter_mut().chain(self.butterfly.iter_mut()) {
            table.fill(1);
        }
        self.killer1 = [Move::NONE; MAX_PLY];
        self.killer2 = [Move::NONE; MAX_PLY];
    }

    // ---- move buffer frames ----

    /// Open a frame for a new node; it starts empty where the parent's frame ends
    #[inline]
    pub fn start_ply(&mut self) {
        debug_assert!(self.frame < MAX_FRAMES);
        let end = self.next_to_generate[self.frame];
        self.frame += 1;
        self.next_to_generate[self.frame] = end;
        self.next_to_move[self.frame] = end;
    }

    #[inline]
    pub fn end_ply(&mut self) {
        debug_assert!(self.frame > 0);
        self.frame -= 1;
    }

    #[inline]
    pub fn add_move(&mut self, mv: Move) {
        let slot = self.next_to_generate[self.frame];
        if slot < MAX_MOVE_BUFFER {
            self.moves[slot] = mv;
            self.next_to_generate[self.frame] = slot + 1;
        } else {
            debug_assert!(false, "move buffer exhausted");
        }
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.next_to_move[self.frame] != self.next_to_generate[self.frame]
    }

    /// Next move of the current frame, with its ordering score
    #[inline]
    pub fn next(&mut self) -> (Move, i32) {
        let slot = self.next_to_move[self.frame];
        self.next_to_move[self.frame] = slot + 1;
        (self.moves[slot], self.scores[slot])
    }

    #[inline]
    fn pending(&self) -> std::ops::Range<usize> {
        self.next_to_move[self.frame]..self.next_to_generate[self.frame]
    }

    /// Most valuable victim first, least valuable attacker second; queen
    /// promotions ahead of everything of equal victim
    pub fn set_mvvlva_scores(&mut self) {
        for slot in self.pending() {
            let mv = self.moves[slot];
            let mut score = mv.captured_index() as i32 * 6 - mv.piece_index() as i32;
            if mv.kind() == MoveKind::PromotionQueen {
                score += PieceType::Queen as i32 * 6;
            }
            self.scores[slot] = score;
        }
    }

    pub fn set_history_scores(&mut self, color: Color) {
        for slot in self.pending() {
            self.scores[slot] = self.history_score(color, self.moves[slot]);
        }
    }

    /// Stable insertion sort of the pending moves, highest score first
    pub fn sort(&mut self) {
        let range = self.pending();
        let left = range.start;
        for i in range.clone().skip(1) {
            let (mv, score) = (self.moves[i], self.scores[i]);
            let mut j = i;
            while j > left && self.scores[j - 1] < score {
                self.moves[j] = self.moves[j - 1];
                self.scores[j] = self.scores[j - 1];
                j -= 1;
            }
            self.moves[j] = mv;
            self.scores[j] = score;
        }
    }

    // ---- ordering heuristics ----

    #[inline]
    pub fn set_played(&mut self, ply: usize, mv: Move) {
        self.played[ply] = mv;
    }

    /// Move that led to the node at `ply`
    #[inline]
    pub fn parent_move(&self, ply: usize) -> Move {
        if ply == 0 { Move::NONE } else { self.played[ply - 1] }
    }

    #[inline]
    pub fn killers(&self, ply: usize) -> (Move, Move) {
        match (self.killer1.get(ply), self.killer2.get(ply)) {
            (Some(&k1), Some(&k2)) => (k1, k2),
            _ => (Move::NONE, Move::NONE),
        }
    }

    pub fn add_killer(&mut self, mv: Move, ply: usize) {
        if ply >= MAX_PLY || self.killer1[ply] == mv {
            return;
        }
        self.killer2[ply] = self.killer1[ply];
        self.killer1[ply] = mv;
    }

    #[inline]
    pub fn counter_move(&self, color: Color, parent: Move) -> Move {
        if parent.is_none() {
            return Move::NONE;
        }
        self.counter[color.index()][parent.piece_index()][parent.to().index()]
    }

    pub fn add_counter_move(&mut self, color: Color, parent: Move, mv: Move) {
        if parent.is_some() {
            self.counter[color.index()][parent.piece_index()][parent.to().index()] = mv;
        }
    }

    #[inline]
    fn from_to(mv: Move) -> usize {
        mv.from().index() * Square::NUM + mv.to().index()
    }

    pub fn add_history(&mut self, color: Color, mv: Move, depth: Depth) {
        let bonus = (depth * depth) as u64;
        self.history[color.index()][Self::from_to(mv)] += bonus;
    }

    pub fn add_butterfly(&mut self, color: Color, mv: Move, depth: Depth) {
        let bonus = (depth * depth) as u64;
        self.butterfly[color.index()][Self::from_to(mv)] += bonus;
    }

    /// Cutoff rate of a quiet move in percent, saturating at `i32::MAX`
    pub fn history_score(&self, color: Color, mv: Move) -> i32 {
        let idx = Self::from_to(mv);
        let c = color.index();
        let ratio = self.history[c][idx].saturating_mul(100) / self.butterfly[c][idx];
        i32::try_from(ratio).unwrap_or(i32::MAX)
    }
}

impl MoveSink for ThreadData {
    #[inline]
    fn push_move(&mut self, mv: Move) {
        self.add_move(mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::generate_attacks_into;
    use crate::position::Position;

    fn quiet(from: Square, to: Square) -> Move {
        Move::new(from, to, PieceType::Knight, None, MoveKind::Normal)
    }

    #[test]
    fn test_frames_are_nested() {
        let mut td = ThreadData::new(0);
        td.start_ply();
        td.add_move(quiet(Square::G1, Square::F3));
        td.add_move(quiet(Square::B1, Square::C3));
        assert_eq!(td.next().0, quiet(Square::G1, Square::F3));

        td.start_ply();
        assert!(!td.has_next());
        td.add_move(quiet(Square::G8, Square::F6));
        assert_eq!(td.next().0, quiet(Square::G8, Square::F6));
        assert!(!td.has_next());
        td.end_ply();

        assert!(td.has_next());
        assert_eq!(td.next().0, quiet(Square::B1, Square::C3));
        assert!(!td.has_next());
        td.end_ply();
    }

    #[test]
    fn test_mvvlva_order() {
        // Pawn takes the queen on d5 before the knight takes the rook on a5
        let pos = Position::from_fen("4k3/8/8/r2q4/2P5/1N6/8/4K3 w - - 0 1").unwrap();
        let mut td = ThreadData::new(0);
        td.start_ply();
        generate_attacks_into(&pos, false, &mut td);
        td.set_mvvlva_scores();
        td.sort();
        let mut order = Vec::new();
        while td.has_next() {
            order.push(td.next().0.to_string());
        }
        assert_eq!(order, ["c4d5", "b3a5"]);
        td.end_ply();
    }

    #[test]
    fn test_killers_shift() {
        let mut td = ThreadData::new(0);
        let (a, b, c) = (
            quiet(Square::G1, Square::F3),
            quiet(Square::B1, Square::C3),
            quiet(Square::G1, Square::H3),
        );
        td.add_killer(a, 3);
        td.add_killer(a, 3);
        assert_eq!(td.killers(3), (a, Move::NONE));
        td.add_killer(b, 3);
        td.add_killer(c, 3);
        assert_eq!(td.killers(3), (c, b));
        assert_eq!(td.killers(MAX_PLY + 5), (Move::NONE, Move::NONE));
    }

    #[test]
    fn test_history_ratio() {
        let mut td = ThreadData::new(0);
        let mv = quiet(Square::G1, Square::F3);
        assert_eq!(td.history_score(Color::White, mv), 100);
        td.add_butterfly(Color::White, mv, 3);
        assert_eq!(td.history_score(Color::White, mv), 10);
        td.add_history(Color::White, mv, 3);
        assert_eq!(td.history_score(Color::White, mv), 100);
        assert_eq!(td.history_score(Color::Black, mv), 100);
    }

    #[test]
    fn test_history_ratio_saturates() {
        let mut td = ThreadData::new(0);
        let mv = quiet(Square::G1, Square::F3);
        // 6000 cutoffs at depth 64 without a single failed try
        for _ in 0..6000 {
            td.add_history(Color::White, mv, 64);
        }
        assert_eq!(td.history_score(Color::White, mv), i32::MAX);
        td.add_butterfly(Color::White, mv, 64);
        let score = td.history_score(Color::White, mv);
        assert!(score > 0 && score < i32::MAX);
    }

    #[test]
    fn test_counter_move_by_parent() {
        let mut td = ThreadData::new(0);
        let parent = quiet(Square::G8, Square::F6);
        let reply = quiet(Square::G1, Square::F3);
        assert_eq!(td.counter_move(Color::White, parent), Move::NONE);
        td.add_counter_move(Color::White, parent, reply);
        assert_eq!(td.counter_move(Color::White, parent), reply);
        assert_eq!(td.counter_move(Color::Black, parent), Move::NONE);
        td.add_counter_move(Color::White, Move::NONE, reply);
        assert_eq!(td.counter_move(Color::White, Move::NONE), Move::NONE);
    }
}
