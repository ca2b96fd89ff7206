//! Staged move ordering
//!
//! Phases in order: TT move, captures and promotions (MVV-LVA), killer 1,
//! killer 2, counter move, quiets (history ratio). Each phase appends its
//! moves to the node's frame in `ThreadData` only when the previous phase
//! is exhausted, so a cutoff on the TT move generates nothing.

use crate::movegen::{generate_attacks_into, generate_quiets_into};
use crate::position::Position;
use crate::types::Move;

use super::thread_data::ThreadData;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    TtMove,
    Attacks,
    Killer1,
    Killer2,
    Counter,
    Quiets,
}

impl Phase {
    fn next(self) -> Option<Phase> {
        match self {
            Phase::TtMove => Some(Phase::Attacks),
            Phase::Attacks => Some(Phase::Killer1),
            Phase::Killer1 => Some(Phase::Killer2),
            Phase::Killer2 => Some(Phase::Counter),
            Phase::Counter => Some(Phase::Quiets),
            Phase::Quiets => None,
        }
    }
}

pub struct MovePicker {
    pending: Option<Phase>,
    tt_move: Move,
    killer1: Move,
    killer2: Move,
    counter: Move,
    parent: Move,
    ply: usize,
    under_promotions: bool,
}

impl MovePicker {
    pub fn new(tt_move: Move, ply: usize, parent: Move, under_promotions: bool) -> Self {
        Self {
            pending: Some(Phase::TtMove),
            tt_move,
            killer1: Move::NONE,
            killer2: Move::NONE,
            counter: Move::NONE,
            parent,
            ply,
            under_promotions,
        }
    }

    #[inline]
    pub fn tt_move(&self) -> Move {
        self.tt_move
    }

    /// Killer or counter move of this node
    #[inline]
    pub fn is_refutation(&self, mv: Move) -> bool {
        mv.is_some() && (mv == self.killer1 || mv == self.killer2 || mv == self.counter)
    }

    /// Load the next non-empty phase into the current frame
    pub fn fill_next(&mut self, pos: &Position, td: &mut ThreadData) -> Option<Phase> {
        loop {
            let phase = self.pending?;
            self.pending = phase.next();
            match phase {
                Phase::TtMove => {
                    if self.tt_move.is_some() && pos.is_valid_move(self.tt_move) {
                        td.add_move(self.tt_move);
                        td.set_history_scores(pos.side_to_move());
                        return Some(phase);
                    }
                    self.tt_move = Move::NONE;
                }
                Phase::Attacks => {
                    generate_attacks_into(pos, self.under_promotions, td);
                    td.set_mvvlva_scores();
                    td.sort();
                    return Some(phase);
                }
                Phase::Killer1 | Phase::Killer2 => {
                    let (k1, k2) = td.killers(self.ply);
                    let killer = if phase == Phase::Killer1 { k1 } else { k2 };
                    if killer.is_some() && killer != self.tt_move && pos.is_valid_move(killer) {
                        if phase == Phase::Killer1 {
                            self.killer1 = killer;
                        } else {
                            self.killer2 = killer;
                        }
                        td.add_move(killer);
                        td.set_history_scores(pos.side_to_move());
                        return Some(phase);
                    }
                }
                Phase::Counter => {
                    let counter = td.counter_move(pos.side_to_move(), self.parent);
                    if counter.is_some()
                        && counter != self.tt_move
                        && counter != self.killer1
                        && counter != self.killer2
                        && pos.is_valid_move(counter)
                    {
                        self.counter = counter;
                        td.add_move(counter);
                        td.set_history_scores(pos.side_to_move());
                        return Some(phase);
                    }
                }
                Phase::Quiets => {
                    generate_quiets_into(pos, td);
                    td.set_history_scores(pos.side_to_move());
                    td.sort();
                    return Some(phase);
                }
            }
        }
    }

    /// Already tried in an earlier phase
    pub fn is_duplicate(&self, phase: Phase, mv: Move) -> bool {
        match phase {
            Phase::Attacks => mv == self.tt_move,
            Phase::Quiets => mv == self.tt_move || self.is_refutation(mv),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::{MoveList, generate_legal};

    fn collect(pos: &Position, td: &mut ThreadData, picker: &mut MovePicker) -> Vec<(Phase, Move)> {
        let mut out = Vec::new();
        td.start_ply();
        while let Some(phase) = picker.fill_next(pos, td) {
            while td.has_next() {
                let (mv, _) = td.next();
                if !picker.is_duplicate(phase, mv) && pos.is_legal(mv) {
                    out.push((phase, mv));
                }
            }
        }
        td.end_ply();
        out
    }

    #[test]
    fn test_yields_every_legal_move_once() {
        let pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let tt_move = pos.parse_move("e2a6").unwrap();
        let killer = pos.parse_move("a2a3").unwrap();
        let mut td = ThreadData::new(0);
        td.add_killer(killer, 0);

        let mut picker = MovePicker::new(tt_move, 0, Move::NONE, true);
        let picked = collect(&pos, &mut td, &mut picker);

        let mut legal = MoveList::new();
        generate_legal(&pos, &mut legal);
        assert_eq!(picked.len(), legal.len());
        for &mv in legal.iter() {
            assert_eq!(picked.iter().filter(|(_, m)| *m == mv).count(), 1, "{mv}");
        }
        assert_eq!(picked[0], (Phase::TtMove, tt_move));
        assert!(picked.contains(&(Phase::Killer1, killer)));
    }

    #[test]
    fn test_invalid_tt_move_is_skipped() {
        let pos = Position::startpos();
        let other = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = other.parse_move("e1g1").unwrap();
        let mut td = ThreadData::new(0);
        let mut picker = MovePicker::new(castle, 0, Move::NONE, false);
        let picked = collect(&pos, &mut td, &mut picker);
        assert_eq!(picked.len(), 20);
        assert!(picked.iter().all(|(phase, _)| *phase != Phase::TtMove));
    }
}
