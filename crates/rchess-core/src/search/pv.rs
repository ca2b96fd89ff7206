//! Principal variation read back from the transposition table

use smallvec::SmallVec;

use crate::position::Position;
use crate::tt::TranspositionTable;
use crate::types::{Move, PV_LENGTH};

pub type PvLine = SmallVec<[Move; PV_LENGTH]>;

/// `best` followed by the table's moves, each checked against the position
/// it is played in. Stops at a missing or unplayable entry, or a repetition.
pub fn extract_pv(pos: &mut Position, tt: &TranspositionTable, best: Move) -> PvLine {
    let mut line = PvLine::new();
    if best.is_none() {
        return line;
    }
    line.push(best);
    pos.do_move(best);

    while line.len() < PV_LENGTH {
        let Some(entry) = tt.probe(pos.key()) else {
            break;
        };
        let mv = entry.mv();
        if mv.is_none() || !pos.is_valid_move(mv) || !pos.is_legal(mv) {
            break;
        }
        line.push(mv);
        pos.do_move(mv);
        if pos.is_repetition(mv) {
            break;
        }
    }

    for &mv in line.iter().rev() {
        pos.undo_move(mv);
    }
    line
}

/// Space-separated long algebraic notation
pub fn pv_to_string(line: &[Move]) -> String {
    line.iter().map(|mv| mv.to_string()).collect::<Vec<_>>().join(" ")
}
