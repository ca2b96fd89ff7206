//! FEN parsing and output

use crate::error::FenError;
use crate::types::{Color, PieceType, Square};

use super::Position;
use super::state::{BLACK_OO, BLACK_OOO, WHITE_OO, WHITE_OOO};

type Placement = [Option<(Color, PieceType)>; Square::NUM];

/// Largest accepted half-move clock or full-move number
const MAX_COUNTER: u32 = 1_000_000;

fn parse_placement(field: &str) -> Result<Placement, FenError> {
    let mut pieces: Placement = [None; Square::NUM];
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidBoard(format!("{} ranks", ranks.len())));
    }
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file = 0u8;
        for c in rank_str.chars() {
            if let Some(n) = c.to_digit(10) {
                if !(1..=8).contains(&n) {
                    return Err(FenError::InvalidBoard(format!("empty run '{c}'")));
                }
                file += n as u8;
            } else {
                let (color, pt) = PieceType::from_char(c).ok_or(FenError::InvalidPiece(c))?;
                if file >= 8 {
                    return Err(FenError::InvalidBoard(format!("rank {} too long", rank + 1)));
                }
                pieces[Square::new(file, rank).index()] = Some((color, pt));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::InvalidBoard(format!("rank {} too long", rank + 1)));
            }
        }
        if file != 8 {
            return Err(FenError::InvalidBoard(format!("rank {} too short", rank + 1)));
        }
    }

    for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
        let kings = pieces.iter().filter(|p| **p == Some((color, PieceType::King))).count();
        if kings != 1 {
            return Err(FenError::KingCount(name));
        }
    }
    let back_rank_pawn = Square::all().any(|sq| {
        matches!(pieces[sq.index()], Some((_, PieceType::Pawn))) && (sq.rank() == 0 || sq.rank() == 7)
    });
    if back_rank_pawn {
        return Err(FenError::PawnOnBackRank);
    }
    Ok(pieces)
}

fn has(pieces: &Placement, sq: Square, color: Color, pt: PieceType) -> bool {
    pieces[sq.index()] == Some((color, pt))
}

/// Rights implied by kings and rooks standing on their home squares
fn infer_castling(pieces: &Placement) -> u8 {
    let mut rights = 0;
    if has(pieces, Square::E1, Color::White, PieceType::King) {
        if has(pieces, Square::H1, Color::White, PieceType::Rook) {
            rights |= WHITE_OO;
        }
        if has(pieces, Square::A1, Color::White, PieceType::Rook) {
            rights |= WHITE_OOO;
        }
    }
    if has(pieces, Square::E8, Color::Black, PieceType::King) {
        if has(pieces, Square::H8, Color::Black, PieceType::Rook) {
            rights |= BLACK_OO;
        }
        if has(pieces, Square::A8, Color::Black, PieceType::Rook) {
            rights |= BLACK_OOO;
        }
    }
    rights
}

fn parse_castling(field: &str, pieces: &Placement) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0;
    for c in field.chars() {
        rights |= match c {
            'K' => WHITE_OO,
            'Q' => WHITE_OOO,
            'k' => BLACK_OO,
            'q' => BLACK_OOO,
            _ => return Err(FenError::InvalidCastling(field.to_string())),
        };
    }
    // Rights without the pieces in place are dropped rather than rejected
    Ok(rights & infer_castling(pieces))
}

/// Guess the full-move number from pawns that have left their start squares
fn guess_fullmove(pieces: &Placement) -> u32 {
    let moved = Square::all()
        .filter(|sq| match pieces[sq.index()] {
            Some((Color::White, PieceType::Pawn)) => sq.rank() != 1,
            Some((Color::Black, PieceType::Pawn)) => sq.rank() != 6,
            _ => false,
        })
        .count() as u32;
    1 + moved
}

impl Position {
    /// Load a position from FEN. Missing castling rights are inferred from king and
    /// rook placement; missing move counters are guessed from the pawn structure.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(2..=6).contains(&fields.len()) {
            return Err(FenError::FieldCount(fields.len()));
        }

        let pieces = parse_placement(fields[0])?;

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            s => return Err(FenError::InvalidSide(s.to_string())),
        };

        let castling = match fields.get(2).copied() {
            Some(field) => parse_castling(field, &pieces)?,
            None => infer_castling(&pieces),
        };

        let ep_square = match fields.get(3).copied() {
            None | Some("-") => None,
            Some(s) => {
                let sq = Square::parse(s).ok_or_else(|| FenError::InvalidEnPassant(s.to_string()))?;
                let (ep_rank, pawn_sq) = match side {
                    Color::White => (5, sq.offset(-8)),
                    Color::Black => (2, sq.offset(8)),
                };
                let pusher_in_place = sq.rank() == ep_rank
                    && has(&pieces, pawn_sq, side.opponent(), PieceType::Pawn)
                    && pieces[sq.index()].is_none();
                if !pusher_in_place {
                    return Err(FenError::InvalidEnPassant(s.to_string()));
                }
                Some(sq)
            }
        };

        let parse_counter = |s: &str| {
            s.parse::<u32>()
                .ok()
                .filter(|&n| n <= MAX_COUNTER)
                .ok_or_else(|| FenError::InvalidCounter(s.to_string()))
        };
        let halfmove_clock = match fields.get(4).copied() {
            Some(s) => parse_counter(s)?,
            None => 0,
        };
        let fullmove = match fields.get(5).copied() {
            Some(s) => parse_counter(s)?.max(1),
            None => guess_fullmove(&pieces),
        };
        let move_counter = fullmove * 2 + side.index() as u32;

        let pos = Position::from_parts(&pieces, side, castling, ep_square, halfmove_clock, move_counter);

        let them = side.opponent();
        if pos.is_square_attacked(pos.king_square(them), side, pos.occupied()) {
            return Err(FenError::OpponentInCheck);
        }
        log::trace!("loaded {}", pos.to_fen());
        Ok(pos)
    }

    /// Six-field FEN
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::new(file, rank);
                match (self.piece_on(sq), self.color_on(sq)) {
                    (Some(pt), Some(color)) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(pt.to_char(color));
                    }
                    _ => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.side_to_move() == Color::White { 'w' } else { 'b' });
        fen.push(' ');
        let rights = self.castling_rights();
        if rights == 0 {
            fen.push('-');
        } else {
            for (bit, c) in [(WHITE_OO, 'K'), (WHITE_OOO, 'Q'), (BLACK_OO, 'k'), (BLACK_OOO, 'q')] {
                if rights & bit != 0 {
                    fen.push(c);
                }
            }
        }
        fen.push(' ');
        match self.ep_square() {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }
        fen.push_str(&format!(" {} {}", self.halfmove_clock(), self.move_counter() / 2));
        fen
    }
}
