//! Error types

use thiserror::Error;

/// Rejected FEN string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 2 to 6 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),
    #[error("invalid board layout: {0}")]
    InvalidBoard(String),
    #[error("invalid side to move '{0}'")]
    InvalidSide(String),
    #[error("invalid castling field '{0}'")]
    InvalidCastling(String),
    #[error("invalid en-passant field '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),
    #[error("{0} must have exactly one king")]
    KingCount(&'static str),
    #[error("pawn on the first or eighth rank")]
    PawnOnBackRank,
    #[error("side not to move is in check")]
    OpponentInCheck,
}

/// Rejected move text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move '{0}'")]
    Syntax(String),
    #[error("illegal move '{0}'")]
    Illegal(String),
}

/// Rejected engine option
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("hash size must be a power of two between 1 and {max} MB, got {value}")]
    HashSize { value: usize, max: usize },
    #[error("thread count must be between 1 and {max}, got {value}")]
    Threads { value: usize, max: usize },
}

/// Errors surfaced by the engine façade
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Move(#[from] MoveParseError),
    #[error("a search is already running")]
    SearchInProgress,
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = ConfigError::HashSize { value: 3, max: 16384 };
        assert_eq!(
            e.to_string(),
            "hash size must be a power of two between 1 and 16384 MB, got 3"
        );
        let e: EngineError = FenError::KingCount("white").into();
        assert_eq!(e.to_string(), "white must have exactly one king");
    }
}
