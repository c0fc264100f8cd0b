use thiserror::Error;

/// Validation failures when building or resizing a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board size {size} is outside the allowed range {min}..={max}")]
    InvalidSize { size: usize, min: usize, max: usize },

    #[error("tile value {0} is neither empty (0) nor a power of two >= 2")]
    InvalidTile(u64),

    #[error("expected {expected} cells for the board, got {got}")]
    WrongLength { expected: usize, got: usize },
}
