use thiserror::Error;

use crate::board::Move;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid cell code: {0} (must be 0-4)")]
    InvalidCell(u8),

    #[error("Invalid piece character: {0:?}")]
    InvalidPiece(char),

    #[error("Expected 8 rows, found {0}")]
    RowCount(usize),

    #[error("Row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },

    #[error("Invalid side: {0:?} (expected red or black)")]
    InvalidSide(String),

    #[error("Illegal move: {0}")]
    IllegalMove(Move),
}

pub type Result<T> = std::result::Result<T, EngineError>;
