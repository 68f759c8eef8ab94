use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid cell: {0}")]
    InvalidCell(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("a table row needs at least one cell")]
    EmptyRow,

    #[error("segment ({x1},{y1},{x2},{y2}) has no elements attached")]
    UnpopulatedSegment { x1: i32, y1: i32, x2: i32, y2: i32 },
}
