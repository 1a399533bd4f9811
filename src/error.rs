use thiserror::Error;

/// Validation failures raised by the engine.
///
/// A snake running into something is not an error, see
/// [`MoveResult::GameOver`](crate::snake::MoveResult::GameOver).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no such cell type: {0}, available types: weed, apple, snake, wall")]
    InvalidCellType(String),

    #[error("no such direction: {0}, available: top, left, right, bottom")]
    InvalidDirection(String),

    #[error("({x}, {y}) is outside the {cols}x{rows} field")]
    OutOfBounds {
        x: i32,
        y: i32,
        cols: usize,
        rows: usize,
    },

    #[error("a field needs at least 3 rows and 3 columns, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("a snake of length {length} leaves no free cell for an apple on the {rows}x{cols} field")]
    FieldFull { length: usize, rows: usize, cols: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
