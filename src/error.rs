use thiserror::Error;

/// Every failure the numeric core and the network can report.
#[derive(Error, Debug)]
pub enum Error {
    #[error("shape mismatch in {op}: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("training set must contain at least one pair")]
    EmptyTrainingSet,

    #[error("invalid range [{min}, {max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Error {
        Error::ShapeMismatch { op, left, right }
    }
}
