//! Error types for the SR3D pipeline
//!
//! Structural faults (incompatible matrices) abort the current frame.
//! Per-primitive faults never surface here: they are logged and skipped
//! where they happen.

use std::fmt;

/// Result type for SR3D operations
pub type RenderResult<T> = Result<T, RenderError>;

/// SR3D errors
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Matrix multiplication with `cols(lhs) != rows(rhs)`
    DimensionMismatch { left_cols: usize, right_rows: usize },

    /// A matrix that should be a homogeneous point (or act on one) has the wrong shape
    NotHomogeneous { rows: usize, cols: usize },

    /// Malformed OBJ record (1-based line number)
    ObjParse { line: usize, message: String },

    /// Failure reading an asset from disk
    Io(String),

    /// No object registered under this id
    UnknownObject(usize),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::DimensionMismatch {
                left_cols,
                right_rows,
            } => write!(
                f,
                "Matrix multiplication not possible: {} != {}",
                left_cols, right_rows
            ),
            RenderError::NotHomogeneous { rows, cols } => {
                write!(f, "Not a homogeneous point matrix: {}x{}", rows, cols)
            }
            RenderError::ObjParse { line, message } => {
                write!(f, "OBJ parse error at line {}: {}", line, message)
            }
            RenderError::Io(msg) => write!(f, "I/O error: {}", msg),
            RenderError::UnknownObject(id) => write!(f, "Unknown scene object: {}", id),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}
