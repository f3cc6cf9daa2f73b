//! @ai:module:intent Define error types for metric log comparison
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for loading and comparing result logs
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {path} is not valid UTF-8 (line {line})")]
    Encoding { path: PathBuf, line: usize },

    #[error("Line count mismatch: baseline has {baseline} lines, comparison has {comparison}")]
    LengthMismatch { baseline: usize, comparison: usize },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Zero baseline value at line {line} (category {category}): relative delta is undefined")]
    ZeroBaseline { line: usize, category: String },

    #[error("Comparison line {line} is not aligned with baseline: {message}")]
    MarkerMismatch { line: usize, message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// @ai:intent Line number the error points at, when it concerns a single row
    /// @ai:effects pure
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. }
            | Error::Encoding { line, .. }
            | Error::ZeroBaseline { line, .. }
            | Error::MarkerMismatch { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
