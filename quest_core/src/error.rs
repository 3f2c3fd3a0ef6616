//! Error types for the quest_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for quest_core operations
///
/// Every variant is recoverable: hosts report the condition and carry on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing goal creation parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Event recorded against a goal position that does not exist
    #[error("Goal {index} is out of range (there are {len} goals)")]
    OutOfRange { index: usize, len: usize },

    /// Persisted ledger could not be parsed
    ///
    /// `line` is 1-based within the stream; 0 means a standalone goal line.
    #[error("Corrupt data{}: {reason}", at_line(.line))]
    CorruptData { line: usize, reason: String },

    /// Load source does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn at_line(line: &usize) -> String {
    match line {
        0 => String::new(),
        n => format!(" at line {}", n),
    }
}

impl Error {
    pub(crate) fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Error::CorruptData {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidInput(reason.into())
    }
}
