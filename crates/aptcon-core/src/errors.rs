//! Error types for the co-occurrence analysis core.

use thiserror::Error;

/// Unified error type for all analysis operations.
///
/// Provides structured, actionable error messages with context.
#[derive(Error, Debug)]
pub enum CoocError {
    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Degenerate geometry (zero ranged ions, collapsed extents)
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Degenerate statistics (empty contingency table for a pair)
    #[error("Degenerate statistics: {0}")]
    DegenerateStatistics(String),

    /// Malformed dataset (mismatched chunk arrays, unknown type codes)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoocError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CoocError::Config(message.into())
    }

    /// Creates a degenerate-geometry error.
    pub fn geometry(message: impl Into<String>) -> Self {
        CoocError::DegenerateGeometry(message.into())
    }

    /// Creates a degenerate-statistics error.
    pub fn statistics(message: impl Into<String>) -> Self {
        CoocError::DegenerateStatistics(message.into())
    }

    /// Creates a dataset error.
    pub fn dataset(message: impl Into<String>) -> Self {
        CoocError::Dataset(message.into())
    }

    /// Returns a user-friendly error message with actionable guidance.
    pub fn user_message(&self) -> String {
        match self {
            CoocError::Config(msg) => {
                format!(
                    "Configuration error: {}\n\
                     → Check that bin size does not exceed block size.\n\
                     → Block size must be between 1 and 1000 ions.",
                    msg
                )
            }
            CoocError::DegenerateGeometry(msg) => {
                format!(
                    "Degenerate geometry: {}\n\
                     → The dataset must contain at least one ranged ion.\n\
                     → Check that the bounding box has positive volume.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, CoocError>;
