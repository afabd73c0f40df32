//! Error types for the review report pipeline.
//!
//! Every error is fatal to a run: the pipeline stops at the first failure and
//! the binary reports the [`ReviewError::error_code`] together with the message.

use crate::config::ConfigValidationError;
use thiserror::Error;

/// The main error type for the review report pipeline.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// The input dataset is missing or could not be parsed as CSV.
    #[error("Failed to load dataset '{path}': {reason}")]
    DataLoad { path: String, reason: String },

    /// None of the known column aliases exist in the dataset.
    #[error("No {role} column in dataset '{dataset}' (tried {candidates:?})")]
    Schema {
        dataset: String,
        role: String,
        candidates: Vec<String>,
    },

    /// Chart or word-cloud generation failed.
    #[error("Failed to render '{path}': {reason}")]
    Render { path: String, reason: String },

    /// The polarity scorer failed for a review.
    #[error("Sentiment scoring failed: {0}")]
    Scoring(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReviewError>,
    },
}

impl ReviewError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReviewError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable code for the final diagnostic line.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataLoad { .. } => "DATA_LOAD_ERROR",
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::Render { .. } => "RENDER_ERROR",
            Self::Scoring(_) => "SCORING_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    pub(crate) fn data_load(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Self::DataLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn render(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Self::Render {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReviewError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReviewError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ReviewError::data_load("missing.csv", "not found").error_code(),
            "DATA_LOAD_ERROR"
        );
        assert_eq!(
            ReviewError::Scoring("boom".to_string()).error_code(),
            "SCORING_ERROR"
        );
    }

    #[test]
    fn test_schema_message_lists_candidates() {
        let error = ReviewError::Schema {
            dataset: "amazon".to_string(),
            role: "review text".to_string(),
            candidates: vec!["Text".to_string(), "Review".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("review text"));
        assert!(message.contains("\"Text\""));
        assert!(message.contains("amazon"));
    }

    #[test]
    fn test_with_context() {
        let error = ReviewError::render("out/chart.png", "no font").with_context("Bar chart");
        assert!(error.to_string().contains("Bar chart"));
        assert_eq!(error.error_code(), "RENDER_ERROR"); // Preserves original code
    }

    #[test]
    fn test_io_context() {
        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let error = io.context("Creating output dir").unwrap_err();
        assert_eq!(error.error_code(), "IO_ERROR");
        assert!(error.to_string().starts_with("Creating output dir"));
    }
}
