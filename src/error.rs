//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the failure came from the hosted AI API or the transport to it.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Error::AiProvider(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_grouping() {
        assert!(Error::AiProvider("rate limited".to_string()).is_provider_error());
        assert!(!Error::InvalidInput("empty".to_string()).is_provider_error());
        assert!(!Error::DimensionMismatch { left: 2, right: 3 }.is_provider_error());
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = Error::DimensionMismatch { left: 2, right: 3 };
        assert_eq!(err.to_string(), "Embedding dimension mismatch: 2 vs 3");
    }
}
