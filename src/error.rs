//! Error types for the Termweave library.
//!
//! All fallible operations return [`Result`], whose error is the
//! [`TermweaveError`] enum. Configuration problems surface at construction
//! time; provider failures are usually caught inside the expander and only
//! reach callers through the lower-level embedding APIs.
//!
//! # Examples
//!
//! ```
//! use termweave::error::{Result, TermweaveError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TermweaveError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Termweave operations.
#[derive(Error, Debug)]
pub enum TermweaveError {
    /// I/O errors (reading synonym or config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid model identifier, device selector, threshold, etc.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Embedding provider failed to produce a vector
    #[error("Provider error: {0}")]
    Provider(String),

    /// Malformed synonym data
    #[error("Synonym error: {0}")]
    Synonym(String),

    /// Invalid argument passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with TermweaveError.
pub type Result<T> = std::result::Result<T, TermweaveError>;

impl TermweaveError {
    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TermweaveError::InvalidConfig(msg.into())
    }

    /// Create a new provider error.
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        TermweaveError::Provider(msg.into())
    }

    /// Create a new synonym error.
    pub fn synonym<S: Into<String>>(msg: S) -> Self {
        TermweaveError::Synonym(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        TermweaveError::InvalidArgument(msg.into())
    }

    /// Returns true for errors raised by an embedding provider at call time.
    ///
    /// These are the errors the expander degrades on instead of propagating.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, TermweaveError::Provider(_) | TermweaveError::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TermweaveError::invalid_config("bad model");
        assert_eq!(error.to_string(), "Invalid configuration: bad model");

        let error = TermweaveError::provider("connection refused");
        assert_eq!(error.to_string(), "Provider error: connection refused");

        let error = TermweaveError::synonym("not a mapping");
        assert_eq!(error.to_string(), "Synonym error: not a mapping");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = TermweaveError::from(io_error);

        match error {
            TermweaveError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let error = TermweaveError::from(json_error);

        assert!(matches!(error, TermweaveError::Json(_)));
        assert!(error.to_string().starts_with("JSON error:"));
        assert!(!error.is_provider_error());
    }

    #[test]
    fn test_provider_error_classification() {
        assert!(TermweaveError::provider("down").is_provider_error());
        assert!(!TermweaveError::invalid_config("bad").is_provider_error());
        assert!(!TermweaveError::invalid_argument("empty").is_provider_error());
    }
}
