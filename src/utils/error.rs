//! Error types for KioskPlayer
//!
//! This module defines custom error types used throughout the application.
//! We use thiserror for convenient error type definitions and anyhow for
//! application-level error handling in the binary.

use thiserror::Error;

/// Main error type for KioskPlayer
#[derive(Error, Debug)]
pub enum KioskPlayerError {
    /// The native player instance could not be allocated.
    ///
    /// Fatal to the affected handle: no operation is attempted against it
    /// again for the lifetime of the controller.
    #[error("Player creation error: {0}")]
    Creation(String),

    /// Setting the data source on the native player failed
    #[error("Set source error: {0}")]
    SetSource(String),

    /// The asynchronous prepare request could not be issued
    #[error("Prepare error: {0}")]
    Prepare(String),

    /// The prepare notification did not arrive within the timeout
    #[error("Prepare timed out after {0} ms")]
    PrepareTimeout(u64),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIo(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error for unexpected situations
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KioskPlayerError {
    /// Create a creation error from string
    pub fn creation<S: Into<String>>(msg: S) -> Self {
        KioskPlayerError::Creation(msg.into())
    }

    /// True for load failures the caller may retry with another
    /// `load_source` call later (no automatic retry is performed).
    pub fn is_retryable_load(&self) -> bool {
        matches!(
            self,
            KioskPlayerError::SetSource(_)
                | KioskPlayerError::Prepare(_)
                | KioskPlayerError::PrepareTimeout(_)
        )
    }
}

/// Convenience type alias for Results in KioskPlayer
pub type Result<T> = std::result::Result<T, KioskPlayerError>;

/// Extension trait for converting other errors to KioskPlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a KioskPlayerError with the given context
    fn creation_err(self, context: &str) -> Result<T>;
    fn source_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn creation_err(self, context: &str) -> Result<T> {
        self.map_err(|e| KioskPlayerError::Creation(format!("{}: {}", context, e)))
    }

    fn source_err(self, context: &str) -> Result<T> {
        self.map_err(|e| KioskPlayerError::SetSource(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| KioskPlayerError::Config(format!("{}: {}", context, e)))
    }
}
