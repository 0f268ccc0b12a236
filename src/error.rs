// src/error.rs

//! Error types for the import pipeline

use thiserror::Error;

/// Errors raised by any stage of an SRPM import
///
/// Every variant is fatal to the run. Nothing in the library retries or
/// rolls back; the caller decides how to report the failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Package metadata could not be read or parsed
    #[error("Initialization error: {0}")]
    InitError(String),

    /// The external rpm-to-cpio conversion failed
    #[error("Conversion error: {0}")]
    ConversionError(String),

    /// The cpio stream was corrupt or truncated
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// Repository, index, commit or branch failure
    #[error("Git error: {0}")]
    GitError(String),

    /// Filesystem failure while materializing the working tree
    #[error("I/O error: {0}")]
    IoError(String),

    /// Invalid configuration file
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Error::GitError(err.message().to_string())
    }
}

/// Result type alias using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;
