//! Common error types used throughout tubevault.
//!
//! These cover the recoverable failures of the pure core: filenames that do
//! not carry an identifier, and files whose container format is unknown or
//! unsupported.

/// Common error type for tubevault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No identifier could be derived from a filename.
    #[error("no video id in {filename:?}: {reason}")]
    InvalidIdentity {
        /// The filename that was inspected.
        filename: String,
        /// Why the candidate was rejected.
        reason: String,
    },

    /// The filename has no extension to classify.
    #[error("no file extension in {0:?}")]
    NoExtension(String),

    /// The extension is not one of the supported container formats.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new InvalidIdentity error.
    pub fn invalid_identity<F: Into<String>, R: Into<String>>(filename: F, reason: R) -> Self {
        Self::InvalidIdentity {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Create a new UnsupportedFormat error.
    pub fn unsupported_format<S: Into<String>>(ext: S) -> Self {
        Self::UnsupportedFormat(ext.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
