//! Error types for tubevault-av.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures of a metadata backend.
///
/// Per-field parse failures are not errors at this level; they are reported
/// as [`FieldError`](crate::FieldError) and aggregated into a
/// [`ParseError`](tubevault_common::ParseError).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool failed to execute.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// No backend is registered for the file's format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The backend cannot write metadata back for this format.
    #[error("writing metadata is not supported for {format} files")]
    WriteUnsupported { format: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Identity or classification failure from the common crate.
    #[error(transparent)]
    Common(#[from] tubevault_common::Error),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a write-back not supported error.
    pub fn write_unsupported(format: impl Into<String>) -> Self {
        Self::WriteUnsupported {
            format: format.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::tool_not_found("mkvinfo").to_string(),
            "tool not found: mkvinfo"
        );
        assert_eq!(
            Error::tool_failed("exiftool", "exited with status 1").to_string(),
            "tool execution failed: exiftool: exited with status 1"
        );
        assert_eq!(
            Error::write_unsupported("mkv").to_string(),
            "writing metadata is not supported for mkv files"
        );
    }

    #[test]
    fn test_common_error_is_transparent() {
        let err = Error::from(tubevault_common::Error::unsupported_format("avi"));
        assert_eq!(err.to_string(), "unsupported format: avi");
    }
}
