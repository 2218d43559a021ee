//! Metadata backends, one per container format.
//!
//! Every backend implements [`CommandProvider`]: it runs an external
//! inspection tool to obtain raw text, and parses each metadata field out of
//! that text independently. A missing or malformed field is a [`FieldError`],
//! never a hard failure; only `run` and `set` fail the whole operation.

mod exiftool;
mod mkvinfo;
mod registry;

pub use self::exiftool::ExiftoolBackend;
pub use self::mkvinfo::MkvinfoBackend;
pub use self::registry::BackendRegistry;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tubevault_common::{Metadata, VideoFormat};

use crate::Result;

/// Result of parsing a single metadata field.
pub type FieldResult<T> = std::result::Result<T, FieldError>;

/// Why a single field could not be parsed from raw tool output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The marker identifying the field was not found.
    #[error("{marker} not found in tool output")]
    Missing { marker: String },

    /// The marker was found but its value could not be interpreted.
    #[error("malformed value {value:?}: {reason}")]
    Malformed { value: String, reason: String },
}

impl FieldError {
    pub fn missing(marker: impl Into<String>) -> Self {
        Self::Missing {
            marker: marker.into(),
        }
    }

    pub fn malformed(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// A format-specific strategy for reading (and possibly writing) metadata.
///
/// Implementations must be safe to share across tasks. The parse methods are
/// pure; `run` and `set` touch the file and must not race on the same path.
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Human-readable backend name (usually the tool it drives).
    fn name(&self) -> &'static str;

    /// The container format this backend handles.
    fn format(&self) -> VideoFormat;

    /// Run the inspection tool and return its output verbatim.
    async fn run(&self, path: &Path) -> Result<String>;

    fn parse_title(&self, raw: &str) -> FieldResult<String>;

    fn parse_description(&self, raw: &str) -> FieldResult<String>;

    fn parse_creator(&self, raw: &str) -> FieldResult<String>;

    /// Parse the publication date, stored as `YYYYMMDD`.
    fn parse_published_at(&self, raw: &str) -> FieldResult<NaiveDate>;

    /// Parse the running time. Sub-second precision is truncated.
    fn parse_duration(&self, raw: &str) -> FieldResult<Duration>;

    /// Write `metadata` back onto the file.
    ///
    /// Backends that cannot write return
    /// [`Error::WriteUnsupported`](crate::Error::WriteUnsupported).
    async fn set(&self, path: &Path, metadata: &Metadata) -> Result<()>;
}

/// Parse a `YYYYMMDD` date.
pub(crate) fn parse_compact_date(value: &str) -> FieldResult<NaiveDate> {
    let value = value.trim();
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::malformed(value, "expected YYYYMMDD"));
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|e| FieldError::malformed(value, e.to_string()))
}

/// Reassemble hour/minute/second components into an elapsed time.
///
/// `raw` is only used for error reporting.
pub(crate) fn elapsed(raw: &str, hours: &str, minutes: &str, seconds: &str) -> FieldResult<Duration> {
    let component = |s: &str, name: &str| {
        s.parse::<u64>()
            .map_err(|e| FieldError::malformed(raw, format!("bad {name} component {s:?}: {e}")))
    };

    let h = component(hours, "hours")?;
    let m = component(minutes, "minutes")?;
    let s = component(seconds, "seconds")?;

    if m >= 60 || s >= 60 {
        return Err(FieldError::malformed(raw, "minutes and seconds must be below 60"));
    }

    h.checked_mul(3600)
        .and_then(|secs| secs.checked_add(m * 60 + s))
        .map(Duration::from_secs)
        .ok_or_else(|| FieldError::malformed(raw, "duration out of range"))
}
