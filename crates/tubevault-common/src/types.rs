//! Core type definitions for local videos, remote entries, and metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ids::VideoId;
use crate::paths::{self, VideoFormat};
use crate::{identity, Error, Result};

/// A video file held in the local archive.
///
/// Built once by [`Video::from_path`] during enumeration and immutable
/// afterwards. The identifier is derived from the filename alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    path: PathBuf,
    id: VideoId,
    file_type: String,
    base_path: PathBuf,
}

impl Video {
    /// Derive a video record from its path.
    ///
    /// # Errors
    ///
    /// Fails if the path has no UTF-8 file name, no extension, or no
    /// identifier can be parsed from the filename.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let name = paths::file_name(&path)?;
        let file_type = paths::file_extension(name)?;
        let id = identity::parse_video_id(name)?;
        let base_path = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(Self {
            path,
            id,
            file_type,
            base_path,
        })
    }

    /// Full path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical identifier parsed from the filename.
    pub fn id(&self) -> &VideoId {
        &self.id
    }

    /// Lowercase extension, e.g. `"mp4"`.
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Directory containing the file.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The container format, if the extension is a supported one.
    pub fn format(&self) -> Result<VideoFormat> {
        VideoFormat::from_extension(&self.file_type)
            .ok_or_else(|| Error::unsupported_format(self.file_type.clone()))
    }
}

/// Nested media block of a remote entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaGroup {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
}

/// A single item of the remote catalog, prior to being downloaded.
///
/// Timestamps are carried as the catalog supplied them and never
/// reinterpreted; only `id` takes part in reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub id: VideoId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub media_group: MediaGroup,
}

impl RemoteEntry {
    /// Create an entry carrying only an id and a title.
    pub fn new(id: impl Into<VideoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: String::new(),
            published: String::new(),
            updated: String::new(),
            media_group: MediaGroup::default(),
        }
    }
}

/// Descriptive metadata extracted from a video file.
///
/// String fields are empty when absent or unparsed; optional fields are
/// `None` on parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub published_at: Option<NaiveDate>,
    pub duration: Option<Duration>,
}

/// One of the five extractable metadata fields.
///
/// The declaration order is the fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Title,
    Description,
    Creator,
    PublishedAt,
    Duration,
}

impl MetadataField {
    /// All fields in evaluation order.
    pub const ALL: [MetadataField; 5] = [
        MetadataField::Title,
        MetadataField::Description,
        MetadataField::Creator,
        MetadataField::PublishedAt,
        MetadataField::Duration,
    ];

    /// Field name as reported in errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Creator => "creator",
            Self::PublishedAt => "published_at",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate of the per-field failures of one extraction attempt.
///
/// Always non-empty: [`ParseError::from_failures`] returns `None` when no
/// field failed. Returned next to the partial [`Metadata`], never instead of
/// it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
    unparsed_fields: Vec<MetadataField>,
}

impl ParseError {
    /// Build an error from `(field, reason)` pairs, or `None` if there are none.
    ///
    /// Fields are reported in evaluation order regardless of input order.
    pub fn from_failures<I, S>(source: &Path, failures: I) -> Option<Self>
    where
        I: IntoIterator<Item = (MetadataField, S)>,
        S: fmt::Display,
    {
        let mut failures: Vec<(MetadataField, String)> = failures
            .into_iter()
            .map(|(field, reason)| (field, reason.to_string()))
            .collect();
        if failures.is_empty() {
            return None;
        }
        failures.sort_by_key(|(field, _)| *field);

        let mut message = format!(
            "failed to parse {} metadata field(s) from {}",
            failures.len(),
            source.display()
        );
        for (field, reason) in &failures {
            let _ = write!(message, "\n  {field}: {reason}");
        }

        Some(Self {
            message,
            unparsed_fields: failures.into_iter().map(|(field, _)| field).collect(),
        })
    }

    /// Human-readable summary, one line per failed field.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fields that failed, in evaluation order.
    pub fn unparsed_fields(&self) -> &[MetadataField] {
        &self.unparsed_fields
    }
}
