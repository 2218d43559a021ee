//! Container format classification by file extension.
//!
//! Classification is a pure extension check against a fixed allow-list.
//! The scanner uses [`is_video_file`] to silently skip anything else, while
//! metadata extraction uses [`classify`] and reports unsupported formats as
//! errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// List of supported video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv"];

/// A supported video container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    /// MPEG-4 Part 14 container.
    Mp4,
    /// Matroska container.
    Mkv,
}

impl VideoFormat {
    /// Every supported format, in allow-list order.
    pub const ALL: [VideoFormat; 2] = [VideoFormat::Mp4, VideoFormat::Mkv];

    /// Map a lowercase extension to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "mp4" => Some(Self::Mp4),
            "mkv" => Some(Self::Mkv),
            _ => None,
        }
    }

    /// The canonical extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Return the lowercase extension of a filename.
///
/// # Errors
///
/// Returns [`Error::NoExtension`] for an empty name, a name without a `.`,
/// or a name ending in `.`.
///
/// # Examples
///
/// ```
/// use tubevault_common::paths::file_extension;
///
/// assert_eq!(file_extension("X.MP4").unwrap(), "mp4");
/// assert!(file_extension("test.").is_err());
/// ```
pub fn file_extension(filename: &str) -> Result<String> {
    let ext = filename
        .rfind('.')
        .map(|idx| &filename[idx + 1..])
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| Error::NoExtension(filename.to_string()))?;

    Ok(ext.to_lowercase())
}

/// Classify a filename into a supported [`VideoFormat`].
///
/// # Errors
///
/// Returns [`Error::NoExtension`] if there is no extension, or
/// [`Error::UnsupportedFormat`] if the extension is not on the allow-list.
pub fn classify(filename: &str) -> Result<VideoFormat> {
    let ext = file_extension(filename)?;
    VideoFormat::from_extension(&ext).ok_or(Error::UnsupportedFormat(ext))
}

/// Classify a path by its final component.
pub fn classify_path(path: &Path) -> Result<VideoFormat> {
    let name = file_name(path)?;
    classify(name)
}

/// The final component of a path as UTF-8.
pub fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::invalid_input(format!("no UTF-8 file name in {}", path.display())))
}

/// Check if a path has a supported video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tubevault_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("clip-dQw4w9WgXcQ.mkv")));
/// assert!(is_video_file(Path::new("/archive/chan/clip.MP4")));
/// assert!(!is_video_file(Path::new("clip.info.json")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    classify_path(path).is_ok()
}

/// Get the list of supported video file extensions.
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}
