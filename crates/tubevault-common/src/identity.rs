//! Identity parsing for archived video filenames.
//!
//! Archived files are named `"<title>-<id>.<ext>"`. The identifier is
//! recovered by stripping the final extension and taking the trailing
//! [`VIDEO_ID_LEN`] characters. A candidate containing whitespace is taken as
//! evidence that the tail is ordinary title text rather than an identifier.
//!
//! This is a heuristic: a title that itself ends in eleven non-space
//! characters is indistinguishable from an identifier.

use crate::ids::{VideoId, VIDEO_ID_LEN};
use crate::{Error, Result};

/// Strip the final `.<ext>` segment from a filename, if any.
///
/// Only the last dot-separated segment is treated as an extension, so
/// `"a.b.mp4"` becomes `"a.b"`. A name without a dot is returned unchanged.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    }
}

/// Extract the canonical identifier from a filename (not a full path).
///
/// # Errors
///
/// Returns [`Error::InvalidIdentity`] if fewer than eleven characters remain
/// after stripping the extension, or if the trailing eleven characters
/// contain whitespace.
///
/// # Examples
///
/// ```
/// use tubevault_common::identity::parse_video_id;
///
/// let id = parse_video_id("Never Gonna Give You Up-dQw4w9WgXcQ.mp4").unwrap();
/// assert_eq!(id.as_str(), "dQw4w9WgXcQ");
///
/// assert!(parse_video_id("Some Video Title.mp4").is_err());
/// ```
pub fn parse_video_id(filename: &str) -> Result<VideoId> {
    let stem = strip_extension(filename);

    let len = stem.chars().count();
    if len < VIDEO_ID_LEN {
        return Err(Error::invalid_identity(
            filename,
            format!("expected at least {VIDEO_ID_LEN} characters before the extension, found {len}"),
        ));
    }

    // Char-boundary safe: slice at the byte offset of the (len - 11)th char.
    let start = stem
        .char_indices()
        .nth(len - VIDEO_ID_LEN)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let candidate = &stem[start..];

    if candidate.chars().any(char::is_whitespace) {
        return Err(Error::invalid_identity(
            filename,
            format!("trailing segment {candidate:?} contains whitespace"),
        ));
    }

    Ok(VideoId::new(candidate))
}
