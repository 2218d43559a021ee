//! The canonical video identifier.
//!
//! Remote catalog entries and archived filenames share one identifier space:
//! a fixed-width opaque token. [`VideoId`] wraps that token so it cannot be
//! confused with titles or paths.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Width of a canonical video identifier, in characters.
pub const VIDEO_ID_LEN: usize = 11;

/// Identifier of a single published video.
///
/// Equality and hashing are by exact string value; no case or unicode
/// normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Wrap an identifier string as-is.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for VideoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VideoId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_and_as_str() {
        let id = VideoId::new("dQw4w9WgXcQ");
        assert_eq!(id.to_string(), "dQw4w9WgXcQ");
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_lookup_by_str() {
        let ids: HashSet<VideoId> = ["aaaaaaaaaaa", "bbbbbbbbbbb"]
            .into_iter()
            .map(VideoId::from)
            .collect();
        assert!(ids.contains("aaaaaaaaaaa"));
        assert!(!ids.contains("AAAAAAAAAAA"));
    }

    #[test]
    fn test_serde_transparent() {
        let id = VideoId::new("dQw4w9WgXcQ");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"dQw4w9WgXcQ\"");
        let back: VideoId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
