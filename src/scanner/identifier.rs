//! Per-file identification for the scanner.
//!
//! Turns a path found during a directory walk into a [`Video`], or explains
//! why the file was left out.

use std::path::Path;

use tubevault_common::paths::is_video_file;
use tubevault_common::Video;

/// Outcome of identifying one file.
#[derive(Debug)]
pub enum Identification {
    /// A supported video with a recoverable id.
    Video(Video),
    /// Not a supported video container. Skipped silently.
    NotVideo,
    /// A supported container whose name carries no valid id.
    Unidentified(tubevault_common::Error),
}

/// Identifies archived videos from their filenames.
#[derive(Debug, Default)]
pub struct VideoIdentifier;

impl VideoIdentifier {
    pub fn new() -> Self {
        Self
    }

    /// Identify a single file by its name.
    pub fn identify(&self, path: &Path) -> Identification {
        if !is_video_file(path) {
            return Identification::NotVideo;
        }

        match Video::from_path(path) {
            Ok(video) => Identification::Video(video),
            Err(e) => Identification::Unidentified(e),
        }
    }
}
