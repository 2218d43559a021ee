//! tubevault-common: shared types, identity parsing, and format classification.
//!
//! This crate provides the pure, dependency-light pieces of tubevault:
//!
//! - **Identity parsing**: derive a [`VideoId`] from an archived filename
//! - **Format classification**: map filenames to a supported [`VideoFormat`]
//! - **Core types**: [`Video`], [`RemoteEntry`], [`Metadata`], [`ParseError`]
//! - **Error handling**: common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use tubevault_common::identity::parse_video_id;
//! use tubevault_common::paths::{classify, VideoFormat};
//!
//! let id = parse_video_id("Some Title-dQw4w9WgXcQ.mkv")?;
//! assert_eq!(id.as_str(), "dQw4w9WgXcQ");
//! assert_eq!(classify("Some Title-dQw4w9WgXcQ.mkv")?, VideoFormat::Mkv);
//! # Ok::<(), tubevault_common::Error>(())
//! ```

pub mod error;
pub mod identity;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::VideoId;
pub use paths::VideoFormat;
pub use types::*;
