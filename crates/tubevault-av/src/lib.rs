//! # tubevault-av
//!
//! Metadata extraction from on-disk video containers.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to
//!   `exiftool` and `mkvinfo`.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Metadata backends** ([`CommandProvider`]) -- one per container format,
//!   each running an inspection tool and parsing its text output field by
//!   field ([`ExiftoolBackend`] for MP4, [`MkvinfoBackend`] for Matroska).
//! - **Backend lookup** ([`BackendRegistry`]) -- select the backend for a
//!   file by its container format.
//! - **Field aggregation** ([`extract`]) -- combine the five per-field parse
//!   results into [`Metadata`](tubevault_common::Metadata) plus an optional
//!   [`ParseError`](tubevault_common::ParseError).
//!
//! ## Example
//!
//! ```no_run
//! use tubevault_av::{extract, BackendRegistry, ToolRegistry, ToolsConfig};
//! use std::path::Path;
//!
//! # async fn example() -> tubevault_av::Result<()> {
//! let tools = ToolRegistry::discover(&ToolsConfig::default());
//! let backends = BackendRegistry::with_defaults(&tools);
//! let path = Path::new("/archive/chan/Title-dQw4w9WgXcQ.mkv");
//! let backend = backends.select(path)?;
//! let (metadata, parse_error) = extract::extract(backend.as_ref(), path).await?;
//! println!("{}", metadata.title);
//! if let Some(err) = parse_error {
//!     eprintln!("{err}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod command;
mod error;
pub mod extract;
pub mod tools;

// ---- Re-exports for convenience ----

pub use backend::{
    BackendRegistry, CommandProvider, ExiftoolBackend, FieldError, MkvinfoBackend,
};
pub use command::{ToolCommand, ToolOutput};
pub use error::{Error, Result};
pub use tools::{ToolInfo, ToolRegistry, ToolsConfig};
