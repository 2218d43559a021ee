//! tubevault - local video archive reconciliation and metadata extraction
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod fanout;
pub mod metadata;
pub mod reconcile;
pub mod scanner;
pub mod sync;
