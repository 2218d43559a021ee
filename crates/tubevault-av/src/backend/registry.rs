//! Backend lookup keyed by container format.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tubevault_common::paths::classify_path;
use tubevault_common::VideoFormat;

use super::{CommandProvider, ExiftoolBackend, MkvinfoBackend};
use crate::tools::ToolRegistry;
use crate::{Error, Result};

/// Maps each supported [`VideoFormat`] to the backend that reads it.
///
/// Selection is a plain lookup: the same format always yields the same
/// backend instance.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<VideoFormat, Arc<dyn CommandProvider>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in exiftool (MP4) and mkvinfo (MKV) backends.
    ///
    /// Backends are registered even when their tool was not discovered, so a
    /// missing tool surfaces as [`Error::ToolNotFound`] when the file is read.
    pub fn with_defaults(tools: &ToolRegistry) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ExiftoolBackend::from_registry(tools)));
        registry.register(Arc::new(MkvinfoBackend::from_registry(tools)));
        registry
    }

    /// Register a backend for the format it reports, replacing any previous one.
    pub fn register(&mut self, backend: Arc<dyn CommandProvider>) -> &mut Self {
        let format = backend.format();
        if let Some(previous) = self.backends.insert(format, backend) {
            tracing::debug!(%format, replaced = previous.name(), "replaced metadata backend");
        }
        self
    }

    /// Look up the backend for a format.
    pub fn get(&self, format: VideoFormat) -> Option<Arc<dyn CommandProvider>> {
        self.backends.get(&format).cloned()
    }

    /// Select the backend for a file from its extension.
    pub fn select(&self, path: &Path) -> Result<Arc<dyn CommandProvider>> {
        let format = match classify_path(path) {
            Ok(format) => format,
            Err(tubevault_common::Error::UnsupportedFormat(ext)) => {
                return Err(Error::UnsupportedFormat(ext))
            }
            Err(e) => return Err(e.into()),
        };

        self.get(format)
            .ok_or_else(|| Error::UnsupportedFormat(format.to_string()))
    }

    /// Formats with a registered backend, in a stable order.
    pub fn formats(&self) -> Vec<VideoFormat> {
        VideoFormat::ALL
            .iter()
            .copied()
            .filter(|f| self.backends.contains_key(f))
            .collect()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.backends.iter().map(|(k, v)| (k, v.name())))
            .finish()
    }
}
