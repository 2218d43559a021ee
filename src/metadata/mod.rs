//! Metadata extraction for archived videos.
//!
//! [`MetadataPipeline`] picks the backend for a [`Video`] by its container
//! format, runs the backend's inspection tool and folds the per-field results
//! into an [`Extraction`]. Field failures travel with the partial metadata;
//! only selection or tool failures are errors.

use serde::Serialize;
use tracing::{debug, warn};
use tubevault_av::{extract, BackendRegistry, Error, Result, ToolRegistry};
use tubevault_common::{Metadata, ParseError, Video};

use crate::config::Config;
use crate::fanout;

/// Metadata read from one video, paired with the video it came from.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub video: Video,
    pub metadata: Metadata,
    pub parse_error: Option<ParseError>,
}

impl Extraction {
    /// Whether every field was parsed.
    pub fn is_complete(&self) -> bool {
        self.parse_error.is_none()
    }

    /// Flatten into a serializable report.
    pub fn report(&self) -> ExtractionReport<'_> {
        ExtractionReport {
            video: &self.video,
            metadata: &self.metadata,
            unparsed_fields: self
                .parse_error
                .as_ref()
                .map(|e| e.unparsed_fields().iter().map(|f| f.as_str()).collect())
                .unwrap_or_default(),
            parse_error: self.parse_error.as_ref().map(|e| e.message()),
        }
    }
}

/// JSON shape of an [`Extraction`].
#[derive(Debug, Serialize)]
pub struct ExtractionReport<'a> {
    pub video: &'a Video,
    pub metadata: &'a Metadata,
    pub unparsed_fields: Vec<&'static str>,
    pub parse_error: Option<&'a str>,
}

/// An extraction that failed outright, with the video it was attempted on.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub video: Video,
    pub error: Error,
}

/// Selects backends and runs extractions, optionally many at once.
#[derive(Debug, Clone)]
pub struct MetadataPipeline {
    backends: BackendRegistry,
    concurrency: usize,
}

impl MetadataPipeline {
    /// Create a pipeline over the given backends.
    ///
    /// `concurrency` bounds [`extract_all`](Self::extract_all) and is raised
    /// to 1 if zero.
    pub fn new(backends: BackendRegistry, concurrency: usize) -> Self {
        Self {
            backends,
            concurrency: concurrency.max(1),
        }
    }

    /// Build the default backends from the `[tools]` and `[concurrency]`
    /// sections of the config.
    pub fn from_config(config: &Config) -> Self {
        let tools = ToolRegistry::discover(&config.tools);
        Self::new(
            BackendRegistry::with_defaults(&tools),
            config.concurrency.extractions,
        )
    }

    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    /// Extract metadata from one video.
    ///
    /// Fails fast with [`Error::UnsupportedFormat`] when no backend handles
    /// the video's format; a tool failure yields no partial metadata.
    pub async fn extract(&self, video: &Video) -> Result<Extraction> {
        let backend = self.backends.select(video.path())?;
        debug!(backend = backend.name(), path = ?video.path(), "extracting metadata");

        let (metadata, parse_error) = extract::extract(backend.as_ref(), video.path()).await?;
        if let Some(ref err) = parse_error {
            warn!(
                id = %video.id(),
                fields = err.unparsed_fields().len(),
                "partial metadata for {:?}",
                video.path()
            );
        }

        Ok(Extraction {
            video: video.clone(),
            metadata,
            parse_error,
        })
    }

    /// Write metadata back onto a video through its backend.
    pub async fn write_back(&self, video: &Video, metadata: &Metadata) -> Result<()> {
        let backend = self.backends.select(video.path())?;
        backend.set(video.path(), metadata).await
    }

    /// Extract every video with bounded concurrency.
    ///
    /// Results are returned in input order, one per video, whether or not
    /// other extractions failed. A task that panics yields a failure for its
    /// video.
    pub async fn extract_all(
        &self,
        videos: Vec<Video>,
    ) -> Vec<std::result::Result<Extraction, ExtractionFailure>> {
        let pipeline = self.clone();
        let joined = fanout::bounded(videos.clone(), self.concurrency, move |video| {
            let pipeline = pipeline.clone();
            async move {
                pipeline
                    .extract(&video)
                    .await
                    .map_err(|error| ExtractionFailure { video, error })
            }
        })
        .await;

        joined
            .into_iter()
            .zip(videos)
            .map(|(result, video)| {
                result.unwrap_or_else(|e| {
                    warn!("Extraction task for {:?} failed: {}", video.path(), e);
                    Err(ExtractionFailure {
                        video,
                        error: Error::Io(std::io::Error::other(e)),
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tubevault_av::backend::FieldResult;
    use tubevault_av::{CommandProvider, FieldError};
    use tubevault_common::{MetadataField, VideoFormat};

    /// Fake MP4 backend: raw output is the file name; files named `fail-*`
    /// fail to run, files named `panic-*` panic, and files named `notitle-*`
    /// lack a title.
    #[derive(Default)]
    struct FakeBackend {
        running: AtomicUsize,
        peak: AtomicUsize,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl CommandProvider for FakeBackend {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn format(&self) -> VideoFormat {
            VideoFormat::Mp4
        }

        async fn run(&self, path: &Path) -> Result<String> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if name.starts_with("panic-") {
                panic!("backend crashed on {name}");
            }
            if name.starts_with("fail-") {
                return Err(Error::tool_failed("fake", "exit status: 1"));
            }
            Ok(name.to_string())
        }

        fn parse_title(&self, raw: &str) -> FieldResult<String> {
            if raw.starts_with("notitle-") {
                Err(FieldError::missing("Title"))
            } else {
                Ok("a title".into())
            }
        }

        fn parse_description(&self, _raw: &str) -> FieldResult<String> {
            Ok("a description".into())
        }

        fn parse_creator(&self, _raw: &str) -> FieldResult<String> {
            Ok("a creator".into())
        }

        fn parse_published_at(&self, _raw: &str) -> FieldResult<NaiveDate> {
            Ok(NaiveDate::from_ymd_opt(1992, 5, 1).unwrap())
        }

        fn parse_duration(&self, _raw: &str) -> FieldResult<Duration> {
            Ok(Duration::from_secs(180))
        }

        async fn set(&self, _path: &Path, _metadata: &Metadata) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn pipeline(backend: Arc<FakeBackend>, concurrency: usize) -> MetadataPipeline {
        let mut registry = BackendRegistry::new();
        registry.register(backend);
        MetadataPipeline::new(registry, concurrency)
    }

    fn video(name: &str) -> Video {
        Video::from_path(format!("/archive/chan/{name}")).unwrap()
    }

    #[tokio::test]
    async fn test_extract_pairs_video() {
        let p = pipeline(Arc::new(FakeBackend::default()), 1);
        let v = video("ok-dQw4w9WgXcQ.mp4");
        let extraction = p.extract(&v).await.unwrap();
        assert_eq!(extraction.video, v);
        assert_eq!(extraction.metadata.title, "a title");
        assert!(extraction.is_complete());
    }

    #[tokio::test]
    async fn test_extract_partial() {
        let p = pipeline(Arc::new(FakeBackend::default()), 1);
        let extraction = p.extract(&video("notitle-dQw4w9WgXcQ.mp4")).await.unwrap();
        assert_eq!(extraction.metadata.title, "");
        assert_eq!(extraction.metadata.creator, "a creator");
        let err = extraction.parse_error.as_ref().unwrap();
        assert_eq!(err.unparsed_fields(), &[MetadataField::Title]);

        let report = extraction.report();
        assert_eq!(report.unparsed_fields, vec!["title"]);
        assert!(report.parse_error.unwrap().contains("notitle-dQw4w9WgXcQ.mp4"));
    }

    #[tokio::test]
    async fn test_extract_unsupported_format() {
        let p = pipeline(Arc::new(FakeBackend::default()), 1);
        let err = p.extract(&video("x-dQw4w9WgXcQ.mkv")).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_write_back() {
        let backend = Arc::new(FakeBackend::default());
        let p = pipeline(backend.clone(), 1);
        p.write_back(&video("x-dQw4w9WgXcQ.mp4"), &Metadata::default())
            .await
            .unwrap();
        assert_eq!(backend.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_extract_all_keeps_order_and_failures() {
        let p = pipeline(Arc::new(FakeBackend::default()), 2);
        let videos = vec![
            video("a-AAAAAAAAAAA.mp4"),
            video("fail-BBBBBBBBBBB.mp4"),
            video("c-CCCCCCCCCCC.mp4"),
        ];

        let results = p.extract_all(videos).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().video.id().as_str(), "AAAAAAAAAAA");
        let failure = results[1].as_ref().unwrap_err();
        assert_eq!(failure.video.id().as_str(), "BBBBBBBBBBB");
        assert!(matches!(failure.error, Error::ToolFailed { .. }));
        assert_eq!(results[2].as_ref().unwrap().video.id().as_str(), "CCCCCCCCCCC");
    }

    #[tokio::test]
    async fn test_extract_all_reports_panicked_task() {
        let p = pipeline(Arc::new(FakeBackend::default()), 2);
        let videos = vec![
            video("a-AAAAAAAAAAA.mp4"),
            video("panic-BBBBBBBBBBB.mp4"),
            video("c-CCCCCCCCCCC.mp4"),
        ];

        let results = p.extract_all(videos).await;
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        let failure = results[1].as_ref().unwrap_err();
        assert_eq!(failure.video.id().as_str(), "BBBBBBBBBBB");
        assert!(matches!(failure.error, Error::Io(_)));
        assert!(results[2].is_ok());
    }

    #[tokio::test]
    async fn test_extract_all_bounded() {
        let backend = Arc::new(FakeBackend::default());
        let p = pipeline(backend.clone(), 2);
        let videos = (0..8)
            .map(|i| video(&format!("v{i}-AAAAAAAAAA{i}.mp4")))
            .collect();

        let results = p.extract_all(videos).await;
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.is_ok()));
        assert!(backend.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_raised() {
        let p = pipeline(Arc::new(FakeBackend::default()), 0);
        let results = p.extract_all(vec![video("a-AAAAAAAAAAA.mp4")]).await;
        assert_eq!(results.len(), 1);
    }
}
