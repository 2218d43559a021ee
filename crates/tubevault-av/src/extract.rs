//! Combine per-field parse results into a single extraction outcome.
//!
//! All five fields are attempted regardless of earlier failures. Failed
//! string fields stay empty and failed optional fields stay `None`.

use std::path::Path;

use tubevault_common::{Metadata, MetadataField, ParseError};

use crate::backend::{CommandProvider, FieldError};
use crate::Result;

/// Parse every field of `raw` with `provider` and fold the outcomes.
///
/// `source` only appears in the aggregated error message.
pub fn aggregate(
    provider: &dyn CommandProvider,
    raw: &str,
    source: &Path,
) -> (Metadata, Option<ParseError>) {
    let title = provider.parse_title(raw);
    let description = provider.parse_description(raw);
    let creator = provider.parse_creator(raw);
    let published_at = provider.parse_published_at(raw);
    let duration = provider.parse_duration(raw);

    let failures: Vec<(MetadataField, FieldError)> = [
        (MetadataField::Title, title.as_ref().err()),
        (MetadataField::Description, description.as_ref().err()),
        (MetadataField::Creator, creator.as_ref().err()),
        (MetadataField::PublishedAt, published_at.as_ref().err()),
        (MetadataField::Duration, duration.as_ref().err()),
    ]
    .into_iter()
    .filter_map(|(field, err)| err.map(|e| (field, e.clone())))
    .collect();

    let metadata = Metadata {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        creator: creator.unwrap_or_default(),
        published_at: published_at.ok(),
        duration: duration.ok(),
    };

    (metadata, ParseError::from_failures(source, failures))
}

/// Run `provider` on `path` and aggregate the fields of its output.
///
/// Only a failure to run the tool is an `Err`; field failures are returned
/// as the second element next to the partially filled [`Metadata`].
pub async fn extract(
    provider: &dyn CommandProvider,
    path: &Path,
) -> Result<(Metadata, Option<ParseError>)> {
    let raw = provider.run(path).await?;
    Ok(aggregate(provider, &raw, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FieldResult;
    use crate::Error;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;
    use tubevault_common::VideoFormat;

    /// Returns literal values, failing exactly the fields in `failing`.
    struct StubProvider {
        failing: Vec<MetadataField>,
        run_fails: bool,
    }

    impl StubProvider {
        fn ok() -> Self {
            Self {
                failing: Vec::new(),
                run_fails: false,
            }
        }

        fn failing(field: MetadataField) -> Self {
            Self {
                failing: vec![field],
                run_fails: false,
            }
        }

        fn field<T>(&self, field: MetadataField, value: T) -> FieldResult<T> {
            if self.failing.contains(&field) {
                Err(FieldError::missing(field.as_str()))
            } else {
                Ok(value)
            }
        }
    }

    #[async_trait]
    impl CommandProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn format(&self) -> VideoFormat {
            VideoFormat::Mp4
        }

        async fn run(&self, _path: &Path) -> Result<String> {
            if self.run_fails {
                return Err(Error::tool_failed("stub", "exit status 1"));
            }
            Ok(String::from("raw"))
        }

        fn parse_title(&self, _raw: &str) -> FieldResult<String> {
            self.field(MetadataField::Title, "a title".into())
        }

        fn parse_description(&self, _raw: &str) -> FieldResult<String> {
            self.field(MetadataField::Description, "a description".into())
        }

        fn parse_creator(&self, _raw: &str) -> FieldResult<String> {
            self.field(MetadataField::Creator, "a creator".into())
        }

        fn parse_published_at(&self, _raw: &str) -> FieldResult<NaiveDate> {
            self.field(
                MetadataField::PublishedAt,
                NaiveDate::from_ymd_opt(1992, 5, 1).unwrap(),
            )
        }

        fn parse_duration(&self, _raw: &str) -> FieldResult<Duration> {
            self.field(MetadataField::Duration, Duration::from_secs(180))
        }

        async fn set(&self, _path: &Path, _metadata: &Metadata) -> Result<()> {
            Ok(())
        }
    }

    fn expected() -> Metadata {
        Metadata {
            title: "a title".into(),
            description: "a description".into(),
            creator: "a creator".into(),
            published_at: NaiveDate::from_ymd_opt(1992, 5, 1),
            duration: Some(Duration::from_secs(180)),
        }
    }

    #[tokio::test]
    async fn all_fields_parse() {
        let path = Path::new("/archive/a title-dQw4w9WgXcQ.mp4");
        let (metadata, err) = extract(&StubProvider::ok(), path).await.unwrap();
        assert_eq!(metadata, expected());
        assert!(err.is_none());
    }

    #[test]
    fn each_field_fails_alone() {
        let path = Path::new("/archive/x-dQw4w9WgXcQ.mp4");
        for field in MetadataField::ALL {
            let (metadata, err) = aggregate(&StubProvider::failing(field), "raw", path);
            let err = err.expect("one field failed");
            assert_eq!(err.unparsed_fields(), &[field]);
            assert!(err.message().contains(field.as_str()));
            assert!(err.message().contains("/archive/x-dQw4w9WgXcQ.mp4"));

            let mut want = expected();
            match field {
                MetadataField::Title => want.title.clear(),
                MetadataField::Description => want.description.clear(),
                MetadataField::Creator => want.creator.clear(),
                MetadataField::PublishedAt => want.published_at = None,
                MetadataField::Duration => want.duration = None,
            }
            assert_eq!(metadata, want, "only {field} should be unset");
        }
    }

    #[test]
    fn all_fields_fail() {
        let stub = StubProvider {
            failing: MetadataField::ALL.to_vec(),
            run_fails: false,
        };
        let (metadata, err) = aggregate(&stub, "", Path::new("x.mp4"));
        assert_eq!(metadata, Metadata::default());
        assert_eq!(err.unwrap().unparsed_fields(), &MetadataField::ALL);
    }

    #[tokio::test]
    async fn run_failure_is_hard_error() {
        let stub = StubProvider {
            failing: Vec::new(),
            run_fails: true,
        };
        let err = extract(&stub, Path::new("x.mp4")).await.unwrap_err();
        assert!(matches!(err, Error::ToolFailed { .. }));
    }
}
