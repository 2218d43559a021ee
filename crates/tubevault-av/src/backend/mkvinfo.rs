//! Matroska metadata via `mkvinfo`.
//!
//! `mkvinfo` prints the element tree with `|` and `+` prefixes. The title and
//! duration live in the segment information block; description, creator and
//! date are simple tags, a `+ Name:` line followed by a `+ String:` line.
//! Writing metadata back is not supported for Matroska.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use tubevault_common::{Metadata, VideoFormat};

use super::{elapsed, parse_compact_date, CommandProvider, FieldError, FieldResult};
use crate::command::ToolCommand;
use crate::tools::{ToolConfig, ToolRegistry};
use crate::{Error, Result};

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\|[ \t]*\+ Title: ?([^\r\n]*)").expect("valid regex"));

static DURATION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\|[ \t]*\+ Duration: ?([^\r\n]*)").expect("valid regex"));

// `HH:MM:SS.nnnnnnnnn`, or the legacy `1692.563s (00:28:12.563)`.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\d.]+s \()?(\d+):(\d{2}):(\d{2})(?:\.\d+)?\)?$").expect("valid regex")
});

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| simple_tag_regex("DESCRIPTION"));
static ARTIST_RE: LazyLock<Regex> = LazyLock::new(|| simple_tag_regex("ARTIST"));
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| simple_tag_regex("DATE"));
static TITLE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| simple_tag_regex("TITLE"));

/// Match a simple tag block and capture its string value.
///
/// Continuation lines of a multi-line value do not start with `|`.
fn simple_tag_regex(name: &str) -> Regex {
    let pattern = format!(
        r"(?m)^\|[ \t]*\+ Name: (?i:{})[ \t]*\r?\n\|[ \t]*\+ String: ?([^\r\n]*(?:\r?\n[^|\r\n][^\r\n]*)*)",
        regex::escape(name)
    );
    Regex::new(&pattern).expect("valid regex")
}

fn capture<'a>(re: &Regex, raw: &'a str) -> Option<&'a str> {
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// A Matroska backend backed by the `mkvinfo` CLI. Read-only.
#[derive(Debug, Clone)]
pub struct MkvinfoBackend {
    tool: ToolConfig,
}

impl MkvinfoBackend {
    /// Create a backend using the given tool configuration.
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    /// Create a backend using the registry's mkvinfo entry.
    pub fn from_registry(registry: &ToolRegistry) -> Self {
        Self::new(registry.resolve("mkvinfo"))
    }
}

#[async_trait]
impl CommandProvider for MkvinfoBackend {
    fn name(&self) -> &'static str {
        "mkvinfo"
    }

    fn format(&self) -> VideoFormat {
        VideoFormat::Mkv
    }

    async fn run(&self, path: &Path) -> Result<String> {
        let output = ToolCommand::new(self.tool.path.clone())
            .timeout(self.tool.timeout)
            .arg(path.as_os_str())
            .execute()
            .await?;
        Ok(output.stdout)
    }

    fn parse_title(&self, raw: &str) -> FieldResult<String> {
        capture(&TITLE_RE, raw)
            .or_else(|| capture(&TITLE_TAG_RE, raw))
            .map(str::to_string)
            .ok_or_else(|| FieldError::missing("segment Title or TITLE tag"))
    }

    fn parse_description(&self, raw: &str) -> FieldResult<String> {
        capture(&DESCRIPTION_RE, raw)
            .map(str::to_string)
            .ok_or_else(|| FieldError::missing("DESCRIPTION tag"))
    }

    fn parse_creator(&self, raw: &str) -> FieldResult<String> {
        capture(&ARTIST_RE, raw)
            .map(str::to_string)
            .ok_or_else(|| FieldError::missing("ARTIST tag"))
    }

    fn parse_published_at(&self, raw: &str) -> FieldResult<NaiveDate> {
        let value = capture(&DATE_RE, raw).ok_or_else(|| FieldError::missing("DATE tag"))?;
        parse_compact_date(value)
    }

    fn parse_duration(&self, raw: &str) -> FieldResult<Duration> {
        let value = capture(&DURATION_LINE_RE, raw)
            .ok_or_else(|| FieldError::missing("segment Duration"))?;
        parse_mkv_duration(value)
    }

    async fn set(&self, _path: &Path, _metadata: &Metadata) -> Result<()> {
        Err(Error::write_unsupported(VideoFormat::Mkv.extension()))
    }
}

fn parse_mkv_duration(value: &str) -> FieldResult<Duration> {
    let caps = DURATION_RE
        .captures(value)
        .ok_or_else(|| FieldError::malformed(value, "expected HH:MM:SS.nnnnnnnnn"))?;
    elapsed(value, &caps[1], &caps[2], &caps[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = "\
+ EBML head
|+ EBML version: 1
|+ Document type: matroska
+ Segment: size 48213377
|+ Seek head (subentries will be skipped)
|+ Segment information
| + Timestamp scale: 1000000
| + Multiplexing application: Lavf60.16.100
| + Writing application: Lavf60.16.100
| + Duration: 00:28:12.563000000
| + Title: a title
|+ Tracks
| + Track
|  + Track number: 1 (track ID for mkvmerge & mkvextract: 0)
|  + Name: main video
|  + Default duration: 00:00:00.033366666 (29.970 frames/fields per second for a video track)
|+ Tags
| + Tag
|  + Targets
|  + Simple
|   + Name: DESCRIPTION
|   + String: first line
second line
|  + Simple
|   + Name: ARTIST
|   + String: a creator
|  + Simple
|   + Name: DATE
|   + String: 19920501
";

    fn backend() -> MkvinfoBackend {
        MkvinfoBackend::new(ToolConfig {
            name: "mkvinfo".into(),
            path: PathBuf::from("mkvinfo"),
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn parses_all_fields() {
        let b = backend();
        assert_eq!(b.parse_title(SAMPLE).unwrap(), "a title");
        assert_eq!(b.parse_description(SAMPLE).unwrap(), "first line\nsecond line");
        assert_eq!(b.parse_creator(SAMPLE).unwrap(), "a creator");
        assert_eq!(
            b.parse_published_at(SAMPLE).unwrap(),
            NaiveDate::from_ymd_opt(1992, 5, 1).unwrap()
        );
        assert_eq!(
            b.parse_duration(SAMPLE).unwrap(),
            Duration::from_secs(28 * 60 + 12)
        );
    }

    #[test]
    fn duration_truncates_sub_second() {
        let d = parse_mkv_duration("00:28:12.563").unwrap();
        assert_eq!(d.as_nanos(), 1_692_000_000_000);
    }

    #[test]
    fn duration_legacy_layout() {
        let d = parse_mkv_duration("1692.563s (00:28:12.563)").unwrap();
        assert_eq!(d, Duration::from_secs(1692));
    }

    #[test]
    fn duration_malformed_components() {
        let raw = "| + Duration: 00:6x:12.563000000\n";
        assert!(matches!(
            backend().parse_duration(raw),
            Err(FieldError::Malformed { .. })
        ));
        assert!(parse_mkv_duration("00:60:00.000").is_err());
    }

    #[test]
    fn duration_hours_out_of_range() {
        let raw = "| + Duration: 9999999999999999:00:00.000000000\n";
        assert!(matches!(
            backend().parse_duration(raw),
            Err(FieldError::Malformed { .. })
        ));
    }

    #[test]
    fn default_duration_is_not_segment_duration() {
        let raw = "|  + Default duration: 00:00:00.033366666 (29.970 frames)\n";
        assert!(matches!(
            backend().parse_duration(raw),
            Err(FieldError::Missing { .. })
        ));
    }

    #[test]
    fn title_falls_back_to_title_tag() {
        let raw = "|  + Simple\n|   + Name: TITLE\n|   + String: tagged title\n";
        assert_eq!(backend().parse_title(raw).unwrap(), "tagged title");
    }

    #[test]
    fn track_names_are_not_tags() {
        let raw = "|  + Name: ARTIST\n|  + Codec ID: V_VP9\n";
        assert!(matches!(
            backend().parse_creator(raw),
            Err(FieldError::Missing { .. })
        ));
    }

    #[test]
    fn malformed_date_tag() {
        let raw = "|   + Name: DATE\n|   + String: 1992-05-01\n";
        assert!(matches!(
            backend().parse_published_at(raw),
            Err(FieldError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn set_is_unsupported() {
        let err = backend()
            .set(Path::new("/tmp/x-dQw4w9WgXcQ.mkv"), &Metadata::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::WriteUnsupported { .. }));
    }
}
