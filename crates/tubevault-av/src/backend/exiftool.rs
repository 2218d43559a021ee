//! MP4 metadata via `exiftool`.
//!
//! `exiftool -s` prints one `TagName : value` line per tag. Dates are forced
//! into `YYYYMMDD` with `-d %Y%m%d`. Durations come out either as
//! `H:MM:SS` or, for short clips, as fractional seconds (`12.56 s`), both
//! optionally suffixed with `(approx)`.

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
use crate::Result;

static HMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})(?:\.\d+)?(?:\s*\(approx\))?$").expect("valid regex")
});

static SECONDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.\d+)?\s*s(?:\s*\(approx\))?$").expect("valid regex")
});

const TITLE_TAG: &str = "Title";
const DESCRIPTION_TAGS: &[&str] = &["Description", "LongDescription"];
const CREATOR_TAG: &str = "Artist";
const DATE_TAG: &str = "ContentCreateDate";
const DURATION_TAG: &str = "Duration";

/// An MP4 backend backed by the `exiftool` CLI. Supports write-back.
#[derive(Debug, Clone)]
pub struct ExiftoolBackend {
    tool: ToolConfig,
}

impl ExiftoolBackend {
    /// Create a backend using the given tool configuration.
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    /// Create a backend using the registry's exiftool entry.
    pub fn from_registry(registry: &ToolRegistry) -> Self {
        Self::new(registry.resolve("exiftool"))
    }

    fn command(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.tool.path.clone());
        cmd.timeout(self.tool.timeout);
        cmd
    }
}

/// Find the value of the first `tag : value` line whose tag matches.
fn tag_value<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    raw.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == tag).then(|| value.trim())
    })
}

fn required_tag<'a>(raw: &'a str, tag: &str) -> FieldResult<&'a str> {
    tag_value(raw, tag).ok_or_else(|| FieldError::missing(tag))
}

fn parse_exif_duration(value: &str) -> FieldResult<Duration> {
    if let Some(caps) = HMS_RE.captures(value) {
        return elapsed(value, &caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = SECONDS_RE.captures(value) {
        let secs = caps[1]
            .parse::<u64>()
            .map_err(|e| FieldError::malformed(value, e.to_string()))?;
        return Ok(Duration::from_secs(secs));
    }

    Err(FieldError::malformed(value, "expected H:MM:SS or seconds"))
}

#[async_trait]
impl CommandProvider for ExiftoolBackend {
    fn name(&self) -> &'static str {
        "exiftool"
    }

    fn format(&self) -> VideoFormat {
        VideoFormat::Mp4
    }

    async fn run(&self, path: &Path) -> Result<String> {
        let output = self
            .command()
            .args(["-s", "-d", "%Y%m%d"])
            .arg(path.as_os_str())
            .execute()
            .await?;
        Ok(output.stdout)
    }

    fn parse_title(&self, raw: &str) -> FieldResult<String> {
        required_tag(raw, TITLE_TAG).map(str::to_string)
    }

    fn parse_description(&self, raw: &str) -> FieldResult<String> {
        DESCRIPTION_TAGS
            .iter()
            .find_map(|tag| tag_value(raw, tag))
            .map(str::to_string)
            .ok_or_else(|| FieldError::missing(DESCRIPTION_TAGS.join(" or ")))
    }

    fn parse_creator(&self, raw: &str) -> FieldResult<String> {
        required_tag(raw, CREATOR_TAG).map(str::to_string)
    }

    fn parse_published_at(&self, raw: &str) -> FieldResult<NaiveDate> {
        parse_compact_date(required_tag(raw, DATE_TAG)?)
    }

    fn parse_duration(&self, raw: &str) -> FieldResult<Duration> {
        parse_exif_duration(required_tag(raw, DURATION_TAG)?)
    }

    async fn set(&self, path: &Path, metadata: &Metadata) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("-overwrite_original")
            .arg(format!("-{TITLE_TAG}={}", metadata.title))
            .arg(format!("-{CREATOR_TAG}={}", metadata.creator))
            .arg(format!("-{}={}", DESCRIPTION_TAGS[0], metadata.description));
        if let Some(date) = metadata.published_at {
            cmd.arg(format!("-{DATE_TAG}={}", date.format("%Y%m%d")));
        }
        cmd.arg(path.as_os_str());

        cmd.execute().await?;
        tracing::debug!(path = %path.display(), "wrote metadata with exiftool");
        Ok(())
    }
}
