use anyhow::{Context, Result};
use serde::Deserialize;
use strum::{EnumCount, EnumIter};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::size::{self, Size};

/// Built-in screenshot targets from the web app manifest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumCount, EnumIter)]
pub enum Preset {
    Mobile,
    Desktop,
}

impl Preset {
    pub fn len() -> usize {
        Self::COUNT
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Preset::Mobile => "mobile.png",
            Preset::Desktop => "desktop.png",
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Preset::Mobile => (1080, 1920),
            Preset::Desktop => (1920, 1016),
        }
    }

    pub fn size(&self) -> Size {
        let (width, height) = self.dimensions();
        Size::new(width, height).expect("preset dimensions are non-zero")
    }
}

/// One file to resize, named relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawJob")]
pub struct ResizeJob {
    pub file: PathBuf,
    pub size: Size,
}

impl ResizeJob {
    pub fn new(file: impl Into<PathBuf>, size: Size) -> Self {
        ResizeJob {
            file: file.into(),
            size,
        }
    }

    /// Name used in status messages.
    pub fn name(&self) -> String {
        self.file.display().to_string()
    }
}

impl From<Preset> for ResizeJob {
    fn from(preset: Preset) -> Self {
        ResizeJob::new(preset.file_name(), preset.size())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawJob {
    file: PathBuf,
    width: u32,
    height: u32,
}

impl TryFrom<RawJob> for ResizeJob {
    type Error = size::ParseError;

    fn try_from(raw: RawJob) -> Result<Self, Self::Error> {
        Ok(ResizeJob::new(raw.file, Size::new(raw.width, raw.height)?))
    }
}

#[derive(Debug)]
pub struct JobParseError(String);

impl fmt::Display for JobParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Invalid job, expected NAME=WIDTHxHEIGHT: ")?;
        f.write_str(&self.0)
    }
}

impl std::error::Error for JobParseError {}

impl FromStr for ResizeJob {
    type Err = JobParseError;

    /// Parses `NAME=WIDTHxHEIGHT`, e.g. `mobile.png=1080x1920`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (file, size) = s
            .rsplit_once('=')
            .ok_or_else(|| JobParseError(s.to_string()))?;

        let file = file.trim();
        if file.is_empty() {
            return Err(JobParseError(s.to_string()));
        }

        let size = size
            .parse::<Size>()
            .map_err(|e| JobParseError(format!("{s} ({e})")))?;

        Ok(ResizeJob::new(file, size))
    }
}

/// Ordered list of jobs, processed front to back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobTable {
    pub jobs: Vec<ResizeJob>,
}

impl Default for JobTable {
    fn default() -> Self {
        Self {
            jobs: Preset::iter().map(ResizeJob::from).collect(),
        }
    }
}

impl JobTable {
    pub fn new(jobs: Vec<ResizeJob>) -> Self {
        Self { jobs }
    }

    /// Load a job table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;

        let table: JobTable = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid job file {}", path.display()))?;

        log::debug!("Loaded {} jobs from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResizeJob> {
        self.jobs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_presets_in_order() {
        let table = JobTable::default();
        assert_eq!(table.len(), Preset::len());

        let jobs: Vec<_> = table
            .iter()
            .map(|job| (job.name(), job.size.dimensions()))
            .collect();
        assert_eq!(
            jobs,
            vec![
                ("mobile.png".to_string(), (1080, 1920)),
                ("desktop.png".to_string(), (1920, 1016)),
            ]
        );
    }

    #[test]
    fn parses_job_argument() {
        let job: ResizeJob = "shots/wide.png=1280x720".parse().unwrap();
        assert_eq!(job.file, PathBuf::from("shots/wide.png"));
        assert_eq!(job.size.dimensions(), (1280, 720));

        assert!("wide.png".parse::<ResizeJob>().is_err());
        assert!("=1280x720".parse::<ResizeJob>().is_err());
        assert!("wide.png=1280x0".parse::<ResizeJob>().is_err());
    }

    #[test]
    fn loads_json_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(
            &path,
            r#"{"jobs": [
                {"file": "tablet.png", "width": 1600, "height": 2560},
                {"file": "mobile.png", "width": 1080, "height": 1920}
            ]}"#,
        )
        .unwrap();

        let table = JobTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.jobs[0].name(), "tablet.png");
        assert_eq!(table.jobs[0].size.dimensions(), (1600, 2560));
        assert_eq!(table.jobs[1].name(), "mobile.png");
    }

    #[test]
    fn rejects_invalid_job_file() {
        let dir = tempfile::tempdir().unwrap();

        let zero = dir.path().join("zero.json");
        std::fs::write(&zero, r#"{"jobs": [{"file": "a.png", "width": 0, "height": 5}]}"#)
            .unwrap();
        assert!(JobTable::load(&zero).is_err());

        let unknown = dir.path().join("unknown.json");
        std::fs::write(&unknown, r#"{"jobs": [], "parallel": true}"#).unwrap();
        assert!(JobTable::load(&unknown).is_err());

        assert!(JobTable::load(&dir.path().join("missing.json")).is_err());
    }
}
