use anyhow::{Context, Result};
use imageproc::image::GenericImageView;
use tempfile::NamedTempFile;

use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::image::{self, EncodeOptions, ImageFormat};
use crate::job::{JobTable, ResizeJob};
use crate::size::Size;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunOptions {
    pub encode: EncodeOptions,
    /// Only read headers, never write.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Resized { from: (u32, u32), to: Size },
    Planned { from: (u32, u32), to: Size },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub name: String,
    pub outcome: Outcome,
}

impl Report {
    pub fn is_missing(&self) -> bool {
        self.outcome == Outcome::Missing
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = &self.name;
        match self.outcome {
            Outcome::Resized { to, .. } => write!(f, "Successfully resized {name} to {to}"),
            Outcome::Planned { from: (w, h), to } => {
                write!(f, "Would resize {name} from ({w}, {h}) to {to}")
            }
            Outcome::Missing => write!(f, "Error: {name} not found."),
        }
    }
}

/// Resize every job in `table`, in order, with file names resolved
/// against `dir`.
///
/// `on_report` sees each job's report as soon as it finishes. Missing
/// files are reported and skipped; any other failure stops the run.
pub fn run(
    dir: &Path,
    table: &JobTable,
    options: &RunOptions,
    mut on_report: impl FnMut(&Report),
) -> Result<Vec<Report>> {
    log::info!(
        "Processing {} jobs in {}{}",
        table.len(),
        dir.display(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    let mut reports = Vec::with_capacity(table.len());
    for job in table.iter() {
        let report = run_job(dir, job, options)?;
        on_report(&report);
        reports.push(report);
    }

    let missing = reports.iter().filter(|r| r.is_missing()).count();
    log::info!(
        "Done: {} of {} images handled, {missing} missing",
        reports.len() - missing,
        reports.len()
    );

    Ok(reports)
}

fn run_job(dir: &Path, job: &ResizeJob, options: &RunOptions) -> Result<Report> {
    let path = dir.join(&job.file);
    let outcome = resize_file(&path, job.size, options)
        .with_context(|| format!("Failed to resize {}", job.name()))?;

    Ok(Report {
        name: job.name(),
        outcome,
    })
}

/// Resize a single file in place to exactly `target`.
pub fn resize_file(path: &Path, target: Size, options: &RunOptions) -> Result<Outcome> {
    if !path.exists() {
        log::debug!("{} does not exist, skipping", path.display());
        return Ok(Outcome::Missing);
    }

    let format = ImageFormat::from_path(path, &options.encode)?;

    if options.dry_run {
        let from = image::read_dimensions(path)?;
        return Ok(Outcome::Planned { from, to: target });
    }

    let img = image::decode(path)?;
    let from = img.dimensions();
    log::debug!(
        "Resizing {} from {from:?} to {target} as {}",
        path.display(),
        format.extension()
    );

    let resized = image::resize(&img, target)?;
    let data = image::encode(&resized, format)?;
    replace(path, &data)?;

    Ok(Outcome::Resized { from, to: target })
}

/// Atomically swap `path`'s content for `data`, keeping its permissions.
fn replace(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .permissions();

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(data)?;
    file.as_file().set_permissions(permissions)?;
    file.as_file().sync_all()?;

    file.persist(path)
        .with_context(|| format!("Failed to overwrite {}", path.display()))?;

    log::trace!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
