use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use std::path::PathBuf;

use pwa_resize::{EncodeOptions, JobTable, PngCompression, ResizeJob, RunOptions};

#[derive(Parser)]
#[command(name = "pwa-resize")]
#[command(
    about = "Resize PWA screenshots in place (mobile.png to 1080x1920, desktop.png to 1920x1016)",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Directory the screenshot file names are resolved against
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// JSON job file: {"jobs": [{"file": "mobile.png", "width": 1080, "height": 1920}]}
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resize job as NAME=WIDTHxHEIGHT, may be repeated (overrides --config)
    #[arg(short, long = "job", value_name = "NAME=WxH")]
    jobs: Vec<ResizeJob>,

    /// JPEG/WebP quality (0-100)
    #[arg(long, value_name = "QUALITY", default_value_t = 90)]
    quality: u8,

    /// PNG compression level
    #[arg(long, value_enum, default_value_t = PngCompressionArg::Default)]
    png_compression: PngCompressionArg,

    /// Print what would be resized without touching any file
    #[arg(short = 'n', long, default_value_t)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, default_value_t)]
    verbose: bool,

    /// Quiet mode (no log output, status lines only)
    #[arg(short, long, default_value_t)]
    quiet: bool,
}

impl Args {
    fn job_table(&self) -> Result<JobTable> {
        if !self.jobs.is_empty() {
            if self.config.is_some() {
                log::warn!("--job given, ignoring --config");
            }
            return Ok(JobTable::new(self.jobs.clone()));
        }

        match &self.config {
            Some(path) => JobTable::load(path),
            None => Ok(JobTable::default()),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PngCompressionArg {
    Fast,
    Default,
    Best,
}

impl From<PngCompressionArg> for PngCompression {
    fn from(arg: PngCompressionArg) -> Self {
        match arg {
            PngCompressionArg::Fast => PngCompression::Fast,
            PngCompressionArg::Default => PngCompression::Default,
            PngCompressionArg::Best => PngCompression::Best,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    let options = build_options(&args)?;
    let table = args.job_table()?;

    if table.is_empty() {
        log::warn!("No jobs to run");
        return Ok(());
    }

    if !args.dir.is_dir() {
        anyhow::bail!("Directory does not exist: {}", args.dir.display());
    }

    // Missing files are reported, not fatal
    pwa_resize::run(&args.dir, &table, &options, |report| println!("{report}"))
        .context("Resize run aborted")?;

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn build_options(args: &Args) -> Result<RunOptions> {
    // Validate quality
    if args.quality > 100 {
        anyhow::bail!("Quality must be between 0 and 100");
    }

    Ok(RunOptions {
        encode: EncodeOptions {
            quality: args.quality,
            png_compression: args.png_compression.into(),
        },
        dry_run: args.dry_run,
    })
}
