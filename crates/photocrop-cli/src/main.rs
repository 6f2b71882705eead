//! photocrop - command-line front end
//!
//! Turns an uploaded photo upright, shrinks it by an integer ratio and writes
//! an exactly sized, center-cropped copy.
//!
//! ```text
//! photocrop org-windows.jpg 123-final.jpg --ratio 4
//! RUST_LOG=photocrop_core=debug photocrop in.jpg out.png
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use photocrop_core::{try_compress_and_save, CompressOptions, FilterType, TargetBasis};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "photocrop", version)]
#[command(about = "Orient, downscale and center-crop an uploaded photo")]
struct Cli {
    /// Image to read (JPEG, PNG, WebP or GIF)
    input: PathBuf,

    /// Where to write the result; the extension picks the format
    output: PathBuf,

    /// Divide both dimensions by this factor
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    ratio: u32,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = photocrop_core::pipeline::DEFAULT_JPEG_QUALITY,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Resampling filter for the downscale
    #[arg(long, value_enum, default_value_t = FilterArg::Bicubic)]
    filter: FilterArg,

    /// Which dimensions the ratio applies to
    #[arg(long, value_enum, default_value_t = BasisArg::Source)]
    basis: BasisArg,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FilterArg {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<FilterArg> for FilterType {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Nearest => FilterType::Nearest,
            FilterArg::Bilinear => FilterType::Bilinear,
            FilterArg::Bicubic => FilterType::Bicubic,
            FilterArg::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BasisArg {
    /// Stored dimensions, before orientation correction
    Source,
    /// Dimensions after orientation correction
    Oriented,
}

impl From<BasisArg> for TargetBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Source => TargetBasis::Source,
            BasisArg::Oriented => TargetBasis::Oriented,
        }
    }
}

impl Cli {
    fn options(&self) -> CompressOptions {
        CompressOptions::new()
            .with_filter(self.filter.into())
            .with_jpeg_quality(self.quality)
            .with_target_basis(self.basis.into())
    }
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let input = File::open(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;

    let saved = try_compress_and_save(BufReader::new(input), &cli.output, cli.ratio, &cli.options())
        .with_context(|| {
            format!(
                "Failed to compress {} into {}",
                cli.input.display(),
                cli.output.display()
            )
        })?;

    let report = &saved.report;
    println!(
        "{} ({}x{}, rotated {}°) -> {} ({}x{}, {:?}, {} bytes)",
        cli.input.display(),
        report.source.0,
        report.source.1,
        report.rotation_degrees,
        cli.output.display(),
        report.target.width,
        report.target.height,
        saved.format,
        saved.bytes_written,
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
