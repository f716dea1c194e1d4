//! Card rendering (`onepoint render`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use onepoint::{BatchExporter, FontCache, OutputFormat};

use crate::cli::common::{InputArgs, LayoutArgs, OutputFormatArg};
use crate::cli::utils::{load_layout, load_records};

/// Args for `onepoint render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub layout: LayoutArgs,
    /// Output directory for the generated images.
    #[arg(short = 'o', long = "output", default_value = "out")]
    pub output: PathBuf,
    /// Image encoding.
    #[arg(long, default_value_t = OutputFormatArg::Jpeg, value_enum)]
    pub format: OutputFormatArg,
    /// JPEG quality (1-100); overrides the layout file.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
}

/// Execute `onepoint render`.
pub fn handle(args: RenderArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let mut layout = load_layout(&args.layout)?;
    if let Some(quality) = args.quality {
        layout.jpeg_quality = quality;
    }
    let format: OutputFormat = args.format.into();

    fs::create_dir_all(&args.output).with_context(|| {
        format!("failed to create output directory {}", args.output.display())
    })?;

    let exporter = BatchExporter::from_layout(&layout, FontCache::global())
        .context("invalid layout configuration")?;
    let cards = exporter.export_all(&records);
    let report = exporter.save_all(&cards, &args.output, format);

    for path in &report.saved {
        println!("Saved {}", path.display());
    }
    for failure in &report.failures {
        eprintln!("Card {} was not saved: {}", failure.page, failure.error);
    }
    if report.all_failed() {
        return Err(anyhow!(
            "none of the {} card(s) could be saved to {}",
            cards.len(),
            args.output.display()
        ));
    }

    println!(
        "Rendered {} of {} card(s) to {} as {}",
        report.saved.len(),
        cards.len(),
        args.output.display(),
        format
    );
    Ok(())
}
