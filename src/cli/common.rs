//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use onepoint::OutputFormat;

/// Image encodings accepted by `--format`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormatArg {
    Jpeg,
    Png,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> OutputFormat {
        match value {
            OutputFormatArg::Jpeg => OutputFormat::Jpeg,
            OutputFormatArg::Png => OutputFormat::Png,
        }
    }
}

/// Which of the two layout fonts to use.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FontRoleArg {
    Title,
    Body,
}

/// Where the batch of posts comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// JSON file with `{"posts": [...]}` or a bare array (`-` for stdin).
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Use the bundled sample post instead of an input file.
    #[arg(long)]
    pub sample: bool,
}

/// Layout overrides shared by rendering commands.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// JSON layout file; omitted fields keep their defaults.
    #[arg(long)]
    pub layout: Option<PathBuf>,
    /// Directory the layout's font families are loaded from.
    #[arg(long = "font-dir")]
    pub font_dir: Option<PathBuf>,
}
