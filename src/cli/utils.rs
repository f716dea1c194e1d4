//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use onepoint::{ContentSource, JsonSource, LayoutConfig, Record, SampleSource};

use crate::cli::common::{InputArgs, LayoutArgs};

/// Resolve plain-text input for commands that accept either inline strings or files.
pub fn read_text_arg(text: Option<String>, from: Option<PathBuf>) -> Result<String> {
    if let Some(t) = text {
        return Ok(t);
    }
    if let Some(path) = from {
        if path.as_os_str() == "-" {
            return read_stdin();
        }
        return fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    read_stdin()
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Fetch the batch selected by `--input` / `--sample`; an empty batch is an error.
pub fn load_records(args: &InputArgs) -> Result<Vec<Record>> {
    let source: Box<dyn ContentSource> = match &args.input {
        Some(path) => Box::new(JsonSource::new(path)),
        None => Box::new(SampleSource),
    };
    let records = source
        .fetch()
        .with_context(|| format!("no posts available from {} source", source.name()))?;
    info!("loaded {} post(s) from {} source", records.len(), source.name());
    Ok(records)
}

/// Build the effective layout from defaults, an optional file, and CLI overrides.
pub fn load_layout(args: &LayoutArgs) -> Result<LayoutConfig> {
    let mut layout = match &args.layout {
        Some(path) => LayoutConfig::load(path)?,
        None => LayoutConfig::default(),
    };
    if let Some(dir) = &args.font_dir {
        layout.font_dir = dir.clone();
    }
    Ok(layout)
}
