//! Configuration and fixture dumps (`onepoint sample`, `onepoint layout`).

use anyhow::{Context, Result};
use clap::Args;
use onepoint::sample_record;
use serde_json::json;

use crate::cli::common::LayoutArgs;
use crate::cli::utils::load_layout;

/// Args for `onepoint layout`.
#[derive(Args, Debug)]
pub struct LayoutDumpArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,
}

pub fn sample() -> Result<()> {
    let document = json!({ "posts": [sample_record()] });
    let rendered =
        serde_json::to_string_pretty(&document).context("failed to serialize sample batch")?;
    println!("{rendered}");
    Ok(())
}

pub fn layout(args: LayoutDumpArgs) -> Result<()> {
    let layout = load_layout(&args.layout)?;
    let rendered = serde_json::to_string_pretty(&layout).context("failed to serialize layout")?;
    println!("{rendered}");
    Ok(())
}
