//! Caption previews (`onepoint caption`).

use anyhow::{Result, anyhow};
use clap::Args;
use onepoint::{caption_preview, post_preview};

use crate::cli::common::InputArgs;
use crate::cli::utils::load_records;

/// Args for `onepoint caption`.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// 1-based post index.
    #[arg(short = 'i', long = "index", default_value_t = 1)]
    pub index: usize,
}

/// Execute `onepoint caption`.
pub fn handle(args: CaptionArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let record = args
        .index
        .checked_sub(1)
        .and_then(|idx| records.get(idx))
        .ok_or_else(|| anyhow!("post index {} out of range 1..{}", args.index, records.len()))?;

    println!("Post preview:\n{}\n", post_preview(record));
    println!("Caption preview:\n{}", caption_preview(record));
    Ok(())
}
