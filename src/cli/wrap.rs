//! Wrap preview (`onepoint wrap`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use onepoint::{GlyphMetrics, load_font, wrap_text};

use crate::cli::common::{FontRoleArg, LayoutArgs};
use crate::cli::utils::{load_layout, read_text_arg};

/// Args for `onepoint wrap`.
#[derive(Args, Debug)]
pub struct WrapArgs {
    /// Text to wrap (falls back to stdin if omitted).
    #[arg(long)]
    pub text: Option<String>,
    /// Read text from file (`-` for stdin).
    #[arg(long = "from")]
    pub from: Option<PathBuf>,
    /// Layout font to measure with.
    #[arg(long, default_value_t = FontRoleArg::Body, value_enum)]
    pub font: FontRoleArg,
    /// Line width in pixels (defaults to the layout's canvas width minus padding).
    #[arg(long)]
    pub width: Option<f32>,
    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute `onepoint wrap`.
pub fn handle(args: WrapArgs) -> Result<()> {
    let text = read_text_arg(args.text, args.from)?;
    let layout = load_layout(&args.layout)?;
    let handle = match args.font {
        FontRoleArg::Title => &layout.title_font,
        FontRoleArg::Body => &layout.body_font,
    };
    let font = load_font(&layout.font_dir, &handle.family, handle.size_pt);
    let max_width = args.width.unwrap_or_else(|| layout.max_line_width());

    let block = wrap_text(&text, &*font, max_width);
    println!(
        "{} line(s) at {:.0}px with {}{}",
        block.len(),
        max_width,
        font.handle(),
        if font.is_fallback() { " (built-in face)" } else { "" }
    );
    for (idx, line) in block.lines().iter().enumerate() {
        let width = font.measure(line);
        let marker = if width > max_width { '!' } else { ' ' };
        println!("{:>3} {:>7.1}{} {}", idx + 1, width, marker, line);
    }
    Ok(())
}
