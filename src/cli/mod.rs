//! Command-line interface wiring for the `onepoint` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod caption;
pub mod common;
pub mod dump;
pub mod render;
pub mod utils;
pub mod wrap;

/// Parsed CLI entrypoint for the `onepoint` binary.
#[derive(Parser, Debug)]
#[command(
    name = "onepoint",
    version,
    about = "Render one-point strategy posts into numbered card images"
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render every post of a batch into `post_{n}` images.
    Render(render::RenderArgs),
    /// Show how text wraps at the card's line width.
    Wrap(wrap::WrapArgs),
    /// Print the post and caption previews for one post.
    Caption(caption::CaptionArgs),
    /// Print the bundled sample batch as JSON.
    Sample,
    /// Print the effective layout configuration as JSON.
    Layout(dump::LayoutDumpArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => render::handle(args),
        Command::Wrap(args) => wrap::handle(args),
        Command::Caption(args) => caption::handle(args),
        Command::Sample => dump::sample(),
        Command::Layout(args) => dump::layout(args),
    }
}
