//! Layout and rendering engine for paginated social-media text cards.

mod caption;
mod export;
mod font;
mod layout;
mod record;
mod render;
mod wrap;

pub use caption::{HASHTAGS, caption_preview, post_preview};
pub use export::{BatchExporter, ExportError, ExportReport, OutputFormat, SaveFailure, encode_card};
pub use font::{
    BuiltinFace, FontCache, FontHandle, FontWarning, GlyphMetrics, ResolvedFont, load_font,
};
pub use layout::{Anchor, LayoutConfig, LayoutError, parse_colour};
pub use record::{
    ContentSource, GenerationError, JsonSource, Record, SampleSource, parse_records,
    sample_record,
};
pub use render::{BlockKind, Card, CardPlan, CardRenderer, PageError, PageNumber, PlacedBlock};
pub use wrap::{WrappedBlock, wrap_text};

use anyhow::Result;

/// Render a whole batch with `layout`, resolving fonts through the process-wide cache.
pub fn render_batch(records: &[Record], layout: &LayoutConfig) -> Result<Vec<Card>> {
    let exporter = BatchExporter::from_layout(layout, FontCache::global())?;
    Ok(exporter.export_all(records))
}
