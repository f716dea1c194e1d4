use image::{Rgb, RgbImage};
use log::debug;
use std::sync::Arc;

use crate::font::{FontCache, FontWarning, ResolvedFont};
use crate::layout::{LayoutConfig, LayoutError};
use crate::record::Record;
use crate::render::card::{Card, PageNumber};
use crate::wrap::{WrappedBlock, wrap_text};

/// The three stacked text regions of a card, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    StrategicPoint,
    KeyPoint,
}

/// A wrapped block together with where its first line goes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub kind: BlockKind,
    pub top: i32,
    pub line_height: u32,
    pub lines: WrappedBlock,
}

impl PlacedBlock {
    /// Y coordinate of every line in the block.
    pub fn line_tops(&self) -> impl Iterator<Item = (i32, &str)> + '_ {
        self.lines
            .lines()
            .iter()
            .enumerate()
            .map(|(idx, line)| (self.offset(idx), line.as_str()))
    }

    /// Y coordinate just below the last line.
    pub fn bottom(&self) -> i32 {
        self.offset(self.lines.len())
    }

    fn offset(&self, lines: usize) -> i32 {
        let lines = i32::try_from(lines).unwrap_or(i32::MAX);
        let line_height = i32::try_from(self.line_height).unwrap_or(i32::MAX);
        self.top.saturating_add(lines.saturating_mul(line_height))
    }
}

/// Everything that will be drawn on one card, before any pixels are touched.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPlan {
    pub blocks: Vec<PlacedBlock>,
    pub counter_origin: (i32, i32),
}

impl CardPlan {
    pub fn block(&self, kind: BlockKind) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|block| block.kind == kind)
    }
}

/// Composes cards from records with a fixed layout and resolved fonts.
pub struct CardRenderer {
    layout: LayoutConfig,
    title_font: Arc<ResolvedFont>,
    body_font: Arc<ResolvedFont>,
    background: Rgb<u8>,
    ink: Rgb<u8>,
}

impl CardRenderer {
    /// Validate `layout` and resolve its fonts through `cache`.
    pub fn new(layout: &LayoutConfig, cache: &FontCache) -> Result<Self, LayoutError> {
        layout.validate()?;
        let title_font = cache.load(&layout.font_dir, &layout.title_font);
        let body_font = cache.load(&layout.font_dir, &layout.body_font);
        Self::with_fonts(layout, title_font, body_font)
    }

    pub fn with_fonts(
        layout: &LayoutConfig,
        title_font: Arc<ResolvedFont>,
        body_font: Arc<ResolvedFont>,
    ) -> Result<Self, LayoutError> {
        layout.validate()?;
        Ok(Self {
            background: layout.background_rgb()?,
            ink: layout.text_rgb()?,
            layout: layout.clone(),
            title_font,
            body_font,
        })
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Font fallbacks that happened while resolving this renderer's fonts.
    pub fn warnings(&self) -> Vec<&FontWarning> {
        let mut warnings: Vec<&FontWarning> = Vec::new();
        for font in [&self.title_font, &self.body_font] {
            if let Some(warning) = font.warning() {
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
            }
        }
        warnings
    }

    /// Wrap and position every block of `record`.
    pub fn plan(&self, record: &Record) -> CardPlan {
        let layout = &self.layout;
        let max_width = layout.max_line_width();
        let strategic = LayoutConfig::mark(&layout.strategic_marker, &record.strategic_point);
        let key = LayoutConfig::mark(&layout.key_marker, &record.key_point);

        let sections = [
            (BlockKind::Title, record.title.as_str(), &self.title_font, layout.title_line_height),
            (BlockKind::StrategicPoint, strategic.as_str(), &self.body_font, layout.body_line_height),
            (BlockKind::KeyPoint, key.as_str(), &self.body_font, layout.body_line_height),
        ];

        let mut cursor = layout.start_y as i32;
        let mut blocks = Vec::with_capacity(sections.len());
        for (kind, text, font, line_height) in sections {
            if kind != BlockKind::Title {
                cursor = cursor.saturating_add(layout.block_gap as i32);
            }
            let block = PlacedBlock {
                kind,
                top: cursor,
                line_height,
                lines: wrap_text(text, &**font, max_width),
            };
            cursor = block.bottom();
            blocks.push(block);
        }

        CardPlan {
            blocks,
            counter_origin: layout.page_counter_origin(),
        }
    }

    /// Render `record` as page `page` of its batch.
    pub fn render(&self, record: &Record, page: PageNumber) -> Card {
        let plan = self.plan(record);
        let mut canvas = RgbImage::from_pixel(self.layout.width, self.layout.height, self.background);
        let left = self.layout.padding as i32;

        for block in &plan.blocks {
            let font = match block.kind {
                BlockKind::Title => &self.title_font,
                BlockKind::StrategicPoint | BlockKind::KeyPoint => &self.body_font,
            };
            for (top, line) in block.line_tops() {
                font.draw(&mut canvas, left, top, self.ink, line);
            }
        }

        let (x, y) = plan.counter_origin;
        self.body_font.draw(&mut canvas, x, y, self.ink, &page.to_string());
        debug!("rendered card {page} ({} blocks)", plan.blocks.len());
        Card::new(page, canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sample_record;
    use pretty_assertions::assert_eq;

    fn renderer() -> CardRenderer {
        let layout = LayoutConfig::default();
        CardRenderer::with_fonts(
            &layout,
            Arc::new(ResolvedFont::builtin(layout.title_font.size_pt)),
            Arc::new(ResolvedFont::builtin(layout.body_font.size_pt)),
        )
        .unwrap()
    }

    #[test]
    fn blocks_stack_in_order_with_gaps() {
        let renderer = renderer();
        let plan = renderer.plan(&Record::new("Short title", "point", "key"));
        let kinds: Vec<BlockKind> = plan.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Title, BlockKind::StrategicPoint, BlockKind::KeyPoint]
        );
        let title = plan.block(BlockKind::Title).unwrap();
        let strategic = plan.block(BlockKind::StrategicPoint).unwrap();
        let key = plan.block(BlockKind::KeyPoint).unwrap();
        assert_eq!(title.top, 100);
        assert_eq!(strategic.top, 100 + 70 + 20);
        assert_eq!(key.top, strategic.top + 60 + 20);
        assert_eq!(strategic.lines.lines(), ["🎯 point"]);
        assert_eq!(key.lines.lines(), ["💡 key"]);
        assert_eq!(plan.counter_origin, (980, 1540));
    }

    #[test]
    fn empty_key_point_yields_zero_lines_and_keeps_title() {
        let renderer = renderer();
        let full = renderer.plan(&Record::new("Title", "point", "key"));
        let empty = renderer.plan(&Record::new("Title", "point", ""));
        assert!(empty.block(BlockKind::KeyPoint).unwrap().lines.is_empty());
        assert_eq!(full.block(BlockKind::Title), empty.block(BlockKind::Title));
        renderer.render(&Record::new("Title", "point", ""), PageNumber::new(1, 1).unwrap());
    }

    #[test]
    fn long_title_pushes_later_blocks_down() {
        let renderer = renderer();
        let short = renderer.plan(&Record::new("Hiring", "point", "key"));
        let long = renderer.plan(&Record::new(
            "The future of entry level hiring when every senior can ask better questions",
            "point",
            "key",
        ));
        let title = long.block(BlockKind::Title).unwrap();
        let strategic = long.block(BlockKind::StrategicPoint).unwrap();
        assert!(title.lines.len() > 1);
        assert_eq!(title.top, 100);
        assert_eq!(strategic.top, title.bottom() + 20);
        let pushed = (title.lines.len() as i32 - 1) * 70;
        assert_eq!(
            strategic.top,
            short.block(BlockKind::StrategicPoint).unwrap().top + pushed
        );
    }

    #[test]
    fn render_is_deterministic() {
        let renderer = renderer();
        let record = sample_record();
        let page = PageNumber::new(3, 5).unwrap();
        let first = renderer.render(&record, page);
        let second = renderer.render(&record, page);
        assert_eq!(first.image().as_raw(), second.image().as_raw());
    }

    #[test]
    fn canvas_has_layout_size_and_background() {
        let renderer = renderer();
        let card = renderer.render(&Record::default(), PageNumber::new(1, 1).unwrap());
        assert_eq!(card.image().dimensions(), (1080, 1620));
        assert_eq!(*card.image().get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(card.label(), "1/1");
    }

    #[test]
    fn page_counter_differs_between_pages() {
        let renderer = renderer();
        let record = Record::new("Same", "same", "same");
        let one = renderer.render(&record, PageNumber::new(1, 5).unwrap());
        let two = renderer.render(&record, PageNumber::new(2, 5).unwrap());
        assert_ne!(one.image().as_raw(), two.image().as_raw());
    }

    #[test]
    fn rejects_invalid_layout() {
        let layout = LayoutConfig {
            text_color: "blue-ish".to_string(),
            ..LayoutConfig::default()
        };
        let result = CardRenderer::with_fonts(
            &layout,
            Arc::new(ResolvedFont::builtin(60)),
            Arc::new(ResolvedFont::builtin(50)),
        );
        assert!(matches!(result, Err(LayoutError::Colour(_))));
    }
}
