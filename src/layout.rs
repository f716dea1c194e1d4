//! Card geometry and styling.
//!
//! A [`LayoutConfig`] is a plain value: the renderer only ever reads it, so one
//! instance can be shared by every card of a batch. All fields default to the
//! stock 1080×1620 portrait card, and a JSON file may override any subset.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::font::FontHandle;

/// Largest accepted canvas side, in pixels.
const MAX_CANVAS_SIDE: u32 = 16_384;
/// Largest accepted canvas area, in pixels.
const MAX_CANVAS_PIXELS: u64 = 40_000_000;
/// Accepted nominal font sizes.
const FONT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

/// Problems found while loading or validating a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid colour '{0}' (expected #RRGGBB, white or black)")]
    Colour(String),
    #[error("canvas must be at least 1×1 pixels (got {width}×{height})")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("canvas {width}×{height} exceeds the 16384px side or 40000000 pixel limit")]
    CanvasTooLarge { width: u32, height: u32 },
    #[error("{role} font size {size} is outside 1..=1000")]
    FontSize { role: &'static str, size: u32 },
    #[error("{field} {value} exceeds 16384px")]
    Geometry { field: &'static str, value: u32 },
    #[error("padding {padding} leaves no room on a {width}px wide canvas")]
    Padding { padding: u32, width: u32 },
    #[error("failed to read layout {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Offset of the page counter, measured leftwards and upwards from the
/// bottom-right corner of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub right: u32,
    pub bottom: u32,
}

/// Static geometry and styling applied to every card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,
    /// Left/right margin; the wrap width is `width - 2 * padding`.
    pub padding: u32,
    /// Y coordinate of the first title line.
    pub start_y: u32,
    pub title_line_height: u32,
    pub body_line_height: u32,
    /// Extra space inserted before the strategic-point and key-point blocks.
    pub block_gap: u32,
    pub strategic_marker: String,
    pub key_marker: String,
    pub background: String,
    pub text_color: String,
    pub page_anchor: Anchor,
    /// Directory the font families below are resolved against.
    pub font_dir: PathBuf,
    pub title_font: FontHandle,
    pub body_font: FontHandle,
    /// JPEG quality used when cards are persisted (1-100).
    pub jpeg_quality: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1620,
            padding: 50,
            start_y: 100,
            title_line_height: 70,
            body_line_height: 60,
            block_gap: 20,
            strategic_marker: "🎯".to_string(),
            key_marker: "💡".to_string(),
            background: "white".to_string(),
            text_color: "#182551".to_string(),
            page_anchor: Anchor {
                right: 100,
                bottom: 80,
            },
            font_dir: PathBuf::from("fonts"),
            title_font: FontHandle::new("AppleGothic.ttf", 60),
            body_font: FontHandle::new("AppleGothic.ttf", 50),
            jpeg_quality: 90,
        }
    }
}

impl LayoutConfig {
    /// Read a (possibly partial) layout from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let raw = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: LayoutConfig =
            serde_json::from_str(&raw).map_err(|source| LayoutError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayoutError::EmptyCanvas {
                width: self.width,
                height: self.height,
            });
        }
        let area = u64::from(self.width) * u64::from(self.height);
        if self.width.max(self.height) > MAX_CANVAS_SIDE || area > MAX_CANVAS_PIXELS {
            return Err(LayoutError::CanvasTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        for (role, font) in [("title", &self.title_font), ("body", &self.body_font)] {
            if !FONT_SIZE_RANGE.contains(&font.size_pt) {
                return Err(LayoutError::FontSize {
                    role,
                    size: font.size_pt,
                });
            }
        }
        let geometry = [
            ("start_y", self.start_y),
            ("title_line_height", self.title_line_height),
            ("body_line_height", self.body_line_height),
            ("block_gap", self.block_gap),
            ("page_anchor.right", self.page_anchor.right),
            ("page_anchor.bottom", self.page_anchor.bottom),
        ];
        if let Some((field, value)) = geometry
            .into_iter()
            .find(|(_, value)| *value > MAX_CANVAS_SIDE)
        {
            return Err(LayoutError::Geometry { field, value });
        }
        if self.padding.saturating_mul(2) >= self.width {
            return Err(LayoutError::Padding {
                padding: self.padding,
                width: self.width,
            });
        }
        parse_colour(&self.background)?;
        parse_colour(&self.text_color)?;
        Ok(())
    }

    /// Horizontal budget available to every wrapped line.
    pub fn max_line_width(&self) -> f32 {
        self.width.saturating_sub(self.padding * 2) as f32
    }

    pub fn background_rgb(&self) -> Result<Rgb<u8>, LayoutError> {
        parse_colour(&self.background)
    }

    pub fn text_rgb(&self) -> Result<Rgb<u8>, LayoutError> {
        parse_colour(&self.text_color)
    }

    /// Top-left position of the page counter.
    pub fn page_counter_origin(&self) -> (i32, i32) {
        (
            self.width as i32 - self.page_anchor.right as i32,
            self.height as i32 - self.page_anchor.bottom as i32,
        )
    }

    /// Prefix `text` with `marker` the way block text is presented on the card.
    ///
    /// Empty text stays empty so that a missing field renders no lines at all.
    pub fn mark(marker: &str, text: &str) -> String {
        if text.trim().is_empty() {
            String::new()
        } else if marker.is_empty() {
            text.to_string()
        } else {
            format!("{marker} {text}")
        }
    }
}

/// Parse `#RRGGBB` (or the names `white` / `black`) into an RGB pixel.
pub fn parse_colour(value: &str) -> Result<Rgb<u8>, LayoutError> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "white" => return Ok(Rgb([0xff, 0xff, 0xff])),
        "black" => return Ok(Rgb([0x00, 0x00, 0x00])),
        _ => {}
    }
    let hex = trimmed
        .strip_prefix('#')
        .ok_or_else(|| LayoutError::Colour(value.to_string()))?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(LayoutError::Colour(value.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| LayoutError::Colour(value.to_string()))
    };
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}
