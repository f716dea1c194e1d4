//! Batch rendering and persistence of cards.

use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use log::{error, info};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::font::FontCache;
use crate::layout::{LayoutConfig, LayoutError};
use crate::record::Record;
use crate::render::{Card, CardRenderer, PageNumber};

/// Failure to persist a single card.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode card {page}: {source}")]
    Encode {
        page: PageNumber,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Raster encodings available when persisting cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Jpeg => write!(f, "jpeg"),
            OutputFormat::Png => write!(f, "png"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// A card that could not be written.
#[derive(Debug)]
pub struct SaveFailure {
    pub page: PageNumber,
    pub error: ExportError,
}

/// Outcome of persisting a batch: every card is either saved or listed as failed.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub saved: Vec<PathBuf>,
    pub failures: Vec<SaveFailure>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        self.saved.is_empty() && !self.failures.is_empty()
    }
}

/// Renders a batch of records into numbered cards.
pub struct BatchExporter {
    renderer: CardRenderer,
}

impl BatchExporter {
    pub fn new(renderer: CardRenderer) -> Self {
        Self { renderer }
    }

    pub fn from_layout(layout: &LayoutConfig, cache: &FontCache) -> Result<Self, LayoutError> {
        CardRenderer::new(layout, cache).map(Self::new)
    }

    pub fn renderer(&self) -> &CardRenderer {
        &self.renderer
    }

    /// Render every record; card `k` of the result is labelled `k/N`.
    ///
    /// Cards are rendered in parallel but returned in input order.
    pub fn export_all(&self, records: &[Record]) -> Vec<Card> {
        let total = records.len();
        info!("rendering {total} card(s)");
        records
            .par_iter()
            .enumerate()
            .map(|(position, record)| {
                self.renderer
                    .render(record, PageNumber::for_position(position, total))
            })
            .collect()
    }

    /// Encode `card` in memory.
    pub fn encode(&self, card: &Card, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
        encode_card(card, format, self.renderer.layout().jpeg_quality)
    }

    /// Write every card into `dir`. A failing card is recorded and skipped.
    pub fn save_all(&self, cards: &[Card], dir: &Path, format: OutputFormat) -> ExportReport {
        let mut report = ExportReport::default();
        for card in cards {
            match self.save(card, dir, format) {
                Ok(path) => report.saved.push(path),
                Err(err) => {
                    error!("card {} not saved: {err}", card.page());
                    report.failures.push(SaveFailure {
                        page: card.page(),
                        error: err,
                    });
                }
            }
        }
        info!(
            "saved {} card(s) to {}, {} failed",
            report.saved.len(),
            dir.display(),
            report.failures.len()
        );
        report
    }

    /// Write one card as `dir/post_{index}.{ext}`.
    pub fn save(&self, card: &Card, dir: &Path, format: OutputFormat) -> Result<PathBuf, ExportError> {
        let bytes = self.encode(card, format)?;
        let path = dir.join(card.file_name(format));
        fs::write(&path, bytes).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Encode `card` as `format`; `quality` only applies to JPEG and is clamped to 1..=100.
pub fn encode_card(card: &Card, format: OutputFormat, quality: u8) -> Result<Vec<u8>, ExportError> {
    let image = card.image();
    let mut buffer = Vec::new();
    let result = match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).encode_image(image)
        }
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|source| ExportError::Encode {
        page: card.page(),
        source,
    })?;
    Ok(buffer)
}
