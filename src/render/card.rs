use image::RgbImage;
use std::fmt;
use thiserror::Error;

use crate::export::OutputFormat;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("page {index} is outside 1..={total}")]
    OutOfRange { index: usize, total: usize },
}

/// Position of a card within its batch, always `1 <= index <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageNumber {
    index: usize,
    total: usize,
}

impl PageNumber {
    pub fn new(index: usize, total: usize) -> Result<Self, PageError> {
        if index == 0 || index > total {
            return Err(PageError::OutOfRange { index, total });
        }
        Ok(Self { index, total })
    }

    /// Page for the zero-based `position` of a batch of `total` items.
    pub(crate) fn for_position(position: usize, total: usize) -> Self {
        debug_assert!(position < total);
        Self {
            index: position + 1,
            total,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.total)
    }
}

/// A rendered card. Never mutated after the renderer hands it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    page: PageNumber,
    image: RgbImage,
}

impl Card {
    pub(crate) fn new(page: PageNumber, image: RgbImage) -> Self {
        Self { page, image }
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    /// The page counter text drawn on the card.
    pub fn label(&self) -> String {
        self.page.to_string()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Output file name: `post_{index}.{ext}`.
    pub fn file_name(&self, format: OutputFormat) -> String {
        format!("post_{}.{}", self.page.index, format.extension())
    }
}
