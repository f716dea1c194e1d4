//! Font resolution and glyph measurement.
//!
//! Fonts are resolved once per `(path, size)` pair and then shared read-only.
//! A family that cannot be read or parsed never fails a render: it resolves to
//! the built-in bitmap face at the same nominal size and carries a
//! [`FontWarning`] describing what went wrong.

mod builtin;

pub use builtin::BuiltinFace;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use thiserror::Error;

/// A font request: family file name plus nominal pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontHandle {
    pub family: String,
    pub size_pt: u32,
}

impl FontHandle {
    pub fn new(family: impl Into<String>, size_pt: u32) -> Self {
        Self {
            family: family.into(),
            size_pt,
        }
    }

    /// Location of the family inside `dir`; a bare family name gets `.ttf`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        let candidate = dir.join(&self.family);
        if candidate.extension().is_some() {
            candidate
        } else {
            candidate.with_extension("ttf")
        }
    }
}

impl fmt::Display for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.family, self.size_pt)
    }
}

/// Width measurement used by the line wrapper.
pub trait GlyphMetrics {
    /// Pixel width of `text` when drawn on one line.
    fn measure(&self, text: &str) -> f32;
}

/// Non-fatal notice that a requested font was replaced by the built-in face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontWarning {
    pub font: FontHandle,
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for FontWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "font {} could not be loaded from {} ({}); using the built-in face",
            self.font,
            self.path.display(),
            self.reason
        )
    }
}

#[derive(Debug, Error)]
enum FontLoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("not a usable TrueType/OpenType font")]
    Invalid,
}

enum Face {
    Outline { font: FontVec, scale: PxScale },
    Builtin(BuiltinFace),
}

/// A font request resolved to concrete glyph data.
pub struct ResolvedFont {
    handle: FontHandle,
    face: Face,
    warning: Option<FontWarning>,
}

impl fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("handle", &self.handle)
            .field("fallback", &self.is_fallback())
            .finish()
    }
}

impl ResolvedFont {
    /// Load `handle` from `path`, falling back to the built-in face on any failure.
    pub fn load(path: &Path, handle: FontHandle) -> Self {
        match read_outline(path) {
            Ok(font) => {
                debug!("loaded font {} from {}", handle, path.display());
                let scale = em_scale(&font, handle.size_pt);
                Self {
                    handle,
                    face: Face::Outline { font, scale },
                    warning: None,
                }
            }
            Err(err) => {
                let warning = FontWarning {
                    font: handle.clone(),
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                };
                warn!("{warning}");
                Self::builtin_with(handle, Some(warning))
            }
        }
    }

    /// The built-in face at `size_pt`, with no warning attached.
    pub fn builtin(size_pt: u32) -> Self {
        Self::builtin_with(FontHandle::new("builtin", size_pt), None)
    }

    fn builtin_with(handle: FontHandle, warning: Option<FontWarning>) -> Self {
        let face = Face::Builtin(BuiltinFace::new(handle.size_pt));
        Self {
            handle,
            face,
            warning,
        }
    }

    pub fn handle(&self) -> &FontHandle {
        &self.handle
    }

    pub fn warning(&self) -> Option<&FontWarning> {
        self.warning.as_ref()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.face, Face::Builtin(_))
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        match &self.face {
            Face::Outline { font, scale } => draw_text_mut(canvas, color, x, y, *scale, font, text),
            Face::Builtin(face) => face.draw(canvas, x, y, color, text),
        }
    }
}

impl GlyphMetrics for ResolvedFont {
    fn measure(&self, text: &str) -> f32 {
        match &self.face {
            // Advances only, no kerning, so width never shrinks as text grows.
            Face::Outline { font, scale } => {
                let scaled = font.as_scaled(*scale);
                text.chars()
                    .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
                    .sum()
            }
            Face::Builtin(face) => face.measure(text),
        }
    }
}

fn read_outline(path: &Path) -> Result<FontVec, FontLoadError> {
    let data = fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|_| FontLoadError::Invalid)
}

/// Scale at which one em equals `size_pt` pixels.
fn em_scale(font: &FontVec, size_pt: u32) -> PxScale {
    let size = size_pt as f32;
    match font.units_per_em() {
        Some(units) if units > 0.0 => PxScale::from(size * font.height_unscaled() / units),
        _ => PxScale::from(size),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    path: PathBuf,
    size_pt: u32,
}

type Slot = Arc<OnceLock<Arc<ResolvedFont>>>;

/// Load-once cache of resolved fonts.
///
/// The map lock is only held while looking up a slot; the slot itself is a
/// `OnceLock`, so concurrent requests for the same key load the file once and
/// every caller gets the same `Arc`.
#[derive(Default)]
pub struct FontCache {
    slots: Mutex<HashMap<FontKey, Slot>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache.
    pub fn global() -> &'static FontCache {
        static GLOBAL: OnceLock<FontCache> = OnceLock::new();
        GLOBAL.get_or_init(FontCache::new)
    }

    /// Resolve `handle` against `dir`, loading it at most once.
    pub fn load(&self, dir: &Path, handle: &FontHandle) -> Arc<ResolvedFont> {
        let key = FontKey {
            path: handle.path_in(dir),
            size_pt: handle.size_pt,
        };
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };
        Arc::clone(slot.get_or_init(|| Arc::new(ResolvedFont::load(&key.path, handle.clone()))))
    }

    /// Number of distinct fonts requested so far.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve `family` at `size_pt` from `dir` through the process-wide cache.
pub fn load_font(dir: &Path, family: &str, size_pt: u32) -> Arc<ResolvedFont> {
    FontCache::global().load(dir, &FontHandle::new(family, size_pt))
}
