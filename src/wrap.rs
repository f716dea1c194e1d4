//! Greedy word wrapping against a pixel budget.

use crate::font::GlyphMetrics;

/// Lines produced by [`wrap_text`], in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrappedBlock {
    lines: Vec<String>,
}

impl WrappedBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The words of the block joined by single spaces.
    pub fn joined(&self) -> String {
        self.lines.join(" ")
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl<'a> IntoIterator for &'a WrappedBlock {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Break `text` at whitespace so each line fits in `max_width` pixels.
///
/// Every word is charged its width plus one trailing space. A word that is
/// wider than `max_width` on its own is put on a line by itself and left
/// unbroken; empty or all-whitespace text yields no lines.
pub fn wrap_text<M: GlyphMetrics + ?Sized>(text: &str, metrics: &M, max_width: f32) -> WrappedBlock {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_width = 0.0f32;

    for word in text.split_whitespace() {
        let word_width = metrics.measure(&format!("{word} "));
        if current_width + word_width <= max_width {
            current.push(word);
            current_width += word_width;
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current.clear();
            current.push(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    WrappedBlock { lines }
}
