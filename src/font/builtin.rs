use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Glyph cell plus one column of spacing.
const ADVANCE_CELLS: u32 = GLYPH_WIDTH + 1;
/// Nominal size covered by one unscaled glyph cell row stack (7 rows + margin).
const CELLS_PER_EM: f32 = 8.0;

/// 5×7 bitmap face scaled to a nominal pixel size.
///
/// Characters outside the bitmap table are drawn as a hollow box with the same
/// advance, so any text measures and wraps predictably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFace {
    scale: u32,
}

impl BuiltinFace {
    pub fn new(size_pt: u32) -> Self {
        let scale = (size_pt as f32 / CELLS_PER_EM).round() as u32;
        Self {
            scale: scale.max(1),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn advance(&self) -> u32 {
        ADVANCE_CELLS.saturating_mul(self.scale)
    }

    pub fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance() as f32
    }

    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        let step = to_i32(self.advance());
        let top = y.saturating_add(to_i32(self.scale));
        for (idx, ch) in text.chars().enumerate() {
            let offset = i32::try_from(idx).unwrap_or(i32::MAX).saturating_mul(step);
            let left = x.saturating_add(offset);
            if left >= to_i32(canvas.width()) {
                break;
            }
            match glyph_pattern(ch) {
                Some(pattern) => self.draw_pattern(canvas, left, top, &pattern, color),
                None if ch.is_whitespace() => {}
                None => {
                    let width = GLYPH_WIDTH.saturating_mul(self.scale);
                    let height = GLYPH_HEIGHT.saturating_mul(self.scale);
                    if let Some(rect) = clipped(canvas, left, top, width, height) {
                        draw_hollow_rect_mut(canvas, rect, color);
                    }
                }
            }
        }
    }

    fn draw_pattern(
        &self,
        canvas: &mut RgbImage,
        x: i32,
        y: i32,
        pattern: &[u8; GLYPH_HEIGHT as usize],
        color: Rgb<u8>,
    ) {
        let scale = to_i32(self.scale);
        for (row, bits) in pattern.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    let px = x.saturating_add((col as i32).saturating_mul(scale));
                    let py = y.saturating_add((row as i32).saturating_mul(scale));
                    if let Some(rect) = clipped(canvas, px, py, self.scale, self.scale) {
                        draw_filled_rect_mut(canvas, rect, color);
                    }
                }
            }
        }
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Rectangle at `(x, y)` with its size capped to the canvas, or `None` when it
/// starts past the right or bottom edge.
fn clipped(canvas: &RgbImage, x: i32, y: i32, width: u32, height: u32) -> Option<Rect> {
    let (canvas_w, canvas_h) = canvas.dimensions();
    if x >= to_i32(canvas_w) || y >= to_i32(canvas_h) {
        return None;
    }
    Some(Rect::at(x, y).of_size(width.min(canvas_w), height.min(canvas_h)))
}

#[rustfmt::skip]
fn glyph_pattern(ch: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    let pattern = match ch.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000, 0b00000],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        '#' => [0b01010, 0b11111, 0b01010, 0b01010, 0b11111, 0b01010, 0b01010],
        '@' => [0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110],
        '\'' => [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '=' => [0b00000, 0b11111, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000],
        '"' => [0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        '<' => [0b00010, 0b00100, 0b01000, 0b10000, 0b01000, 0b00100, 0b00010],
        '>' => [0b01000, 0b00100, 0b00010, 0b00001, 0b00010, 0b00100, 0b01000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '[' => [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110],
        ']' => [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '$' => [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100],
        '%' => [0b11001, 0b11010, 0b00100, 0b01000, 0b10110, 0b00110, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111],
        '|' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        ';' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        '*' => [0b00000, 0b10101, 0b01110, 0b11111, 0b01110, 0b10101, 0b00000],
        '?' => [0b01110, 0b10001, 0b00010, 0b00100, 0b00100, 0b00000, 0b00100],
        '~' => [0b00000, 0b00000, 0b01000, 0b10101, 0b00010, 0b00000, 0b00000],
        ' ' => [0b00000; GLYPH_HEIGHT as usize],
        _ => return None,
    };
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgb<u8> = Rgb([0, 0, 0]);
    const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

    fn inked(canvas: &RgbImage) -> usize {
        canvas.pixels().filter(|p| **p == INK).count()
    }

    #[test]
    fn scale_tracks_nominal_size() {
        assert_eq!(BuiltinFace::new(50).scale(), 6);
        assert_eq!(BuiltinFace::new(60).scale(), 8);
        assert_eq!(BuiltinFace::new(1).scale(), 1);
        assert_eq!(BuiltinFace::new(50).advance(), 36);
    }

    #[test]
    fn every_char_advances_equally() {
        let face = BuiltinFace::new(50);
        assert_eq!(face.measure("ab"), face.measure("가나"));
        assert_eq!(face.measure(""), 0.0);
    }

    #[test]
    fn unknown_glyphs_draw_a_box_and_spaces_draw_nothing() {
        let face = BuiltinFace::new(8);
        let mut canvas = RgbImage::from_pixel(40, 20, PAPER);
        face.draw(&mut canvas, 0, 0, INK, " ");
        assert_eq!(inked(&canvas), 0);
        face.draw(&mut canvas, 0, 0, INK, "가");
        // Outline of a 5×7 box.
        assert_eq!(inked(&canvas), 2 * 5 + 2 * 7 - 4);
    }

    #[test]
    fn huge_sizes_saturate_instead_of_overflowing() {
        let face = BuiltinFace::new(4_000_000_000);
        assert!(face.measure("ab") > face.measure("a"));
        assert!(face.measure("ab").is_finite());
        let mut canvas = RgbImage::from_pixel(20, 20, PAPER);
        face.draw(&mut canvas, 0, 0, INK, "ab가");
    }

    #[test]
    fn lowercase_uses_uppercase_bitmap() {
        let face = BuiltinFace::new(8);
        let mut upper = RgbImage::from_pixel(10, 10, PAPER);
        let mut lower = RgbImage::from_pixel(10, 10, PAPER);
        face.draw(&mut upper, 0, 0, INK, "Q");
        face.draw(&mut lower, 0, 0, INK, "q");
        assert_eq!(upper, lower);
    }
}
