//! Text rasterization
//!
//! Glyphs are rasterized with ab_glyph straight into the frame pixmap. When
//! no usable font can be found the renderer keeps going with plain block
//! glyphs, so a missing font degrades the wall instead of stopping it.

use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use tiny_skia::Pixmap;

use crate::domain::presentation::Rgb;

/// Fonts tried, in order, when no explicit path is configured
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// Block glyph width as a fraction of the font size
const BLOCK_ADVANCE: f32 = 0.6;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Draws text into a pixmap with a TrueType font or block glyphs
#[derive(Debug, Clone)]
pub struct TextRenderer {
    font: Option<FontArc>,
}

impl TextRenderer {
    /// Loads `font_path` if given, otherwise the first system font found
    ///
    /// Never fails: without a font a single warning is logged and text is
    /// drawn as blocks.
    pub fn load(font_path: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match font_path {
            Some(path) => vec![path.to_path_buf()],
            None => SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            match std::fs::read(path) {
                Ok(bytes) => match FontArc::try_from_vec(bytes) {
                    Ok(font) => {
                        tracing::debug!(path = %path.display(), "loaded font");
                        return Self { font: Some(font) };
                    }
                    Err(err) => {
                        tracing::debug!(path = %path.display(), error = %err, "font rejected");
                    }
                },
                Err(err) if font_path.is_some() => {
                    tracing::debug!(path = %path.display(), error = %err, "cannot read font");
                }
                Err(_) => {}
            }
        }

        tracing::warn!("no usable font found, falling back to block glyphs");
        Self::blocks()
    }

    /// Renderer that always draws block glyphs
    pub fn blocks() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Width of `text` at `size` pixels
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                text.chars()
                    .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
                    .sum()
            }
            None => text.chars().count() as f32 * size * BLOCK_ADVANCE,
        }
    }

    /// Draws one line of text with its top edge at `y`
    ///
    /// `x` is interpreted according to `align`; `alpha` is in `[0, 1]`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        y: f32,
        size: f32,
        color: Rgb,
        alpha: f32,
        align: Align,
    ) {
        if text.is_empty() || size <= 0.0 || alpha <= 0.0 {
            return;
        }

        let x = match align {
            Align::Left => x,
            Align::Center => x - self.measure(text, size) / 2.0,
            Align::Right => x - self.measure(text, size),
        };

        match &self.font {
            Some(font) => draw_glyphs(font, pixmap, text, x, y, size, color, alpha),
            None => draw_blocks(pixmap, text, x, y, size, color, alpha),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyphs(
    font: &FontArc,
    pixmap: &mut Pixmap,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: Rgb,
    alpha: f32,
) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let mut caret = point(x, y + scaled.ascent());

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(scale, caret);
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                blend_pixel(pixmap, px, py, color, coverage * alpha);
            });
        }
        caret.x += scaled.h_advance(glyph_id);
    }
}

fn draw_blocks(pixmap: &mut Pixmap, text: &str, x: f32, y: f32, size: f32, color: Rgb, alpha: f32) {
    let advance = size * BLOCK_ADVANCE;
    let block_w = (advance * 0.7).max(1.0);
    let block_h = (size * 0.7).max(1.0);
    let top = y + size * 0.15;

    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let left = x + i as f32 * advance;
        for py in top as i32..(top + block_h) as i32 {
            for px in left as i32..(left + block_w) as i32 {
                blend_pixel(pixmap, px, py, color, alpha);
            }
        }
    }
}

/// Source-over blend of one pixel into a premultiplied RGBA pixmap
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Rgb, alpha: f32) {
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    if a == 0.0 {
        return;
    }
    let inv = 1.0 - a;
    let idx = (y as usize * width as usize + x as usize) * 4;
    let data = pixmap.data_mut();
    let mix = |src: u8, dst: u8| {
        (src as f32 * a + dst as f32 * inv).round().clamp(0.0, 255.0) as u8
    };
    data[idx] = mix(color.r, data[idx]);
    data[idx + 1] = mix(color.g, data[idx + 1]);
    data[idx + 2] = mix(color.b, data[idx + 2]);
    data[idx + 3] = mix(255, data[idx + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(pixmap: &Pixmap) -> usize {
        pixmap.data().chunks(4).filter(|px| px[0] > 0).count()
    }

    #[test]
    fn block_measure_is_proportional() {
        let text = TextRenderer::blocks();
        assert!(!text.has_font());
        assert_eq!(text.measure("", 20.0), 0.0);
        assert!((text.measure("abcd", 10.0) - 24.0).abs() < 1e-4);
    }

    #[test]
    fn blocks_draw_inside_bounds() {
        let text = TextRenderer::blocks();
        let mut pixmap = Pixmap::new(40, 20).unwrap();
        text.draw(&mut pixmap, "hi there", 30.0, 2.0, 16.0, Rgb::new(255, 0, 0), 1.0, Align::Left);
        assert!(lit_pixels(&pixmap) > 0);
    }

    #[test]
    fn zero_alpha_draws_nothing() {
        let text = TextRenderer::blocks();
        let mut pixmap = Pixmap::new(40, 20).unwrap();
        text.draw(&mut pixmap, "hi", 0.0, 0.0, 16.0, Rgb::new(255, 255, 255), 0.0, Align::Left);
        assert_eq!(lit_pixels(&pixmap), 0);
    }

    #[test]
    fn missing_font_falls_back_to_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let text = TextRenderer::load(Some(&dir.path().join("missing.ttf")));
        assert!(!text.has_font());
    }

    #[test]
    fn garbage_font_file_falls_back_to_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        assert!(!TextRenderer::load(Some(&path)).has_font());
    }
}
