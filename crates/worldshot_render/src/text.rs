//! Text rasterization onto a canvas
//!
//! Glyph coverage from `fontdue` becomes the alpha of a solid color, so text
//! is composited with the same source-over rule as sprites.

use crate::surface::Canvas;
use fontdue::{Font, FontSettings};
use image::Rgba;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("Failed to parse font: {0}")]
    Font(&'static str),
    #[error("Failed to read font file: {0}")]
    Io(#[from] std::io::Error),
}

/// A loaded font that lays out single lines of text
pub struct TextRenderer {
    font: Font,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer").finish_non_exhaustive()
    }
}

impl TextRenderer {
    pub fn from_bytes(data: &[u8]) -> Result<Self, TextError> {
        let font = Font::from_bytes(data, FontSettings::default()).map_err(TextError::Font)?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> Result<Self, TextError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Advance width of `text` at `px` pixels
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(c, px).advance_width)
            .sum()
    }

    /// Draw `text` starting at pen position `x` on the `baseline` row
    ///
    /// Returns the pen position after the last glyph.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: f32,
        baseline: f32,
        px: f32,
        color: [u8; 3],
    ) -> f32 {
        let mut pen = x;

        for c in text.chars() {
            let (metrics, coverage) = self.font.rasterize(c, px);
            let left = (pen + metrics.xmin as f32).round() as i64;
            let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i64;

            for (i, alpha) in coverage.iter().enumerate() {
                if *alpha == 0 {
                    continue;
                }
                let gx = (i % metrics.width) as i64;
                let gy = (i / metrics.width) as i64;
                canvas.blend_pixel(
                    left + gx,
                    top + gy,
                    Rgba([color[0], color[1], color[2], *alpha]),
                );
            }

            pen += metrics.advance_width;
        }

        pen
    }
}
