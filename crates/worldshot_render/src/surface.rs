//! Drawing surface
//!
//! Every draw call of a render goes through an explicit [`Canvas`] handle.
//! Drawing is source-over alpha blending; source rectangles are clipped to the
//! sprite sheet and destinations are clipped to the canvas.

use image::imageops::{self, FilterType};
use image::{GenericImageView, Rgba, RgbaImage};

/// Edge length of one grid tile in pixels
pub const TILE_SIZE: u32 = 32;
/// Output width (100 tiles)
pub const CANVAS_WIDTH: u32 = 3200;
/// Output height (60 tiles)
pub const CANVAS_HEIGHT: u32 = 1920;

/// A pixel rectangle within a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpriteRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square cell of `size` pixels at grid coordinate (`column`, `row`)
    pub fn cell(column: u32, row: u32, size: u32) -> Self {
        Self::new(column * size, row * size, size, size)
    }

    /// A 32x32 tile at tile coordinate (`column`, `row`)
    pub fn tile(column: u32, row: u32) -> Self {
        Self::cell(column, row, TILE_SIZE)
    }

    /// Intersect with the bounds of a sheet, `None` when nothing remains
    pub fn clip_to(&self, sheet: &RgbaImage) -> Option<Self> {
        let (sheet_w, sheet_h) = sheet.dimensions();
        if self.x >= sheet_w || self.y >= sheet_h {
            return None;
        }
        let width = self.width.min(sheet_w - self.x);
        let height = self.height.min(sheet_h - self.y);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::new(self.x, self.y, width, height))
    }
}

/// The output raster every render pass draws onto
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// The fixed-size world canvas
    pub fn world() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Composite an image with its top-left corner at (`x`, `y`)
    pub fn draw_image<I>(&mut self, source: &I, x: i64, y: i64)
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let (width, height) = source.dimensions();
        for sy in 0..height {
            for sx in 0..width {
                self.blend_pixel(x + i64::from(sx), y + i64::from(sy), source.get_pixel(sx, sy));
            }
        }
    }

    /// Composite a region of a sprite sheet at (`x`, `y`) without scaling
    pub fn draw_region(&mut self, sheet: &RgbaImage, rect: SpriteRect, x: i64, y: i64) {
        let Some(rect) = rect.clip_to(sheet) else {
            return;
        };
        for sy in 0..rect.height {
            for sx in 0..rect.width {
                let pixel = *sheet.get_pixel(rect.x + sx, rect.y + sy);
                self.blend_pixel(x + i64::from(sx), y + i64::from(sy), pixel);
            }
        }
    }

    /// Composite an image stretched over the whole canvas
    pub fn draw_stretched(&mut self, source: &RgbaImage) {
        let (width, height) = self.image.dimensions();
        if source.dimensions() == (width, height) {
            self.draw_image(source, 0, 0);
        } else {
            let scaled = imageops::resize(source, width, height, FilterType::Triangle);
            self.draw_image(&scaled, 0, 0);
        }
    }

    /// Blend one pixel, ignoring coordinates off the canvas
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if color[3] == 0
            || x < 0
            || y < 0
            || x >= i64::from(self.width())
            || y >= i64::from(self.height())
        {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        *dst = source_over(color, *dst);
    }
}

/// Straight-alpha source-over compositing
pub fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let src_a = f32::from(src[3]) / 255.0;
    if src_a <= 0.0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let out = (f32::from(s) * src_a + f32::from(d) * dst_a * (1.0 - src_a)) / out_a;
        out.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
