//! Color blending and the per-cell scratch buffer
//!
//! Tinting multiplies the RGB channels of every visible pixel by
//! `channel / 255` and never touches alpha.

use crate::surface::{Canvas, SpriteRect, TILE_SIZE};
use image::{Rgba, RgbaImage};
use worldshot_core::flags;

/// Alpha multiplier of drop shadows
pub const SHADOW_OPACITY: f32 = 0.56;
/// Flat alpha of liquid and fire overlays
pub const OVERLAY_ALPHA: u8 = 145;

/// Per-channel multiplier in the 0..=255 range
///
/// A negative channel means "leave this channel alone" and counts as 255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Tint {
    pub const WHITE: Self = Self::rgb(255.0, 255.0, 255.0);

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Tint selected by the channel bits of a block's flags
    ///
    /// With none of the three bits set the tint is white.
    pub fn from_flags(block_flags: u32) -> Self {
        let channel = |bit: u32| if block_flags & bit != 0 { 255.0 } else { 0.0 };
        let tint = Self::rgb(
            channel(flags::TINT_RED),
            channel(flags::TINT_GREEN),
            channel(flags::TINT_BLUE),
        );
        if tint.red + tint.green + tint.blue == 0.0 {
            Self::WHITE
        } else {
            tint
        }
    }

    /// Unpack a seed color: red in bits 8..16, green 16..24, blue 24..32
    pub fn from_packed(color: u32) -> Self {
        let channel = |shift: u32| f32::from(((color >> shift) & 0xFF) as u8);
        Self::rgb(channel(8), channel(16), channel(24))
    }

    /// Animated rainbow keyed on wall-clock time and pixel position
    pub fn rainbow(now_millis: f64, x: i64, y: i64) -> Self {
        let time = now_millis * 0.5 + x as f64 + y as f64;
        let channel = |phase: f64| ((time * 0.0012 + phase).sin() * 127.0 + 128.0) as f32;
        Self::rgb(channel(0.0), channel(2.0), channel(4.0))
    }

    pub fn is_white(&self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|c| *c < 0.0 || *c >= 255.0)
    }
}

fn factor(channel: f32) -> f32 {
    if channel < 0.0 {
        1.0
    } else {
        channel / 255.0
    }
}

/// Tint one pixel in place, skipping fully transparent pixels
pub fn tint_pixel(pixel: &mut Rgba<u8>, tint: Tint) {
    if pixel[3] == 0 {
        return;
    }
    for (value, channel) in pixel.0.iter_mut().zip([tint.red, tint.green, tint.blue]) {
        *value = (f32::from(*value) * factor(channel)).round().clamp(0.0, 255.0) as u8;
    }
}

/// Copy `src` of `sprite` into a new `dst_width` x `dst_height` image and tint it
pub fn blend_color(
    sprite: &RgbaImage,
    src: SpriteRect,
    dst_width: u32,
    dst_height: u32,
    tint: Tint,
) -> RgbaImage {
    let mut out = RgbaImage::new(dst_width, dst_height);
    sample_into(&mut out, sprite, src, dst_width, dst_height, false);
    for pixel in out.pixels_mut() {
        tint_pixel(pixel, tint);
    }
    out
}

/// Nearest-neighbor copy of `src` into the top-left `width` x `height` of `out`
fn sample_into(
    out: &mut RgbaImage,
    sheet: &RgbaImage,
    src: SpriteRect,
    width: u32,
    height: u32,
    mirror: bool,
) {
    if width == 0 || height == 0 {
        return;
    }
    let (sheet_w, sheet_h) = sheet.dimensions();
    for dy in 0..height {
        for dx in 0..width {
            let column = if mirror { width - 1 - dx } else { dx };
            let sx = src.x + column * src.width / width;
            let sy = src.y + dy * src.height / height;
            let pixel = if sx < sheet_w && sy < sheet_h {
                *sheet.get_pixel(sx, sy)
            } else {
                Rgba([0, 0, 0, 0])
            };
            out.put_pixel(dx, dy, pixel);
        }
    }
}

/// A single reusable tile-sized buffer for per-cell effects
///
/// Every operation works on the active `width` x `height` area set by the
/// last [`Scratch::load`].
#[derive(Debug, Clone)]
pub struct Scratch {
    buffer: RgbaImage,
    width: u32,
    height: u32,
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            buffer: RgbaImage::new(TILE_SIZE, TILE_SIZE),
            width: 0,
            height: 0,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Replace the contents with a (possibly scaled and mirrored) sprite region
    pub fn load(
        &mut self,
        sheet: &RgbaImage,
        src: SpriteRect,
        width: u32,
        height: u32,
        mirror: bool,
    ) -> &mut Self {
        self.width = width.min(TILE_SIZE);
        self.height = height.min(TILE_SIZE);
        for pixel in self.buffer.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        sample_into(
            &mut self.buffer,
            sheet,
            src,
            self.width,
            self.height,
            mirror,
        );
        self
    }

    fn active_pixels(&mut self) -> impl Iterator<Item = &mut Rgba<u8>> {
        let (width, height) = (self.width, self.height);
        self.buffer
            .enumerate_pixels_mut()
            .filter(move |(x, y, _)| *x < width && *y < height)
            .map(|(_, _, pixel)| pixel)
    }

    /// Black silhouette at [`SHADOW_OPACITY`]
    pub fn silhouette(&mut self) -> &mut Self {
        for pixel in self.active_pixels() {
            let alpha = (f32::from(pixel[3]) * SHADOW_OPACITY).round() as u8;
            *pixel = Rgba([0, 0, 0, alpha]);
        }
        self
    }

    pub fn tint(&mut self, tint: Tint) -> &mut Self {
        if tint.is_white() {
            return self;
        }
        for pixel in self.active_pixels() {
            tint_pixel(pixel, tint);
        }
        self
    }

    /// Set every visible pixel's alpha to `alpha`
    pub fn flatten_alpha(&mut self, alpha: u8) -> &mut Self {
        for pixel in self.active_pixels() {
            if pixel[3] > 0 {
                pixel[3] = alpha;
            }
        }
        self
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width && y < self.height).then(|| *self.buffer.get_pixel(x, y))
    }

    /// Composite the active area onto the canvas at (`x`, `y`)
    pub fn draw(&self, canvas: &mut Canvas, x: i64, y: i64) {
        canvas.draw_region(
            &self.buffer,
            SpriteRect::new(0, 0, self.width, self.height),
            x,
            y,
        );
    }
}
