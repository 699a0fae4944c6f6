//! Layered world compositor
//!
//! A render walks the grid in a fixed order:
//!
//! 1. weather backdrop, stretched over the canvas
//! 2. background layer
//! 3. shadow layer (foreground silhouettes, then dropped object silhouettes)
//! 4. foreground layer; each cell draws its sprite, then the object dropped on
//!    it, then its liquid and fire overlays
//! 5. decorative border
//! 6. caption
//!
//! A sprite or catalog entry that cannot be found is logged and that single
//! draw is skipped. Nothing short of a broken world aborts a render.

use crate::atlas::{AtlasError, SpriteAtlas, FIRE, PICKUP_BOX, SEED, WATER};
use crate::blend::{Scratch, Tint, OVERLAY_ALPHA};
use crate::clock::Clock;
use crate::surface::{Canvas, SpriteRect, TILE_SIZE};
use crate::text::TextRenderer;
use image::RgbaImage;
use std::fmt::Display;
use tracing::{debug, warn};
use worldshot_autotile::{get_flag_offset, get_offset};
use worldshot_core::{flags, DroppedObject, Item, ItemCatalog, Layer, World, WORLD_WIDTH};

/// Item drawn with the animated rainbow tint
pub const RAINBOW_ITEM: u32 = 2590;
/// Currency item whose sprite column follows the stack size
pub const GEMS_ITEM: u32 = 112;

/// Dropped items are drawn shrunk to this size
const DROP_SIZE: u32 = 19;
const PICKUP_BOX_SIZE: u32 = 20;
const SEED_SIZE: u32 = 16;
/// Shadows are cast down and to the left
const SHADOW_OFFSET: (i64, i64) = (-4, 4);

const COUNT_PX: f32 = 10.0;
/// Count text is right-aligned to this offset from the object origin
const COUNT_ANCHOR: f32 = 18.0;

const CAPTION_PX: f32 = 55.0;
const CAPTION_BASELINE: f32 = 1826.0;
const CAPTION_RIGHT: f32 = 2929.0;

const PINK: [u8; 3] = [255, 144, 243];
const WHITE: [u8; 3] = [255, 255, 255];

/// Per-deployment render options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Server name shown in the caption
    pub server_name: String,
    /// Atlas name of the decorative border
    pub border: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            server_name: "Server".to_string(),
            border: "valentines".to_string(),
        }
    }
}

/// Sprite column of a dropped stack
///
/// Only gems pick a column by stack size; everything else uses column 0.
pub fn stack_column(item_id: u32, count: u32) -> u32 {
    if item_id != GEMS_ITEM {
        return 0;
    }
    match count {
        5 => 1,
        10 => 2,
        50 => 3,
        100 => 4,
        _ => 0,
    }
}

/// Pixel origin of a grid cell
pub fn cell_origin(index: usize) -> (i64, i64) {
    let column = (index % WORLD_WIDTH) as i64;
    let row = (index / WORLD_WIDTH) as i64;
    let size = i64::from(TILE_SIZE);
    (column * size, row * size)
}

/// Renders worlds against a shared catalog and atlas
pub struct Compositor<'a> {
    catalog: &'a ItemCatalog,
    atlas: &'a SpriteAtlas,
    clock: &'a dyn Clock,
    font: Option<&'a TextRenderer>,
    settings: RenderSettings,
}

impl<'a> Compositor<'a> {
    pub fn new(catalog: &'a ItemCatalog, atlas: &'a SpriteAtlas, clock: &'a dyn Clock) -> Self {
        Self {
            catalog,
            atlas,
            clock,
            font: None,
            settings: RenderSettings::default(),
        }
    }

    pub fn with_font(mut self, font: Option<&'a TextRenderer>) -> Self {
        self.font = font;
        self
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Render a world onto a fresh canvas
    pub fn render(&self, world: &World) -> RgbaImage {
        let mut canvas = Canvas::world();
        self.render_onto(&mut canvas, world);
        canvas.into_image()
    }

    /// Render a world onto an existing canvas
    pub fn render_onto(&self, canvas: &mut Canvas, world: &World) {
        let mut scratch = Scratch::new();

        if self.font.is_none() {
            warn!("No font loaded, text is skipped for '{}'", world.name);
        }

        self.draw_backdrop(canvas, world);
        self.draw_background(canvas, world);
        self.draw_shadows(canvas, world, &mut scratch);
        self.draw_foreground(canvas, world, &mut scratch);
        self.draw_border(canvas);
        self.draw_caption(canvas, world);

        debug!("Composited world '{}'", world.name);
    }

    fn sheet(&self, name: &str, what: impl Display) -> Option<&'a RgbaImage> {
        match self.atlas.sprite(name) {
            Ok(sheet) => Some(sheet),
            Err(AtlasError::MissingSprite(name)) => {
                warn!("Texture not found: '{}' (drawing {})", name, what);
                None
            }
            Err(e) => {
                warn!("Texture lookup failed: {} (drawing {})", e, what);
                None
            }
        }
    }

    fn item(&self, id: u32) -> Option<&'a Item> {
        match self.catalog.get_item(id) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Missing catalog item: {}", e);
                None
            }
        }
    }

    /// Placed item and its sheet, `None` for empty cells
    fn placed(&self, id: u32) -> Option<(&'a Item, &'a RgbaImage)> {
        if id == 0 {
            return None;
        }
        let item = self.item(id)?;
        let sheet = self.sheet(&item.texture_sheet, format_args!("item {}", item.id))?;
        Some((item, sheet))
    }

    fn draw_backdrop(&self, canvas: &mut Canvas, world: &World) {
        let name = world.weather.to_string();
        if let Some(backdrop) = self.sheet(&name, "weather backdrop") {
            canvas.draw_stretched(backdrop);
        }
    }

    fn draw_background(&self, canvas: &mut Canvas, world: &World) {
        for (index, block) in world.blocks.iter().enumerate() {
            let Some((item, sheet)) = self.placed(block.background) else {
                continue;
            };
            let (offset_x, offset_y) = get_offset(
                world,
                self.catalog,
                item.id,
                index,
                item.spread(),
                Layer::Background,
            );
            let (x, y) = cell_origin(index);
            canvas.draw_region(
                sheet,
                SpriteRect::tile(item.texture_x + offset_x, item.texture_y + offset_y),
                x,
                y,
            );
        }
    }

    fn draw_shadows(&self, canvas: &mut Canvas, world: &World, scratch: &mut Scratch) {
        let (shift_x, shift_y) = SHADOW_OFFSET;

        for (index, block) in world.blocks.iter().enumerate() {
            if let Some((item, sheet)) = self.placed(block.foreground) {
                let (x, y) = cell_origin(index);
                scratch
                    .load(
                        sheet,
                        SpriteRect::tile(item.texture_x, item.texture_y),
                        TILE_SIZE,
                        TILE_SIZE,
                        block.is_mirrored(),
                    )
                    .silhouette()
                    .draw(canvas, x + shift_x, y + shift_y);
            }

            if let Some(object) = world.object(index) {
                self.draw_object_shadow(canvas, object, scratch);
            }
        }
    }

    fn draw_object_shadow(
        &self,
        canvas: &mut Canvas,
        object: &DroppedObject,
        scratch: &mut Scratch,
    ) {
        let Some(item) = self.item(object.item_id) else {
            return;
        };
        let (shift_x, shift_y) = SHADOW_OFFSET;
        let x = object.x.round() as i64 + shift_x;
        let y = object.y.round() as i64 + shift_y;

        if object.is_seed() {
            if let Some(seeds) = self.sheet(SEED, format_args!("seed shadow {}", item.id)) {
                scratch
                    .load(seeds, seed_rect(item.seed_base, 0), SEED_SIZE, SEED_SIZE, false)
                    .silhouette()
                    .draw(canvas, x, y);
            }
            return;
        }

        let sheet = self.sheet(&item.texture_sheet, format_args!("drop shadow {}", item.id));
        if let Some(sheet) = sheet {
            let (texture_x, texture_y) = item.default_texture();
            let column = stack_column(item.id, object.count);
            scratch
                .load(
                    sheet,
                    SpriteRect::tile(texture_x + column, texture_y),
                    DROP_SIZE,
                    DROP_SIZE,
                    false,
                )
                .silhouette()
                .draw(canvas, x, y);
        }

        if item.id != GEMS_ITEM {
            if let Some(pickup_box) = self.sheet(PICKUP_BOX, "pickup box shadow") {
                let size = PICKUP_BOX_SIZE;
                scratch
                    .load(pickup_box, pickup_box_rect(), size, size, false)
                    .silhouette()
                    .draw(canvas, x, y);
            }
        }
    }

    fn draw_foreground(&self, canvas: &mut Canvas, world: &World, scratch: &mut Scratch) {
        for (index, block) in world.blocks.iter().enumerate() {
            let (x, y) = cell_origin(index);

            if let Some((item, sheet)) = self.placed(block.foreground) {
                let (offset_x, offset_y) = get_offset(
                    world,
                    self.catalog,
                    item.id,
                    index,
                    item.spread(),
                    Layer::Foreground,
                );
                let rect = SpriteRect::tile(item.texture_x + offset_x, item.texture_y + offset_y);

                if item.id == RAINBOW_ITEM {
                    let tint = Tint::rainbow(self.clock.now_millis(), x, y);
                    scratch
                        .load(sheet, rect, TILE_SIZE, TILE_SIZE, false)
                        .tint(tint)
                        .draw(canvas, x, y);
                } else if block.flags != 0 {
                    scratch
                        .load(sheet, rect, TILE_SIZE, TILE_SIZE, block.is_mirrored())
                        .tint(Tint::from_flags(block.flags))
                        .draw(canvas, x, y);
                } else {
                    canvas.draw_region(sheet, rect, x, y);
                }
            }

            if let Some(object) = world.object(index) {
                self.draw_object(canvas, object, scratch);
            }

            for (flag, sheet_name) in [(flags::WATER, WATER), (flags::FIRE, FIRE)] {
                if block.has_flag(flag) {
                    self.draw_overlay(canvas, world, index, flag, sheet_name, scratch);
                }
            }
        }
    }

    fn draw_object(&self, canvas: &mut Canvas, object: &DroppedObject, scratch: &mut Scratch) {
        let Some(item) = self.item(object.item_id) else {
            return;
        };
        let x = object.x.round() as i64;
        let y = object.y.round() as i64;

        if object.is_seed() {
            let Some(seeds) = self.sheet(SEED, format_args!("seed {}", item.id)) else {
                return;
            };
            scratch
                .load(seeds, seed_rect(item.seed_base, 0), SEED_SIZE, SEED_SIZE, false)
                .tint(Tint::from_packed(item.seed_color))
                .draw(canvas, x, y);
            scratch
                .load(seeds, seed_rect(item.seed_overlay, 1), SEED_SIZE, SEED_SIZE, false)
                .tint(Tint::from_packed(item.seed_overlay_color))
                .draw(canvas, x, y);
            return;
        }

        if let Some(sheet) = self.sheet(&item.texture_sheet, format_args!("drop {}", item.id)) {
            let (texture_x, texture_y) = item.default_texture();
            let column = stack_column(item.id, object.count);
            scratch
                .load(
                    sheet,
                    SpriteRect::tile(texture_x + column, texture_y),
                    DROP_SIZE,
                    DROP_SIZE,
                    false,
                )
                .draw(canvas, x, y);
        }

        if object.count > 1 && item.id != GEMS_ITEM {
            if let Some(pickup_box) = self.sheet(PICKUP_BOX, "pickup box") {
                canvas.draw_region(pickup_box, pickup_box_rect(), x, y);
            }
            if let Some(font) = self.font {
                let count = object.count.to_string();
                let width = font.measure(&count, COUNT_PX);
                font.draw(
                    canvas,
                    &count,
                    x as f32 + COUNT_ANCHOR - width,
                    y as f32 + COUNT_ANCHOR,
                    COUNT_PX,
                    WHITE,
                );
            }
        }
    }

    fn draw_overlay(
        &self,
        canvas: &mut Canvas,
        world: &World,
        index: usize,
        flag: u32,
        sheet_name: &str,
        scratch: &mut Scratch,
    ) {
        let Some(sheet) = self.sheet(sheet_name, format_args!("overlay at {}", index)) else {
            return;
        };
        let (offset_x, offset_y) = get_flag_offset(world, index, flag);
        let (x, y) = cell_origin(index);
        let rect = SpriteRect::tile(offset_x, offset_y);
        scratch
            .load(sheet, rect, TILE_SIZE, TILE_SIZE, false)
            .flatten_alpha(OVERLAY_ALPHA)
            .draw(canvas, x, y);
    }

    fn draw_border(&self, canvas: &mut Canvas) {
        if let Some(border) = self.sheet(&self.settings.border, "border") {
            canvas.draw_stretched(border);
        }
    }

    fn draw_caption(&self, canvas: &mut Canvas, world: &World) {
        let Some(font) = self.font else {
            return;
        };
        let world_name = format!("\"{}\" ", world.name);
        let runs: [(&str, [u8; 3]); 4] = [
            ("Visit ", PINK),
            (&world_name, WHITE),
            ("in ", PINK),
            (&self.settings.server_name, WHITE),
        ];

        let total: f32 = runs
            .iter()
            .map(|(text, _)| font.measure(text, CAPTION_PX))
            .sum();
        let mut x = CAPTION_RIGHT - total;
        for (text, color) in runs {
            x = font.draw(canvas, text, x, CAPTION_BASELINE, CAPTION_PX, color);
        }
    }
}

fn pickup_box_rect() -> SpriteRect {
    SpriteRect::new(0, 0, PICKUP_BOX_SIZE, PICKUP_BOX_SIZE)
}

/// Seed sprites are 16x16; row 0 holds bases, row 1 overlays
fn seed_rect(column: u32, row: u32) -> SpriteRect {
    SpriteRect::cell(column, row, SEED_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use image::Rgba;
    use worldshot_core::Block;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn atlas() -> SpriteAtlas {
        let mut atlas = SpriteAtlas::new();
        atlas.insert("blocks", RgbaImage::from_pixel(256, 64, RED));
        atlas
    }

    fn catalog() -> ItemCatalog {
        ItemCatalog::new(vec![
            Item::new(0, "blank", 0, 0),
            Item::new(2, "blocks", 0, 0),
            Item::new(4, "missing_sheet", 0, 0),
        ])
    }

    fn small_canvas() -> Canvas {
        Canvas::new(320, 192)
    }

    #[test]
    fn test_stack_column() {
        assert_eq!(stack_column(GEMS_ITEM, 1), 0);
        assert_eq!(stack_column(GEMS_ITEM, 5), 1);
        assert_eq!(stack_column(GEMS_ITEM, 10), 2);
        assert_eq!(stack_column(GEMS_ITEM, 50), 3);
        assert_eq!(stack_column(GEMS_ITEM, 100), 4);
        assert_eq!(stack_column(GEMS_ITEM, 7), 0);
        assert_eq!(stack_column(2, 10), 0);
    }

    #[test]
    fn test_cell_origin() {
        assert_eq!(cell_origin(0), (0, 0));
        assert_eq!(cell_origin(101), (32, 32));
        assert_eq!(cell_origin(5999), (3168, 1888));
    }

    #[test]
    fn test_foreground_and_shadow_placement() {
        let (catalog, atlas, clock) = (catalog(), atlas(), FixedClock(0.0));
        let compositor = Compositor::new(&catalog, &atlas, &clock);
        let mut world = World::new("SHADOW");
        world.blocks[102] = Block::new(2, 0);

        let mut canvas = small_canvas();
        compositor.render_onto(&mut canvas, &world);

        // Cell 102 covers (64..96, 32..64)
        assert_eq!(canvas.image().get_pixel(64, 32), &RED);
        // Shadow pokes out below-left of the sprite
        let shadow = canvas.image().get_pixel(60, 64 + 2);
        assert_eq!(*shadow, Rgba([0, 0, 0, 143]));
        assert_eq!(canvas.image().get_pixel(100, 32), &CLEAR);
    }

    #[test]
    fn test_missing_sprite_is_skipped() {
        let (catalog, atlas, clock) = (catalog(), atlas(), FixedClock(0.0));
        let compositor = Compositor::new(&catalog, &atlas, &clock);
        let mut world = World::new("MISSING");
        world.blocks[0] = Block::new(4, 4);
        world.blocks[1] = Block::new(2, 0);
        world.blocks[2] = Block::new(999, 0);

        let mut canvas = small_canvas();
        compositor.render_onto(&mut canvas, &world);

        assert_eq!(canvas.image().get_pixel(10, 10), &CLEAR);
        assert_eq!(canvas.image().get_pixel(40, 10), &RED);
    }

    #[test]
    fn test_flag_tint_and_mirror() {
        let mut atlas = SpriteAtlas::new();
        let mut sheet = RgbaImage::from_pixel(32, 32, Rgba([200, 200, 200, 255]));
        for y in 0..32 {
            sheet.put_pixel(0, y, Rgba([100, 100, 100, 255]));
        }
        atlas.insert("blocks", sheet);
        let (catalog, clock) = (catalog(), FixedClock(0.0));
        let compositor = Compositor::new(&catalog, &atlas, &clock);

        let mut world = World::new("TINT");
        world.blocks[0] = Block::new(2, 0).with_flags(flags::MIRRORED | flags::TINT_GREEN);

        let mut canvas = small_canvas();
        compositor.render_onto(&mut canvas, &world);

        assert_eq!(canvas.image().get_pixel(31, 0), &Rgba([0, 100, 0, 255]));
        assert_eq!(canvas.image().get_pixel(0, 0), &Rgba([0, 200, 0, 255]));
    }

    #[test]
    fn test_rainbow_follows_clock() {
        let mut atlas = atlas();
        atlas.insert("rainbow", RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255])));
        let catalog = ItemCatalog::new(vec![
            Item::new(0, "blank", 0, 0),
            Item::new(RAINBOW_ITEM, "rainbow", 0, 0),
        ]);
        let mut world = World::new("RAINBOW");
        world.blocks[0] = Block::new(RAINBOW_ITEM, 0);

        let render = |now: f64| {
            let clock = FixedClock(now);
            let mut canvas = small_canvas();
            Compositor::new(&catalog, &atlas, &clock).render_onto(&mut canvas, &world);
            *canvas.image().get_pixel(0, 0)
        };

        // t = 0: sin(0), sin(2), sin(4)
        let expected = Tint::rainbow(0.0, 0, 0);
        let pixel = render(0.0);
        assert_eq!(pixel[0], expected.red.round() as u8);
        assert_eq!(pixel[1], expected.green.round() as u8);
        assert_eq!(pixel[2], expected.blue.round() as u8);
        assert_eq!(pixel, render(0.0));
        assert_ne!(pixel, render(2000.0));
    }

    #[test]
    fn test_backdrop_and_border_keys() {
        let mut atlas = SpriteAtlas::new();
        atlas.insert("3", RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255])));
        atlas.insert("hearts", RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 0])));
        let (catalog, clock) = (catalog(), FixedClock(0.0));
        let compositor = Compositor::new(&catalog, &atlas, &clock).with_settings(RenderSettings {
            server_name: "Test".to_string(),
            border: "hearts".to_string(),
        });

        let mut world = World::new("SKY");
        world.weather = 3;

        let mut canvas = small_canvas();
        compositor.render_onto(&mut canvas, &world);
        assert_eq!(canvas.image().get_pixel(319, 191), &Rgba([0, 0, 255, 255]));
    }
}
