use image::{Rgba, RgbaImage};
use worldshot_core::{flags, Block, DroppedObject, Item, ItemCatalog, World};
use worldshot_render::{Compositor, FixedClock, SpriteAtlas, TILE_SIZE};

/// A sheet where every 32x32 tile has a color encoding its tile coordinate
fn coordinate_sheet(columns: u32, rows: u32) -> RgbaImage {
    RgbaImage::from_fn(columns * TILE_SIZE, rows * TILE_SIZE, |x, y| {
        tile_color(x / TILE_SIZE, y / TILE_SIZE)
    })
}

fn tile_color(column: u32, row: u32) -> Rgba<u8> {
    Rgba([(column * 30) as u8, (row * 40) as u8, 7, 255])
}

fn render(world: &World, catalog: &ItemCatalog, atlas: &SpriteAtlas) -> RgbaImage {
    let clock = FixedClock(0.0);
    Compositor::new(catalog, atlas, &clock).render(world)
}

#[test]
fn test_horizontal_pair_selects_pair_tiles() {
    let catalog = ItemCatalog::new(vec![
        Item::new(0, "blank", 0, 0),
        Item::new(5, "tiles", 0, 0).with_spread_type(2),
    ]);
    let mut atlas = SpriteAtlas::new();
    atlas.insert("tiles", coordinate_sheet(8, 6));

    let mut world = World::new("PAIR");
    world.blocks[10] = Block::new(5, 0);
    world.blocks[11] = Block::new(5, 0);

    let image = render(&world, &catalog, &atlas);

    // East neighbor only -> tile 29 at (5, 3); west neighbor only -> tile 30 at (6, 3)
    assert_eq!(*image.get_pixel(10 * 32 + 16, 16), tile_color(5, 3));
    assert_eq!(*image.get_pixel(11 * 32 + 16, 16), tile_color(6, 3));
    // Neighbors stay empty
    assert_eq!(*image.get_pixel(12 * 32 + 16, 16), Rgba([0, 0, 0, 0]));
}

#[test]
fn test_liquid_overlay_has_flat_alpha() {
    let catalog = ItemCatalog::new(vec![Item::new(0, "blank", 0, 0)]);
    let water = RgbaImage::from_fn(256, 192, |x, y| {
        if (x + y) % 3 == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([40, 90, 220, 255])
        }
    });
    let mut atlas = SpriteAtlas::new();
    atlas.insert("water", water.clone());

    let index = 10 * 100 + 50;
    let mut world = World::new("POOL");
    world.blocks[index] = Block::EMPTY.with_flags(flags::WATER);

    let image = render(&world, &catalog, &atlas);

    // Isolated cell -> table entry 12 -> tile (4, 1)
    let (origin_x, origin_y) = (50 * 32, 10 * 32);
    for dy in 0..32 {
        for dx in 0..32 {
            let source = water.get_pixel(4 * 32 + dx, 32 + dy);
            let drawn = image.get_pixel(origin_x + dx, origin_y + dy);
            if source[3] == 0 {
                assert_eq!(drawn[3], 0, "({dx}, {dy})");
            } else {
                assert_eq!(*drawn, Rgba([40, 90, 220, 145]), "({dx}, {dy})");
            }
        }
    }
}

#[test]
fn test_fire_overlay_joins_neighbors() {
    let catalog = ItemCatalog::new(vec![Item::new(0, "blank", 0, 0)]);
    let mut atlas = SpriteAtlas::new();
    atlas.insert("fire", coordinate_sheet(8, 6));

    let mut world = World::new("BLAZE");
    world.blocks[10] = Block::EMPTY.with_flags(flags::FIRE);
    world.blocks[11] = Block::EMPTY.with_flags(flags::FIRE);

    let image = render(&world, &catalog, &atlas);

    let expected = |column, row| {
        let mut color = tile_color(column, row);
        color[3] = 145;
        color
    };
    assert_eq!(*image.get_pixel(10 * 32 + 16, 16), expected(5, 3));
    assert_eq!(*image.get_pixel(11 * 32 + 16, 16), expected(6, 3));
}

#[test]
fn test_gem_stack_selects_column() {
    let catalog = ItemCatalog::new(vec![
        Item::new(0, "blank", 0, 0),
        Item::new(112, "gems", 0, 0),
    ]);
    let mut atlas = SpriteAtlas::new();
    atlas.insert("gems", coordinate_sheet(6, 1));

    let mut world = World::new("RICH");
    world.set_object(
        7,
        DroppedObject {
            uid: 1,
            item_id: 112,
            count: 10,
            x: 320.0,
            y: 640.0,
        },
    );

    let image = render(&world, &catalog, &atlas);

    assert_eq!(*image.get_pixel(325, 645), tile_color(2, 0));
    assert_eq!(*image.get_pixel(338, 658), tile_color(2, 0));
    // Drawn at 19x19, the shadow shows below-left of it
    assert_eq!(*image.get_pixel(317, 660), Rgba([0, 0, 0, 143]));
    assert_eq!(*image.get_pixel(339, 645), Rgba([0, 0, 0, 0]));
}

#[test]
fn test_stacked_drop_gets_pickup_box() {
    let catalog = ItemCatalog::new(vec![
        Item::new(0, "blank", 0, 0),
        Item::new(2, "tiles", 0, 0).with_spread_type(2),
    ]);
    let mut atlas = SpriteAtlas::new();
    atlas.insert("tiles", coordinate_sheet(8, 6));
    let mut pickup_box = RgbaImage::new(32, 32);
    pickup_box.put_pixel(19, 19, Rgba([255, 144, 243, 255]));
    atlas.insert("pickup_box", pickup_box);

    let mut world = World::new("STACK");
    world.set_object(
        3,
        DroppedObject {
            uid: 9,
            item_id: 2,
            count: 4,
            x: 100.4,
            y: 200.0,
        },
    );

    let image = render(&world, &catalog, &atlas);

    // Pickup form of a blob item sits at base + (4, 1)
    assert_eq!(*image.get_pixel(105, 205), tile_color(4, 1));
    assert_eq!(*image.get_pixel(119, 219), Rgba([255, 144, 243, 255]));
}

#[test]
fn test_seed_drop_is_tinted() {
    let catalog = ItemCatalog::new(vec![
        Item::new(0, "blank", 0, 0),
        Item::new(3, "tiles", 0, 0).with_seed(1, 0x00FF_0000, 2, 0),
    ]);
    let mut seeds = RgbaImage::new(64, 32);
    for y in 0..16 {
        for x in 16..32 {
            seeds.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    let mut atlas = SpriteAtlas::new();
    atlas.insert("seed", seeds);

    let mut world = World::new("GARDEN");
    world.set_object(
        0,
        DroppedObject {
            uid: 2,
            item_id: 3,
            count: 1,
            x: 64.0,
            y: 64.0,
        },
    );

    let image = render(&world, &catalog, &atlas);

    // Base color 0x00FF0000 unpacks to pure green; the overlay cell is empty
    assert_eq!(*image.get_pixel(70, 70), Rgba([0, 255, 0, 255]));
    assert_eq!(*image.get_pixel(80, 70), Rgba([0, 0, 0, 0]));
}
