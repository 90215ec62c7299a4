use tui_overworld::core::assets::load_builtin;
use tui_overworld::core::world::DEFAULT_MAP;
use image::imageops;
use tui_overworld::core::raster::rgb;
use tui_overworld::core::{RgbaImage, TileAtlas, TileGrid, WorldRaster};
use tui_overworld::server::SharedWorld;
use tui_overworld::types::{Point, TileKind, SPRITE_PX};

fn striped(seed: u8) -> RgbaImage {
    RgbaImage::from_fn(8, 8, |x, y| {
        let v = seed.wrapping_add((x * 8 + y) as u8);
        rgb(v, v / 2, 255 - v)
    })
}

fn atlas() -> TileAtlas {
    TileAtlas {
        brick: striped(0),
        grass: striped(100),
        blank: striped(200),
    }
}

#[test]
fn all_brick_grid_tiles_the_brick_cell() {
    let atlas = atlas();
    let grid = TileGrid::parse(&["BB", "BB"]).unwrap();
    let world = WorldRaster::build(&atlas, &grid);

    assert_eq!(world.width(), 16);
    assert_eq!(world.height(), 16);
    for y in 0..16 {
        for x in 0..16 {
            assert_eq!(
                world.raster().get_pixel(x, y),
                atlas.brick.get_pixel(x % 8, y % 8),
                "pixel ({x}, {y})"
            );
        }
    }
}

#[test]
fn unknown_symbols_render_as_blank() {
    let atlas = atlas();
    let grid = TileGrid::parse(&["G?"]).unwrap();
    assert_eq!(grid.get(1, 0), Some(TileKind::Blank));

    let world = WorldRaster::build(&atlas, &grid);
    assert_eq!(world.raster().get_pixel(3, 3), atlas.grass.get_pixel(3, 3));
    assert_eq!(world.raster().get_pixel(8 + 3, 3), atlas.blank.get_pixel(3, 3));
}

#[test]
fn default_world_spawns_on_step_grid() {
    let assets = load_builtin().unwrap();
    let grid = TileGrid::parse(&DEFAULT_MAP).unwrap();
    let world = WorldRaster::build(&assets.atlas, &grid);

    assert_eq!(world.width(), 144);
    assert_eq!(world.height(), 144);
    let spawn = world.spawn_point();
    assert_eq!(spawn, Point::new(64, 64));
    assert_eq!(spawn.x % 16, 0);
    assert_eq!(spawn.y % 16, 0);
}

#[test]
fn world_is_fully_opaque() {
    let assets = load_builtin().unwrap();
    let grid = TileGrid::parse(&DEFAULT_MAP).unwrap();
    let world = WorldRaster::build(&assets.atlas, &grid);
    assert!(world.raster().pixels().all(|p| p.0[3] == 255));
}

#[test]
fn viewport_is_the_world_window_under_the_sprite() {
    let shared = SharedWorld::builtin().unwrap();
    let session = shared.session();
    let frame = session.viewport();

    // Spawn (64, 64) puts the window origin at (32, 32), fully inside the world.
    let window = imageops::crop_imm(shared.world().raster(), 32, 32, 80, 80).to_image();
    let sprite_box = 32..32 + SPRITE_PX as u32;
    for (x, y, pixel) in frame.enumerate_pixels() {
        if sprite_box.contains(&x) && sprite_box.contains(&y) {
            continue;
        }
        assert_eq!(pixel, window.get_pixel(x, y), "pixel ({x}, {y})");
    }
}
