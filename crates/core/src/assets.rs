//! Built-in asset provider.
//!
//! Tiles and trainer cells are declared as palette-indexed pixel art and
//! decoded into [`RgbaImage`]s once at startup. A decode failure is fatal: the
//! caller aborts before any session is created.

use thiserror::Error;

use image::RgbaImage;

use crate::raster::{rgb, Rgba, PALETTE_BLACK, PALETTE_HIGHLIGHT, PALETTE_WHITE, TRANSPARENT};
use crate::types::{SPRITE_PX, TILE_PX};
use crate::world::TileAtlas;

/// Asset decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("{name}: row {row} has {found} pixels, expected {expected}")]
    RaggedRow {
        name: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{name}: unknown palette symbol {symbol:?} at ({col}, {row})")]
    UnknownSymbol {
        name: String,
        row: usize,
        col: usize,
        symbol: char,
    },
    #[error("{name}: cell is {found_w}x{found_h}, expected {expected}x{expected}")]
    WrongSize {
        name: String,
        expected: usize,
        found_w: usize,
        found_h: usize,
    },
}

/// Palette symbol -> color.
fn palette(symbol: char) -> Option<Rgba> {
    let c = match symbol {
        '.' => TRANSPARENT,
        'W' => PALETTE_WHITE,
        'K' => PALETTE_BLACK,
        'H' => PALETTE_HIGHLIGHT,
        'R' => rgb(0xc8, 0x30, 0x30),
        'S' => rgb(0xf8, 0xc8, 0x90),
        'G' => rgb(0x78, 0xc0, 0x58),
        'D' => rgb(0x40, 0x88, 0x30),
        'B' => rgb(0xb0, 0x50, 0x30),
        'M' => rgb(0xd8, 0xa8, 0x78),
        _ => return None,
    };
    Some(c)
}

/// Decode a square `size`x`size` pixel-art cell.
pub fn decode_cell(name: &str, rows: &[&str], size: usize) -> Result<RgbaImage, AssetError> {
    let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    let mut pixels: Vec<u8> = Vec::with_capacity(width * rows.len() * 4);
    for (row, line) in rows.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(AssetError::RaggedRow {
                name: name.to_string(),
                row,
                expected: width,
                found,
            });
        }
        for (col, symbol) in line.chars().enumerate() {
            let color = palette(symbol).ok_or_else(|| AssetError::UnknownSymbol {
                name: name.to_string(),
                row,
                col,
                symbol,
            })?;
            pixels.extend_from_slice(&color.0);
        }
    }
    if width != size || rows.len() != size {
        return Err(AssetError::WrongSize {
            name: name.to_string(),
            expected: size,
            found_w: width,
            found_h: rows.len(),
        });
    }
    // Length matches width * height by construction.
    RgbaImage::from_raw(width as u32, rows.len() as u32, pixels).ok_or(AssetError::WrongSize {
        name: name.to_string(),
        expected: size,
        found_w: width,
        found_h: rows.len(),
    })
}

/// Trainer sprite cells as supplied by the asset provider.
///
/// Mirrored poses (right facing, second walk pose) are derived later by
/// [`crate::animation::SpriteSet::new`].
#[derive(Debug, Clone)]
pub struct TrainerCells {
    pub front_idle: RgbaImage,
    pub front_walk: RgbaImage,
    pub back_idle: RgbaImage,
    pub back_walk: RgbaImage,
    pub side_idle: RgbaImage,
    pub side_walk: RgbaImage,
}

/// Everything a session needs from the asset provider.
#[derive(Debug, Clone)]
pub struct GameAssets {
    pub atlas: TileAtlas,
    pub trainer: TrainerCells,
}

/// Decode the built-in tiles and trainer cells.
pub fn load_builtin() -> Result<GameAssets, AssetError> {
    let tile = |name: &str, rows: &[&str]| decode_cell(name, rows, TILE_PX as usize);
    let cell = |name: &str, rows: &[&str]| decode_cell(name, rows, SPRITE_PX as usize);

    Ok(GameAssets {
        atlas: TileAtlas {
            brick: tile("brick", &BRICK)?,
            grass: tile("grass", &GRASS)?,
            blank: tile("blank", &BLANK)?,
        },
        trainer: TrainerCells {
            front_idle: cell("front_idle", &FRONT_IDLE)?,
            front_walk: cell("front_walk", &FRONT_WALK)?,
            back_idle: cell("back_idle", &BACK_IDLE)?,
            back_walk: cell("back_walk", &BACK_WALK)?,
            side_idle: cell("side_idle", &SIDE_IDLE)?,
            side_walk: cell("side_walk", &SIDE_WALK)?,
        },
    })
}

#[rustfmt::skip]
const BRICK: [&str; 8] = [
    "BBBMBBBB",
    "BBBMBBBB",
    "BBBMBBBB",
    "MMMMMMMM",
    "BBBBBBBM",
    "BBBBBBBM",
    "BBBBBBBM",
    "MMMMMMMM",
];

#[rustfmt::skip]
const GRASS: [&str; 8] = [
    "GGGGGGGG",
    "GDGGGGGG",
    "DGDGGGGG",
    "GGGGGGGG",
    "GGGGGDGG",
    "GGGGDGDG",
    "GGGGGGGG",
    "GGGGGGGG",
];

#[rustfmt::skip]
const BLANK: [&str; 8] = [
    "WWWWWWWW",
    "WWWWWWWW",
    "WWWWWWWW",
    "WWWWWWWW",
    "WWWWWWWW",
    "WWWWWWWW",
    "WWWWWWWW",
    "WWWWWWWW",
];

#[rustfmt::skip]
const FRONT_IDLE: [&str; 16] = [
    "....KKKKKKKK....",
    "...KRRRRRRRRK...",
    "..KRRRRRRRRRRK..",
    "..KKKKKKKKKKKK..",
    "..KSSSSSSSSSSK..",
    "..KSKSSSSSSKSK..",
    "..KSKSSSSSSKSK..",
    "...KSSSSSSSSK...",
    "....KKKKKKKK....",
    "...KHHHHHHHHK...",
    "..KSKHHHHHHKSK..",
    "..KSKHHHHHHKSK..",
    "...KKHHHHHHKK...",
    "....KHHKKHHK....",
    "....KKKK.KKK....",
    "................",
];

#[rustfmt::skip]
const FRONT_WALK: [&str; 16] = [
    "................",
    "....KKKKKKKK....",
    "...KRRRRRRRRK...",
    "..KRRRRRRRRRRK..",
    "..KKKKKKKKKKKK..",
    "..KSSSSSSSSSSK..",
    "..KSKSSSSSSKSK..",
    "..KSKSSSSSSKSK..",
    "...KSSSSSSSSK...",
    "....KKKKKKKK....",
    "..KSKHHHHHHK....",
    "..KSKHHHHHHKSK..",
    "...KKHHHHHHKSK..",
    "....KHHK.KHKK...",
    "....KKKK.KHK....",
    ".........KKK....",
];

#[rustfmt::skip]
const BACK_IDLE: [&str; 16] = [
    "....KKKKKKKK....",
    "...KRRRRRRRRK...",
    "..KRRRRRRRRRRK..",
    "..KRRRRRRRRRRK..",
    "..KKKKKKKKKKKK..",
    "..KKKKKKKKKKKK..",
    "..KSKKKKKKKKSK..",
    "...KKKKKKKKKK...",
    "....KKKKKKKK....",
    "...KHHHHHHHHK...",
    "..KSKHHHHHHKSK..",
    "..KSKHHHHHHKSK..",
    "...KKHHHHHHKK...",
    "....KHHKKHHK....",
    "....KKKK.KKK....",
    "................",
];

#[rustfmt::skip]
const BACK_WALK: [&str; 16] = [
    "................",
    "....KKKKKKKK....",
    "...KRRRRRRRRK...",
    "..KRRRRRRRRRRK..",
    "..KRRRRRRRRRRK..",
    "..KKKKKKKKKKKK..",
    "..KKKKKKKKKKKK..",
    "..KSKKKKKKKKSK..",
    "...KKKKKKKKKK...",
    "....KKKKKKKK....",
    "..KSKHHHHHHK....",
    "..KSKHHHHHHKSK..",
    "...KKHHHHHHKSK..",
    "....KHHK.KHKK...",
    "....KKKK.KHK....",
    ".........KKK....",
];

#[rustfmt::skip]
const SIDE_IDLE: [&str; 16] = [
    "....KKKKKKK.....",
    "...KRRRRRRRK....",
    "..KRRRRRRRRRK...",
    ".KKKKKKKKKKKK...",
    "..KSSSSSSKKK....",
    "..KSKSSSSKKK....",
    "..KSSSSSSSKK....",
    "...KSSSSSSK.....",
    "....KKKKKK......",
    "....KHHHHHK.....",
    "....KHSSHHK.....",
    "....KHSSHHK.....",
    "....KHHHHHK.....",
    ".....KHHHK......",
    ".....KKKKK......",
    "................",
];

#[rustfmt::skip]
const SIDE_WALK: [&str; 16] = [
    "................",
    "....KKKKKKK.....",
    "...KRRRRRRRK....",
    "..KRRRRRRRRRK...",
    ".KKKKKKKKKKKK...",
    "..KSSSSSSKKK....",
    "..KSKSSSSKKK....",
    "..KSSSSSSSKK....",
    "...KSSSSSSK.....",
    "....KKKKKK......",
    "...KHHHHHHK.....",
    "..KSHHSSHHK.....",
    "....KHSSHHK.....",
    "...KHHK.KHHK....",
    "...KKK...KKK....",
    "................",
];
