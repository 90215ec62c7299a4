//! World module - tile grid, tile atlas and the composed world raster.
//!
//! The world raster is built once per process from the literal map and the
//! tile atlas, then shared read-only (`Arc<WorldRaster>`) by every session.

use image::{imageops, RgbaImage};

use crate::assets::AssetError;
use crate::types::{Point, TileKind, SPRITE_PX, STEP_PX, TILE_PX};

/// The built-in world map: two-tile brick border around a grass/blank field.
pub const DEFAULT_MAP: [&str; 18] = [
    "BBBBBBBBBBBBBBBBBB",
    "BBBBBBBBBBBBBBBBBB",
    "BBGGG GGG GGG GGBB",
    "BBGG GGG GGG GGGBB",
    "BBG G G G G G G BB",
    "BB G G G G G G GBB",
    "BBGGG GGG GGG GGBB",
    "BBGG GGG GGG GGGBB",
    "BBG G G G G G G BB",
    "BB G G G G G G GBB",
    "BBGGG GGG GGG GGBB",
    "BBGG GGG GGG GGGBB",
    "BBG G G G G G G BB",
    "BB G G G G G G GBB",
    "BBGGG GGG GGG GGBB",
    "BBGG GGG GGG GGGBB",
    "BBBBBBBBBBBBBBBBBB",
    "BBBBBBBBBBBBBBBBBB",
];

/// Immutable 2D grid of tile symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Parse a literal map, one string per row, one byte per tile.
    ///
    /// Unrecognized symbols become [`TileKind::Blank`]. Rows must all have the
    /// same length.
    pub fn parse(rows: &[&str]) -> Result<Self, AssetError> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(AssetError::RaggedRow {
                    name: "world map".to_string(),
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            tiles.extend(row.bytes().map(TileKind::from_symbol));
        }
        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }

    /// Grid filled with a single tile kind.
    pub fn uniform(width: usize, height: usize, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<TileKind> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.tiles[y * self.width + x])
    }
}

/// Tile symbol -> 8x8 image cell.
#[derive(Debug, Clone)]
pub struct TileAtlas {
    pub brick: RgbaImage,
    pub grass: RgbaImage,
    pub blank: RgbaImage,
}

impl TileAtlas {
    pub fn cell(&self, kind: TileKind) -> &RgbaImage {
        match kind {
            TileKind::Brick => &self.brick,
            TileKind::Grass => &self.grass,
            TileKind::Blank => &self.blank,
        }
    }
}

/// The composed world: one atlas cell per grid entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldRaster {
    raster: RgbaImage,
}

impl WorldRaster {
    /// Rasterize `grid` with `atlas`; cell (i, j) lands at (i*8, j*8).
    pub fn build(atlas: &TileAtlas, grid: &TileGrid) -> Self {
        let mut raster = RgbaImage::new(
            (grid.width() as i32 * TILE_PX) as u32,
            (grid.height() as i32 * TILE_PX) as u32,
        );
        for j in 0..grid.height() {
            for i in 0..grid.width() {
                let kind = grid.get(i, j).unwrap_or(TileKind::Blank);
                let (x, y) = (i as i32 * TILE_PX, j as i32 * TILE_PX);
                imageops::replace(&mut raster, atlas.cell(kind), x.into(), y.into());
            }
        }
        Self { raster }
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn width(&self) -> i32 {
        self.raster.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.raster.height() as i32
    }

    /// Centre of the world minus half a sprite, snapped down to the step grid.
    pub fn spawn_point(&self) -> Point {
        let snap = |v: i32| (v / STEP_PX) * STEP_PX;
        Point::new(
            snap(self.width() / 2 - SPRITE_PX / 2),
            snap(self.height() / 2 - SPRITE_PX / 2),
        )
    }
}
