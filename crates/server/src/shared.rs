//! World state shared by every session.

use std::sync::Arc;

use crate::core::assets::{self, GameAssets};
use crate::core::world::DEFAULT_MAP;
use crate::core::{AssetError, Session, SpriteSet, TileGrid, WorldRaster};

/// The immutable world raster plus the player sprite set.
#[derive(Debug, Clone)]
pub struct SharedWorld {
    world: Arc<WorldRaster>,
    sprites: SpriteSet,
}

impl SharedWorld {
    /// Built-in assets over the default map.
    pub fn builtin() -> Result<Self, AssetError> {
        let assets = assets::load_builtin()?;
        Self::from_assets(&assets, &DEFAULT_MAP)
    }

    pub fn from_assets(assets: &GameAssets, map: &[&str]) -> Result<Self, AssetError> {
        let grid = TileGrid::parse(map)?;
        Ok(Self {
            world: Arc::new(WorldRaster::build(&assets.atlas, &grid)),
            sprites: SpriteSet::new(&assets.trainer),
        })
    }

    pub fn world(&self) -> &Arc<WorldRaster> {
        &self.world
    }

    /// Fresh player session at the spawn point.
    pub fn session(&self) -> Session {
        Session::new(Arc::clone(&self.world), self.sprites.clone())
    }
}
