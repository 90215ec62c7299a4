//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the world compositor, the sprite animation state
//! machine, the motion controller and the session reducer that ties them
//! together. It has **no dependencies** on terminals, networking, or I/O:
//!
//! - **Deterministic**: identical event sequences produce identical states and
//!   frames (correlation ids aside, which tests pin with `with_id`)
//! - **Testable**: every transition is a plain function call
//! - **Non-blocking**: timers are returned as data ([`Effect::Schedule`]),
//!   never slept on
//!
//! # Module Structure
//!
//! - [`raster`]: RGBA colors and palette over `image::RgbaImage` buffers
//! - [`world`]: tile grid, tile atlas and the shared world raster
//! - [`assets`]: built-in pixel-art tiles and trainer cells
//! - [`animation`]: facing / walk-frame / input-lock state machine
//! - [`motion`]: stride targets, bounds and 2px interpolation
//! - [`event`]: events, effects and correlation ids
//! - [`session`]: the per-player reducer and viewport compositor
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use tui_overworld_core::{assets, Effect, Event, Session, SpriteSet, TileGrid, WorldRaster};
//! use tui_overworld_core::world::DEFAULT_MAP;
//! use tui_overworld_types::Direction;
//!
//! let assets = assets::load_builtin().unwrap();
//! let grid = TileGrid::parse(&DEFAULT_MAP).unwrap();
//! let world = Arc::new(WorldRaster::build(&assets.atlas, &grid));
//! let mut session = Session::new(world, SpriteSet::new(&assets.trainer));
//!
//! // Facing down already: pressing down starts a stride.
//! let effects = session.update(Event::Key(Direction::Down));
//! assert!(effects.contains(&Effect::Emit(Event::Move(Direction::Down))));
//! assert!(session.animation().input_locked);
//!
//! // 80x80 pixel camera window.
//! assert_eq!(session.viewport().width(), 80);
//! ```

pub mod animation;
pub mod assets;
pub mod event;
pub mod motion;
pub mod raster;
pub mod session;
pub mod world;

pub use image::RgbaImage;
pub use tui_overworld_types as types;

// Re-export commonly used types for convenience
pub use animation::{AnimationModel, AnimationState, SpriteSet};
pub use assets::{AssetError, GameAssets, TrainerCells};
pub use event::{AudioCommand, CorrelationId, Effect, Effects, Event};
pub use motion::{MotionBounds, MotionController, MotionState};
pub use raster::{Rgba, PALETTE_BLACK, PALETTE_HIGHLIGHT, PALETTE_WHITE, TRANSPARENT};
pub use session::Session;
pub use world::{TileAtlas, TileGrid, WorldRaster};
