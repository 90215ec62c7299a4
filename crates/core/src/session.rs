//! Session module - the reducer that ties animation, motion and audio cues
//! together, and the viewport compositor.
//!
//! One `Session` exists per connected player. It owns the player's
//! [`AnimationModel`] and [`MotionController`] and shares the immutable
//! [`WorldRaster`] with every other session.
//!
//! [`Session::update`] processes exactly one event to completion and returns
//! the follow-up [`Effects`]; it never blocks, sleeps or performs I/O.

use std::sync::Arc;

use image::{imageops, RgbaImage};

use crate::animation::{AnimationModel, AnimationState, SpriteSet};
use crate::event::{Effect, Effects, Event};
use crate::motion::{MotionBounds, MotionController, MotionState};
use crate::raster::PALETTE_BLACK;
use crate::types::{Point, SPRITE_PX, VIEW_PX};
use crate::world::WorldRaster;

/// Per-player game state plus a handle to the shared world.
#[derive(Debug, Clone)]
pub struct Session {
    world: Arc<WorldRaster>,
    animation: AnimationModel,
    motion: MotionController,
}

impl Session {
    /// New session with the player at the world's spawn point.
    pub fn new(world: Arc<WorldRaster>, sprites: SpriteSet) -> Self {
        let spawn = world.spawn_point();
        let bounds = MotionBounds::for_world(world.width(), world.height());
        Self {
            animation: AnimationModel::new(sprites),
            motion: MotionController::new(spawn, bounds),
            world,
        }
    }

    /// Assemble a session from pre-built parts.
    pub fn from_parts(
        world: Arc<WorldRaster>,
        animation: AnimationModel,
        motion: MotionController,
    ) -> Self {
        Self {
            world,
            animation,
            motion,
        }
    }

    pub fn animation(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn motion(&self) -> MotionState {
        self.motion.state()
    }

    pub fn world(&self) -> &Arc<WorldRaster> {
        &self.world
    }

    /// Apply one event and return the follow-up effects.
    pub fn update(&mut self, event: Event) -> Effects {
        let mut effects = Effects::new();
        match &event {
            Event::Quit => {
                effects.push(Effect::Quit);
                return effects;
            }
            Event::Move(direction) => {
                if let Some(e) = self.motion.on_movement_intent(*direction) {
                    effects.push(e);
                }
            }
            Event::Inbetween => {
                if let Some(e) = self.motion.on_animation_tick() {
                    effects.push(e);
                }
            }
            Event::Sound(command) => {
                effects.push(Effect::Audio(command.clone()));
            }
            Event::Key(_) | Event::StrideComplete(_) => {}
        }

        // Mid-stride key presses never reach the animation model.
        if !event.is_key() || self.motion.is_focused() {
            self.animation.update(&event, &mut effects);
        }
        effects
    }

    /// Compose the camera window: the world around the player (replace) with
    /// the current sprite centred on top (alpha-over).
    ///
    /// Parts of the window outside the world show the black backdrop.
    pub fn viewport(&self) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(VIEW_PX as u32, VIEW_PX as u32, PALETTE_BLACK);
        let centre = Point::new(VIEW_PX / 2 - SPRITE_PX / 2, VIEW_PX / 2 - SPRITE_PX / 2);

        // The world is placed so that the window origin lands on (0, 0).
        let origin = self.motion.position() - centre;
        imageops::replace(
            &mut frame,
            self.world.raster(),
            -i64::from(origin.x),
            -i64::from(origin.y),
        );
        imageops::overlay(
            &mut frame,
            self.animation.current_sprite(),
            centre.x.into(),
            centre.y.into(),
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::load_builtin;
    use crate::event::{AudioCommand, CorrelationId, STEP_CUE};
    use crate::types::{Direction, TileKind, STRIDE_MS};
    use crate::world::TileGrid;
    use std::time::Duration;

    const ID: CorrelationId = CorrelationId::from_bytes([1; 8]);

    fn session_at(position: Point) -> Session {
        let assets = load_builtin().unwrap();
        let world = Arc::new(WorldRaster::build(
            &assets.atlas,
            &TileGrid::uniform(16, 16, TileKind::Grass),
        ));
        let bounds = MotionBounds::for_world(world.width(), world.height());
        Session::from_parts(
            world,
            AnimationModel::with_id(SpriteSet::new(&assets.trainer), ID),
            MotionController::new(position, bounds),
        )
    }

    /// Feed an event and every `Emit` it produces, returning the rest.
    fn dispatch(s: &mut Session, event: Event) -> Vec<Effect> {
        let mut pending = vec![event];
        let mut out = Vec::new();
        while let Some(ev) = pending.pop() {
            for fx in s.update(ev) {
                match fx {
                    Effect::Emit(e) => pending.push(e),
                    other => out.push(other),
                }
            }
        }
        out
    }

    #[test]
    fn quit_yields_quit_only() {
        let mut s = session_at(Point::new(64, 64));
        assert_eq!(s.update(Event::Quit).as_slice(), &[Effect::Quit]);
    }

    #[test]
    fn key_in_facing_steps_one_stride() {
        let mut s = session_at(Point::new(64, 64));
        let fx = dispatch(&mut s, Event::Key(Direction::Down));

        assert_eq!(s.animation().frame_index, 1);
        assert!(s.animation().input_locked);
        assert_eq!(s.motion().target, Point::new(64, 80));
        assert!(!s.motion().focused);
        assert!(fx.contains(&Effect::Schedule {
            after: Duration::from_millis(STRIDE_MS),
            event: Event::StrideComplete(ID),
        }));
        assert!(fx.contains(&Effect::Audio(AudioCommand::Play(STEP_CUE.to_string()))));
        assert!(fx
            .iter()
            .any(|e| matches!(e, Effect::Schedule { event: Event::Inbetween, .. })));
    }

    #[test]
    fn keys_mid_stride_are_not_forwarded() {
        let mut s = session_at(Point::new(64, 64));
        dispatch(&mut s, Event::Key(Direction::Down));
        // Release the lock early; motion is still interpolating.
        dispatch(&mut s, Event::StrideComplete(ID));
        assert!(!s.animation().input_locked);
        assert!(!s.motion().focused);

        let fx = dispatch(&mut s, Event::Key(Direction::Left));
        assert!(fx.is_empty());
        assert_eq!(s.animation().facing, Direction::Down);
    }

    #[test]
    fn sound_events_become_audio_effects() {
        let mut s = session_at(Point::new(64, 64));
        let cmd = AudioCommand::Loop("start".to_string());
        assert_eq!(
            s.update(Event::Sound(cmd.clone())).as_slice(),
            &[Effect::Audio(cmd)]
        );
    }

    #[test]
    fn viewport_centres_sprite_over_world() {
        let s = session_at(Point::new(64, 64));
        let frame = s.viewport();
        assert_eq!(frame.width(), VIEW_PX as u32);
        assert_eq!(frame.height(), VIEW_PX as u32);

        // Window origin is position - (32, 32); corner shows world pixel (32, 32).
        assert_eq!(frame.get_pixel(0, 0), s.world().raster().get_pixel(32, 32));

        // Sprite corner is transparent, so the world shows through.
        assert_eq!(frame.get_pixel(32, 32), s.world().raster().get_pixel(64, 64));
        // Sprite interior is opaque.
        let sprite = s.animation.current_sprite();
        assert_eq!(frame.get_pixel(32 + 6, 32 + 1), sprite.get_pixel(6, 1));
    }

    #[test]
    fn viewport_shows_backdrop_off_world() {
        let s = session_at(Point::new(16, 16));
        let frame = s.viewport();
        // Origin (-16, -16): the top-left 16 pixels are outside the world.
        assert_eq!(*frame.get_pixel(0, 0), PALETTE_BLACK);
        assert_eq!(*frame.get_pixel(15, 15), PALETTE_BLACK);
        assert_eq!(frame.get_pixel(16, 16), s.world().raster().get_pixel(0, 0));
    }
}
