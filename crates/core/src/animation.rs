//! Animation module - facing, walk-cycle frame and input lock.
//!
//! # Frame sequences
//!
//! | Facing | Frames |
//! |--------|--------|
//! | down / up | idle, walk, idle, walk (mirrored) |
//! | left | idle, walk |
//! | right | idle (mirrored), walk (mirrored) |
//!
//! Even indices are settled poses, odd indices are mid-stride poses.
//!
//! # Transitions
//!
//! - Key in the current facing (unlocked): lock, advance one frame, schedule
//!   the stride-completion timer, emit a movement intent and a footstep cue.
//! - Key in another facing (unlocked): turn only.
//! - Any key while locked: dropped.
//! - Stride completion with this entity's id: unlock and settle an odd frame
//!   onto the next even one. Foreign ids are ignored.
//!
//! The frame index is reduced modulo the facing's sequence length after
//! every transition.

use std::time::Duration;

use image::{imageops, RgbaImage};

use crate::assets::TrainerCells;
use crate::event::{AudioCommand, CorrelationId, Effect, Effects, Event, STEP_CUE};
use crate::types::{Direction, STRIDE_MS};

/// Per-facing frame sequences, built once per session.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    up: Vec<RgbaImage>,
    down: Vec<RgbaImage>,
    left: Vec<RgbaImage>,
    right: Vec<RgbaImage>,
}

impl SpriteSet {
    pub fn new(cells: &TrainerCells) -> Self {
        Self {
            down: vec![
                cells.front_idle.clone(),
                cells.front_walk.clone(),
                cells.front_idle.clone(),
                imageops::flip_horizontal(&cells.front_walk),
            ],
            up: vec![
                cells.back_idle.clone(),
                cells.back_walk.clone(),
                cells.back_idle.clone(),
                imageops::flip_horizontal(&cells.back_walk),
            ],
            left: vec![cells.side_idle.clone(), cells.side_walk.clone()],
            right: vec![
                imageops::flip_horizontal(&cells.side_idle),
                imageops::flip_horizontal(&cells.side_walk),
            ],
        }
    }

    pub fn frames(&self, facing: Direction) -> &[RgbaImage] {
        match facing {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }
}

/// Observable animation state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState {
    pub facing: Direction,
    pub frame_index: usize,
    pub input_locked: bool,
    pub correlation_id: CorrelationId,
}

/// Animation state machine for one entity.
#[derive(Debug, Clone)]
pub struct AnimationModel {
    state: AnimationState,
    sprites: SpriteSet,
}

impl AnimationModel {
    /// New model facing down on the idle frame, with a fresh correlation id.
    pub fn new(sprites: SpriteSet) -> Self {
        Self::with_id(sprites, CorrelationId::generate())
    }

    pub fn with_id(sprites: SpriteSet, correlation_id: CorrelationId) -> Self {
        Self {
            state: AnimationState {
                facing: Direction::Down,
                frame_index: 0,
                input_locked: false,
                correlation_id,
            },
            sprites,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn id(&self) -> CorrelationId {
        self.state.correlation_id
    }

    /// Sprite cell for the current facing and frame.
    pub fn current_sprite(&self) -> &RgbaImage {
        &self.sprites.frames(self.state.facing)[self.state.frame_index]
    }

    /// Apply one event, pushing any follow-up effects.
    pub fn update(&mut self, event: &Event, effects: &mut Effects) {
        match *event {
            Event::Key(direction) => {
                if self.state.input_locked {
                    return;
                }
                if direction == self.state.facing {
                    self.state.input_locked = true;
                    self.state.frame_index += 1;
                    effects.push(Effect::Schedule {
                        after: Duration::from_millis(STRIDE_MS),
                        event: Event::StrideComplete(self.state.correlation_id),
                    });
                    effects.push(Effect::Emit(Event::Move(direction)));
                    effects.push(Effect::Audio(AudioCommand::Play(STEP_CUE.to_string())));
                } else {
                    self.state.facing = direction;
                }
            }
            Event::StrideComplete(id) => {
                if id != self.state.correlation_id {
                    return;
                }
                self.state.input_locked = false;
                if self.state.frame_index % 2 == 1 {
                    self.state.frame_index += 1;
                }
            }
            _ => {}
        }
        self.state.frame_index %= self.sprites.frames(self.state.facing).len();
    }
}
