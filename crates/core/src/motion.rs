//! Motion module - grid position, in-flight target and interpolation.

use std::time::Duration;

use crate::event::{Effect, Event};
use crate::types::{Direction, Point, INBETWEEN_MS, INBETWEEN_STEP_PX, SPRITE_PX, STEP_PX};

/// Observable motion state of one entity.
///
/// `focused` means settled: `position == target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionState {
    pub position: Point,
    pub target: Point,
    pub focused: bool,
}

/// Inclusive range a stride target must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionBounds {
    pub min: Point,
    pub max: Point,
}

impl MotionBounds {
    /// One stride plus one pixel of margin from every map edge, with the
    /// sprite's own extent reserved on the far edges.
    pub fn for_world(width: i32, height: i32) -> Self {
        let margin = STEP_PX + 1;
        Self {
            min: Point::new(margin, margin),
            max: Point::new(width - SPRITE_PX - margin, height - SPRITE_PX - margin),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Moves one entity a stride at a time, 2px per tick.
#[derive(Debug, Clone)]
pub struct MotionController {
    state: MotionState,
    bounds: MotionBounds,
}

impl MotionController {
    pub fn new(position: Point, bounds: MotionBounds) -> Self {
        Self {
            state: MotionState {
                position,
                target: position,
                focused: true,
            },
            bounds,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn position(&self) -> Point {
        self.state.position
    }

    pub fn is_focused(&self) -> bool {
        self.state.focused
    }

    /// Start a stride. Returns the first interpolation tick, or `None` if the
    /// intent is dropped (target out of bounds, or a stride is in flight).
    pub fn on_movement_intent(&mut self, direction: Direction) -> Option<Effect> {
        if !self.state.focused {
            return None;
        }
        let target = self.state.position.step(direction, STEP_PX);
        if !self.bounds.contains(target) {
            return None;
        }
        self.state.target = target;
        self.state.focused = false;
        Some(schedule_inbetween())
    }

    /// Advance one interpolation tick. Returns the next tick, or `None` once
    /// the entity has settled.
    pub fn on_animation_tick(&mut self) -> Option<Effect> {
        if self.state.focused {
            return None;
        }
        let p = &mut self.state.position;
        let t = self.state.target;
        p.x += INBETWEEN_STEP_PX * (t.x - p.x).signum();
        p.y += INBETWEEN_STEP_PX * (t.y - p.y).signum();
        if self.state.position == self.state.target {
            self.state.focused = true;
            None
        } else {
            Some(schedule_inbetween())
        }
    }
}

fn schedule_inbetween() -> Effect {
    Effect::Schedule {
        after: Duration::from_millis(INBETWEEN_MS),
        event: Event::Inbetween,
    }
}
