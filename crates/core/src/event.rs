//! Events and effects exchanged between the session reducer and its driver.
//!
//! The reducer never sleeps or performs I/O: every follow-up (a delayed
//! timer, a movement intent, an audio cue) is returned as an [`Effect`] and
//! carried out by the driver.

use std::fmt;
use std::time::Duration;

use arrayvec::ArrayVec;

use crate::types::Direction;

/// Upper bound on effects produced by one reducer step.
pub const MAX_EFFECTS: usize = 8;

/// Effects produced by one reducer step.
pub type Effects = ArrayVec<Effect, MAX_EFFECTS>;

/// Opaque per-entity token used to filter timer events to their owner.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId([u8; 8]);

impl CorrelationId {
    /// Fresh random token.
    pub fn generate() -> Self {
        Self(rand::random())
    }

    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({self})")
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Request for the audio sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    /// Play a tune once, interrupting the background loop.
    Play(String),
    /// Replace the looping background tune.
    Loop(String),
}

/// Name of the one-shot footstep cue emitted on every stride.
pub const STEP_CUE: &str = "step";

/// Everything a session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Directional key press.
    Key(Direction),
    /// Quit request (ctrl-c, `q`, session teardown).
    Quit,
    /// Movement intent for the motion controller.
    Move(Direction),
    /// Stride-completion timer for the entity owning the id.
    StrideComplete(CorrelationId),
    /// Interpolation tick.
    Inbetween,
    /// Audio request, forwarded to the sequencer.
    Sound(AudioCommand),
}

impl Event {
    pub fn is_key(&self) -> bool {
        matches!(self, Event::Key(_))
    }
}

/// Follow-up work for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `event` back to the session after `after`.
    Schedule { after: Duration, event: Event },
    /// Deliver `event` back to the session before the next inbound event.
    Emit(Event),
    /// Best-effort send to the audio sequencer.
    Audio(AudioCommand),
    /// Tear the session down.
    Quit,
}
