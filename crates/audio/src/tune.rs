//! Tone and tune definitions.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use crate::core::event::STEP_CUE;

/// Background tune played from startup.
pub const START_TUNE: &str = "start";
/// Footstep cue, played once per stride.
pub const STEP_TUNE: &str = STEP_CUE;

/// One note held for a number of seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub note: &'static str,
    pub seconds: f32,
}

impl Tone {
    pub const fn new(note: &'static str, seconds: f32) -> Self {
        Self { note, seconds }
    }

    /// Write the tone as a sink line, e.g. `"C4 0.5 \n"`.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{} {} ", self.note, self.seconds)
    }
}

const START: [Tone; 4] = [
    Tone::new("C4", 0.5),
    Tone::new("C4", 0.3),
    Tone::new("D4", 0.2),
    Tone::new("E4", 0.8),
];

const STEP: [Tone; 1] = [Tone::new("G2", 0.05)];

/// Named tunes, shared read-only between sequencers.
#[derive(Debug, Clone)]
pub struct TuneBook {
    tunes: HashMap<String, Arc<[Tone]>>,
}

impl Default for TuneBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TuneBook {
    pub fn empty() -> Self {
        Self {
            tunes: HashMap::new(),
        }
    }

    /// `start` and `step`.
    pub fn builtin() -> Self {
        Self::empty().with(START_TUNE, &START).with(STEP_TUNE, &STEP)
    }

    /// Add or replace a tune. Empty tunes are not stored.
    pub fn with(mut self, name: &str, tones: &[Tone]) -> Self {
        if !tones.is_empty() {
            self.tunes.insert(name.to_string(), Arc::from(tones));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<[Tone]>> {
        self.tunes.get(name).cloned()
    }
}
