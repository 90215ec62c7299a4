//! Audio module - best-effort tone sequencing off the render path
//!
//! The sequencer runs as its own tokio task with a fixed-period ticker. It
//! never produces sound itself: each tone is written as a text line
//! (`"<NOTE> <SECONDS> \n"`) to a sink, which an external synthesizer may
//! consume (a FIFO, a file, or stderr piped elsewhere).
//!
//! # Control
//!
//! Session loops talk to the worker through an [`AudioHandle`]:
//!
//! - `Play(name)`: one-shot tune, first tone written at once, the rest on the
//!   following ticks, after which the background loop restarts
//! - `Loop(name)`: replace the background tune
//!
//! Sends never block; when the worker is busy or gone the command is dropped.
//! Sink I/O is asynchronous and path sinks are opened non-blocking, so a FIFO
//! without a reader fails to open instead of waiting; [`AudioSink::open_or_discard`]
//! then falls back to discarding tones.
//!
//! # Example
//!
//! ```no_run
//! use tokio::sync::watch;
//! use tui_overworld_audio::{AudioSequencer, AudioSink};
//! use tui_overworld_core::AudioCommand;
//!
//! # async fn demo() -> std::io::Result<()> {
//! let (_stop_tx, stop_rx) = watch::channel(false);
//! let sink = AudioSink::Stderr.open().await?;
//! let (audio, _task) = AudioSequencer::new(sink).spawn(stop_rx);
//! audio.send(AudioCommand::Play("step".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod sequencer;
pub mod tune;

pub use tui_overworld_core as core;

pub use sequencer::{AudioHandle, AudioSequencer, AudioSink, SinkWriter};
pub use tune::{Tone, TuneBook, START_TUNE, STEP_TUNE};
