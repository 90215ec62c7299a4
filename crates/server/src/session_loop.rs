//! SessionLoop: cooperative single-task driver of one player session.
//!
//! Exactly one event is processed at a time. An event's `Emit` effects are
//! applied before the next inbound event is accepted; `Schedule` effects
//! become sleeping tasks that post the event back into the loop; `Audio`
//! effects are handed to the sequencer without blocking.
//!
//! The loop suspends only while waiting for the next input, timer or
//! shutdown signal.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tracing::trace;

use crate::audio::AudioHandle;
use crate::core::{Effect, Event, Session};
use crate::term::{encode_frame_into, RasterRenderer};
use crate::types::Input;

/// Whether the loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct SessionLoop {
    session: Session,
    renderer: Box<dyn RasterRenderer>,
    audio: AudioHandle,
    text: String,
    bytes: Vec<u8>,
    frames: u64,
}

impl SessionLoop {
    pub fn new(session: Session, renderer: Box<dyn RasterRenderer>, audio: AudioHandle) -> Self {
        Self {
            session,
            renderer,
            audio,
            text: String::with_capacity(64 * 1024),
            bytes: Vec::with_capacity(64 * 1024),
            frames: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run `event` and everything it emits to completion.
    ///
    /// Timers are appended to `timers` as `(delay, event)` for the caller to
    /// arm; audio commands go straight to the sequencer.
    pub fn dispatch(&mut self, event: Event, timers: &mut Vec<(Duration, Event)>) -> Flow {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in self.session.update(event) {
                match effect {
                    Effect::Emit(next) => pending.push_back(next),
                    Effect::Schedule { after, event } => timers.push((after, event)),
                    Effect::Audio(command) => self.audio.send(command),
                    Effect::Quit => return Flow::Quit,
                }
            }
        }
        Flow::Continue
    }

    /// Render the viewport and encode it as a terminal redraw.
    pub fn encode_frame(&mut self, full: bool) -> Result<&[u8]> {
        let frame = self.session.viewport();
        self.text.clear();
        self.renderer.render_into(&frame, &mut self.text);
        self.bytes.clear();
        encode_frame_into(&self.text, full, &mut self.bytes)?;
        Ok(&self.bytes)
    }

    async fn write_frame<W: AsyncWrite + Unpin>(&mut self, out: &mut W) -> Result<()> {
        let full = self.frames == 0;
        self.encode_frame(full)?;
        out.write_all(&self.bytes).await?;
        out.flush().await?;
        self.frames += 1;
        Ok(())
    }

    /// Drive the session until quit, input end-of-stream or shutdown.
    ///
    /// A closed input channel counts as quit. Write errors end the loop with
    /// an error.
    pub async fn run<W: AsyncWrite + Unpin>(
        &mut self,
        mut inputs: mpsc::Receiver<Input>,
        mut out: W,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let (timer_tx, mut timer_rx) = mpsc::unbounded_channel::<Event>();
        let mut timers = Vec::new();

        self.write_frame(&mut out).await?;

        loop {
            let event = tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                input = inputs.recv() => match input {
                    Some(Input::Move(direction)) => Event::Key(direction),
                    Some(Input::Quit) | None => Event::Quit,
                },
                Some(event) = timer_rx.recv() => event,
            };

            timers.clear();
            let flow = self.dispatch(event, &mut timers);
            for (after, event) in timers.drain(..) {
                let tx = timer_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    // Session gone: the timer lapses.
                    let _ = tx.send(event);
                });
            }
            if flow == Flow::Quit {
                break;
            }

            self.write_frame(&mut out).await?;
        }

        trace!(frames = self.frames, "session loop finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioSequencer;
    use crate::shared::SharedWorld;
    use crate::term::{ColorProfile, GlyphRenderer};
    use crate::types::{Direction, Point, STRIDE_MS};

    fn session_loop() -> SessionLoop {
        let shared = SharedWorld::builtin().unwrap();
        let (_stop_tx, stop_rx) = watch::channel(false);
        let (audio, _task) = AudioSequencer::new(Box::new(tokio::io::sink())).spawn(stop_rx);
        SessionLoop::new(
            shared.session(),
            Box::new(GlyphRenderer::new(ColorProfile::TrueColor)),
            audio,
        )
    }

    #[tokio::test]
    async fn dispatch_runs_emits_before_returning() {
        let mut sl = session_loop();
        let mut timers = Vec::new();
        let start = sl.session().motion().position;

        let flow = sl.dispatch(Event::Key(Direction::Down), &mut timers);
        assert_eq!(flow, Flow::Continue);
        // The emitted movement intent was applied in the same dispatch.
        assert_eq!(
            sl.session().motion().target,
            start.step(Direction::Down, 16)
        );
        assert!(timers
            .iter()
            .any(|(after, e)| *after == Duration::from_millis(STRIDE_MS)
                && matches!(e, Event::StrideComplete(_))));
        assert!(timers.iter().any(|(_, e)| *e == Event::Inbetween));
    }

    #[tokio::test]
    async fn quit_stops_dispatch() {
        let mut sl = session_loop();
        let mut timers = Vec::new();
        assert_eq!(sl.dispatch(Event::Quit, &mut timers), Flow::Quit);
        assert!(timers.is_empty());
    }

    #[tokio::test]
    async fn first_frame_is_full_redraw() {
        let mut sl = session_loop();
        let full = String::from_utf8(sl.encode_frame(true).unwrap().to_vec()).unwrap();
        assert!(full.starts_with("\x1b[2J"));
        let partial = String::from_utf8(sl.encode_frame(false).unwrap().to_vec()).unwrap();
        assert!(partial.starts_with("\x1b[1;1H"));
        // 80 pixel rows -> 40 text lines.
        assert_eq!(partial.matches("\r\n").count(), 39);
    }

    #[tokio::test(start_paused = true)]
    async fn run_completes_a_stride_and_quits() {
        let mut sl = session_loop();
        let start = sl.session().motion().position;
        let (input_tx, input_rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);

        let drive = async move {
            // Turn to face right, then step.
            input_tx.send(Input::Move(Direction::Right)).await.unwrap();
            input_tx.send(Input::Move(Direction::Right)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            input_tx.send(Input::Quit).await.unwrap();
        };
        let (result, ()) = tokio::join!(sl.run(input_rx, tokio::io::sink(), stop_rx), drive);
        result.unwrap();

        let motion = sl.session().motion();
        assert_eq!(motion.position, start + Point::new(16, 0));
        assert!(motion.focused);
        assert!(!sl.session().animation().input_locked);
        // Initial frame, two keys, one stride completion and eight inbetweens.
        assert_eq!(sl.frames(), 12);
    }

    #[tokio::test]
    async fn closed_input_ends_session() {
        let mut sl = session_loop();
        let (input_tx, input_rx) = mpsc::channel::<Input>(1);
        let (_stop_tx, stop_rx) = watch::channel(false);
        drop(input_tx);
        sl.run(input_rx, tokio::io::sink(), stop_rx).await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_ends_session() {
        let mut sl = session_loop();
        let (_input_tx, input_rx) = mpsc::channel::<Input>(1);
        let (stop_tx, stop_rx) = watch::channel(false);
        stop_tx.send(true).unwrap();
        sl.run(input_rx, tokio::io::sink(), stop_rx).await.unwrap();
        assert_eq!(sl.frames(), 1);
    }
}
