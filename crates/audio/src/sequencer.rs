//! AudioSequencer worker and its control handle.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::core::types::AUDIO_TICK_MS;
use crate::core::AudioCommand;
use crate::tune::{Tone, TuneBook, START_TUNE};

/// Pending commands per channel before sends start dropping.
const CONTROL_CAPACITY: usize = 4;

/// Opened tone sink.
pub type SinkWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Where tone lines go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AudioSink {
    /// Audio disabled; writes are discarded.
    #[default]
    Discard,
    Stderr,
    /// File or FIFO, opened for append once per sequencer.
    Path(PathBuf),
}

impl AudioSink {
    /// Open the sink. A FIFO with no reader is an error, not a wait.
    pub async fn open(&self) -> io::Result<SinkWriter> {
        Ok(match self {
            AudioSink::Discard => Box::new(tokio::io::sink()),
            AudioSink::Stderr => Box::new(tokio::io::stderr()),
            AudioSink::Path(path) => Box::new(open_nonblocking(path).await?),
        })
    }

    /// Open the sink, discarding tones if that fails.
    pub async fn open_or_discard(&self) -> SinkWriter {
        match self.open().await {
            Ok(sink) => sink,
            Err(err) => {
                warn!(sink = ?self, error = %err, "audio sink unavailable, discarding tones");
                Box::new(tokio::io::sink())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, AudioSink::Discard)
    }
}

async fn open_nonblocking(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.custom_flags(libc::O_NONBLOCK);
    options.open(path).await
}

/// Non-blocking sender side of a running sequencer.
#[derive(Debug, Clone)]
pub struct AudioHandle {
    play_tx: mpsc::Sender<String>,
    loop_tx: mpsc::Sender<String>,
}

impl AudioHandle {
    /// Hand a command to the worker. Never blocks; a full or closed channel
    /// drops the command.
    pub fn send(&self, command: AudioCommand) {
        let result = match command {
            AudioCommand::Play(name) => self.play_tx.try_send(name),
            AudioCommand::Loop(name) => self.loop_tx.try_send(name),
        };
        if let Err(err) = result {
            debug!(error = %err, "audio command dropped");
        }
    }
}

/// Tone sequencer over a line sink.
pub struct AudioSequencer {
    sink: SinkWriter,
    book: TuneBook,
    period: Duration,
}

impl AudioSequencer {
    pub fn new(sink: SinkWriter) -> Self {
        Self {
            sink,
            book: TuneBook::builtin(),
            period: Duration::from_millis(AUDIO_TICK_MS),
        }
    }

    pub fn with_book(mut self, book: TuneBook) -> Self {
        self.book = book;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Start the worker on the current tokio runtime.
    ///
    /// The task ends when `shutdown` flips to `true` (or its sender is
    /// dropped), or when every [`AudioHandle`] is gone.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> (AudioHandle, JoinHandle<()>) {
        let (play_tx, play_rx) = mpsc::channel(CONTROL_CAPACITY);
        let (loop_tx, loop_rx) = mpsc::channel(CONTROL_CAPACITY);
        let task = tokio::spawn(self.run(play_rx, loop_rx, shutdown));
        (AudioHandle { play_tx, loop_tx }, task)
    }

    async fn run(
        mut self,
        mut play_rx: mpsc::Receiver<String>,
        mut loop_rx: mpsc::Receiver<String>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        if *shutdown.borrow() {
            return;
        }
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut tune: Arc<[Tone]> = self.book.get(START_TUNE).unwrap_or_else(|| Arc::from(Vec::new()));
        let mut index = 0usize;

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                name = play_rx.recv() => {
                    let Some(name) = name else { break };
                    let Some(one_shot) = self.book.get(&name) else {
                        debug!(tune = %name, "unknown tune");
                        continue;
                    };
                    if !self.play_once(&one_shot, &mut ticker, &mut shutdown).await {
                        break;
                    }
                    index = 0;
                }
                name = loop_rx.recv() => {
                    let Some(name) = name else { break };
                    match self.book.get(&name) {
                        Some(next) => {
                            tune = next;
                            index = 0;
                        }
                        None => debug!(tune = %name, "unknown tune"),
                    }
                }
                _ = ticker.tick() => {
                    if let Some(&tone) = tune.get(index) {
                        self.write(&tone).await;
                        index = (index + 1) % tune.len();
                    }
                }
            }
        }
        trace!("audio sequencer stopped");
    }

    /// First tone now, the rest one per tick. `false` when shut down midway.
    async fn play_once(
        &mut self,
        tones: &[Tone],
        ticker: &mut Interval,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        let Some((first, rest)) = tones.split_first() else {
            return true;
        };
        self.write(first).await;
        for tone in rest {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return false;
                    }
                }
                _ = ticker.tick() => self.write(tone).await,
            }
        }
        true
    }

    async fn write(&mut self, tone: &Tone) {
        let mut line = Vec::with_capacity(16);
        let result = match tone.write_to(&mut line) {
            Ok(()) => write_line(&mut self.sink, &line).await,
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            trace!(error = %err, note = tone.note, "audio sink write failed");
        }
    }
}

async fn write_line(sink: &mut SinkWriter, line: &[u8]) -> io::Result<()> {
    sink.write_all(line).await?;
    sink.flush().await
}
