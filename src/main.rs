//! Overworld runner (default binary).
//!
//! Serves the overworld to remote terminals over TCP, or with `--addr -`
//! plays a single session in the controlling terminal.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tui_overworld::audio::{AudioSequencer, AudioSink};
use tui_overworld::input::handle_key_event;
use tui_overworld::server::{run_server, ServerConfig, SessionLoop, SharedWorld};
use tui_overworld::term::{ColorProfile, GlyphStyle, TerminalRenderer};
use tui_overworld::types::Input;

/// Address sentinel for a local session.
const LOCAL_ADDR: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "tui-overworld", version, about)]
struct Args {
    /// Listen address (default from OVERWORLD_HOST/OVERWORLD_PORT), or `-`
    /// to play in this terminal
    #[arg(short, long)]
    addr: Option<String>,

    /// Write tone lines to stderr for an external synthesizer
    #[arg(long)]
    audio: bool,

    /// File or FIFO receiving tone lines (implies --audio)
    #[arg(long, value_name = "PATH")]
    audio_sink: Option<PathBuf>,

    /// Glyph strategy: half-block or luminance
    #[arg(long, default_value = "half-block", value_parser = parse_glyphs)]
    glyphs: GlyphStyle,

    /// Color profile: truecolor, ansi256 or ansi16
    #[arg(long, default_value = "truecolor", value_parser = parse_color)]
    color: ColorProfile,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file (local mode discards logs otherwise)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn is_local(&self) -> bool {
        self.addr.as_deref() == Some(LOCAL_ADDR)
    }

    /// Environment configuration with the command-line flags applied on top.
    fn config(&self, base: ServerConfig) -> Result<ServerConfig> {
        let mut config = base;
        if let Some(addr) = self.addr.as_deref().filter(|a| *a != LOCAL_ADDR) {
            let addr: SocketAddr = addr
                .parse()
                .with_context(|| format!("invalid listen address {addr}"))?;
            config.host = addr.ip().to_string();
            config.port = addr.port();
        }
        if let Some(path) = &self.audio_sink {
            config.audio = AudioSink::Path(path.clone());
        } else if self.audio {
            config.audio = AudioSink::Stderr;
        }
        config.glyphs = self.glyphs;
        config.color = self.color;
        Ok(config)
    }
}

fn parse_glyphs(s: &str) -> Result<GlyphStyle, String> {
    GlyphStyle::from_str(s).ok_or_else(|| format!("unknown glyph style '{s}'"))
}

fn parse_color(s: &str) -> Result<ColorProfile, String> {
    ColorProfile::from_str(s).ok_or_else(|| format!("unknown color profile '{s}'"))
}

/// Initialize logging with the specified level
fn init_logging(level: &str, log_file: Option<&Path>, local: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tui_overworld={level},tui_overworld_server={level},tui_overworld_audio={level}"
        ))
    });

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Anything on stderr would tear the full-screen frame.
        None if local => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref(), args.is_local())?;

    // Asset failures are fatal before any session starts.
    let world = SharedWorld::builtin().context("loading built-in assets")?;

    let config = args.config(ServerConfig::from_env())?;
    if args.is_local() {
        return run_local(config, world).await;
    }

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
        }
        let _ = stop_tx.send(true);
    });

    run_server(config, world, None, stop_rx).await
}

async fn run_local(config: ServerConfig, world: SharedWorld) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = play_local(&config, world).await;

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

async fn play_local(config: &ServerConfig, world: SharedWorld) -> Result<()> {
    let (stop_tx, stop_rx) = watch::channel(false);
    let sink = config.audio.open_or_discard().await;
    let (audio, audio_task) = AudioSequencer::new(sink).spawn(stop_rx.clone());

    let (input_tx, input_rx) = mpsc::channel(32);
    std::thread::spawn(move || read_keys(input_tx));

    let mut session = SessionLoop::new(world.session(), config.glyphs.renderer(config.color), audio);
    let result = session.run(input_rx, tokio::io::stdout(), stop_rx).await;

    let _ = stop_tx.send(true);
    let _ = audio_task.await;
    result
}

/// Blocking crossterm reader; ends on quit or when the session is gone.
fn read_keys(tx: mpsc::Sender<Input>) {
    loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let Some(input) = handle_key_event(key) else {
                    continue;
                };
                if tx.blocking_send(input).is_err() || input == Input::Quit {
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                debug!(error = %err, "terminal input closed");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> ServerConfig {
        let argv = std::iter::once("tui-overworld").chain(argv.iter().copied());
        let args = Args::try_parse_from(argv).unwrap();
        args.config(ServerConfig::default()).unwrap()
    }

    #[test]
    fn audio_sink_implies_audio() {
        assert_eq!(
            parse(&["--audio-sink", "/tmp/tones"]).audio,
            AudioSink::Path(PathBuf::from("/tmp/tones"))
        );
        assert_eq!(parse(&["--audio"]).audio, AudioSink::Stderr);
        assert_eq!(parse(&[]).audio, AudioSink::Discard);
    }

    #[test]
    fn flags_override_environment() {
        let base = ServerConfig {
            port: 6001,
            audio: AudioSink::Stderr,
            ..ServerConfig::default()
        };
        let args = Args::try_parse_from(["tui-overworld", "--glyphs", "luminance"]).unwrap();
        let config = args.config(base.clone()).unwrap();
        assert_eq!(config.port, 6001);
        assert_eq!(config.audio, AudioSink::Stderr);
        assert_eq!(config.glyphs, GlyphStyle::Luminance);

        let args = Args::try_parse_from(["tui-overworld", "-a", "127.0.0.1:7000"]).unwrap();
        let config = args.config(base).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:7000");
    }

    #[test]
    fn local_sentinel_keeps_configured_address() {
        let args = Args::try_parse_from(["tui-overworld", "--addr", "-"]).unwrap();
        assert!(args.is_local());
        assert_eq!(args.config(ServerConfig::default()).unwrap().port, 5000);
    }

    #[test]
    fn bad_address_is_rejected() {
        let args = Args::try_parse_from(["tui-overworld", "--addr", "nowhere"]).unwrap();
        assert!(args.config(ServerConfig::default()).is_err());
    }
}
