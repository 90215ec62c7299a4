//! TCP server for remote terminal sessions
//!
//! Every accepted connection becomes an independent player: its own
//! [`SessionLoop`], glyph renderer and audio worker, over the one shared
//! world raster.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::audio::AudioSequencer;
use crate::config::ServerConfig;
use crate::input::decode::TELNET_HANDSHAKE;
use crate::input::ByteDecoder;
use crate::session_loop::SessionLoop;
use crate::shared::SharedWorld;
use crate::term::{encode_enter_into, encode_exit_into};
use crate::types::Input;

/// Inputs buffered per connection before the reader waits.
const INPUT_CAPACITY: usize = 32;

/// Accept connections until `shutdown` flips to `true`.
///
/// `ready_tx` receives the bound address once listening (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    world: SharedWorld,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let listener = TcpListener::bind(config.socket_addr()?).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, audio = config.audio.is_enabled(), "listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let config = Arc::new(config);
    let world = Arc::new(world);
    let mut next_client_id = 0usize;

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            accepted = listener.accept() => {
                let (socket, addr) = match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!(error = %err, "accept failed");
                        continue;
                    }
                };
                next_client_id += 1;
                let client_id = next_client_id;
                let config = Arc::clone(&config);
                let world = Arc::clone(&world);
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    info!(client_id, %addr, "client connected");
                    if let Err(err) = handle_client(socket, config, world, shutdown).await {
                        debug!(client_id, error = %err, "client error");
                    }
                    info!(client_id, %addr, "client disconnected");
                });
            }
        }
    }

    info!("server stopped");
    Ok(())
}

async fn handle_client(
    socket: TcpStream,
    config: Arc<ServerConfig>,
    world: Arc<SharedWorld>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    socket.set_nodelay(true)?;
    let (mut reader, mut writer) = socket.into_split();

    let mut preamble = Vec::with_capacity(64);
    preamble.extend_from_slice(&TELNET_HANDSHAKE);
    encode_enter_into(&mut preamble)?;
    writer.write_all(&preamble).await?;

    let sink = config.audio.open_or_discard().await;
    let (audio, _audio_task) = AudioSequencer::new(sink).spawn(shutdown.clone());

    let (input_tx, input_rx) = mpsc::channel::<Input>(INPUT_CAPACITY);
    let read_task = tokio::spawn(async move {
        let mut decoder = ByteDecoder::new();
        let mut buf = [0u8; 256];
        let mut inputs = Vec::with_capacity(16);
        loop {
            let n = match reader.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            decoder.feed(&buf[..n], &mut inputs);
            for input in inputs.drain(..) {
                if input_tx.send(input).await.is_err() {
                    return;
                }
            }
        }
    });

    let mut session = SessionLoop::new(
        world.session(),
        config.glyphs.renderer(config.color),
        audio,
    );
    let result = session.run(input_rx, &mut writer, shutdown).await;
    read_task.abort();

    // Best effort: the peer may already be gone.
    let mut epilogue = Vec::with_capacity(64);
    encode_exit_into(&mut epilogue)?;
    let _ = writer.write_all(&epilogue).await;
    let _ = writer.shutdown().await;

    result
}
