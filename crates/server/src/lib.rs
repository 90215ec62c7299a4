//! Server module - session driver and TCP transport
//!
//! Each player gets one [`SessionLoop`]: a single-task dispatcher that pulls
//! inputs and timer events one at a time, runs them through the core
//! [`Session`](crate::core::Session) reducer, and writes the redrawn frame.
//!
//! # Transport
//!
//! [`run_server`] accepts plain TCP connections. Clients are expected to be
//! terminals: `telnet host 5000` works out of the box (the server negotiates
//! character mode), and so does `nc` with a raw local tty
//! (`stty raw -echo; nc host 5000`).
//!
//! # Environment Variables
//!
//! Read by [`ServerConfig::from_env`]:
//!
//! - `OVERWORLD_HOST`: Bind address (default: "0.0.0.0")
//! - `OVERWORLD_PORT`: Port number (default: 5000)
//! - `OVERWORLD_AUDIO`: "1"/"true" writes tone lines to stderr
//!
//! # Concurrency
//!
//! The [`SharedWorld`] raster is built once and shared read-only by every
//! session. Glyph caches and audio workers are per session.

pub mod config;
pub mod server;
pub mod session_loop;
pub mod shared;

pub use tui_overworld_audio as audio;
pub use tui_overworld_core as core;
pub use tui_overworld_input as input;
pub use tui_overworld_term as term;
pub use tui_overworld_types as types;

pub use config::ServerConfig;
pub use server::run_server;
pub use session_loop::{Flow, SessionLoop};
pub use shared::SharedWorld;
