//! Terminal input module.
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events (local sessions) and raw terminal byte streams
//! (remote sessions) into [`crate::types::Input`] tokens.

pub mod decode;
pub mod map;

pub use tui_overworld_types as types;

pub use decode::ByteDecoder;
pub use map::{handle_key_event, should_quit};
