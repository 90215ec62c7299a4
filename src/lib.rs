//! TUI Overworld (workspace facade crate).
//!
//! Re-exports the member crates under short names so binaries, integration
//! tests and benches can write `tui_overworld::core::Session` and friends.

pub use tui_overworld_audio as audio;
pub use tui_overworld_core as core;
pub use tui_overworld_input as input;
pub use tui_overworld_server as server;
pub use tui_overworld_term as term;
pub use tui_overworld_types as types;
