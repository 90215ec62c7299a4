//! Terminal rendering module.
//!
//! Turns composed rasters into terminal text and terminal text into screen
//! redraws. It intentionally avoids ratatui widgets/layout: a frame is just
//! a block of half-block glyphs, two source pixel rows per text line.
//!
//! - [`glyph`]: raster -> styled text (cached half-block and luminance strategies)
//! - [`renderer`]: raw mode / alternate screen handling and frame encoding

pub mod glyph;
pub mod renderer;

pub use tui_overworld_core as core;

pub use glyph::{
    ColorProfile, GlyphCache, GlyphRenderer, GlyphStyle, LuminanceRenderer, RasterRenderer,
};
pub use renderer::{encode_enter_into, encode_exit_into, encode_frame_into, TerminalRenderer};
