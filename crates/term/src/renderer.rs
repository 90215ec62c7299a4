//! TerminalRenderer: puts the local terminal into game mode; frame encoding.
//!
//! Frames produced by the glyph renderers are plain `\n`-separated text with
//! embedded color escapes. Encoding turns one into a redraw that homes the
//! cursor, uses `\r\n` line breaks (raw-mode terminals do not translate `\n`)
//! and clears any stale characters to the right and below.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Print, ResetColor, SetAttribute},
    terminal, QueueableCommand,
};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        encode_enter_into(&mut self.buf)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        encode_exit_into(&mut self.buf)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Alternate screen, hidden cursor, no line wrap.
pub fn encode_enter_into(out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::EnterAlternateScreen)?;
    out.queue(cursor::Hide)?;
    out.queue(terminal::DisableLineWrap)?;
    Ok(())
}

/// Undo [`encode_enter_into`].
pub fn encode_exit_into(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(terminal::EnableLineWrap)?;
    out.queue(cursor::Show)?;
    out.queue(terminal::LeaveAlternateScreen)?;
    Ok(())
}

/// Encode a frame redraw into `out`.
///
/// With `full` the whole screen is cleared first (first frame, resize).
pub fn encode_frame_into(frame: &str, full: bool, out: &mut Vec<u8>) -> Result<()> {
    if full {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }
    out.queue(cursor::MoveTo(0, 0))?;

    for (i, line) in frame.split('\n').enumerate() {
        if i != 0 {
            out.queue(Print("\r\n"))?;
        }
        out.queue(Print(line))?;
        out.queue(ResetColor)?;
        out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
    }

    out.queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}
