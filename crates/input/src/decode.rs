//! Byte-stream decoder for remote terminals.
//!
//! A remote client (telnet, `nc`, ...) sends raw bytes: printable keys,
//! ANSI cursor sequences (`ESC [ A`, or `ESC O A` in application mode) and
//! interleaved telnet negotiation (`IAC ...`). The decoder is incremental:
//! sequences split across reads resume where they stopped. An ESC that is
//! not followed by `[`/`O` in the same read is the Esc key, which quits.

use arrayvec::ArrayVec;

use crate::types::{Direction, Input};

/// Telnet "interpret as command"
pub const IAC: u8 = 255;
/// Telnet subnegotiation begin
pub const SB: u8 = 250;
/// Telnet subnegotiation end
pub const SE: u8 = 240;
/// Telnet option: echo
pub const OPT_ECHO: u8 = 1;
/// Telnet option: suppress go-ahead
pub const OPT_SGA: u8 = 3;
pub const WILL: u8 = 251;
pub const WONT: u8 = 252;
pub const DO: u8 = 253;
pub const DONT: u8 = 254;

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;

/// Longest CSI parameter run kept before the sequence is discarded.
const MAX_CSI_PARAMS: usize = 16;

/// Server-side negotiation sent on connect: the server echoes (nothing) and
/// suppresses go-ahead, which puts common telnet clients in character mode.
pub const TELNET_HANDSHAKE: [u8; 6] = [IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SGA];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Esc,
    /// `ESC [` or `ESC O`, collecting parameter bytes
    Csi,
    Iac,
    /// `IAC WILL|WONT|DO|DONT`, option byte follows
    IacOpt,
    /// Inside `IAC SB ... IAC SE`
    Sb,
    SbIac,
}

/// Incremental decoder from raw terminal bytes to [`Input`] tokens.
#[derive(Debug, Clone, Default)]
pub struct ByteDecoder {
    state: State,
    params: ArrayVec<u8, MAX_CSI_PARAMS>,
}

impl ByteDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, appending recognized inputs to `out`.
    pub fn feed(&mut self, bytes: &[u8], out: &mut Vec<Input>) {
        for &b in bytes {
            if let Some(input) = self.step(b) {
                out.push(input);
            }
        }
        // Terminals send cursor sequences in one write; a trailing ESC is a keypress.
        if self.state == State::Esc {
            self.state = State::Ground;
            out.push(Input::Quit);
        }
    }

    fn step(&mut self, b: u8) -> Option<Input> {
        match self.state {
            State::Ground => match b {
                IAC => {
                    self.state = State::Iac;
                    None
                }
                ESC => {
                    self.state = State::Esc;
                    None
                }
                CTRL_C | CTRL_D => Some(Input::Quit),
                _ => map_key_byte(b),
            },
            State::Esc => match b {
                b'[' | b'O' => {
                    self.params.clear();
                    self.state = State::Csi;
                    None
                }
                IAC => {
                    self.state = State::Iac;
                    Some(Input::Quit)
                }
                // Lone ESC: the rest of the read is moot once the session quits.
                _ => {
                    self.state = State::Ground;
                    Some(Input::Quit)
                }
            },
            State::Csi => {
                if b == IAC {
                    self.state = State::Iac;
                    return None;
                }
                // Parameter and intermediate bytes: 0x20..=0x3f
                if (0x20..=0x3f).contains(&b) {
                    if self.params.try_push(b).is_err() {
                        self.state = State::Ground;
                    }
                    return None;
                }
                self.state = State::Ground;
                match b {
                    b'A' => Some(Input::Move(Direction::Up)),
                    b'B' => Some(Input::Move(Direction::Down)),
                    b'C' => Some(Input::Move(Direction::Right)),
                    b'D' => Some(Input::Move(Direction::Left)),
                    _ => None,
                }
            }
            State::Iac => {
                self.state = match b {
                    WILL | WONT | DO | DONT => State::IacOpt,
                    SB => State::Sb,
                    // Escaped 0xff data byte; not a key we know.
                    _ => State::Ground,
                };
                None
            }
            State::IacOpt => {
                self.state = State::Ground;
                None
            }
            State::Sb => {
                if b == IAC {
                    self.state = State::SbIac;
                }
                None
            }
            State::SbIac => {
                self.state = if b == SE { State::Ground } else { State::Sb };
                None
            }
        }
    }
}

/// Single printable key byte.
fn map_key_byte(b: u8) -> Option<Input> {
    let direction = match b.to_ascii_lowercase() {
        b'q' => return Some(Input::Quit),
        b'w' | b'k' => Direction::Up,
        b's' | b'j' => Direction::Down,
        b'a' | b'h' => Direction::Left,
        b'd' | b'l' => Direction::Right,
        _ => return None,
    };
    Some(Input::Move(direction))
}
