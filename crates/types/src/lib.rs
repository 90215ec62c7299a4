//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, glyph rendering, session transport).
//!
//! # Geometry
//!
//! All coordinates are integer pixels (or tiles, where noted) with axes
//! increasing right and down:
//!
//! - **Tile cell**: 8x8 pixels
//! - **Sprite cell**: 16x16 pixels
//! - **Stride**: 16 pixels (one movement step)
//! - **Viewport**: 5x5 strides (80x80 pixels, 80 columns x 40 text rows)
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INBETWEEN_MS` | 30 | Interval between interpolation ticks |
//! | `INBETWEEN_STEP_PX` | 2 | Pixels moved per interpolation tick |
//! | `STRIDE_FRAMES` | 7 | Animation-frame durations per stride lock |
//! | `STRIDE_MS` | 210 | Stride-completion timer delay |
//! | `AUDIO_TICK_MS` | 500 | Audio sequencer tone period |
//!
//! One stride interpolates in `STEP_PX / INBETWEEN_STEP_PX` = 8 ticks (240ms),
//! while the input lock releases after 210ms. The two timers are independent
//! and only approximately synchronized.
//!
//! # Examples
//!
//! ```
//! use tui_overworld_types::{Direction, Point, TileKind, STEP_PX};
//!
//! let p = Point::new(64, 64);
//! assert_eq!(p.step(Direction::Down, STEP_PX), Point::new(64, 80));
//!
//! assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
//! assert_eq!(TileKind::from_symbol(b'B'), TileKind::Brick);
//! assert_eq!(TileKind::from_symbol(b'?'), TileKind::Blank);
//! ```

/// Tile cell edge in pixels (8x8)
pub const TILE_PX: i32 = 8;

/// Sprite cell edge in pixels (16x16)
pub const SPRITE_PX: i32 = 16;

/// Movement step in pixels (one stride)
pub const STEP_PX: i32 = 16;

/// Pixels moved per interpolation tick
pub const INBETWEEN_STEP_PX: i32 = 2;

/// Interval between interpolation ticks
pub const INBETWEEN_MS: u64 = 30;

/// Number of animation-frame durations the input lock is held per stride
pub const STRIDE_FRAMES: u64 = 7;

/// Stride-completion timer delay (7 x 30ms)
pub const STRIDE_MS: u64 = STRIDE_FRAMES * INBETWEEN_MS;

/// Audio sequencer tone period
pub const AUDIO_TICK_MS: u64 = 500;

/// Viewport edge in strides
pub const VIEW_STRIDES: i32 = 5;

/// Viewport edge in pixels (80)
pub const VIEW_PX: i32 = VIEW_STRIDES * STEP_PX;


/// Integer pixel or grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `distance` pixels in `direction`.
    pub fn step(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Facing / movement direction
///
/// The same four tokens are used for key input, movement intents and the
/// facing an entity's sprite depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector (dx, dy) for this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_overworld_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("Right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("north"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Discrete player input tokens
///
/// This is the whole input vocabulary: local key events and remote byte
/// streams both decode into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Directional key (face or step)
    Move(Direction),
    /// Leave the session
    Quit,
}

/// Tile symbols of the world map
///
/// Maps are written with one byte per tile: `B` brick, `G` grass, anything
/// else is a blank tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Brick,
    Grass,
    Blank,
}

impl TileKind {
    /// Decode a map symbol; unrecognized symbols fall back to `Blank`.
    pub fn from_symbol(b: u8) -> Self {
        match b {
            b'B' => TileKind::Brick,
            b'G' => TileKind::Grass,
            _ => TileKind::Blank,
        }
    }
}
