//! Glyph rendering: raster -> styled half-block text.
//!
//! Every terminal cell shows two vertically stacked pixels. The default
//! [`GlyphRenderer`] always draws `▀` with the top pixel as foreground and the
//! bottom pixel as background, caching the styled string per color pair. The
//! [`LuminanceRenderer`] is the older, lower-fidelity strategy that picks one
//! of four glyphs by perceived brightness; it keeps no cache.
//!
//! Output is one text line per two pixel rows, lines separated by `\n` with
//! no trailing newline. Odd-height images are not supported: the missing
//! bottom row reads as transparent.

use std::collections::HashMap;
use std::fmt::Write as _;

use crossterm::style::{style, Color, Stylize};

use crate::core::raster::{is_transparent, pixel_at, rgb, Rgba, PALETTE_WHITE};
use crate::core::RgbaImage;

pub const UPPER_HALF: char = '▀';
pub const LOWER_HALF: char = '▄';
pub const FULL_BLOCK: char = '█';

/// Terminal color capability of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorProfile {
    /// 24-bit color.
    #[default]
    TrueColor,
    /// xterm 256-color palette.
    Ansi256,
    /// The 16 basic ANSI colors.
    Ansi16,
}

impl ColorProfile {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "truecolor" | "24bit" => Some(ColorProfile::TrueColor),
            "ansi256" | "256" => Some(ColorProfile::Ansi256),
            "ansi16" | "ansi" | "16" => Some(ColorProfile::Ansi16),
            _ => None,
        }
    }

    /// Terminal color for a pixel. Fully transparent pixels show the backdrop.
    pub fn resolve(&self, c: Rgba) -> Color {
        let [r, g, b, _] = opaque(c).0;
        match self {
            ColorProfile::TrueColor => Color::Rgb { r, g, b },
            ColorProfile::Ansi256 => Color::AnsiValue(nearest_ansi256(rgb(r, g, b))),
            ColorProfile::Ansi16 => nearest_ansi16(rgb(r, g, b)),
        }
    }
}

/// Glyph strategy selectable per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphStyle {
    /// Cached `▀` with foreground/background pair.
    #[default]
    HalfBlock,
    /// Four-way brightness branch, uncached.
    Luminance,
}

impl GlyphStyle {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "half-block" | "halfblock" => Some(GlyphStyle::HalfBlock),
            "luminance" => Some(GlyphStyle::Luminance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GlyphStyle::HalfBlock => "half-block",
            GlyphStyle::Luminance => "luminance",
        }
    }

    /// Fresh renderer for one session; caches are never shared.
    pub fn renderer(&self, profile: ColorProfile) -> Box<dyn RasterRenderer> {
        match self {
            GlyphStyle::HalfBlock => Box::new(GlyphRenderer::new(profile)),
            GlyphStyle::Luminance => Box::new(LuminanceRenderer::new(profile)),
        }
    }
}

/// Renders a raster to text.
pub trait RasterRenderer: Send {
    /// Append the rendering of `img` to `out`.
    fn render_into(&mut self, img: &RgbaImage, out: &mut String);

    fn render(&mut self, img: &RgbaImage) -> String {
        let mut out = String::new();
        self.render_into(img, &mut out);
        out
    }
}

/// (top, bottom) color pair -> styled glyph.
///
/// Grows monotonically; never invalidated.
#[derive(Debug, Clone, Default)]
pub struct GlyphCache {
    glyphs: HashMap<(Rgba, Rgba), String>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, top: Rgba, bottom: Rgba) -> Option<&str> {
        self.glyphs.get(&(top, bottom)).map(String::as_str)
    }

    fn get_or_insert_with(&mut self, top: Rgba, bottom: Rgba, f: impl FnOnce() -> String) -> &str {
        self.glyphs.entry((top, bottom)).or_insert_with(f)
    }
}

/// Half-block renderer with a per-session glyph cache.
#[derive(Debug, Clone, Default)]
pub struct GlyphRenderer {
    profile: ColorProfile,
    cache: GlyphCache,
}

impl GlyphRenderer {
    pub fn new(profile: ColorProfile) -> Self {
        Self {
            profile,
            cache: GlyphCache::new(),
        }
    }

    pub fn profile(&self) -> ColorProfile {
        self.profile
    }

    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    /// Styled `▀` with `top` as foreground and `bottom` as background.
    pub fn glyph(profile: ColorProfile, top: Rgba, bottom: Rgba) -> String {
        style(UPPER_HALF)
            .with(profile.resolve(top))
            .on(profile.resolve(bottom))
            .to_string()
    }
}

impl RasterRenderer for GlyphRenderer {
    fn render_into(&mut self, img: &RgbaImage, out: &mut String) {
        let profile = self.profile;
        let (w, h) = (img.width() as i32, img.height() as i32);
        for y in (0..h).step_by(2) {
            if y != 0 {
                out.push('\n');
            }
            for x in 0..w {
                let top = pixel_at(img, x, y);
                let bottom = pixel_at(img, x, y + 1);
                let glyph = self
                    .cache
                    .get_or_insert_with(top, bottom, || Self::glyph(profile, top, bottom));
                out.push_str(glyph);
            }
        }
    }
}

/// Brightness-branching renderer (no cache).
#[derive(Debug, Clone, Copy, Default)]
pub struct LuminanceRenderer {
    profile: ColorProfile,
}

impl LuminanceRenderer {
    pub fn new(profile: ColorProfile) -> Self {
        Self { profile }
    }

    fn cell_into(&self, top: Rgba, bottom: Rgba, out: &mut String) {
        let top = opaque(top);
        let bottom = opaque(bottom);
        let (lt, lb) = (luminance(top), luminance(bottom));
        let p = self.profile;
        let styled = if lt > lb {
            style(UPPER_HALF).with(p.resolve(top)).on(p.resolve(bottom))
        } else if lt < lb {
            style(LOWER_HALF).with(p.resolve(bottom)).on(p.resolve(top))
        } else if lt < luminance(rgb(128, 128, 128)) {
            style(FULL_BLOCK).with(p.resolve(top)).on(p.resolve(PALETTE_WHITE))
        } else {
            style(' ').on(p.resolve(bottom))
        };
        // Writing into a String cannot fail.
        let _ = write!(out, "{styled}");
    }
}

impl RasterRenderer for LuminanceRenderer {
    fn render_into(&mut self, img: &RgbaImage, out: &mut String) {
        let (w, h) = (img.width() as i32, img.height() as i32);
        for y in (0..h).step_by(2) {
            if y != 0 {
                out.push('\n');
            }
            for x in 0..w {
                self.cell_into(pixel_at(img, x, y), pixel_at(img, x, y + 1), out);
            }
        }
    }
}

fn opaque(c: Rgba) -> Rgba {
    if is_transparent(c) {
        PALETTE_WHITE
    } else {
        c
    }
}

/// Relative luminance (ITU-R BT.709 weights over linearized sRGB).
pub fn luminance(c: Rgba) -> f64 {
    let [r, g, b, _] = c.0;
    0.2126 * srgb_to_linear(r) + 0.7152 * srgb_to_linear(g) + 0.0722 * srgb_to_linear(b)
}

fn srgb_to_linear(v: u8) -> f64 {
    let v = v as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

fn nearest_level(v: u8) -> usize {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, &l)| (l as i32 - v as i32).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Nearest xterm-256 index: the 6x6x6 cube or the 24-step gray ramp.
fn nearest_ansi256(c: Rgba) -> u8 {
    let [r, g, b, _] = c.0;
    let (ri, gi, bi) = (nearest_level(r), nearest_level(g), nearest_level(b));
    let cube = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_idx = 16 + 36 * ri + 6 * gi + bi;

    let avg = (r as u32 + g as u32 + b as u32) / 3;
    let gray_i = ((avg.saturating_sub(8)) / 10).min(23);
    let gray_v = (8 + 10 * gray_i) as u8;
    let gray_idx = 232 + gray_i as usize;

    let rgb = (r, g, b);
    if dist2(rgb, (gray_v, gray_v, gray_v)) < dist2(rgb, cube) {
        gray_idx as u8
    } else {
        cube_idx as u8
    }
}

const ANSI16: [((u8, u8, u8), Color); 16] = [
    ((0, 0, 0), Color::Black),
    ((128, 0, 0), Color::DarkRed),
    ((0, 128, 0), Color::DarkGreen),
    ((128, 128, 0), Color::DarkYellow),
    ((0, 0, 128), Color::DarkBlue),
    ((128, 0, 128), Color::DarkMagenta),
    ((0, 128, 128), Color::DarkCyan),
    ((192, 192, 192), Color::Grey),
    ((128, 128, 128), Color::DarkGrey),
    ((255, 0, 0), Color::Red),
    ((0, 255, 0), Color::Green),
    ((255, 255, 0), Color::Yellow),
    ((0, 0, 255), Color::Blue),
    ((255, 0, 255), Color::Magenta),
    ((0, 255, 255), Color::Cyan),
    ((255, 255, 255), Color::White),
];

fn nearest_ansi16(c: Rgba) -> Color {
    let [r, g, b, _] = c.0;
    let rgb = (r, g, b);
    ANSI16
        .iter()
        .min_by_key(|(v, _)| dist2(rgb, *v))
        .map(|(_, color)| *color)
        .unwrap_or(Color::White)
}
