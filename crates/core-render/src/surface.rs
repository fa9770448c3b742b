//! Paint surface abstraction.
//!
//! Painters issue fills, outlines and text in their own coordinate space; the
//! surface owns a translation and a clip rect. Clips are given in surface
//! coordinates (before translation) and never grow past the surface bounds.

use core_model::{Point, Rect};
use core_text::FontMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const LIGHT_GRAY: Color = Color::rgb(192, 192, 192);
    pub const DARK_GRAY: Color = Color::rgb(128, 128, 128);
    /// Background of the focused cursor line.
    pub const LINE_HIGHLIGHT: Color = Color::rgb(230, 230, 230);
    /// Outline drawn around the text area while focused.
    pub const FOCUS_FRAME: Color = Color::from_rgb(0x84351a);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }
}

pub trait PaintSurface {
    /// Replace the clip rect (surface coordinates).
    fn set_clip(&mut self, rect: Rect);
    fn clip(&self) -> Rect;
    /// Shift the origin of subsequent drawing; cumulative.
    fn translate(&mut self, dx: i32, dy: i32);
    fn translation(&self) -> Point;
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// One-pixel outline just inside `rect`.
    fn draw_rect(&mut self, rect: Rect, color: Color);
    /// Draw `text` left-aligned and vertically centred in `rect`. Glyphs keep
    /// whatever background is already there.
    fn draw_text(&mut self, rect: Rect, text: &str, metrics: &dyn FontMetrics, color: Color);
}
