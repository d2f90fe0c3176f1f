//! Drawing backend contract.
//!
//! A [`Canvas`] is an opaque surface owned by one drawable view. The core only
//! sizes and clears it; draw handlers issue the rest of the calls. Every call
//! may be rejected by the backend, which surfaces as [`CanvasError`].

use std::fmt;
use std::str::FromStr;

use crate::error::CanvasError;
use crate::geometry::{Pos, Rect, Size};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color, 8 bits per channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const CLEAR: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different opacity (0.0 to 1.0).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parses `#rrggbb` or `#rrggbbaa`.
impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CanvasError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(c: Color) -> Self {
        crossterm::style::Color::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathElement {
    MoveTo(Pos),
    LineTo(Pos),
    Close,
}

/// A vector outline handed to the backend for filling or stroking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed outline of a rect.
    pub fn rect(rect: Rect) -> Self {
        Self::new()
            .move_to(rect.pos())
            .line_to(Pos::new(rect.right(), rect.y))
            .line_to(Pos::new(rect.right(), rect.bottom()))
            .line_to(Pos::new(rect.x, rect.bottom()))
            .close()
    }

    pub fn move_to(mut self, pos: Pos) -> Self {
        self.elements.push(PathElement::MoveTo(pos));
        self
    }

    pub fn line_to(mut self, pos: Pos) -> Self {
        self.elements.push(PathElement::LineTo(pos));
        self
    }

    pub fn close(mut self) -> Self {
        self.elements.push(PathElement::Close);
        self
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Smallest rect containing every point of the path.
    pub fn bounds(&self) -> Rect {
        let mut points = self.elements.iter().filter_map(|e| match e {
            PathElement::MoveTo(p) | PathElement::LineTo(p) => Some(*p),
            PathElement::Close => None,
        });
        let Some(first) = points.next() else {
            return Rect::ZERO;
        };
        points.fold(Rect::from_pos_size(first, Size::ZERO), |acc, p| {
            acc.union(Rect::from_pos_size(p, Size::ZERO))
        })
    }
}

/// A named image resource, already decoded by the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRef {
    pub name: String,
    pub size: Size,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self { name: name.into(), size }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Opaque drawing primitives implemented by a platform backend.
pub trait Canvas {
    /// Resize the backing surface. Called before every draw.
    fn set_size(&mut self, size: Size) -> Result<(), CanvasError>;

    /// Erase a region to transparent.
    fn clear(&mut self, rect: Rect) -> Result<(), CanvasError>;

    fn set_color(&mut self, color: Color) -> Result<(), CanvasError>;

    fn fill_path(&mut self, path: &Path) -> Result<(), CanvasError>;

    fn stroke_path(&mut self, path: &Path, width: f64) -> Result<(), CanvasError>;

    fn draw_image(&mut self, image: &ImageRef, dest: Rect) -> Result<(), CanvasError>;

    /// Convenience: fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), CanvasError> {
        self.set_color(color)?;
        self.fill_path(&Path::rect(rect))
    }
}

/// A canvas that accepts and discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn set_size(&mut self, _size: Size) -> Result<(), CanvasError> {
        Ok(())
    }

    fn clear(&mut self, _rect: Rect) -> Result<(), CanvasError> {
        Ok(())
    }

    fn set_color(&mut self, _color: Color) -> Result<(), CanvasError> {
        Ok(())
    }

    fn fill_path(&mut self, _path: &Path) -> Result<(), CanvasError> {
        Ok(())
    }

    fn stroke_path(&mut self, _path: &Path, _width: f64) -> Result<(), CanvasError> {
        Ok(())
    }

    fn draw_image(&mut self, _image: &ImageRef, _dest: Rect) -> Result<(), CanvasError> {
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
