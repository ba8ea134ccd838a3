//! Shape entities, identifiers and the colour palette
//!
//! A `Shape` is passive geometry: kind, square size, top-left position and
//! fill colour. Motion lives on the owning handler so it survives a kind swap.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Stable identity of a handler, unchanged across shape swaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerId(pub u32);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one concrete shape object
///
/// Toggling a handler's kind replaces its shape, which bumps `generation`
/// so the surface sees a distinct object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId {
    pub handler: HandlerId,
    pub generation: u32,
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.handler, self.generation)
    }
}

/// Geometric kind of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Rectangle,
}

impl ShapeKind {
    /// The other kind
    pub fn toggled(self) -> Self {
        match self {
            ShapeKind::Circle => ShapeKind::Rectangle,
            ShapeKind::Rectangle => ShapeKind::Circle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Rectangle => "Rectangle",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "circle" | "ellipse" => Ok(ShapeKind::Circle),
            "rectangle" | "rect" => Ok(ShapeKind::Rectangle),
            _ => Err(ShapeError::InvalidKind(s.to_string())),
        }
    }
}

impl TryFrom<u8> for ShapeKind {
    type Error = ShapeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ShapeKind::Circle),
            1 => Ok(ShapeKind::Rectangle),
            other => Err(ShapeError::InvalidKind(other.to_string())),
        }
    }
}

/// Fill colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
    Green,
    /// Explicit colour outside the built-in three
    Rgb(u8, u8, u8),
}

impl Color {
    /// Colour a shape takes when its kind is toggled.
    ///
    /// Looks at the current value, not at any palette position: Blue -> Red,
    /// Red -> Green, anything else -> Blue.
    pub fn toggled(self) -> Self {
        match self {
            Color::Blue => Color::Red,
            Color::Red => Color::Green,
            _ => Color::Blue,
        }
    }
}

/// Fixed three-colour palette with a round-robin cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: [Color; 3],
    cursor: usize,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new([Color::Blue, Color::Red, Color::Green])
    }
}

impl Palette {
    pub const fn new(colors: [Color; 3]) -> Self {
        Self { colors, cursor: 0 }
    }

    /// Return the colour under the cursor and advance it (wrapping)
    pub fn next_color(&mut self) -> Color {
        let color = self.colors[self.cursor];
        self.cursor = (self.cursor + 1) % self.colors.len();
        color
    }

    /// Index of the colour the next call will hand out
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// A square shape on the surface (width == height == `size`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub size: f64,
    /// Top-left corner, surface-local
    pub pos: DVec2,
    pub color: Color,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind, size: f64, pos: DVec2, color: Color) -> Self {
        Self {
            id,
            kind,
            size,
            pos,
            color,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size
    }

    /// Point-in-box test, inclusive on all four edges
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + self.size
            && point.y >= self.pos.y
            && point.y <= self.pos.y + self.size
    }

    /// A fresh shape object of the other kind at the same size and position
    pub fn swapped(&self) -> Self {
        Self {
            id: ShapeId {
                handler: self.id.handler,
                generation: self.id.generation.wrapping_add(1),
            },
            kind: self.kind.toggled(),
            size: self.size,
            pos: self.pos,
            color: self.color.toggled(),
        }
    }
}
