//! Drawable primitives and their paint description.

use tiny_skia::{Path, PathBuilder};

/// Geometry of a drawable primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Axis-aligned box filling its bounds.
    Rect,
    /// Ellipse inscribed in its bounds.
    Ellipse,
}

/// Floating-point bounding box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by `amount` on every side. Returns None once nothing is left.
    pub fn inset(&self, amount: f32) -> Option<Bounds> {
        let width = self.width - 2.0 * amount;
        let height = self.height - 2.0 * amount;
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Bounds::new(self.x + amount, self.y + amount, width, height))
    }

    /// Grow by `amount` on every side.
    pub fn outset(&self, amount: f32) -> Bounds {
        Bounds::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub(crate) fn to_skia(self) -> Option<tiny_skia::Rect> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// How a primitive is painted.
///
/// The stroke is aligned to the inside of the bounds so a painted shape never
/// spills past its box. A stroke wider than half the box covers the whole
/// primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    /// Interior colour (straight RGBA), or None for a transparent interior.
    pub fill: Option<[u8; 4]>,
    /// Outline colour (straight RGBA), or None for no outline.
    pub stroke: Option<[u8; 4]>,
    /// Outline width in canvas pixels.
    pub stroke_width: f32,
    /// Smooth edges. Off gives hard, integer-aligned edges.
    pub anti_alias: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            anti_alias: true,
        }
    }
}

pub(crate) fn path_for(primitive: Primitive, bounds: Bounds) -> Option<Path> {
    let rect = bounds.to_skia()?;
    match primitive {
        Primitive::Rect => Some(PathBuilder::from_rect(rect)),
        Primitive::Ellipse => PathBuilder::from_oval(rect),
    }
}
