//! Overlay shape records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Point, Rect};
use crate::color::Color;
use crate::constants::{
    DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH,
};

// ============================================================================
// Errors
// ============================================================================

/// Invalid style values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Width outside `MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH`
    #[error("Stroke width {0} is outside the allowed range 1..=20")]
    StrokeWidthOutOfRange(u32),
}

/// Invalid shape records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("Shape bounds must have positive size, got {width}x{height}")]
    EmptyBounds { width: i32, height: i32 },

    #[error(transparent)]
    Style(#[from] StyleError),
}

// ============================================================================
// Kind & Style
// ============================================================================

/// Geometry of an overlay shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned box
    #[default]
    Rectangle,
    /// Ellipse inscribed in the bounding box
    Ellipse,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
        }
    }
}

/// Outline and fill of a shape.
///
/// The stroke width is always within `MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StyleFields")]
pub struct ShapeStyle {
    stroke_color: Option<Color>,
    stroke_width: u32,
    fill_color: Option<Color>,
}

#[derive(Deserialize)]
struct StyleFields {
    #[serde(default)]
    stroke_color: Option<Color>,
    #[serde(default = "default_stroke_width")]
    stroke_width: u32,
    #[serde(default)]
    fill_color: Option<Color>,
}

fn default_stroke_width() -> u32 {
    DEFAULT_STROKE_WIDTH
}

impl TryFrom<StyleFields> for ShapeStyle {
    type Error = StyleError;

    fn try_from(fields: StyleFields) -> Result<Self, Self::Error> {
        ShapeStyle::new(fields.stroke_color, fields.stroke_width, fields.fill_color)
    }
}

impl ShapeStyle {
    pub fn new(
        stroke_color: Option<Color>,
        stroke_width: u32,
        fill_color: Option<Color>,
    ) -> Result<Self, StyleError> {
        check_stroke_width(stroke_width)?;
        Ok(Self {
            stroke_color,
            stroke_width,
            fill_color,
        })
    }

    /// Outline colour, or None for no outline.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke_color
    }

    /// Outline width in base-display units.
    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Interior colour, or None for a transparent interior.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill_color
    }

    pub fn with_stroke_color(self, stroke_color: Option<Color>) -> Self {
        Self {
            stroke_color,
            ..self
        }
    }

    pub fn with_stroke_width(self, stroke_width: u32) -> Result<Self, StyleError> {
        check_stroke_width(stroke_width)?;
        Ok(Self {
            stroke_width,
            ..self
        })
    }

    pub fn with_fill_color(self, fill_color: Option<Color>) -> Self {
        Self { fill_color, ..self }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: Some(DEFAULT_STROKE_COLOR),
            stroke_width: DEFAULT_STROKE_WIDTH,
            fill_color: None,
        }
    }
}

fn check_stroke_width(width: u32) -> Result<(), StyleError> {
    if (MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(StyleError::StrokeWidthOutOfRange(width))
    }
}

// ============================================================================
// Shape
// ============================================================================

/// An immutable overlay shape.
///
/// Bounds are in base-display space and always have positive size.
/// Edits produce a new value that replaces the old one in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShapeFields")]
pub struct Shape {
    kind: ShapeKind,
    bounds: Rect,
    style: ShapeStyle,
}

#[derive(Deserialize)]
struct ShapeFields {
    #[serde(default)]
    kind: ShapeKind,
    bounds: Rect,
    #[serde(default)]
    style: ShapeStyle,
}

impl TryFrom<ShapeFields> for Shape {
    type Error = ShapeError;

    fn try_from(fields: ShapeFields) -> Result<Self, Self::Error> {
        Shape::new(fields.kind, fields.bounds, fields.style)
    }
}

impl Shape {
    pub fn new(kind: ShapeKind, bounds: Rect, style: ShapeStyle) -> Result<Self, ShapeError> {
        if bounds.is_empty() {
            return Err(ShapeError::EmptyBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self {
            kind,
            bounds,
            style,
        })
    }

    /// Shape from a finished drag, or None when either side is at or below
    /// `threshold`.
    pub fn from_drag(
        kind: ShapeKind,
        bounds: Rect,
        style: ShapeStyle,
        threshold: i32,
    ) -> Option<Self> {
        if bounds.width > threshold && bounds.height > threshold {
            Some(Self {
                kind,
                bounds,
                style,
            })
        } else {
            None
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn style(&self) -> ShapeStyle {
        self.style
    }

    /// Same size and style at a new top-left corner.
    pub fn moved_to(self, origin: Point) -> Self {
        Self {
            bounds: self.bounds.with_origin(origin),
            ..self
        }
    }

    pub fn with_style(self, style: ShapeStyle) -> Self {
        Self { style, ..self }
    }

    /// Replace the bounds. Callers guarantee a positive size.
    pub(crate) fn with_bounds(self, bounds: Rect) -> Self {
        debug_assert!(!bounds.is_empty(), "shape bounds collapsed: {:?}", bounds);
        Self { bounds, ..self }
    }
}
