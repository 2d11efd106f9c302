//! Current drawing tool: shape kind plus the style new shapes get.

use crate::color::Color;
use crate::model::{ShapeKind, ShapeStyle, StyleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolSettings {
    kind: ShapeKind,
    style: ShapeStyle,
}

impl ToolSettings {
    pub fn new(kind: ShapeKind, style: ShapeStyle) -> Self {
        Self { kind, style }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn style(&self) -> ShapeStyle {
        self.style
    }

    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.kind = kind;
        log::debug!("Tool shape: {}", kind.name());
    }

    pub fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    pub fn set_stroke_color(&mut self, color: Option<Color>) {
        self.style = self.style.with_stroke_color(color);
    }

    /// Fails without changing anything if `width` is out of range.
    pub fn set_stroke_width(&mut self, width: u32) -> Result<(), StyleError> {
        self.style = self.style.with_stroke_width(width)?;
        Ok(())
    }

    pub fn set_fill_color(&mut self, color: Option<Color>) {
        self.style = self.style.with_fill_color(color);
    }
}
