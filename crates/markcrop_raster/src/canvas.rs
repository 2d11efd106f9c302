//! Pixmap-backed drawing surface.
//!
//! tiny-skia works on premultiplied RGBA while the rest of the application
//! keeps straight-alpha `image::RgbaImage` buffers. `Canvas` owns the
//! conversion in both directions so callers never see premultiplied data.

use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, FillRule, Paint, Pixmap, Stroke, StrokeDash, Transform};

use crate::error::{RasterError, Result};
use crate::primitive::{path_for, Bounds, Brush, Primitive};

/// A drawing surface the size of one image.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// Create a canvas holding a copy of `image`.
    pub fn from_rgba(image: &RgbaImage) -> Result<Self> {
        let mut canvas = Self::new(image.width(), image.height())?;
        for (dst, src) in canvas.pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(canvas)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Copy the canvas out as a straight-alpha image.
    pub fn to_rgba(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.to_rgba()
    }

    /// Paint a primitive. Returns false if the bounds are degenerate and
    /// nothing was drawn.
    pub fn draw(&mut self, primitive: Primitive, bounds: Bounds, brush: &Brush) -> bool {
        let Some(path) = path_for(primitive, bounds) else {
            log::trace!("Skipping degenerate {:?} at {:?}", primitive, bounds);
            return false;
        };

        if let Some(fill) = brush.fill {
            let paint = solid_paint(fill, brush.anti_alias);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        if let Some(color) = brush.stroke.filter(|_| brush.stroke_width > 0.0) {
            let paint = solid_paint(color, brush.anti_alias);
            let inner = bounds
                .inset(brush.stroke_width / 2.0)
                .and_then(|inner| path_for(primitive, inner));
            match inner {
                Some(inner) => {
                    let stroke = Stroke {
                        width: brush.stroke_width,
                        ..Default::default()
                    };
                    self.pixmap
                        .stroke_path(&inner, &paint, &stroke, Transform::identity(), None);
                }
                // Outline is thicker than the shape: it covers everything
                None => {
                    self.pixmap
                        .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
                }
            }
        }

        true
    }

    /// Stroke a dashed outline centred on the edge of the primitive.
    pub fn dashed_outline(
        &mut self,
        primitive: Primitive,
        bounds: Bounds,
        color: [u8; 4],
        width: f32,
        dash: f32,
    ) {
        let Some(path) = path_for(primitive, bounds) else {
            return;
        };
        let mut stroke = Stroke {
            width,
            ..Default::default()
        };
        stroke.dash = StrokeDash::new(vec![dash, dash], 0.0);
        self.pixmap.stroke_path(
            &path,
            &solid_paint(color, false),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    /// Draw a square grab handle: solid interior with a one pixel border.
    pub fn handle(&mut self, bounds: Bounds, fill: [u8; 4], border: [u8; 4]) {
        self.draw(
            Primitive::Rect,
            bounds,
            &Brush {
                fill: Some(fill),
                stroke: Some(border),
                stroke_width: 1.0,
                anti_alias: false,
            },
        );
    }

    /// Darken everything outside `keep` with a translucent colour.
    pub fn dim_outside(&mut self, keep: Bounds, color: [u8; 4]) {
        let width = self.width() as f32;
        let height = self.height() as f32;
        let bands = [
            Bounds::new(0.0, 0.0, width, keep.y),
            Bounds::new(0.0, keep.bottom(), width, height - keep.bottom()),
            Bounds::new(0.0, keep.y, keep.x, keep.height),
            Bounds::new(keep.right(), keep.y, width - keep.right(), keep.height),
        ];
        let paint = solid_paint(color, false);
        for band in bands {
            if let Some(rect) = band.to_skia() {
                self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
    }
}

fn solid_paint(color: [u8; 4], anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = anti_alias;
    paint
}
