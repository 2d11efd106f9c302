//! Rendering: export flattening, the live zoomed view, crop commit and
//! region blur.
//!
//! All drawing goes through `markcrop_raster::Canvas`. Flattening works in
//! source pixels with hard edges so the same shapes on the same raster give
//! byte-identical output; the live view works in zoomed-display space.

mod blur;
mod crop;
mod flatten;
mod live;

pub use blur::blur_region;
pub use crop::{CropResult, commit_crop, crop_raster, crop_shapes};
pub use flatten::flatten;
pub use live::{Overlay, render_view};

use markcrop_raster::{Bounds, Brush, Primitive};

use crate::model::{Rect, ShapeKind, ShapeStyle};

fn primitive_for(kind: ShapeKind) -> Primitive {
    match kind {
        ShapeKind::Rectangle => Primitive::Rect,
        ShapeKind::Ellipse => Primitive::Ellipse,
    }
}

fn to_bounds(r: Rect) -> Bounds {
    Bounds::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
}

fn brush_for(style: &ShapeStyle, stroke_width: u32, anti_alias: bool) -> Brush {
    Brush {
        fill: style.fill_color().map(|c| c.to_array()),
        stroke: style.stroke_color().map(|c| c.to_array()),
        stroke_width: stroke_width as f32,
        anti_alias,
    }
}
