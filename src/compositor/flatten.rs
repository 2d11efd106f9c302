use image::{Pixel, RgbaImage};
use markcrop_raster::{Canvas, RasterError};

use super::{brush_for, primitive_for, to_bounds};
use crate::coords::CoordinateSpace;
use crate::model::Shape;

/// Burn `shapes` into a copy of `raster` at source resolution.
///
/// Geometry and stroke width are mapped from base-display space through
/// `1 / base_scale` with truncation; zoom plays no part. Shapes are painted in
/// z-order, fill first, outline inside the box, without anti-aliasing.
/// Pixels no shape covers are copied through unchanged.
pub fn flatten(
    raster: &RgbaImage,
    shapes: &[Shape],
    space: &CoordinateSpace,
) -> Result<RgbaImage, RasterError> {
    let mut canvas = Canvas::new(raster.width(), raster.height())?;

    for shape in shapes {
        let bounds = space.rect_to_pixel_space(shape.bounds());
        let style = shape.style();
        let brush = brush_for(&style, space.stroke_to_pixel_space(style.stroke_width()), false);
        canvas.draw(primitive_for(shape.kind()), to_bounds(bounds), &brush);
    }

    log::debug!(
        "Flattened {} shapes onto {}x{} raster",
        shapes.len(),
        raster.width(),
        raster.height()
    );
    let layer = canvas.into_rgba();
    let mut out = raster.clone();
    for (dst, src) in out.pixels_mut().zip(layer.pixels()) {
        match src.0[3] {
            0 => {}
            255 => *dst = *src,
            _ => dst.blend(src),
        }
    }
    Ok(out)
}
