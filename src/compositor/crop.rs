//! Crop commit: cut the raster and carry the shapes into the new frame.

use image::{RgbaImage, imageops};

use crate::constants::CLIP_THRESHOLD;
use crate::coords::CoordinateSpace;
use crate::model::{Point, Rect, Shape};

/// Outcome of a committed crop.
#[derive(Debug, Clone)]
pub struct CropResult {
    pub raster: RgbaImage,
    pub shapes: Vec<Shape>,
    /// Same base scale and zoom, new image size
    pub space: CoordinateSpace,
    /// Shapes lost because they fell outside or were clipped too thin
    pub dropped: usize,
}

/// Cut `region` (source pixels, inside the image) out of `raster`.
pub fn crop_raster(raster: &RgbaImage, region: Rect) -> RgbaImage {
    imageops::crop_imm(
        raster,
        to_u32(region.x),
        to_u32(region.y),
        to_u32(region.width),
        to_u32(region.height),
    )
    .to_image()
}

/// Move shapes so `origin` becomes (0, 0) and fit them to `bounds`.
///
/// Shapes inside `bounds` are kept as they are. Shapes crossing the edge are
/// clipped and kept only if both clipped sides exceed `CLIP_THRESHOLD`.
/// Everything else is dropped. Z-order is preserved.
pub fn crop_shapes(shapes: &[Shape], origin: Point, bounds: Rect) -> Vec<Shape> {
    shapes
        .iter()
        .filter_map(|shape| {
            let moved = shape.bounds().translate(-origin.x, -origin.y);
            if bounds.contains_rect(&moved) {
                return Some(shape.with_bounds(moved));
            }
            let clipped = bounds.intersect(&moved)?;
            (clipped.width > CLIP_THRESHOLD && clipped.height > CLIP_THRESHOLD)
                .then(|| shape.with_bounds(clipped))
        })
        .collect()
}

/// Crop the raster to `region` (source pixels) and reshape every shape.
///
/// The crop origin is brought into base-display units with the base scale,
/// which stays unchanged so shape sizes do not move.
pub fn commit_crop(
    raster: &RgbaImage,
    shapes: &[Shape],
    space: &CoordinateSpace,
    region: Rect,
) -> CropResult {
    let cropped = crop_raster(raster, region);

    let mut new_space = *space;
    new_space.set_image_size(cropped.width(), cropped.height());

    let scale = space.base_scale();
    let origin = Point::new(
        (f64::from(region.x) * scale) as i32,
        (f64::from(region.y) * scale) as i32,
    );
    let kept = crop_shapes(shapes, origin, new_space.base_bounds());
    let dropped = shapes.len() - kept.len();

    log::info!(
        "Cropped {}x{} -> {}x{} at ({}, {}), {} shapes dropped",
        raster.width(),
        raster.height(),
        cropped.width(),
        cropped.height(),
        region.x,
        region.y,
        dropped
    );

    CropResult {
        raster: cropped,
        shapes: kept,
        space: new_space,
        dropped,
    }
}

fn to_u32(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}
