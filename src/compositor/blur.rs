use image::{RgbaImage, imageops};

use crate::coords::CoordinateSpace;
use crate::model::{Rect, Shape, ShapeKind};

/// Gaussian-blur the source pixels under `shape`.
///
/// Rectangles blur their whole box; ellipses only the pixels whose centres
/// fall inside the inscribed ellipse. Returns `None` when the shape does not
/// overlap the raster.
pub fn blur_region(
    raster: &RgbaImage,
    shape: &Shape,
    space: &CoordinateSpace,
    sigma: f32,
) -> Option<RgbaImage> {
    let image = Rect::new(0, 0, to_i32(raster.width()), to_i32(raster.height()));
    let shape_px = space.rect_to_pixel_space(shape.bounds());
    let region = image.intersect(&shape_px)?;

    let (x, y) = (to_u32(region.x), to_u32(region.y));
    let patch = imageops::crop_imm(raster, x, y, to_u32(region.width), to_u32(region.height))
        .to_image();
    let blurred = imageops::blur(&patch, sigma);

    let mut out = raster.clone();
    for (px, py, pixel) in blurred.enumerate_pixels() {
        let (ix, iy) = (x + px, y + py);
        if shape.kind() == ShapeKind::Ellipse && !in_ellipse(shape_px, ix, iy) {
            continue;
        }
        out.put_pixel(ix, iy, *pixel);
    }

    log::debug!(
        "Blurred {} region {}x{} at ({}, {}) sigma {}",
        shape.kind().name(),
        region.width,
        region.height,
        region.x,
        region.y,
        sigma
    );
    Some(out)
}

fn in_ellipse(bounds: Rect, x: u32, y: u32) -> bool {
    let rx = f64::from(bounds.width) / 2.0;
    let ry = f64::from(bounds.height) / 2.0;
    let dx = (f64::from(x) + 0.5 - (f64::from(bounds.x) + rx)) / rx;
    let dy = (f64::from(y) + 0.5 - (f64::from(bounds.y) + ry)) / ry;
    dx * dx + dy * dy <= 1.0
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn to_u32(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ZoomLimits;
    use crate::model::ShapeStyle;
    use crate::test_image;

    fn marker(kind: ShapeKind, bounds: Rect) -> Shape {
        Shape::new(kind, bounds, ShapeStyle::default()).unwrap()
    }

    /// Black and white columns, so any blur changes the pixels.
    fn stripes(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| {
            if x % 2 == 0 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_blur_changes_region_only() {
        let raster = stripes(60, 60);
        let space = CoordinateSpace::new(60, 60, 1.0, ZoomLimits::default());
        let shape = marker(ShapeKind::Rectangle, Rect::new(10, 10, 20, 20));

        let out = blur_region(&raster, &shape, &space, 2.0).unwrap();
        assert_ne!(out.get_pixel(20, 20), raster.get_pixel(20, 20));
        assert_eq!(out.get_pixel(40, 40), raster.get_pixel(40, 40));
        assert_eq!(out.get_pixel(5, 20), raster.get_pixel(5, 20));
    }

    #[test]
    fn test_ellipse_keeps_corners() {
        let raster = stripes(60, 60);
        let space = CoordinateSpace::new(60, 60, 1.0, ZoomLimits::default());
        let shape = marker(ShapeKind::Ellipse, Rect::new(10, 10, 40, 40));

        let out = blur_region(&raster, &shape, &space, 2.0).unwrap();
        assert_ne!(out.get_pixel(30, 30), raster.get_pixel(30, 30));
        assert_eq!(out.get_pixel(11, 11), raster.get_pixel(11, 11));
        assert_eq!(out.get_pixel(48, 48), raster.get_pixel(48, 48));
    }

    #[test]
    fn test_region_mapped_to_pixel_space() {
        let raster = stripes(100, 100);
        let space = CoordinateSpace::new(100, 100, 0.5, ZoomLimits::default());
        // base (10,10,10,10) covers pixels 20..40
        let shape = marker(ShapeKind::Rectangle, Rect::new(10, 10, 10, 10));

        let out = blur_region(&raster, &shape, &space, 2.0).unwrap();
        assert_ne!(out.get_pixel(30, 30), raster.get_pixel(30, 30));
        assert_eq!(out.get_pixel(15, 30), raster.get_pixel(15, 30));
    }

    #[test]
    fn test_partially_outside_is_clipped() {
        let raster = stripes(40, 40);
        let space = CoordinateSpace::new(40, 40, 1.0, ZoomLimits::default());
        let shape = marker(ShapeKind::Rectangle, Rect::new(30, 30, 50, 50));

        let out = blur_region(&raster, &shape, &space, 1.5).unwrap();
        assert_eq!(out.dimensions(), (40, 40));
        assert_ne!(out.get_pixel(35, 35), raster.get_pixel(35, 35));
    }

    #[test]
    fn test_outside_raster_is_none() {
        let raster = test_image::solid(20, 20, [10, 20, 30, 255]);
        let space = CoordinateSpace::new(20, 20, 1.0, ZoomLimits::default());
        let shape = marker(ShapeKind::Rectangle, Rect::new(30, 30, 10, 10));
        assert!(blur_region(&raster, &shape, &space, 2.0).is_none());
    }
}
