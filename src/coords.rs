//! Coordinate frames of one image.
//!
//! - **Pixel space**: native resolution of the decoded raster.
//! - **Base-display space**: pixel space times `base_scale`, the fit-to-viewport
//!   factor fixed at load. Shapes are stored here.
//! - **Zoomed-display space**: base-display space times the interactive zoom.
//!   Pointer events and the on-screen view live here.
//!
//! Every conversion truncates toward zero after scaling.

use crate::constants::{MAX_ZOOM, MIN_CROP_PIXELS, MIN_ZOOM, ZOOM_STEP};
use crate::model::{Point, Rect};

/// Zoom clamp range and step factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    /// Multiplicative step for zoom in/out
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: MIN_ZOOM,
            max: MAX_ZOOM,
            step: ZOOM_STEP,
        }
    }
}

/// Fit-to-viewport factor: the largest scale that fits the image inside the
/// viewport, never above 1.0. Degenerate sizes give 1.0.
pub fn fit_scale(image_width: u32, image_height: u32, max_width: u32, max_height: u32) -> f64 {
    if image_width == 0 || image_height == 0 || max_width == 0 || max_height == 0 {
        return 1.0;
    }
    let sx = f64::from(max_width) / f64::from(image_width);
    let sy = f64::from(max_height) / f64::from(image_height);
    sx.min(sy).min(1.0)
}

/// Transform state for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    base_scale: f64,
    zoom: f64,
    image_width: u32,
    image_height: u32,
    limits: ZoomLimits,
}

impl CoordinateSpace {
    /// Space for an image with an explicit base scale (clamped to `(0, 1]`).
    pub fn new(image_width: u32, image_height: u32, base_scale: f64, limits: ZoomLimits) -> Self {
        let base_scale = if base_scale.is_finite() && base_scale > 0.0 {
            base_scale.min(1.0)
        } else {
            1.0
        };
        Self {
            base_scale,
            zoom: 1.0,
            image_width,
            image_height,
            limits,
        }
    }

    /// Space whose base scale fits the image into `max_width` x `max_height`.
    pub fn fit(
        image_width: u32,
        image_height: u32,
        max_width: u32,
        max_height: u32,
        limits: ZoomLimits,
    ) -> Self {
        let scale = fit_scale(image_width, image_height, max_width, max_height);
        Self::new(image_width, image_height, scale, limits)
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Source raster size in pixels.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Update the raster size after a crop. The base scale is kept so stored
    /// shapes stay in the same frame.
    pub(crate) fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
    }

    // ========================================================================
    // Zoom
    // ========================================================================

    /// Set the zoom, clamped to the limits. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.limits.min, self.limits.max);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom * self.limits.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom / self.limits.step)
    }

    pub fn reset_zoom(&mut self) -> f64 {
        self.set_zoom(1.0)
    }

    // ========================================================================
    // Scalar conversions
    // ========================================================================

    /// Zoomed-display value to base-display.
    pub fn to_base_display(&self, value: i32) -> i32 {
        (f64::from(value) / self.zoom) as i32
    }

    /// Base-display value to zoomed-display.
    pub fn to_zoomed_display(&self, value: i32) -> i32 {
        (f64::from(value) * self.zoom) as i32
    }

    /// Base-display value to source pixels. Independent of zoom.
    pub fn to_pixel_space(&self, value: i32) -> i32 {
        (f64::from(value) * (1.0 / self.base_scale)) as i32
    }

    /// Outline width in source pixels, at least 1.
    pub fn stroke_to_pixel_space(&self, width: u32) -> u32 {
        ((f64::from(width) * (1.0 / self.base_scale)) as u32).max(1)
    }

    /// Outline width on screen, at least 1.
    pub fn stroke_to_zoomed_display(&self, width: u32) -> u32 {
        ((f64::from(width) * self.zoom) as u32).max(1)
    }

    // ========================================================================
    // Point & rect conversions
    // ========================================================================

    pub fn point_to_base_display(&self, p: Point) -> Point {
        Point::new(self.to_base_display(p.x), self.to_base_display(p.y))
    }

    pub fn point_to_zoomed_display(&self, p: Point) -> Point {
        Point::new(self.to_zoomed_display(p.x), self.to_zoomed_display(p.y))
    }

    /// Converts each field independently.
    pub fn rect_to_base_display(&self, r: Rect) -> Rect {
        Rect::new(
            self.to_base_display(r.x),
            self.to_base_display(r.y),
            self.to_base_display(r.width),
            self.to_base_display(r.height),
        )
    }

    /// Converts each field independently.
    pub fn rect_to_zoomed_display(&self, r: Rect) -> Rect {
        Rect::new(
            self.to_zoomed_display(r.x),
            self.to_zoomed_display(r.y),
            self.to_zoomed_display(r.width),
            self.to_zoomed_display(r.height),
        )
    }

    /// Converts each field independently.
    pub fn rect_to_pixel_space(&self, r: Rect) -> Rect {
        Rect::new(
            self.to_pixel_space(r.x),
            self.to_pixel_space(r.y),
            self.to_pixel_space(r.width),
            self.to_pixel_space(r.height),
        )
    }

    // ========================================================================
    // Display sizes
    // ========================================================================

    /// Size of the fit-to-viewport raster (at least 1x1).
    pub fn base_display_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((f64::from(v) * self.base_scale).round() as u32).max(1);
        (scale(self.image_width), scale(self.image_height))
    }

    /// Size of the zoomed on-screen raster (at least 1x1).
    pub fn zoomed_display_size(&self) -> (u32, u32) {
        let (w, h) = self.base_display_size();
        let scale = |v: u32| ((f64::from(v) * self.zoom) as u32).max(1);
        (scale(w), scale(h))
    }

    /// Whole image in zoomed-display coordinates.
    pub fn zoomed_bounds(&self) -> Rect {
        let (w, h) = self.zoomed_display_size();
        Rect::new(0, 0, to_i32(w), to_i32(h))
    }

    /// Whole image in base-display coordinates.
    pub fn base_bounds(&self) -> Rect {
        let (w, h) = self.base_display_size();
        Rect::new(0, 0, to_i32(w), to_i32(h))
    }

    /// Map a zoomed-display crop region to source pixels, clamped to the
    /// image. None if the result is smaller than `MIN_CROP_PIXELS` either way.
    pub fn crop_to_pixel_space(&self, region: Rect) -> Option<Rect> {
        let factor = self.base_scale * self.zoom;
        let to_px = |v: i32, max: u32| ((f64::from(v) / factor) as i64).clamp(0, i64::from(max));

        let left = to_px(region.x, self.image_width);
        let top = to_px(region.y, self.image_height);
        let right = to_px(region.right(), self.image_width);
        let bottom = to_px(region.bottom(), self.image_height);

        let min = i64::from(MIN_CROP_PIXELS);
        if right - left < min || bottom - top < min {
            return None;
        }
        Some(Rect::new(
            clamp_i32(left),
            clamp_i32(top),
            clamp_i32(right - left),
            clamp_i32(bottom - top),
        ))
    }
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn clamp_i32(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
