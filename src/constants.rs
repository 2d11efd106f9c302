//! Global constants for markcrop

use crate::color::Color;

/// Smallest allowed outline width
pub const MIN_STROKE_WIDTH: u32 = 1;

/// Largest allowed outline width
pub const MAX_STROKE_WIDTH: u32 = 20;

/// Outline width of the default tool
pub const DEFAULT_STROKE_WIDTH: u32 = 2;

/// Outline colour of the default tool
pub const DEFAULT_STROKE_COLOR: Color = Color::RED;

/// Default fit-to-viewport width cap
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 800;

/// Default fit-to-viewport height cap
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;

/// Minimum interactive zoom
pub const MIN_ZOOM: f64 = 0.25;

/// Maximum interactive zoom
pub const MAX_ZOOM: f64 = 4.0;

/// Multiplicative zoom step per zoom in/out action
pub const ZOOM_STEP: f64 = 1.15;

/// Shape resize handle size in screen pixels
pub const HANDLE_SIZE: i32 = 8;

/// Extra hit margin around every handle, in screen pixels
pub const HANDLE_TOLERANCE: i32 = 3;

/// Crop region handle size in screen pixels
pub const CROP_HANDLE_SIZE: i32 = 10;

/// A resized shape edge must stay strictly larger than this (base-display units)
pub const MIN_SHAPE_SIZE: i32 = 4;

/// A resized crop edge must stay strictly larger than this (zoomed-display units)
pub const MIN_CROP_SIZE: i32 = 20;

/// Drawn rectangles must exceed this in both dimensions to become shapes
pub const DRAW_THRESHOLD: i32 = 2;

/// Shapes clipped by a crop must exceed this in both dimensions to survive
pub const CLIP_THRESHOLD: i32 = 2;

/// Smallest crop region, in source pixels, that can be committed
pub const MIN_CROP_PIXELS: u32 = 2;

/// Distance between a selected shape and its dashed highlight
pub const SELECTION_OUTSET: i32 = 3;

/// Default Gaussian sigma for region blur, in source pixels
pub const DEFAULT_BLUR_RADIUS: f32 = 8.0;
