//! CPU raster backend for markcrop.
//!
//! Wraps tiny-skia behind a small surface that speaks `image::RgbaImage`,
//! so the engine can flatten shapes onto full-resolution rasters and paint
//! the zoomed on-screen view with the same primitives.

pub mod canvas;
pub mod error;
pub mod primitive;

pub use canvas::Canvas;
pub use error::{RasterError, Result};
pub use primitive::{Bounds, Brush, Primitive};
