//! Shape data model: geometry, shape records and the per-image store.

mod geometry;
mod shape;
mod store;

pub use geometry::{Point, Rect};
pub use shape::{Shape, ShapeError, ShapeKind, ShapeStyle, StyleError};
pub use store::{ShapeStore, StoreError};
