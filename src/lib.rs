//! markcrop - image annotation overlays with crop and flattened export
//!
//! Shapes are stored in a resolution-independent base-display frame, edited
//! through a pointer/keyboard state machine and burned into the source
//! raster on save or export.

pub mod codec;
pub mod color;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod coords;
pub mod export;
pub mod interaction;
pub mod model;
pub mod session;

#[cfg(test)]
mod test_image;

pub use codec::{CodecError, ExportFormat, FsCodec, ImageCodec};
pub use color::Color;
pub use config::AppConfig;
pub use coords::CoordinateSpace;
pub use interaction::{CanvasEvent, InteractionController, Key, Mode};
pub use model::{Point, Rect, Shape, ShapeKind, ShapeStore, ShapeStyle};
pub use session::{FileSlot, Session, SessionError};
