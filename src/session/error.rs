//! Error types for session operations.

use markcrop_raster::RasterError;
use thiserror::Error;

use crate::codec::CodecError;
use crate::export::ExportError;
use crate::model::{StoreError, StyleError};

/// Errors that can occur while editing or writing open images.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Operation needs an open image
    #[error("No image is open")]
    NoActiveSlot,

    /// Operation needs a selected shape
    #[error("No shape is selected")]
    NoSelection,

    /// Slot index past the end of the open images
    #[error("No image at index {index} ({len} open)")]
    NoSuchSlot { index: usize, len: usize },

    /// Decode or encode failure
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Export of the active image failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Pixmap could not be created
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Invalid tool style
    #[error(transparent)]
    Style(#[from] StyleError),

    /// Shape index went stale
    #[error(transparent)]
    Store(#[from] StoreError),
}
