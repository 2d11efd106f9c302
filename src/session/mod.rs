//! Open images and the editing session.
//!
//! Each `FileSlot` owns one decoded raster, its coordinate space and its
//! shapes. `Session` holds the slots, points the interaction controller at
//! exactly one of them and carries out crops, blurs, saves and exports.

mod editor;
mod error;
mod slot;

pub use editor::{OpenReport, Session};
pub use error::SessionError;
pub use slot::{FileSlot, Snapshot};

#[cfg(test)]
mod tests;
