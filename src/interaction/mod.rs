//! Canvas input handling.
//!
//! `InteractionController` turns pointer-down / move / up sequences and key
//! presses into shape store mutations and crop requests. It never touches
//! pixels: a confirmed crop is reported as a `CanvasEvent` and committed by
//! the session.

mod controller;
mod resize;
mod tool;

pub use controller::{
    CanvasEvent, CanvasTarget, InteractionController, InteractionSettings, InteractionState, Key,
    Mode,
};
pub use resize::{move_within, resize_edges};
pub use tool::ToolSettings;

#[cfg(test)]
mod tests;
