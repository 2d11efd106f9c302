//! Open images and the single active canvas.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::error::SessionError;
use super::slot::FileSlot;
use crate::codec::{CodecError, ExportFormat, FsCodec, ImageCodec};
use crate::color::Color;
use crate::compositor;
use crate::config::AppConfig;
use crate::coords::CoordinateSpace;
use crate::export::{self, BatchProgress, BatchReport};
use crate::interaction::{CanvasEvent, InteractionController, Key, Mode};
use crate::model::{Point, Rect, Shape, ShapeKind};

/// Result of opening several files at once.
#[derive(Debug, Default)]
pub struct OpenReport {
    /// Slot indices of the files that opened
    pub opened: Vec<usize>,
    pub failures: Vec<(PathBuf, CodecError)>,
}

/// Every open image plus the controller bound to the active one.
///
/// Before any image is open there is no active slot and canvas input is
/// ignored.
pub struct Session {
    config: AppConfig,
    codec: Box<dyn ImageCodec>,
    slots: Vec<FileSlot>,
    active: Option<usize>,
    controller: InteractionController,
}

impl Session {
    /// Session reading and writing files with the `image` crate.
    pub fn new(config: AppConfig) -> Self {
        Self::with_codec(config, Box::new(FsCodec))
    }

    pub fn with_codec(config: AppConfig, codec: Box<dyn ImageCodec>) -> Self {
        let controller =
            InteractionController::new(config.interaction_settings(), config.tool_settings());
        Self {
            config,
            codec,
            slots: Vec::new(),
            active: None,
            controller,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn slots(&self) -> &[FileSlot] {
        &self.slots
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_slot(&self) -> Option<&FileSlot> {
        self.active.and_then(|i| self.slots.get(i))
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    // ========================================================================
    // Slots
    // ========================================================================

    /// Open every path, one slot each. Failures are collected and do not stop
    /// the rest; the last file that opened becomes active.
    pub fn open_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> OpenReport {
        let mut report = OpenReport::default();
        for path in paths {
            let path = path.as_ref();
            match self.codec.decode(path) {
                Ok(raster) => {
                    let index = self.push_slot(path.to_path_buf(), raster);
                    log::info!("Opened {:?}", path);
                    report.opened.push(index);
                }
                Err(e) => {
                    log::warn!("Failed to open {:?}: {}", path, e);
                    report.failures.push((path.to_path_buf(), e));
                }
            }
        }
        if let Some(&last) = report.opened.last() {
            self.activate(last);
        }
        report
    }

    /// Add an already decoded image and make it active.
    pub fn add_image(&mut self, path: PathBuf, raster: RgbaImage) -> usize {
        let index = self.push_slot(path, raster);
        self.activate(index);
        index
    }

    /// Bind the canvas to another slot. Zoom is kept per slot; selection,
    /// gestures and the crop region are reset.
    pub fn switch_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        self.activate(index);
        Ok(())
    }

    /// Close a slot. The active pointer follows the remaining slots.
    pub fn close(&mut self, index: usize) -> Result<FileSlot, SessionError> {
        self.check_index(index)?;
        let slot = self.slots.remove(index);
        self.active = match self.active {
            _ if self.slots.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.slots.len() - 1)),
            other => other,
        };
        self.reset_controller();
        log::info!("Closed {:?}", slot.path());
        Ok(slot)
    }

    /// Close everything and return to the no-image state.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.active = None;
        self.controller.reset(None);
        log::debug!("Session reset");
    }

    // ========================================================================
    // Canvas input
    // ========================================================================

    pub fn pointer_down(&mut self, p: Point) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        self.controller.pointer_down(slot.target(), p)
    }

    pub fn pointer_move(&mut self, p: Point) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        self.controller.pointer_move(slot.target(), p)
    }

    pub fn pointer_up(&mut self, p: Point) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        self.controller.pointer_up(slot.target(), p)
    }

    /// Handle a key. A confirmed crop is committed to the active slot here.
    pub fn key_press(&mut self, key: Key) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        let events = self.controller.key_press(slot.target(), key);
        for event in &events {
            if let CanvasEvent::CropConfirmed(region) = event {
                commit_crop(slot, *region);
            }
        }
        events
    }

    pub fn set_mode(&mut self, mode: Mode) -> Vec<CanvasEvent> {
        let space = self.active_slot().map(|slot| *slot.space());
        self.controller.set_mode(mode, space.as_ref())
    }

    // ========================================================================
    // Shapes
    // ========================================================================

    /// Undo the topmost shape. A selection pointing at it is dropped.
    pub fn undo(&mut self) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        if slot.store_mut().undo().is_some() {
            events.push(CanvasEvent::ShapeRemoved {
                index: slot.store().len(),
            });
        }
        events.extend(self.controller.sync_selection(slot.store()));
        events
    }

    pub fn redo(&mut self) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        match slot.store_mut().redo() {
            Some(_) => vec![CanvasEvent::ShapeAdded {
                index: slot.store().len() - 1,
            }],
            None => Vec::new(),
        }
    }

    /// Append a shape (base-display coordinates) to the active slot.
    pub fn add_shape(&mut self, shape: Shape) -> Result<usize, SessionError> {
        let index = self.active_slot_mut()?.store_mut().add(shape);
        Ok(index)
    }

    /// Remove every shape of the active slot.
    pub fn clear_shapes(&mut self) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        slot.store_mut().clear();
        self.controller.sync_selection(slot.store())
    }

    // ========================================================================
    // Zoom
    // ========================================================================

    pub fn zoom_in(&mut self) -> Option<f64> {
        self.change_zoom(|space| space.zoom_in())
    }

    pub fn zoom_out(&mut self) -> Option<f64> {
        self.change_zoom(|space| space.zoom_out())
    }

    pub fn reset_zoom(&mut self) -> Option<f64> {
        self.change_zoom(|space| space.reset_zoom())
    }

    /// Set the zoom (clamped). None without an open image.
    pub fn set_zoom(&mut self, zoom: f64) -> Option<f64> {
        self.change_zoom(|space| space.set_zoom(zoom))
    }

    fn change_zoom(
        &mut self,
        change: impl FnOnce(&mut CoordinateSpace) -> f64,
    ) -> Option<f64> {
        let slot = self.active.and_then(|i| self.slots.get_mut(i))?;
        let old = slot.space().zoom();
        let new = change(slot.space_mut());
        self.controller.zoom_changed(old, new);
        log::debug!("Zoom {:.3} -> {:.3}", old, new);
        Some(new)
    }

    // ========================================================================
    // Tool
    // ========================================================================

    pub fn set_tool_kind(&mut self, kind: ShapeKind) {
        self.controller.tool_mut().set_kind(kind);
    }

    /// Change the tool outline colour; a selected shape follows.
    pub fn set_stroke_color(&mut self, color: Option<Color>) -> Vec<CanvasEvent> {
        self.controller.tool_mut().set_stroke_color(color);
        self.restyle_selected()
    }

    /// Change the tool outline width; a selected shape follows.
    pub fn set_stroke_width(&mut self, width: u32) -> Result<Vec<CanvasEvent>, SessionError> {
        self.controller.tool_mut().set_stroke_width(width)?;
        Ok(self.restyle_selected())
    }

    /// Change the tool fill colour; a selected shape follows.
    pub fn set_fill_color(&mut self, color: Option<Color>) -> Vec<CanvasEvent> {
        self.controller.tool_mut().set_fill_color(color);
        self.restyle_selected()
    }

    fn restyle_selected(&mut self) -> Vec<CanvasEvent> {
        let Some(slot) = self.active.and_then(|i| self.slots.get_mut(i)) else {
            return Vec::new();
        };
        let style = self.controller.tool().style();
        self.controller
            .apply_style_to_selected(slot.store_mut(), style)
    }

    // ========================================================================
    // Raster edits
    // ========================================================================

    /// Blur the pixels under the selected shape, then drop the shape.
    /// Undone by `undo_edit`.
    pub fn blur_selected(&mut self) -> Result<Vec<CanvasEvent>, SessionError> {
        let index = self.active.ok_or(SessionError::NoActiveSlot)?;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SessionError::NoActiveSlot)?;
        let shape_index = self.controller.selected().ok_or(SessionError::NoSelection)?;
        let shape = self
            .controller
            .selected_shape(slot.store())
            .ok_or(SessionError::NoSelection)?;

        let Some(blurred) = compositor::blur_region(
            slot.raster(),
            &shape,
            slot.space(),
            self.config.blur.radius,
        ) else {
            log::debug!("Selected shape does not overlap the image; nothing to blur");
            return Ok(Vec::new());
        };

        let snapshot = slot.snapshot();
        let space = *slot.space();
        slot.store_mut().remove(shape_index)?;
        slot.set_raster(blurred, space);
        slot.set_edit_undo(snapshot);
        self.controller.reset(Some(slot.space()));
        log::info!("Blurred region under shape {}", shape_index);

        Ok(vec![
            CanvasEvent::ShapeRemoved { index: shape_index },
            CanvasEvent::SelectionChanged(None),
        ])
    }

    /// Restore the active slot from before its last crop or blur. Returns
    /// false if there is nothing to undo.
    pub fn undo_edit(&mut self) -> Result<bool, SessionError> {
        let slot = self.active_slot_mut()?;
        let Some(snapshot) = slot.take_edit_undo() else {
            return Ok(false);
        };
        slot.restore(snapshot);
        log::info!("Undid last crop or blur on {:?}", slot.path());
        self.reset_controller();
        Ok(true)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Flatten the active slot to `path`. The format comes from `format` or
    /// else from the extension, and is checked before anything is written.
    pub fn export_active(
        &self,
        path: &Path,
        format: Option<ExportFormat>,
    ) -> Result<(), SessionError> {
        let slot = self.active_slot().ok_or(SessionError::NoActiveSlot)?;
        let format = match format {
            Some(format) => format,
            None => ExportFormat::from_path(path)?,
        };
        export::export_slot(slot, path, format, self.codec.as_ref())?;
        Ok(())
    }

    /// Batch export. `order` lists slot indices in output order.
    pub fn export_batch(
        &self,
        order: &[usize],
        out_dir: &Path,
        format: ExportFormat,
        on_progress: impl FnMut(&BatchProgress) -> ControlFlow<()>,
    ) -> BatchReport {
        export::run_batch(
            &self.slots,
            order,
            out_dir,
            format,
            self.codec.as_ref(),
            on_progress,
        )
    }

    /// Overwrite the active file with its flattened composite.
    ///
    /// The composite replaces the slot raster and the shapes are cleared.
    /// The previous state is kept for one `undo_save`.
    pub fn save_active(&mut self) -> Result<PathBuf, SessionError> {
        let index = self.active.ok_or(SessionError::NoActiveSlot)?;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SessionError::NoActiveSlot)?;
        let format = ExportFormat::from_path(slot.path())?;
        let composite = slot.flatten()?;
        self.codec.encode(&composite, slot.path(), format)?;

        let snapshot = slot.snapshot();
        let space = *slot.space();
        slot.set_raster(composite, space);
        slot.store_mut().clear();
        slot.set_save_undo(Some(snapshot));
        self.controller.reset(Some(slot.space()));

        log::info!("Saved {:?}", slot.path());
        Ok(slot.path().to_path_buf())
    }

    /// Put back the raster and shapes from before the last save and write
    /// the old raster back to the file. Returns false if nothing was saved.
    pub fn undo_save(&mut self) -> Result<bool, SessionError> {
        let index = self.active.ok_or(SessionError::NoActiveSlot)?;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SessionError::NoActiveSlot)?;
        let Some(snapshot) = slot.take_save_undo() else {
            return Ok(false);
        };

        let format = ExportFormat::from_path(slot.path())?;
        if let Err(e) = self.codec.encode(&snapshot.raster, slot.path(), format) {
            slot.set_save_undo(Some(snapshot));
            return Err(e.into());
        }
        slot.restore(snapshot);
        self.controller.reset(Some(slot.space()));
        log::info!("Undid save of {:?}", slot.path());
        Ok(true)
    }

    /// Render the active slot as shown on screen: zoomed raster, shapes and
    /// the interaction overlay. None without an open image.
    pub fn render_view(&self) -> Result<Option<RgbaImage>, SessionError> {
        let Some(slot) = self.active_slot() else {
            return Ok(None);
        };
        let view = compositor::render_view(
            slot.display(),
            slot.shapes(),
            slot.space(),
            &self.controller.overlay(),
        )?;
        Ok(Some(view))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn push_slot(&mut self, path: PathBuf, raster: RgbaImage) -> usize {
        let viewport = self.config.viewport;
        self.slots.push(FileSlot::new(
            path,
            raster,
            viewport.max_width,
            viewport.max_height,
            self.config.zoom_limits(),
        ));
        self.slots.len() - 1
    }

    fn activate(&mut self, index: usize) {
        self.active = Some(index);
        self.reset_controller();
        log::debug!("Active slot: {}", index);
    }

    fn reset_controller(&mut self) {
        let space = self.active_slot().map(|slot| *slot.space());
        self.controller.reset(space.as_ref());
    }

    fn active_slot_mut(&mut self) -> Result<&mut FileSlot, SessionError> {
        self.active
            .and_then(|i| self.slots.get_mut(i))
            .ok_or(SessionError::NoActiveSlot)
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.slots.len() {
            Ok(())
        } else {
            Err(SessionError::NoSuchSlot {
                index,
                len: self.slots.len(),
            })
        }
    }
}

/// Crop the slot to `region` (source pixels), keeping one level of undo.
fn commit_crop(slot: &mut FileSlot, region: Rect) {
    let snapshot = slot.snapshot();
    let result = compositor::commit_crop(slot.raster(), slot.shapes(), slot.space(), region);
    slot.set_raster(result.raster, result.space);
    slot.store_mut().reset_to(result.shapes);
    slot.set_edit_undo(snapshot);
}
