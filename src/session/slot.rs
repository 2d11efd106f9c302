//! One open image and everything edited on it.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::{self, FilterType};
use markcrop_raster::RasterError;

use crate::compositor;
use crate::coords::{CoordinateSpace, ZoomLimits};
use crate::interaction::CanvasTarget;
use crate::model::{Shape, ShapeStore};

/// Slot state restored by the single-level undo of a save, crop or blur.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub raster: RgbaImage,
    pub space: CoordinateSpace,
    pub store: ShapeStore,
}

/// A loaded image: source raster, its fit-to-viewport copy, transform and
/// shapes.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    raster: RgbaImage,
    /// `raster` scaled to the base display size
    display: RgbaImage,
    space: CoordinateSpace,
    store: ShapeStore,
    /// Before the last crop or blur
    edit_undo: Option<Snapshot>,
    /// Before the last save
    save_undo: Option<Snapshot>,
}

impl FileSlot {
    /// Wrap a decoded raster, fitting it into `max_width` x `max_height`.
    pub fn new(
        path: PathBuf,
        raster: RgbaImage,
        max_width: u32,
        max_height: u32,
        limits: ZoomLimits,
    ) -> Self {
        let space = CoordinateSpace::fit(
            raster.width(),
            raster.height(),
            max_width,
            max_height,
            limits,
        );
        let display = display_raster(&raster, &space);
        log::debug!(
            "Slot {:?}: {}x{} at base scale {:.3}",
            path,
            raster.width(),
            raster.height(),
            space.base_scale()
        );
        Self {
            path,
            raster,
            display,
            space,
            store: ShapeStore::new(),
            edit_undo: None,
            save_undo: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension, used in export names.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// Fit-to-viewport copy of the raster.
    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn space(&self) -> &CoordinateSpace {
        &self.space
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn can_undo_save(&self) -> bool {
        self.save_undo.is_some()
    }

    pub fn can_undo_edit(&self) -> bool {
        self.edit_undo.is_some()
    }

    /// Shapes burned into the source raster.
    pub fn flatten(&self) -> Result<RgbaImage, RasterError> {
        compositor::flatten(&self.raster, self.store.shapes(), &self.space)
    }

    pub(crate) fn space_mut(&mut self) -> &mut CoordinateSpace {
        &mut self.space
    }

    pub(crate) fn store_mut(&mut self) -> &mut ShapeStore {
        &mut self.store
    }

    pub(crate) fn target(&mut self) -> CanvasTarget<'_> {
        CanvasTarget {
            store: &mut self.store,
            space: &self.space,
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            raster: self.raster.clone(),
            space: self.space,
            store: self.store.clone(),
        }
    }

    /// Swap in a new raster and transform, rebuilding the display copy.
    pub(crate) fn set_raster(&mut self, raster: RgbaImage, space: CoordinateSpace) {
        self.display = display_raster(&raster, &space);
        self.raster = raster;
        self.space = space;
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.set_raster(snapshot.raster, snapshot.space);
        self.store = snapshot.store;
    }

    pub(crate) fn set_edit_undo(&mut self, snapshot: Snapshot) {
        self.edit_undo = Some(snapshot);
    }

    pub(crate) fn take_edit_undo(&mut self) -> Option<Snapshot> {
        self.edit_undo.take()
    }

    pub(crate) fn set_save_undo(&mut self, snapshot: Option<Snapshot>) {
        self.save_undo = snapshot;
    }

    pub(crate) fn take_save_undo(&mut self) -> Option<Snapshot> {
        self.save_undo.take()
    }
}

fn display_raster(raster: &RgbaImage, space: &CoordinateSpace) -> RgbaImage {
    let (width, height) = space.base_display_size();
    if raster.dimensions() == (width, height) {
        raster.clone()
    } else {
        imageops::resize(raster, width, height, FilterType::Triangle)
    }
}
