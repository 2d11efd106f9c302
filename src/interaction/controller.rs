//! Pointer and keyboard state machine for the canvas.
//!
//! Events arrive in zoomed-display coordinates. Shapes are hit-tested and
//! edited in base-display space; handles and the crop region stay in zoomed
//! space so their screen size is fixed.

use super::resize::{move_within, resize_edges};
use super::tool::ToolSettings;
use crate::compositor::Overlay;
use crate::constants::{DRAW_THRESHOLD, MIN_CROP_SIZE, MIN_SHAPE_SIZE};
use crate::coords::CoordinateSpace;
use crate::hit_test::{Handle, HandleModel, find_topmost_shape_at};
use crate::model::{Point, Rect, Shape, ShapeStore, ShapeStyle};

// ============================================================================
// Public Types
// ============================================================================

/// Mutually exclusive canvas modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Drag out new shapes with the current tool
    #[default]
    Draw,
    /// Pick, move and resize existing shapes
    Select,
    /// Adjust and confirm a crop region
    Crop,
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Delete,
}

/// Observable state, derived from the mode and the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Drawing,
    Selecting,
    Dragging,
    Resizing,
    CroppingIdle,
    CroppingHandleDrag,
    CroppingMove,
}

/// Notifications produced by input handling, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// Selection changed; carries the selected shape so controls can sync
    SelectionChanged(Option<Shape>),
    ShapeAdded { index: usize },
    ShapeModified { index: usize },
    ShapeRemoved { index: usize },
    /// Crop confirmed; the region is in source pixels, already clamped
    CropConfirmed(Rect),
    CropCancelled,
}

/// Sizes and thresholds the controller enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionSettings {
    pub shape_handles: HandleModel,
    pub crop_handles: HandleModel,
    /// Resized shape sides must stay above this (base-display units)
    pub min_shape_size: i32,
    /// Resized crop sides must stay above this (zoomed-display units)
    pub min_crop_size: i32,
    /// Drawn rectangles must exceed this in both dimensions (base-display units)
    pub draw_threshold: i32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            shape_handles: HandleModel::SHAPE,
            crop_handles: HandleModel::CROP,
            min_shape_size: MIN_SHAPE_SIZE,
            min_crop_size: MIN_CROP_SIZE,
            draw_threshold: DRAW_THRESHOLD,
        }
    }
}

/// The shape store and transform of the active image.
pub struct CanvasTarget<'a> {
    pub store: &'a mut ShapeStore,
    pub space: &'a CoordinateSpace,
}

// ============================================================================
// Gesture
// ============================================================================

/// Pointer gesture between a press and its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Rubber band in zoomed-display space
    Drawing { start: Point, current: Point },
    /// Pointer minus shape origin, in base-display units
    Dragging { offset: Point },
    Resizing { handle: Handle },
    CropHandle { handle: Handle },
    /// Last pointer position in zoomed-display space
    CropMove { last: Point },
}

// ============================================================================
// Controller
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: Mode,
    gesture: Gesture,
    selected: Option<usize>,
    crop: Option<Rect>,
    tool: ToolSettings,
    settings: InteractionSettings,
}

impl InteractionController {
    pub fn new(settings: InteractionSettings, tool: ToolSettings) -> Self {
        Self {
            settings,
            tool,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> InteractionState {
        match (self.mode, self.gesture) {
            (Mode::Crop, Gesture::CropHandle { .. }) => InteractionState::CroppingHandleDrag,
            (Mode::Crop, Gesture::CropMove { .. }) => InteractionState::CroppingMove,
            (Mode::Crop, _) => InteractionState::CroppingIdle,
            (_, Gesture::Drawing { .. }) => InteractionState::Drawing,
            (_, Gesture::Dragging { .. }) => InteractionState::Dragging,
            (_, Gesture::Resizing { .. }) => InteractionState::Resizing,
            (Mode::Select, _) => InteractionState::Selecting,
            _ => InteractionState::Idle,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_shape(&self, store: &ShapeStore) -> Option<Shape> {
        self.selected.and_then(|i| store.get(i).copied())
    }

    /// Crop region in zoomed-display space, while crop mode is engaged.
    pub fn crop_region(&self) -> Option<Rect> {
        self.crop
    }

    /// Rubber band of the shape being drawn, in zoomed-display space.
    pub fn preview(&self) -> Option<Rect> {
        match self.gesture {
            Gesture::Drawing { start, current } => Some(Rect::from_corners(start, current)),
            _ => None,
        }
    }

    pub fn tool(&self) -> &ToolSettings {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut ToolSettings {
        &mut self.tool
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// Everything the live view draws on top of the shapes.
    pub fn overlay(&self) -> Overlay {
        Overlay {
            selected: self.selected,
            preview: self.preview(),
            tool: self.tool,
            crop: self.crop,
            shape_handles: self.settings.shape_handles,
            crop_handles: self.settings.crop_handles,
        }
    }

    /// Switch mode. Drops any gesture, selection and crop region; entering
    /// crop mode starts from the whole image when one is loaded.
    pub fn set_mode(&mut self, mode: Mode, space: Option<&CoordinateSpace>) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        if mode == self.mode {
            return events;
        }

        self.gesture = Gesture::Idle;
        if self.selected.take().is_some() {
            events.push(CanvasEvent::SelectionChanged(None));
        }
        if self.crop.take().is_some() {
            events.push(CanvasEvent::CropCancelled);
        }
        self.mode = mode;
        if mode == Mode::Crop {
            self.crop = space.map(CoordinateSpace::zoomed_bounds);
        }
        log::debug!("Canvas mode: {:?}", mode);
        events
    }

    /// Forget transient state after the active image changed. The mode is
    /// kept; crop mode restarts from the new image's bounds.
    pub fn reset(&mut self, space: Option<&CoordinateSpace>) {
        self.gesture = Gesture::Idle;
        self.selected = None;
        self.crop = match self.mode {
            Mode::Crop => space.map(CoordinateSpace::zoomed_bounds),
            _ => None,
        };
    }

    /// Rescale the crop region after the zoom changed from `old` to `new`.
    pub fn zoom_changed(&mut self, old: f64, new: f64) {
        if old <= 0.0 {
            return;
        }
        let factor = new / old;
        let scale = |v: i32| (f64::from(v) * factor) as i32;
        if let Some(crop) = self.crop.as_mut() {
            *crop = Rect::new(
                scale(crop.x),
                scale(crop.y),
                scale(crop.width),
                scale(crop.height),
            );
        }
    }

    /// Drop a selection that no longer points at a shape, e.g. after undo.
    pub fn sync_selection(&mut self, store: &ShapeStore) -> Vec<CanvasEvent> {
        match self.selected {
            Some(index) if index >= store.len() => {
                self.selected = None;
                self.gesture = Gesture::Idle;
                vec![CanvasEvent::SelectionChanged(None)]
            }
            _ => Vec::new(),
        }
    }

    /// Give the selected shape `style`, keeping its geometry.
    pub fn apply_style_to_selected(
        &mut self,
        store: &mut ShapeStore,
        style: ShapeStyle,
    ) -> Vec<CanvasEvent> {
        let Some((index, shape)) = self.selected.zip(self.selected_shape(store)) else {
            return Vec::new();
        };
        if shape.style() == style {
            return Vec::new();
        }
        self.replace_selected(store, index, shape.with_style(style))
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    pub fn pointer_down(&mut self, target: CanvasTarget<'_>, p: Point) -> Vec<CanvasEvent> {
        log::trace!("pointer down {:?} in {:?}", p, self.mode);
        match self.mode {
            Mode::Draw => {
                self.gesture = Gesture::Drawing {
                    start: p,
                    current: p,
                };
                Vec::new()
            }
            Mode::Select => self.select_press(target, p),
            Mode::Crop => {
                self.crop_press(p);
                Vec::new()
            }
        }
    }

    pub fn pointer_move(&mut self, target: CanvasTarget<'_>, p: Point) -> Vec<CanvasEvent> {
        match self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Drawing { start, .. } => {
                self.gesture = Gesture::Drawing { start, current: p };
                Vec::new()
            }
            Gesture::Dragging { offset } => {
                let base = target.space.point_to_base_display(p);
                self.edit_selected(target.store, |shape| {
                    shape.moved_to(base.delta_from(offset))
                })
            }
            Gesture::Resizing { handle } => {
                let base = target.space.point_to_base_display(p);
                let min = self.settings.min_shape_size;
                self.edit_selected(target.store, |shape| {
                    shape.with_bounds(resize_edges(shape.bounds(), handle, base, min))
                })
            }
            Gesture::CropHandle { handle } => {
                if let Some(crop) = self.crop.as_mut() {
                    *crop = resize_edges(*crop, handle, p, self.settings.min_crop_size);
                }
                Vec::new()
            }
            Gesture::CropMove { last } => {
                if let Some(crop) = self.crop.as_mut() {
                    *crop = move_within(*crop, p.delta_from(last), target.space.zoomed_bounds());
                }
                self.gesture = Gesture::CropMove { last: p };
                Vec::new()
            }
        }
    }

    /// Finish the gesture. Only a rubber band produces anything here: a new
    /// shape if it is large enough in base-display space.
    pub fn pointer_up(&mut self, target: CanvasTarget<'_>, p: Point) -> Vec<CanvasEvent> {
        let Gesture::Drawing { start, .. } = std::mem::take(&mut self.gesture) else {
            return Vec::new();
        };

        let zoomed = Rect::from_corners(start, p);
        let base = target.space.rect_to_base_display(zoomed);
        match Shape::from_drag(
            self.tool.kind(),
            base,
            self.tool.style(),
            self.settings.draw_threshold,
        ) {
            Some(shape) => {
                let index = target.store.add(shape);
                log::debug!("Added {} #{} at {:?}", shape.kind().name(), index, base);
                vec![CanvasEvent::ShapeAdded { index }]
            }
            None => {
                log::trace!("Discarded {}x{} drag", base.width, base.height);
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn key_press(&mut self, target: CanvasTarget<'_>, key: Key) -> Vec<CanvasEvent> {
        match (self.mode, key) {
            (Mode::Crop, Key::Enter) => self.confirm_crop(target.space),
            (Mode::Crop, Key::Escape) => self.cancel_crop(),
            (Mode::Select, Key::Delete) => self.delete_selected(target.store),
            _ => Vec::new(),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn select_press(&mut self, target: CanvasTarget<'_>, p: Point) -> Vec<CanvasEvent> {
        // Handles of the current selection win over any shape body
        if let Some(shape) = self.selected_shape(target.store) {
            let on_screen = target.space.rect_to_zoomed_display(shape.bounds());
            if let Some(handle) = self.settings.shape_handles.handle_at(p, on_screen) {
                log::debug!("Resize via {} handle", handle.name());
                self.gesture = Gesture::Resizing { handle };
                return Vec::new();
            }
        }

        let base = target.space.point_to_base_display(p);
        let hit = find_topmost_shape_at(target.store.shapes(), base)
            .and_then(|index| target.store.get(index).map(|shape| (index, *shape)));
        match hit {
            Some((index, shape)) => {
                self.selected = Some(index);
                self.gesture = Gesture::Dragging {
                    offset: base.delta_from(shape.bounds().origin()),
                };
                vec![CanvasEvent::SelectionChanged(Some(shape))]
            }
            None => {
                self.selected = None;
                self.gesture = Gesture::Idle;
                vec![CanvasEvent::SelectionChanged(None)]
            }
        }
    }

    fn crop_press(&mut self, p: Point) {
        let Some(crop) = self.crop else {
            return;
        };
        self.gesture = if let Some(handle) = self.settings.crop_handles.handle_at(p, crop) {
            Gesture::CropHandle { handle }
        } else if crop.contains(p) {
            Gesture::CropMove { last: p }
        } else {
            Gesture::Idle
        };
    }

    fn confirm_crop(&mut self, space: &CoordinateSpace) -> Vec<CanvasEvent> {
        let Some(region) = self.crop else {
            return Vec::new();
        };
        match space.crop_to_pixel_space(region) {
            Some(pixels) => {
                self.crop = None;
                self.gesture = Gesture::Idle;
                self.mode = Mode::Draw;
                log::debug!("Crop confirmed: {:?} -> {:?} px", region, pixels);
                vec![CanvasEvent::CropConfirmed(pixels)]
            }
            None => {
                log::debug!("Crop region {:?} too small to commit", region);
                Vec::new()
            }
        }
    }

    fn cancel_crop(&mut self) -> Vec<CanvasEvent> {
        self.crop = None;
        self.gesture = Gesture::Idle;
        self.mode = Mode::Draw;
        log::debug!("Crop cancelled");
        vec![CanvasEvent::CropCancelled]
    }

    fn delete_selected(&mut self, store: &mut ShapeStore) -> Vec<CanvasEvent> {
        let Some(index) = self.selected.take() else {
            return Vec::new();
        };
        self.gesture = Gesture::Idle;
        match store.remove(index) {
            Ok(_) => vec![
                CanvasEvent::ShapeRemoved { index },
                CanvasEvent::SelectionChanged(None),
            ],
            Err(e) => {
                log::warn!("Delete of stale selection: {}", e);
                vec![CanvasEvent::SelectionChanged(None)]
            }
        }
    }

    fn edit_selected(
        &mut self,
        store: &mut ShapeStore,
        edit: impl FnOnce(Shape) -> Shape,
    ) -> Vec<CanvasEvent> {
        let Some((index, shape)) = self.selected.zip(self.selected_shape(store)) else {
            return Vec::new();
        };
        let edited = edit(shape);
        if edited == shape {
            return Vec::new();
        }
        self.replace_selected(store, index, edited)
    }

    fn replace_selected(
        &mut self,
        store: &mut ShapeStore,
        index: usize,
        shape: Shape,
    ) -> Vec<CanvasEvent> {
        match store.replace(index, shape) {
            Ok(_) => vec![CanvasEvent::ShapeModified { index }],
            Err(e) => {
                log::warn!("Dropping stale selection: {}", e);
                self.selected = None;
                self.gesture = Gesture::Idle;
                vec![CanvasEvent::SelectionChanged(None)]
            }
        }
    }
}
