//! Ordered shape list with single-step redo.
//!
//! Append order is z-order: later shapes draw on top. Undo pops the topmost
//! shape into a redo buffer; any other mutation clears that buffer, except
//! `replace`, so moving or restyling a shape keeps the redo history.

use thiserror::Error;

use super::shape::Shape;

/// Errors from index-based store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Shape index {index} out of range (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Shapes drawn on one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeStore {
    /// Shapes in z-order
    shapes: Vec<Shape>,
    /// Undone shapes, most recent last
    redo_buffer: Vec<Shape>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.shapes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_buffer.is_empty()
    }

    /// Append a shape on top and return its index.
    pub fn add(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.redo_buffer.clear();
        self.shapes.len() - 1
    }

    /// Swap the shape at `index` for `shape`, returning the old one.
    pub fn replace(&mut self, index: usize, shape: Shape) -> Result<Shape, StoreError> {
        let len = self.shapes.len();
        let slot = self
            .shapes
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, shape))
    }

    /// Remove the shape at `index`. Clears the redo buffer.
    pub fn remove(&mut self, index: usize) -> Result<Shape, StoreError> {
        if index >= self.shapes.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.shapes.len(),
            });
        }
        self.redo_buffer.clear();
        Ok(self.shapes.remove(index))
    }

    /// Drop every shape and the redo buffer.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.redo_buffer.clear();
    }

    /// Move the topmost shape to the redo buffer. No-op when empty.
    pub fn undo(&mut self) -> Option<Shape> {
        let shape = self.shapes.pop()?;
        self.redo_buffer.push(shape);
        log::debug!(
            "Undo: {} shapes, {} redoable",
            self.shapes.len(),
            self.redo_buffer.len()
        );
        Some(shape)
    }

    /// Restore the most recently undone shape. No-op when nothing is buffered.
    pub fn redo(&mut self) -> Option<Shape> {
        let shape = self.redo_buffer.pop()?;
        self.shapes.push(shape);
        log::debug!(
            "Redo: {} shapes, {} redoable",
            self.shapes.len(),
            self.redo_buffer.len()
        );
        Some(shape)
    }

    /// Replace the whole list, e.g. after a crop reshaped every shape.
    pub(crate) fn reset_to(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.redo_buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::Rect;
    use crate::model::shape::{ShapeKind, ShapeStyle};

    fn rect_shape(x: i32) -> Shape {
        Shape::new(
            ShapeKind::Rectangle,
            Rect::new(x, 0, 10, 10),
            ShapeStyle::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_add_clears_redo() {
        let mut store = ShapeStore::new();
        store.add(rect_shape(0));
        store.undo();
        assert!(store.can_redo());

        assert_eq!(store.add(rect_shape(1)), 0);
        assert!(!store.can_redo());
        assert_eq!(store.redo(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_undo_redo_restores_same_shape() {
        let mut store = ShapeStore::new();
        let shape = rect_shape(5);
        store.add(rect_shape(0));
        store.add(shape);

        assert_eq!(store.undo(), Some(shape));
        assert_eq!(store.len(), 1);
        assert_eq!(store.redo(), Some(shape));
        assert_eq!(store.shapes().last(), Some(&shape));
    }

    #[test]
    fn test_undo_redo_on_empty_is_noop() {
        let mut store = ShapeStore::new();
        assert_eq!(store.undo(), None);
        assert_eq!(store.redo(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_undo_twice_redo_in_reverse_order() {
        let mut store = ShapeStore::new();
        let (a, b) = (rect_shape(0), rect_shape(1));
        store.add(a);
        store.add(b);
        store.undo();
        store.undo();

        assert_eq!(store.redo(), Some(a));
        assert_eq!(store.redo(), Some(b));
        assert_eq!(store.shapes(), &[a, b]);
    }

    #[test]
    fn test_replace_keeps_redo() {
        let mut store = ShapeStore::new();
        store.add(rect_shape(0));
        store.add(rect_shape(1));
        store.undo();

        let old = store.replace(0, rect_shape(9)).unwrap();
        assert_eq!(old, rect_shape(0));
        assert_eq!(store.get(0), Some(&rect_shape(9)));
        assert!(store.can_redo());
    }

    #[test]
    fn test_remove_clears_redo() {
        let mut store = ShapeStore::new();
        store.add(rect_shape(0));
        store.add(rect_shape(1));
        store.add(rect_shape(2));
        store.undo();

        assert_eq!(store.remove(0), Ok(rect_shape(0)));
        assert!(!store.can_redo());
        assert_eq!(store.shapes(), &[rect_shape(1)]);
    }

    #[test]
    fn test_bad_index() {
        let mut store = ShapeStore::new();
        store.add(rect_shape(0));
        assert_eq!(
            store.replace(1, rect_shape(1)),
            Err(StoreError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            store.remove(3),
            Err(StoreError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_empties_both() {
        let mut store = ShapeStore::new();
        store.add(rect_shape(0));
        store.add(rect_shape(1));
        store.undo();
        store.clear();
        assert!(store.is_empty());
        assert!(!store.can_redo());
    }
}
