//! Behaviour tests for the canvas state machine.
//!
//! Each test drives a controller against a store and coordinate space through
//! the same pointer/key calls the session makes.

mod select_tests;

use super::{CanvasEvent, CanvasTarget, InteractionController, Key, Mode};
use crate::coords::{CoordinateSpace, ZoomLimits};
use crate::model::{Point, Rect, Shape, ShapeKind, ShapeStore, ShapeStyle};

/// Controller plus the data it edits.
struct Canvas {
    ctl: InteractionController,
    store: ShapeStore,
    space: CoordinateSpace,
}

impl Canvas {
    /// 400x300 image shown at base scale 1.0 and the given zoom.
    fn new(zoom: f64) -> Self {
        let mut space = CoordinateSpace::new(400, 300, 1.0, ZoomLimits::default());
        space.set_zoom(zoom);
        Self {
            ctl: InteractionController::default(),
            store: ShapeStore::new(),
            space,
        }
    }

    fn with_shapes(zoom: f64, rects: &[Rect]) -> Self {
        let mut canvas = Self::new(zoom);
        for r in rects {
            canvas.store.add(shape(*r));
        }
        canvas
    }

    fn mode(&mut self, mode: Mode) -> Vec<CanvasEvent> {
        self.ctl.set_mode(mode, Some(&self.space))
    }

    fn down(&mut self, x: i32, y: i32) -> Vec<CanvasEvent> {
        let target = CanvasTarget {
            store: &mut self.store,
            space: &self.space,
        };
        self.ctl.pointer_down(target, Point::new(x, y))
    }

    fn move_to(&mut self, x: i32, y: i32) -> Vec<CanvasEvent> {
        let target = CanvasTarget {
            store: &mut self.store,
            space: &self.space,
        };
        self.ctl.pointer_move(target, Point::new(x, y))
    }

    fn up(&mut self, x: i32, y: i32) -> Vec<CanvasEvent> {
        let target = CanvasTarget {
            store: &mut self.store,
            space: &self.space,
        };
        self.ctl.pointer_up(target, Point::new(x, y))
    }

    fn key(&mut self, key: Key) -> Vec<CanvasEvent> {
        let target = CanvasTarget {
            store: &mut self.store,
            space: &self.space,
        };
        self.ctl.key_press(target, key)
    }

    /// Press, move, release. Returns every event in order.
    fn drag(&mut self, from: (i32, i32), to: (i32, i32)) -> Vec<CanvasEvent> {
        let mut events = self.down(from.0, from.1);
        events.extend(self.move_to(to.0, to.1));
        events.extend(self.up(to.0, to.1));
        events
    }

    fn bounds(&self, index: usize) -> Rect {
        self.store.shapes()[index].bounds()
    }
}

fn shape(bounds: Rect) -> Shape {
    Shape::new(ShapeKind::Rectangle, bounds, ShapeStyle::default()).unwrap()
}
