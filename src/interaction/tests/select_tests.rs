//! Select mode: picking, dragging, resizing, deleting.

use super::*;
use crate::color::Color;
use crate::interaction::InteractionState;

fn selecting(zoom: f64, rects: &[Rect]) -> Canvas {
    let mut canvas = Canvas::with_shapes(zoom, rects);
    canvas.mode(Mode::Select);
    canvas
}

#[test]
fn test_click_selects_topmost() {
    let mut canvas = selecting(1.0, &[Rect::new(0, 0, 100, 100), Rect::new(50, 50, 100, 100)]);
    let events = canvas.down(60, 60);

    assert_eq!(
        events,
        vec![CanvasEvent::SelectionChanged(Some(shape(Rect::new(50, 50, 100, 100))))]
    );
    assert_eq!(canvas.ctl.selected(), Some(1));
    assert_eq!(canvas.ctl.state(), InteractionState::Dragging);

    canvas.up(60, 60);
    assert_eq!(canvas.ctl.state(), InteractionState::Selecting);
    assert_eq!(canvas.ctl.selected(), Some(1));
}

#[test]
fn test_click_empty_deselects() {
    let mut canvas = selecting(1.0, &[Rect::new(0, 0, 50, 50)]);
    canvas.down(10, 10);
    canvas.up(10, 10);

    let events = canvas.down(200, 200);
    assert_eq!(events, vec![CanvasEvent::SelectionChanged(None)]);
    assert_eq!(canvas.ctl.selected(), None);
}

#[test]
fn test_drag_moves_keeping_offset() {
    let mut canvas = selecting(1.0, &[Rect::new(20, 20, 60, 40)]);
    let events = canvas.drag((30, 25), (130, 75));

    assert!(events.contains(&CanvasEvent::ShapeModified { index: 0 }));
    assert_eq!(canvas.bounds(0), Rect::new(120, 70, 60, 40));
    assert_eq!(canvas.store.shapes()[0].style(), ShapeStyle::default());
}

#[test]
fn test_drag_under_zoom_moves_in_base_units() {
    let mut canvas = selecting(2.0, &[Rect::new(20, 20, 60, 40)]);
    // (60, 60) zoomed is (30, 30) base, inside the shape
    canvas.drag((60, 60), (160, 60));
    assert_eq!(canvas.bounds(0), Rect::new(70, 20, 60, 40));
}

#[test]
fn test_drag_keeps_redo_buffer() {
    let mut canvas = selecting(1.0, &[Rect::new(0, 0, 50, 50), Rect::new(100, 100, 20, 20)]);
    canvas.store.undo();
    canvas.drag((10, 10), (20, 20));
    assert!(canvas.store.can_redo());
}

#[test]
fn test_resize_se_handle() {
    let mut canvas = selecting(1.0, &[Rect::new(20, 20, 60, 40)]);
    canvas.down(40, 40);
    canvas.up(40, 40);

    canvas.down(80, 60);
    assert_eq!(canvas.ctl.state(), InteractionState::Resizing);
    canvas.move_to(100, 80);
    canvas.up(100, 80);

    assert_eq!(canvas.bounds(0), Rect::new(20, 20, 80, 60));
}

#[test]
fn test_resize_nw_handle() {
    let mut canvas = selecting(1.0, &[Rect::new(40, 40, 60, 40)]);
    canvas.down(50, 50);
    canvas.up(50, 50);

    canvas.drag((40, 40), (30, 30));
    assert_eq!(canvas.bounds(0), Rect::new(30, 30, 70, 50));
}

#[test]
fn test_handle_beats_body_of_other_shape() {
    // second shape covers the first one's se corner
    let mut canvas = selecting(1.0, &[Rect::new(20, 20, 60, 40), Rect::new(70, 50, 50, 50)]);
    canvas.down(30, 30);
    canvas.up(30, 30);
    assert_eq!(canvas.ctl.selected(), Some(0));

    canvas.down(80, 60);
    assert_eq!(canvas.ctl.state(), InteractionState::Resizing);
    assert_eq!(canvas.ctl.selected(), Some(0));
}

#[test]
fn test_handles_scale_position_not_size() {
    let mut canvas = selecting(2.0, &[Rect::new(20, 20, 60, 40)]);
    canvas.down(60, 60);
    canvas.up(60, 60);

    // se corner at zoom 2 sits at (160, 120); the hit box spans 153..167
    canvas.down(166, 126);
    assert_eq!(canvas.ctl.state(), InteractionState::Resizing);
    canvas.up(166, 126);

    canvas.down(167, 127);
    assert_ne!(canvas.ctl.state(), InteractionState::Resizing);
}

#[test]
fn test_resize_rejects_collapse() {
    let mut canvas = selecting(1.0, &[Rect::new(20, 20, 60, 40)]);
    canvas.down(40, 40);
    canvas.up(40, 40);

    canvas.down(80, 60);
    let events = canvas.move_to(22, 22);
    assert!(events.is_empty());
    assert_eq!(canvas.bounds(0), Rect::new(20, 20, 60, 40));
}

#[test]
fn test_delete_removes_selected() {
    let mut canvas = selecting(1.0, &[Rect::new(0, 0, 50, 50), Rect::new(100, 100, 20, 20)]);
    canvas.down(10, 10);
    canvas.up(10, 10);

    let events = canvas.key(Key::Delete);
    assert_eq!(
        events,
        vec![
            CanvasEvent::ShapeRemoved { index: 0 },
            CanvasEvent::SelectionChanged(None)
        ]
    );
    assert_eq!(canvas.store.len(), 1);
    assert_eq!(canvas.bounds(0), Rect::new(100, 100, 20, 20));
    assert!(canvas.key(Key::Delete).is_empty());
}

#[test]
fn test_apply_style_to_selected() {
    let mut canvas = selecting(1.0, &[Rect::new(0, 0, 50, 50)]);
    canvas.down(10, 10);
    canvas.up(10, 10);

    let style = ShapeStyle::new(Some(Color::BLACK), 5, Some(Color::WHITE)).unwrap();
    let events = canvas.ctl.apply_style_to_selected(&mut canvas.store, style);
    assert_eq!(events, vec![CanvasEvent::ShapeModified { index: 0 }]);
    assert_eq!(canvas.store.shapes()[0].style(), style);
    assert_eq!(canvas.bounds(0), Rect::new(0, 0, 50, 50));
}

#[test]
fn test_undo_clears_stale_selection() {
    let mut canvas = selecting(1.0, &[Rect::new(0, 0, 50, 50)]);
    canvas.down(10, 10);
    canvas.up(10, 10);

    canvas.store.undo();
    let events = canvas.ctl.sync_selection(&canvas.store);
    assert_eq!(events, vec![CanvasEvent::SelectionChanged(None)]);
    assert!(canvas.move_to(20, 20).is_empty());
}

#[test]
fn test_leaving_select_mode_deselects() {
    let mut canvas = selecting(1.0, &[Rect::new(0, 0, 50, 50)]);
    canvas.down(10, 10);
    canvas.up(10, 10);

    let events = canvas.mode(Mode::Draw);
    assert_eq!(events, vec![CanvasEvent::SelectionChanged(None)]);
    assert_eq!(canvas.ctl.selected(), None);
}
