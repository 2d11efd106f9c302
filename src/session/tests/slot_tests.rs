use super::*;
use crate::codec::CodecError;
use crate::interaction::Mode;
use crate::session::SessionError;

#[test]
fn test_no_slot_ignores_input() {
    let mut fixture = Fixture::new();
    let session = &mut fixture.session;

    assert!(session.active_slot().is_none());
    assert!(session.pointer_down(Point::new(5, 5)).is_empty());
    assert!(session.pointer_up(Point::new(50, 50)).is_empty());
    assert!(session.undo().is_empty());
    assert_eq!(session.zoom_in(), None);
    assert!(session.render_view().unwrap().is_none());
    assert!(matches!(
        session.export_active(&fixture.dir.path().join("x.png"), None),
        Err(SessionError::NoActiveSlot)
    ));
    assert!(matches!(session.save_active(), Err(SessionError::NoActiveSlot)));
}

#[test]
fn test_open_collects_failures() {
    let mut fixture = Fixture::new();
    let a = fixture.png("a.png", 30, 20);
    let missing = fixture.dir.path().join("missing.png");
    let b = fixture.png("b.png", 40, 20);

    let report = fixture.session.open_files(&[&a, &missing, &b]);
    assert_eq!(report.opened, vec![0, 1]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, missing);
    assert!(matches!(report.failures[0].1, CodecError::NotFound(_)));

    // last opened file is active
    assert_eq!(fixture.session.active_index(), Some(1));
    assert_eq!(fixture.session.active_slot().unwrap().path(), b.as_path());
}

#[test]
fn test_open_large_image_fits_viewport() {
    let mut fixture = Fixture::new();
    let path = fixture.png("big.png", 2000, 1000);
    fixture.session.open_files(&[&path]);

    let slot = fixture.session.active_slot().unwrap();
    assert!(slot.space().base_scale() < 1.0);
    let (w, h) = slot.display().dimensions();
    assert!(w <= 800 && h <= 600);
    assert_eq!(slot.raster().dimensions(), (2000, 1000));
}

#[test]
fn test_zoom_is_kept_per_slot() {
    let mut fixture = Fixture::new();
    let a = fixture.png("a.png", 100, 100);
    let b = fixture.png("b.png", 100, 100);
    fixture.session.open_files(&[&a, &b]);

    fixture.session.set_zoom(2.0);
    fixture.session.switch_to(0).unwrap();
    assert_eq!(fixture.session.active_slot().unwrap().space().zoom(), 1.0);
    fixture.session.zoom_out();

    fixture.session.switch_to(1).unwrap();
    assert_eq!(fixture.session.active_slot().unwrap().space().zoom(), 2.0);
    fixture.session.switch_to(0).unwrap();
    let zoom = fixture.session.active_slot().unwrap().space().zoom();
    assert!((zoom - 1.0 / 1.15).abs() < 1e-9);
}

#[test]
fn test_zoom_clamps() {
    let (mut fixture, _) = Fixture::with_image();
    assert_eq!(fixture.session.set_zoom(0.01), Some(0.25));
    assert_eq!(fixture.session.set_zoom(100.0), Some(4.0));
    assert_eq!(fixture.session.reset_zoom(), Some(1.0));
}

#[test]
fn test_switch_resets_selection() {
    let mut fixture = Fixture::new();
    let a = fixture.png("a.png", 100, 100);
    let b = fixture.png("b.png", 100, 100);
    fixture.session.open_files(&[&a, &b]);

    fixture.drag((10, 10), (50, 50));
    fixture.session.set_mode(Mode::Select);
    fixture.session.pointer_down(Point::new(20, 20));
    fixture.session.pointer_up(Point::new(20, 20));
    assert_eq!(fixture.session.controller().selected(), Some(0));

    fixture.session.switch_to(0).unwrap();
    assert_eq!(fixture.session.controller().selected(), None);
    assert_eq!(fixture.session.controller().mode(), Mode::Select);
    assert!(fixture.shape_bounds().is_empty());

    fixture.session.switch_to(1).unwrap();
    assert_eq!(fixture.shape_bounds(), vec![Rect::new(10, 10, 40, 40)]);
}

#[test]
fn test_switch_to_missing_slot() {
    let (mut fixture, _) = Fixture::with_image();
    assert!(matches!(
        fixture.session.switch_to(3),
        Err(SessionError::NoSuchSlot { index: 3, len: 1 })
    ));
    assert_eq!(fixture.session.active_index(), Some(0));
}

#[test]
fn test_close_moves_active_pointer() {
    let mut fixture = Fixture::new();
    let paths: Vec<_> = ["a.png", "b.png", "c.png"]
        .iter()
        .map(|name| fixture.png(name, 20, 20))
        .collect();
    fixture.session.open_files(paths.as_slice());
    assert_eq!(fixture.session.active_index(), Some(2));

    // closing an earlier slot shifts the pointer down
    fixture.session.close(0).unwrap();
    assert_eq!(fixture.session.active_index(), Some(1));
    assert_eq!(
        fixture.session.active_slot().unwrap().path(),
        paths[2].as_path()
    );

    // closing the active last slot falls back to the new last
    fixture.session.close(1).unwrap();
    assert_eq!(fixture.session.active_index(), Some(0));

    fixture.session.close(0).unwrap();
    assert_eq!(fixture.session.active_index(), None);
}

#[test]
fn test_reset_returns_to_no_slot() {
    let (mut fixture, _) = Fixture::with_image();
    fixture.session.reset();
    assert!(fixture.session.slots().is_empty());
    assert!(fixture.session.active_slot().is_none());
}

#[test]
fn test_render_view_size_follows_zoom() {
    let (mut fixture, _) = Fixture::with_image();
    fixture.session.set_zoom(2.0);
    let view = fixture.session.render_view().unwrap().unwrap();
    assert_eq!(view.dimensions(), (400, 200));
}
