//! Session tests against real files in a temporary directory.

mod slot_tests;

use std::path::PathBuf;

use tempfile::TempDir;

use super::Session;
use crate::config::AppConfig;
use crate::interaction::CanvasEvent;
use crate::model::{Point, Rect};
use crate::test_image;

/// Session plus the directory its files live in.
struct Fixture {
    dir: TempDir,
    session: Session,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            session: Session::new(AppConfig::default()),
        }
    }

    /// Write a gradient PNG of the given size and return its path.
    fn png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        test_image::write_png(self.dir.path(), name, width, height)
    }

    /// Fixture with one 200x100 image open at base scale 1.0.
    fn with_image() -> (Self, PathBuf) {
        let mut fixture = Self::new();
        let path = fixture.png("photo.png", 200, 100);
        let report = fixture.session.open_files(&[&path]);
        assert!(report.failures.is_empty());
        (fixture, path)
    }

    fn drag(&mut self, from: (i32, i32), to: (i32, i32)) -> Vec<CanvasEvent> {
        let mut events = self.session.pointer_down(Point::new(from.0, from.1));
        events.extend(self.session.pointer_move(Point::new(to.0, to.1)));
        events.extend(self.session.pointer_up(Point::new(to.0, to.1)));
        events
    }

    fn shape_bounds(&self) -> Vec<Rect> {
        self.session
            .active_slot()
            .map(|slot| slot.shapes().iter().map(|s| s.bounds()).collect())
            .unwrap_or_default()
    }
}
