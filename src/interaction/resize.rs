//! Edge rules shared by shape resizing and crop-region adjustment.

use crate::hit_test::Handle;
use crate::model::{Point, Rect};

/// Move the edges `handle` controls to `pointer`.
///
/// Each edge is judged on its own: an update that would leave that dimension
/// at or below `min_size` is dropped and the old edge kept. Corner handles
/// apply two single-edge rules.
pub fn resize_edges(bounds: Rect, handle: Handle, pointer: Point, min_size: i32) -> Rect {
    let Rect {
        mut x,
        mut y,
        mut width,
        mut height,
    } = bounds;

    if handle.north() {
        let new_height = y + height - pointer.y;
        if new_height > min_size {
            y = pointer.y;
            height = new_height;
        }
    }
    if handle.south() {
        let new_height = pointer.y - y;
        if new_height > min_size {
            height = new_height;
        }
    }
    if handle.west() {
        let new_width = x + width - pointer.x;
        if new_width > min_size {
            x = pointer.x;
            width = new_width;
        }
    }
    if handle.east() {
        let new_width = pointer.x - x;
        if new_width > min_size {
            width = new_width;
        }
    }

    Rect::new(x, y, width, height)
}

/// Translate `region` by `delta`, keeping it inside `within` where it fits.
pub fn move_within(region: Rect, delta: Point, within: Rect) -> Rect {
    let max_x = (within.right() - region.width).max(within.x);
    let max_y = (within.bottom() - region.height).max(within.y);
    Rect::new(
        (region.x + delta.x).clamp(within.x, max_x),
        (region.y + delta.y).clamp(within.y, max_y),
        region.width,
        region.height,
    )
}
