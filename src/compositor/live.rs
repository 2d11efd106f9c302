//! On-screen view in zoomed-display space.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use markcrop_raster::{Canvas, Primitive, RasterError};

use super::{brush_for, primitive_for, to_bounds};
use crate::constants::SELECTION_OUTSET;
use crate::coords::CoordinateSpace;
use crate::hit_test::HandleModel;
use crate::interaction::ToolSettings;
use crate::model::{Rect, Shape};

const SELECTION_COLOR: [u8; 4] = [0x00, 0x80, 0xFF, 0xFF];
const HANDLE_FILL: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const CROP_DIM: [u8; 4] = [0, 0, 0, 128];
const CROP_BORDER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const DASH: f32 = 4.0;

/// Interaction decorations drawn above the shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    /// Index of the selected shape
    pub selected: Option<usize>,
    /// Rubber band of a shape being drawn (zoomed display)
    pub preview: Option<Rect>,
    /// Tool the rubber band previews
    pub tool: ToolSettings,
    /// Crop region (zoomed display)
    pub crop: Option<Rect>,
    pub shape_handles: HandleModel,
    pub crop_handles: HandleModel,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            selected: None,
            preview: None,
            tool: ToolSettings::default(),
            crop: None,
            shape_handles: HandleModel::SHAPE,
            crop_handles: HandleModel::CROP,
        }
    }
}

/// Render the view: the base-display raster scaled by the zoom, every shape
/// at zoomed coordinates, then the overlay.
pub fn render_view(
    display: &RgbaImage,
    shapes: &[Shape],
    space: &CoordinateSpace,
    overlay: &Overlay,
) -> Result<RgbaImage, RasterError> {
    let (width, height) = space.zoomed_display_size();
    let mut canvas = if display.dimensions() == (width, height) {
        Canvas::from_rgba(display)?
    } else {
        Canvas::from_rgba(&imageops::resize(display, width, height, FilterType::Triangle))?
    };

    for shape in shapes {
        let bounds = space.rect_to_zoomed_display(shape.bounds());
        let style = shape.style();
        let brush = brush_for(&style, space.stroke_to_zoomed_display(style.stroke_width()), true);
        canvas.draw(primitive_for(shape.kind()), to_bounds(bounds), &brush);
    }

    if let Some(shape) = overlay.selected.and_then(|i| shapes.get(i)) {
        let bounds = space.rect_to_zoomed_display(shape.bounds());
        canvas.dashed_outline(
            Primitive::Rect,
            to_bounds(bounds.outset(SELECTION_OUTSET)),
            SELECTION_COLOR,
            1.0,
            DASH,
        );
        draw_handles(&mut canvas, overlay.shape_handles, bounds);
    }

    if let Some(preview) = overlay.preview {
        let style = overlay.tool.style();
        let color = style.stroke_color().map_or(SELECTION_COLOR, |c| c.to_array());
        let width = space.stroke_to_zoomed_display(style.stroke_width()) as f32;
        canvas.dashed_outline(
            primitive_for(overlay.tool.kind()),
            to_bounds(preview),
            color,
            width,
            DASH,
        );
    }

    if let Some(crop) = overlay.crop {
        canvas.dim_outside(to_bounds(crop), CROP_DIM);
        canvas.dashed_outline(Primitive::Rect, to_bounds(crop), CROP_BORDER, 1.0, DASH);
        draw_handles(&mut canvas, overlay.crop_handles, crop);
    }

    Ok(canvas.into_rgba())
}

fn draw_handles(canvas: &mut Canvas, model: HandleModel, bounds: Rect) {
    for (_, rect) in model.handle_rects(bounds) {
        canvas.handle(to_bounds(rect), HANDLE_FILL, SELECTION_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::coords::ZoomLimits;
    use crate::model::{ShapeKind, ShapeStyle};
    use crate::test_image;

    const GREY: [u8; 4] = [128, 128, 128, 255];

    fn near(px: [u8; 4], expected: [u8; 4]) -> bool {
        px.iter().zip(expected).all(|(a, b)| a.abs_diff(b) <= 1)
    }

    fn filled_shape(bounds: Rect) -> Shape {
        let style = ShapeStyle::new(None, 1, Some(Color::BLUE)).unwrap();
        Shape::new(ShapeKind::Rectangle, bounds, style).unwrap()
    }

    #[test]
    fn test_view_size_follows_zoom() {
        let display = test_image::solid(100, 50, GREY);
        let mut space = CoordinateSpace::new(200, 100, 0.5, ZoomLimits::default());
        space.set_zoom(2.0);

        let view = render_view(&display, &[], &space, &Overlay::default()).unwrap();
        assert_eq!(view.dimensions(), (200, 100));
        assert!(near(view.get_pixel(150, 80).0, GREY));
    }

    #[test]
    fn test_shapes_drawn_at_zoomed_position() {
        let display = test_image::solid(100, 100, GREY);
        let mut space = CoordinateSpace::new(100, 100, 1.0, ZoomLimits::default());
        space.set_zoom(2.0);
        let shapes = [filled_shape(Rect::new(10, 10, 20, 20))];

        let view = render_view(&display, &shapes, &space, &Overlay::default()).unwrap();
        assert_eq!(view.get_pixel(40, 40).0, [0, 0, 255, 255]);
        assert!(near(view.get_pixel(15, 15).0, GREY));
    }

    #[test]
    fn test_selection_draws_handles() {
        let display = test_image::solid(100, 100, GREY);
        let space = CoordinateSpace::new(100, 100, 1.0, ZoomLimits::default());
        let shapes = [filled_shape(Rect::new(20, 20, 40, 40))];
        let overlay = Overlay {
            selected: Some(0),
            ..Default::default()
        };

        let view = render_view(&display, &shapes, &space, &overlay).unwrap();
        // centre of the se handle square is white
        assert_eq!(view.get_pixel(60, 60).0, HANDLE_FILL);
        // far from the selection nothing changed
        assert_eq!(view.get_pixel(90, 5).0, GREY);
    }

    #[test]
    fn test_crop_dims_outside() {
        let display = test_image::solid(100, 100, GREY);
        let space = CoordinateSpace::new(100, 100, 1.0, ZoomLimits::default());
        let overlay = Overlay {
            crop: Some(Rect::new(20, 20, 60, 60)),
            ..Default::default()
        };

        let view = render_view(&display, &[], &space, &overlay).unwrap();
        assert_eq!(view.get_pixel(50, 50).0, GREY);
        let dimmed = view.get_pixel(5, 50).0;
        assert!(dimmed[0] < 100, "outside not dimmed: {:?}", dimmed);
    }
}
