//! Faint background grid (stateless).

use cybermatrix_core::{Paint, Point, Settings, Stroke, Surface, Viewport};

use crate::palette::Palette;

const LINE_WIDTH: f32 = 0.5;

/// Draw vertical then horizontal lines every `grid_size` pixels.
pub fn draw(
    surface: &mut impl Surface,
    viewport: Viewport,
    settings: &Settings,
    palette: &Palette,
) {
    let step = settings.grid_size;
    if !(step.is_finite() && step > 0.0) {
        return;
    }
    let stroke = Stroke {
        paint: Paint::Solid(palette.grid),
        alpha: settings.grid_opacity,
        width: LINE_WIDTH,
    };

    for x in offsets(viewport.width, step) {
        surface.stroke_line(Point::new(x, 0.0), Point::new(x, viewport.height), &stroke);
    }
    for y in offsets(viewport.height, step) {
        surface.stroke_line(Point::new(0.0, y), Point::new(viewport.width, y), &stroke);
    }
}

fn offsets(extent: f32, step: f32) -> impl Iterator<Item = f32> {
    (0u32..)
        .map(move |i| i as f32 * step)
        .take_while(move |v| *v < extent)
}
