//! Capabilities the effect needs from whatever host renders it.
//!
//! The effect never touches a concrete rendering stack. A host provides a
//! [`Container`] that can attach a [`Surface`], a [`Scheduler`] for
//! presentation-timed frame callbacks, and forwards [`HostEvent`]s.

use crate::color::Rgba;

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint of the segment to another point.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Pixel dimensions of the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Horizontal anchoring of text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
}

/// Vertical anchoring of text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Middle,
}

/// Soft glow drawn around filled text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

/// How a single glyph is filled.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    /// CSS-style font shorthand, e.g. `14px "Courier New", monospace`.
    pub font: &'a str,
    pub color: Rgba,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    pub glow: Option<Glow>,
}

/// A color stop along a linear gradient, `offset` in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Linear gradient running from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: [ColorStop; 3],
}

impl LinearGradient {
    /// Color at parameter `t` along the gradient axis.
    pub fn color_at(&self, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let segment = self
            .stops
            .windows(2)
            .find(|pair| t <= pair[1].offset)
            .unwrap_or(&self.stops[1..]);
        let (from, to) = (segment[0], segment[segment.len() - 1]);
        let span = to.offset - from.offset;
        if span <= f32::EPSILON {
            return to.color;
        }
        from.color.lerp(to.color, (t - from.offset) / span)
    }
}

/// Stroke paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
}

/// Line stroke parameters. `alpha` multiplies the paint's own alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub alpha: f32,
    pub width: f32,
}

/// A 2D drawing context.
pub trait Surface {
    /// Change the backing pixel dimensions.
    fn resize(&mut self, viewport: Viewport);

    /// Erase everything drawn in the given area.
    fn clear(&mut self, viewport: Viewport);

    /// Stroke a straight segment.
    fn stroke_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, color: Rgba);

    /// Fill a single glyph at `at`.
    fn fill_text(&mut self, glyph: char, at: Point, style: &TextStyle<'_>);
}

/// How the drawing surface is placed when attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSpec<'a> {
    pub id: &'a str,
    pub z_index: i32,
    /// CSS background painted beneath everything drawn on the surface.
    pub background: &'a str,
    /// The surface never captures pointer input from content above it.
    pub pointer_events: bool,
}

/// Document-like host that can hold a drawing surface.
pub trait Container {
    type Surface: Surface;

    /// Current viewport dimensions in pixels.
    fn viewport(&self) -> Viewport;

    /// Create a full-viewport surface and insert it as the first child.
    fn attach(&mut self, spec: &SurfaceSpec<'_>) -> Self::Surface;

    /// Remove a previously attached surface.
    fn detach(&mut self, surface: Self::Surface);
}

/// Handle identifying one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Presentation-timed callback scheduler.
///
/// When a requested frame comes due the host calls back into the effect with
/// the same [`FrameRequest`].
pub trait Scheduler {
    fn request_frame(&mut self) -> FrameRequest;

    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Notifications delivered by the host between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    Resize(Viewport),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> LinearGradient {
        let stop = |offset, v| ColorStop {
            offset,
            color: Rgba::rgb(v, v, v),
        };
        LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            stops: [stop(0.0, 0), stop(0.5, 100), stop(1.0, 200)],
        }
    }

    #[test]
    fn test_distance_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.midpoint(b), Point::new(1.5, 2.0));
    }

    #[test]
    fn test_gradient_color_at() {
        let g = gradient();
        assert_eq!(g.color_at(0.0), Rgba::rgb(0, 0, 0));
        assert_eq!(g.color_at(0.25), Rgba::rgb(50, 50, 50));
        assert_eq!(g.color_at(0.5), Rgba::rgb(100, 100, 100));
        assert_eq!(g.color_at(0.75), Rgba::rgb(150, 150, 150));
        assert_eq!(g.color_at(2.0), Rgba::rgb(200, 200, 200));
    }
}
