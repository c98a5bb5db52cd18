//! Matrix rain animation (stateful).

use cybermatrix_core::{
    Glow, Point, Settings, Surface, TextAlign, TextBaseline, TextStyle, Viewport,
};
use rand::Rng;

use crate::{chars, palette::Palette};

/// Horizontal spacing between rain lanes.
pub const LANE_WIDTH: f32 = 20.0;
/// Vertical distance between consecutive glyphs of a trail. Also sets how far
/// past the bottom edge a stream travels before wrapping.
pub const GLYPH_STRIDE: f32 = 15.0;
/// Shortest possible trail.
pub const MIN_TRAIL: usize = 10;
/// Chance that a wrapping stream reshuffles its glyphs.
const MUTATE_CHANCE: f64 = 0.02;
/// Chance that each glyph changes during a reshuffle.
const GLYPH_SWAP_CHANCE: f64 = 0.3;
/// Peak alpha of the trail behind the head.
const TRAIL_ALPHA: f32 = 0.6;
const HEAD_GLOW_BLUR: f32 = 5.0;

/// State for a single rain stream.
#[derive(Debug, Clone)]
pub struct RainStream {
    /// Lane position.
    pub x: f32,
    /// Current y position of the head.
    pub y: f32,
    /// Pixels fallen per frame.
    pub speed: f32,
    /// Trail glyphs, head first.
    glyphs: Vec<char>,
}

/// One stream per lane across the viewport.
pub fn init_streams<R: Rng + ?Sized>(
    viewport: Viewport,
    settings: &Settings,
    rng: &mut R,
) -> Vec<RainStream> {
    let lanes = (viewport.width / LANE_WIDTH).floor().max(0.0) as usize;
    (0..lanes)
        .map(|lane| {
            let y = if viewport.height > 0.0 {
                rng.gen_range(0.0..viewport.height)
            } else {
                0.0
            };
            RainStream::new(lane as f32 * LANE_WIDTH, y, settings, rng)
        })
        .collect()
}

fn roll_speed<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> f32 {
    rng.gen_range(0.0..1.0) * settings.matrix_speed + 1.0
}

impl RainStream {
    /// A stream with a random speed and a trail of at least [`MIN_TRAIL`] glyphs.
    pub fn new<R: Rng + ?Sized>(x: f32, y: f32, settings: &Settings, rng: &mut R) -> Self {
        let speed = roll_speed(settings, rng);
        let extra = match settings.matrix_drop_length {
            0 => 0,
            n => rng.gen_range(0..n) as usize,
        };
        let glyphs = (0..MIN_TRAIL + extra)
            .map(|_| chars::pick(&settings.matrix_chars, rng))
            .collect();
        Self { x, y, speed, glyphs }
    }

    /// Number of glyphs in the trail.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Trail glyphs, head first.
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Rendered height of the trail.
    pub fn trail_extent(&self) -> f32 {
        self.glyphs.len() as f32 * GLYPH_STRIDE
    }

    /// Advance one frame, wrapping above the viewport once the whole trail
    /// has left the bottom.
    pub fn update<R: Rng + ?Sized>(&mut self, height: f32, settings: &Settings, rng: &mut R) {
        self.y += self.speed;

        if self.y > height + self.trail_extent() {
            self.y = -self.trail_extent();
            self.speed = roll_speed(settings, rng);

            if rng.gen_bool(MUTATE_CHANCE) {
                for glyph in &mut self.glyphs {
                    if rng.gen_bool(GLYPH_SWAP_CHANCE) {
                        *glyph = chars::pick(&settings.matrix_chars, rng);
                    }
                }
            }
        }
    }

    /// Draw the head at `y` and the trail fading out above it.
    pub fn draw(&self, surface: &mut impl Surface, settings: &Settings, palette: &Palette) {
        let len = self.glyphs.len() as f32;
        for (i, &glyph) in self.glyphs.iter().enumerate() {
            let at = Point::new(self.x, self.y - i as f32 * GLYPH_STRIDE);
            let (color, glow) = if i == 0 {
                (
                    palette.matrix_head,
                    Some(Glow {
                        color: palette.matrix,
                        blur: HEAD_GLOW_BLUR,
                    }),
                )
            } else {
                let fade = 1.0 - i as f32 / len;
                (palette.matrix.scale_alpha(fade * TRAIL_ALPHA), None)
            };
            let style = TextStyle {
                font: &settings.matrix_font,
                color,
                align: TextAlign::Center,
                baseline: TextBaseline::Alphabetic,
                glow,
            };
            surface.fill_text(glyph, at, &style);
        }
    }
}
