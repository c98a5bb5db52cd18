//! Interactive particle grid (stateful).

use cybermatrix_core::{
    Glow, Point, Settings, Surface, TextAlign, TextBaseline, TextStyle, Viewport,
};
use rand::Rng;

use crate::{chars, palette::Palette};

/// Frames between routine glyph swaps.
pub const GLYPH_RESAMPLE_FRAMES: u32 = 120;
/// Per-frame chance of a glyph swap while hovered.
const HOVER_RESAMPLE_CHANCE: f64 = 0.05;
/// Share of the remaining offset from rest recovered each frame.
const RELAX_FRACTION: f32 = 1.0 / 12.0;

/// Pointer position and interaction radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// `None` once the pointer has left the viewport.
    pub position: Option<Point>,
    pub radius: f32,
}

impl Pointer {
    pub fn new(radius: f32) -> Self {
        Self {
            position: None,
            radius,
        }
    }
}

/// A single glyph on the particle lattice.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Current position, displaced by the pointer.
    pub position: Point,
    /// Lattice anchor the particle relaxes toward.
    rest: Point,
    glyph: char,
    /// Glow intensity, recomputed every frame.
    glow: f32,
    frames_since_resample: u32,
    hovered: bool,
}

/// Rest positions of the particle lattice, row by row.
///
/// Each axis starts at `((size - spacing) % spacing + spacing) / 2` so the
/// leftover margin is split evenly and the lattice is symmetric about the
/// viewport center.
pub fn lattice(viewport: Viewport, spacing: f32) -> Vec<Point> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Vec::new();
    }
    let ys = axis(viewport.height, spacing);
    let xs = axis(viewport.width, spacing);
    ys.iter()
        .flat_map(|&y| xs.iter().map(move |&x| Point::new(x, y)))
        .collect()
}

fn axis(size: f32, spacing: f32) -> Vec<f32> {
    let start = ((size - spacing) % spacing + spacing) / 2.0;
    (0u32..)
        .map(|i| start + i as f32 * spacing)
        .take_while(|v| *v < size)
        .collect()
}

/// Create the particle grid for the given viewport.
pub fn init_particles<R: Rng + ?Sized>(
    viewport: Viewport,
    settings: &Settings,
    rng: &mut R,
) -> Vec<Particle> {
    lattice(viewport, settings.particle_distance)
        .into_iter()
        .map(|rest| Particle::new(rest, settings, rng))
        .collect()
}

/// Step `pos` away from `pointer` by `step`, keeping it within `max` of `rest`.
fn repel(pos: f32, pointer: f32, rest: f32, step: f32, max: f32) -> f32 {
    if pos < pointer {
        (pos - step).max(rest - max)
    } else if pos > pointer {
        (pos + step).min(rest + max)
    } else {
        pos
    }
}

impl Particle {
    /// A particle at rest with a random glyph and glow.
    pub fn new<R: Rng + ?Sized>(rest: Point, settings: &Settings, rng: &mut R) -> Self {
        Self {
            position: rest,
            rest,
            glyph: chars::pick(&settings.particle_chars, rng),
            glow: rng.gen_range(0.5..1.0),
            frames_since_resample: 0,
            hovered: false,
        }
    }

    /// Lattice point the particle returns to.
    pub fn rest(&self) -> Point {
        self.rest
    }

    /// Glyph currently shown.
    pub fn glyph(&self) -> char {
        self.glyph
    }

    /// Glow strength from the last update.
    pub fn glow(&self) -> f32 {
        self.glow
    }

    /// Whether the pointer was within reach on the last update.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Advance one frame.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        pointer: &Pointer,
        time: f32,
        settings: &Settings,
        rng: &mut R,
    ) {
        self.frames_since_resample += 1;
        if self.frames_since_resample > GLYPH_RESAMPLE_FRAMES {
            self.glyph = chars::pick(&settings.particle_chars, rng);
            self.frames_since_resample = 0;
        }

        self.hovered = false;
        if let Some(target) = pointer.position
            && self.position.distance(target) < pointer.radius
        {
            self.hovered = true;
            let (step, max) = (settings.particle_speed, settings.mouse_repulsion);
            self.position.x = repel(self.position.x, target.x, self.rest.x, step, max);
            self.position.y = repel(self.position.y, target.y, self.rest.y, step, max);

            if rng.gen_bool(HOVER_RESAMPLE_CHANCE) {
                self.glyph = chars::pick(&settings.particle_chars, rng);
            }
        }

        self.position.x -= (self.position.x - self.rest.x) * RELAX_FRACTION;
        self.position.y -= (self.position.y - self.rest.y) * RELAX_FRACTION;

        // Phase follows the rest column so the pulse sweeps across the grid
        self.glow = 0.5 + (time * 2.0 + self.rest.x * 0.01).sin() * settings.pulse_intensity;
    }

    /// Draw the glyph centered on its current position.
    pub fn draw(&self, surface: &mut impl Surface, settings: &Settings, palette: &Palette) {
        let (color, glow) = if self.hovered {
            (
                palette.particle_hover,
                Glow {
                    color: palette.particle_hover,
                    blur: 15.0,
                },
            )
        } else {
            (
                palette.particle.scale_alpha(0.8 * self.glow),
                Glow {
                    color: palette.particle,
                    blur: 10.0 * self.glow,
                },
            )
        };
        let style = TextStyle {
            font: &settings.particle_font,
            color,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            glow: Some(glow),
        };
        surface.fill_text(self.glyph, self.position, &style);
    }
}
