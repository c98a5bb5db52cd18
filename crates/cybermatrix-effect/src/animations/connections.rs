//! Network lines between neighboring particles.

use cybermatrix_core::{ColorStop, LinearGradient, Paint, Point, Settings, Stroke, Surface};
use rand::Rng;

use super::particles::Particle;
use crate::palette::Palette;

/// Side length of a data packet mark.
const PACKET_SIZE: f32 = 2.0;

/// Opacity of the line joining two particles `distance` apart, or `None`
/// when they are too far apart to be linked.
pub fn link_opacity(distance: f32, threshold: f32, max_opacity: f32) -> Option<f32> {
    (threshold > 0.0 && distance <= threshold).then(|| (1.0 - distance / threshold) * max_opacity)
}

fn gradient(from: Point, to: Point, palette: &Palette) -> LinearGradient {
    let [first, middle, last] = palette.connection;
    LinearGradient {
        start: from,
        end: to,
        stops: [
            ColorStop {
                offset: 0.0,
                color: first,
            },
            ColorStop {
                offset: 0.5,
                color: middle,
            },
            ColorStop {
                offset: 1.0,
                color: last,
            },
        ],
    }
}

/// Link every pair of particles within `particle_distance` of each other.
///
/// All pairs are scanned; the grid stays small enough for that to be cheap.
pub fn draw<R: Rng + ?Sized>(
    surface: &mut impl Surface,
    particles: &[Particle],
    settings: &Settings,
    palette: &Palette,
    rng: &mut R,
) {
    let threshold = settings.particle_distance;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let (from, to) = (a.position, b.position);
            let Some(alpha) =
                link_opacity(from.distance(to), threshold, settings.connection_opacity)
            else {
                continue;
            };

            let stroke = Stroke {
                paint: Paint::Linear(gradient(from, to, palette)),
                alpha,
                width: 1.0,
            };
            surface.stroke_line(from, to, &stroke);

            if rng.gen_range(0.0..1.0) < settings.data_packet_chance {
                let mid = from.midpoint(to);
                let origin = Point::new(mid.x - PACKET_SIZE / 2.0, mid.y - PACKET_SIZE / 2.0);
                let color = palette.packet.scale_alpha(alpha);
                surface.fill_rect(origin, PACKET_SIZE, PACKET_SIZE, color);
            }
        }
    }
}
