//! The cybermatrix background effect.
//!
//! A particle grid that shies away from the pointer, matrix rain falling
//! behind it, faint network lines between neighboring particles and a
//! background grid. Rendering goes through the capability traits in
//! [`cybermatrix_core::host`], so any host that can draw text and lines can
//! run it.

mod animations;
mod chars;
mod palette;
mod state;
#[cfg(test)]
mod testing;

pub use animations::connections::link_opacity;
pub use animations::particles::{Particle, Pointer, lattice};
pub use animations::rain::{GLYPH_STRIDE, LANE_WIDTH, RainStream};
pub use palette::Palette;
pub use state::{CyberMatrix, RunState, SURFACE_ID};
