//! Animation modules for the effect.

pub mod connections;
pub mod grid;
pub mod particles;
pub mod rain;
