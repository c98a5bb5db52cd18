//! Core types for the cybermatrix background effect.
//!
//! Settings and their resolver, color parsing, and the capability traits a
//! host implements to render the effect.

pub mod color;
pub mod host;
pub mod settings;

pub use color::Rgba;
pub use host::{
    ColorStop, Container, FrameRequest, Glow, HostEvent, LinearGradient, Paint, Point, Scheduler,
    Stroke, Surface, SurfaceSpec, TextAlign, TextBaseline, TextStyle, Viewport,
};
pub use settings::{PartialSettings, Settings};
