//! Effect settings and the resolver that fills them from partial input.

use serde::{Deserialize, Serialize};

/// Default glyphs for the particle grid.
pub const DEFAULT_PARTICLE_CHARS: &[char] = &[
    '0', '1', 'A', 'B', 'C', 'D', 'E', 'F', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Default glyphs for matrix rain.
pub const DEFAULT_MATRIX_CHARS: &[char] = &[
    '0', '1', 'ア', 'カ', 'サ', 'タ', 'ナ', 'ハ', 'マ', 'ヤ', 'ラ', 'ワ', 'A', 'B', 'C', 'D', 'E',
    'F',
];

/// Default CSS background painted behind the effect.
pub const DEFAULT_BACKGROUND_GRADIENT: &str = "linear-gradient(135deg, #0a0a0a 0%, #1a1a2e 25%, #16213e 50%, #0f3460 75%, #0a192f 100%)";

/// Fully resolved effect settings. Every option has a concrete value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Stacking order of the drawing surface relative to page content.
    pub z_index: i32,
    /// CSS background painted under the surface.
    pub background_gradient: String,

    /// Lattice spacing of the particle grid, also the connection threshold.
    pub particle_distance: f32,
    /// Pixels a hovered particle moves per frame on each axis.
    pub particle_speed: f32,
    /// Glyphs a particle picks from.
    pub particle_chars: Vec<char>,
    /// CSS font used for particle glyphs.
    pub particle_font: String,
    /// Resting particle color, also its glow color.
    pub particle_color: String,
    /// Color of a particle inside the pointer radius.
    pub particle_hover_color: String,

    /// Pointer interaction radius.
    pub mouse_radius: f32,
    /// Maximum displacement from rest on each axis.
    pub mouse_repulsion: f32,

    /// Draw lines between neighboring particles.
    pub show_connections: bool,
    /// Gradient stops at 0, 0.5 and 1 along each connection.
    pub connection_colors: [String; 3],
    /// Opacity of a connection between coincident particles.
    pub connection_opacity: f32,
    /// Per-frame chance that a connection shows a data packet.
    pub data_packet_chance: f64,
    /// Fill color of data packets.
    pub data_packet_color: String,

    /// Draw the matrix rain layer.
    pub show_matrix_rain: bool,
    /// Glyphs rain trails are built from.
    pub matrix_chars: Vec<char>,
    /// Random part of a stream's fall speed, added to one pixel per frame.
    pub matrix_speed: f32,
    /// CSS font used for rain glyphs.
    pub matrix_font: String,
    /// Trail color, also the head's glow color.
    pub matrix_color: String,
    /// Color of the leading glyph.
    pub matrix_head_color: String,
    /// Upper bound of the random part of a rain trail's length.
    pub matrix_drop_length: u32,

    /// Draw the background grid.
    pub show_grid: bool,
    /// Spacing between grid lines.
    pub grid_size: f32,
    /// Grid line color.
    pub grid_color: String,
    /// Grid line opacity.
    pub grid_opacity: f32,

    /// Amount the time accumulator advances every tick.
    pub animation_speed: f32,
    /// Amplitude of the particle glow pulse.
    pub pulse_intensity: f32,

    /// Attach and start immediately on construction.
    pub auto_init: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            z_index: -1,
            background_gradient: DEFAULT_BACKGROUND_GRADIENT.to_string(),
            particle_distance: 60.0,
            particle_speed: 1.5,
            particle_chars: DEFAULT_PARTICLE_CHARS.to_vec(),
            particle_font: r#"14px "Courier New", monospace"#.to_string(),
            particle_color: "#00ff41".to_string(),
            particle_hover_color: "#ff6b6b".to_string(),
            mouse_radius: 120.0,
            mouse_repulsion: 15.0,
            show_connections: true,
            connection_colors: [
                "#00ff41".to_string(),
                "#0099cc".to_string(),
                "#00ff41".to_string(),
            ],
            connection_opacity: 0.6,
            data_packet_chance: 0.02,
            data_packet_color: "#ff6b6b".to_string(),
            show_matrix_rain: true,
            matrix_chars: DEFAULT_MATRIX_CHARS.to_vec(),
            matrix_speed: 2.0,
            matrix_font: r#"12px "Courier New", monospace"#.to_string(),
            matrix_color: "#00ff41".to_string(),
            matrix_head_color: "rgba(255, 255, 255, 0.9)".to_string(),
            matrix_drop_length: 15,
            show_grid: true,
            grid_size: 50.0,
            grid_color: "#00ff41".to_string(),
            grid_opacity: 0.1,
            animation_speed: 0.01,
            pulse_intensity: 0.3,
            auto_init: true,
        }
    }
}

/// Caller-supplied settings. `None` keeps the current value.
///
/// Deserialization ignores unknown keys, so config files written for a newer
/// version still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSettings {
    pub z_index: Option<i32>,
    pub background_gradient: Option<String>,
    pub particle_distance: Option<f32>,
    pub particle_speed: Option<f32>,
    pub particle_chars: Option<Vec<char>>,
    pub particle_font: Option<String>,
    pub particle_color: Option<String>,
    pub particle_hover_color: Option<String>,
    pub mouse_radius: Option<f32>,
    pub mouse_repulsion: Option<f32>,
    pub show_connections: Option<bool>,
    pub connection_colors: Option<[String; 3]>,
    pub connection_opacity: Option<f32>,
    pub data_packet_chance: Option<f64>,
    pub data_packet_color: Option<String>,
    pub show_matrix_rain: Option<bool>,
    pub matrix_chars: Option<Vec<char>>,
    pub matrix_speed: Option<f32>,
    pub matrix_font: Option<String>,
    pub matrix_color: Option<String>,
    pub matrix_head_color: Option<String>,
    pub matrix_drop_length: Option<u32>,
    pub show_grid: Option<bool>,
    pub grid_size: Option<f32>,
    pub grid_color: Option<String>,
    pub grid_opacity: Option<f32>,
    pub animation_speed: Option<f32>,
    pub pulse_intensity: Option<f32>,
    pub auto_init: Option<bool>,
}

macro_rules! merge_fields {
    (@some $target:expr, $source:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $source.$field {
                $target.$field = Some(value);
            }
        )+
    };
    ($target:expr, $source:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $source.$field {
                $target.$field = value;
            }
        )+
    };
}

impl Settings {
    /// Resolve a partial record against the built-in defaults.
    pub fn resolve(partial: PartialSettings) -> Self {
        let mut settings = Self::default();
        settings.merge(partial);
        settings
    }

    /// Apply every option present in `partial` over the current values.
    pub fn merge(&mut self, partial: PartialSettings) {
        merge_fields!(self, partial;
            z_index,
            background_gradient,
            particle_distance,
            particle_speed,
            particle_chars,
            particle_font,
            particle_color,
            particle_hover_color,
            mouse_radius,
            mouse_repulsion,
            show_connections,
            connection_colors,
            connection_opacity,
            data_packet_chance,
            data_packet_color,
            show_matrix_rain,
            matrix_chars,
            matrix_speed,
            matrix_font,
            matrix_color,
            matrix_head_color,
            matrix_drop_length,
            show_grid,
            grid_size,
            grid_color,
            grid_opacity,
            animation_speed,
            pulse_intensity,
            auto_init,
        );
    }
}

impl PartialSettings {
    /// Layer `overrides` on top of `self`; options set in `overrides` win.
    pub fn overlay(mut self, overrides: PartialSettings) -> Self {
        merge_fields!(@some self, overrides;
            z_index,
            background_gradient,
            particle_distance,
            particle_speed,
            particle_chars,
            particle_font,
            particle_color,
            particle_hover_color,
            mouse_radius,
            mouse_repulsion,
            show_connections,
            connection_colors,
            connection_opacity,
            data_packet_chance,
            data_packet_color,
            show_matrix_rain,
            matrix_chars,
            matrix_speed,
            matrix_font,
            matrix_color,
            matrix_head_color,
            matrix_drop_length,
            show_grid,
            grid_size,
            grid_color,
            grid_opacity,
            animation_speed,
            pulse_intensity,
            auto_init,
        );
        self
    }
}
