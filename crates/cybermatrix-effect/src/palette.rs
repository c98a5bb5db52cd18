//! Colors parsed once from settings.

use cybermatrix_core::{Rgba, Settings};

/// Every configured color, parsed. Malformed strings become the fallback
/// green instead of failing a draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub particle: Rgba,
    pub particle_hover: Rgba,
    pub connection: [Rgba; 3],
    pub packet: Rgba,
    pub matrix: Rgba,
    pub matrix_head: Rgba,
    pub grid: Rgba,
}

impl Palette {
    pub fn from_settings(settings: &Settings) -> Self {
        let parse = |s: &String| Rgba::parse_or_fallback(s);
        Self {
            particle: parse(&settings.particle_color),
            particle_hover: parse(&settings.particle_hover_color),
            connection: settings.connection_colors.each_ref().map(parse),
            packet: parse(&settings.data_packet_color),
            matrix: parse(&settings.matrix_color),
            matrix_head: parse(&settings.matrix_head_color),
            grid: parse(&settings.grid_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cybermatrix_core::{PartialSettings, color::FALLBACK};

    #[test]
    fn test_default_palette() {
        let palette = Palette::from_settings(&Settings::default());
        assert_eq!(palette.particle, Rgba::rgb(0, 255, 65));
        assert_eq!(palette.particle_hover, Rgba::rgb(255, 107, 107));
        assert_eq!(palette.connection[1], Rgba::rgb(0, 153, 204));
        assert!((palette.matrix_head.a - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bad_color_uses_fallback() {
        let settings = Settings::resolve(PartialSettings {
            grid_color: Some("bright green".to_string()),
            ..Default::default()
        });
        assert_eq!(Palette::from_settings(&settings).grid, FALLBACK);
    }
}
