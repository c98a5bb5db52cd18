//! Color parsing and blending.

/// Color used whenever a configured color string cannot be parsed.
pub const FALLBACK: Rgba = Rgba::rgb(0, 255, 65);

/// An sRGB color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rrggbb`, `#rgb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex);
        }
        let (name, args) = input.split_once('(')?;
        let args = args.strip_suffix(')')?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        match (name.trim().to_ascii_lowercase().as_str(), parts.as_slice()) {
            ("rgb", [r, g, b]) => Some(Self::rgb(
                r.parse().ok()?,
                g.parse().ok()?,
                b.parse().ok()?,
            )),
            ("rgba", [r, g, b, a]) => Some(Self {
                r: r.parse().ok()?,
                g: g.parse().ok()?,
                b: b.parse().ok()?,
                a: a.parse::<f32>().ok()?.clamp(0.0, 1.0),
            }),
            _ => None,
        }
    }

    /// Parse a color, falling back to [`FALLBACK`] when the input is malformed.
    pub fn parse_or_fallback(input: &str) -> Self {
        Self::parse(input).unwrap_or(FALLBACK)
    }

    /// Same color with its alpha multiplied by `factor`.
    pub fn scale_alpha(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Same color with alpha replaced by `alpha`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Linear interpolation between two colors, `t` clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Composite this color over an opaque backdrop.
    pub fn over(self, backdrop: Self) -> Self {
        Self {
            a: 1.0,
            ..backdrop.lerp(self.with_alpha(1.0), self.a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Rgba::rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Rgba::rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Extract the `#rrggbb` color stops of a CSS gradient string, in order.
///
/// Anything that is not a six-digit hex color is skipped, so
/// `linear-gradient(135deg, #0a0a0a 0%, #1a1a2e 100%)` yields two stops.
pub fn css_color_stops(gradient: &str) -> Vec<Rgba> {
    gradient
        .split('#')
        .skip(1)
        .filter_map(|rest| rest.get(..6).and_then(parse_hex))
        .collect()
}

/// Sample evenly spaced color stops at `t` in `0.0..=1.0`.
pub fn sample_stops(stops: &[Rgba], t: f32) -> Option<Rgba> {
    match stops {
        [] => None,
        [only] => Some(*only),
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let index = (scaled.floor() as usize).min(stops.len() - 2);
            Some(stops[index].lerp(stops[index + 1], scaled - index as f32))
        }
    }
}
