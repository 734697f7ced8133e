//! Palettes and visualization parameters for indicator rendering.
//!
//! Rendering itself happens on the remote service; these types describe the
//! stretch and the color ramp it should apply.

use serde::{Deserialize, Serialize};

use crate::CommonError;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse "#RRGGBB" or "#RRGGBBAA".
    pub fn from_hex(s: &str) -> Result<Self, CommonError> {
        let hex = s.trim_start_matches('#');
        let byte = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| CommonError::InvalidColor(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(CommonError::InvalidColor(s.to_string())),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8;
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

/// A color ramp stretched over `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    /// Hex colors, evenly spaced over the stretch.
    pub palette: Vec<String>,
}

impl VisParams {
    pub fn new(min: f64, max: f64, palette: &[&str]) -> Self {
        Self {
            min,
            max,
            palette: palette.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Decode the palette into colors.
    pub fn colors(&self) -> Result<Vec<Color>, CommonError> {
        self.palette.iter().map(|c| Color::from_hex(c)).collect()
    }

    /// Color for a value: clamp into the stretch, then interpolate between
    /// the two nearest palette entries.
    pub fn color_for(&self, value: f64) -> Result<Color, CommonError> {
        let colors = self.colors()?;
        let (first, last) = match (colors.first(), colors.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return Ok(Color::transparent()),
        };
        if colors.len() == 1 {
            return Ok(first);
        }

        let range = self.max - self.min;
        let range = if range.abs() < f64::EPSILON { 1.0 } else { range };
        let norm = ((value - self.min) / range).clamp(0.0, 1.0);

        let pos = norm * (colors.len() - 1) as f64;
        let idx = pos.floor() as usize;
        if idx >= colors.len() - 1 {
            return Ok(last);
        }
        Ok(colors[idx].lerp(&colors[idx + 1], pos - idx as f64))
    }
}

/// Named palettes keyed by main-band name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Class,
    Vcf,
    Ndvi,
    Mineral,
    RainfallProxy,
}

impl Palette {
    /// Palette for a main-band name; unknown names fall back to NDVI.
    pub fn for_band(main_band: &str) -> Self {
        match main_band {
            "Class" | "class" => Palette::Class,
            "VCF" => Palette::Vcf,
            "Mineral" => Palette::Mineral,
            "RainfallProxy" => Palette::RainfallProxy,
            _ => Palette::Ndvi,
        }
    }

    pub fn vis_params(&self) -> VisParams {
        match self {
            Palette::Class => VisParams::new(0.0, 2.0, &["#ff0000", "#ffff00", "#00ff00"]),
            Palette::Vcf => VisParams::new(0.0, 100.0, &["#ffffcc", "#a1d99b", "#006400"]),
            Palette::Ndvi => VisParams::new(0.0, 1.0, &["#ffffe5", "#a1d99b", "#006d2c"]),
            Palette::Mineral => VisParams::new(0.0, 0.3, &["#f7fcf0", "#c7e9c0", "#00441b"]),
            Palette::RainfallProxy => {
                VisParams::new(-1.0, 1.0, &["#ffffe5", "#a1d99b", "#006d2c"])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::new(255, 0, 0, 255));
        assert_eq!(Color::from_hex("00ff0080").unwrap(), Color::new(0, 255, 0, 128));
        assert!(Color::from_hex("#ff00").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }

    #[test]
    fn test_color_for_endpoints_and_midpoint() {
        let vis = Palette::Class.vis_params();
        assert_eq!(vis.color_for(-5.0).unwrap(), Color::new(255, 0, 0, 255));
        assert_eq!(vis.color_for(1.0).unwrap(), Color::new(255, 255, 0, 255));
        assert_eq!(vis.color_for(9.0).unwrap(), Color::new(0, 255, 0, 255));
    }

    #[test]
    fn test_unknown_band_falls_back_to_ndvi() {
        assert_eq!(Palette::for_band("GPP"), Palette::Ndvi);
        assert_eq!(Palette::for_band("VCF").vis_params().max, 100.0);
    }
}
