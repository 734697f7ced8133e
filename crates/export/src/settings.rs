//! Export parameters and the panel's input fallbacks.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCALE: f64 = 500.0;
pub const DEFAULT_FOLDER: &str = "GEE_Exports";
pub const DEFAULT_CRS: &str = "EPSG:4326";
pub const DEFAULT_MAX_PIXELS: f64 = 1e13;

/// Parameters shared by every artifact of one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Nominal pixel size in meters.
    pub scale: f64,
    pub folder: String,
    /// Projection of raster artifacts, except the thumbnail.
    pub crs: String,
    pub max_pixels: f64,
    pub thumbnail_factor: f64,
    pub thumbnail_min_scale: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            folder: DEFAULT_FOLDER.to_string(),
            crs: DEFAULT_CRS.to_string(),
            max_pixels: DEFAULT_MAX_PIXELS,
            thumbnail_factor: 4.0,
            thumbnail_min_scale: 30.0,
        }
    }
}

impl ExportSettings {
    /// Apply raw scale and folder text on top of these settings. Unusable
    /// input keeps the current value.
    pub fn with_panel_input(mut self, scale_text: Option<&str>, folder_text: Option<&str>) -> Self {
        if let Some(scale) = scale_text.and_then(parse_scale) {
            self.scale = scale;
        }
        if let Some(folder) = folder_text.map(str::trim).filter(|f| !f.is_empty()) {
            self.folder = folder.to_string();
        }
        self
    }

    /// Coarser scale for the quicklook.
    pub fn thumbnail_scale(&self) -> f64 {
        (self.scale * self.thumbnail_factor).max(self.thumbnail_min_scale)
    }
}

/// Leading decimal digits as a positive scale; `None` when there are none
/// or they are zero. `"250m"` is 250.
pub fn parse_scale(text: &str) -> Option<f64> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_fallback() {
        let s = ExportSettings::default().with_panel_input(Some("abc"), None);
        assert_eq!(s.scale, 500.0);
        let s = ExportSettings::default().with_panel_input(Some("0"), None);
        assert_eq!(s.scale, 500.0);
        let s = ExportSettings::default().with_panel_input(Some("-30"), None);
        assert_eq!(s.scale, 500.0);
        let s = ExportSettings::default().with_panel_input(Some(" 250m "), None);
        assert_eq!(s.scale, 250.0);
    }

    #[test]
    fn test_folder_fallback() {
        let s = ExportSettings::default().with_panel_input(None, Some("   "));
        assert_eq!(s.folder, "GEE_Exports");
        let s = ExportSettings::default().with_panel_input(None, Some("Colab"));
        assert_eq!(s.folder, "Colab");
    }

    #[test]
    fn test_thumbnail_scale() {
        let mut s = ExportSettings::default();
        assert_eq!(s.thumbnail_scale(), 2000.0);
        s.scale = 5.0;
        assert_eq!(s.thumbnail_scale(), 30.0);
        s.scale = 10.0;
        assert_eq!(s.thumbnail_scale(), 40.0);
    }
}
