//! Image collection catalog entries.

/// Property carrying the acquisition timestamp of a scene.
pub const TIME_START: &str = "system:time_start";

/// Scene-level cloud cover property on Sentinel-2 products.
pub const CLOUDY_PIXEL_PERCENTAGE: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// A catalog collection and the bands its scenes carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dataset {
    pub id: &'static str,
    pub bands: &'static [&'static str],
}

/// Sentinel-2 surface reflectance, harmonized.
pub const SENTINEL2_SR: Dataset = Dataset {
    id: "COPERNICUS/S2_SR_HARMONIZED",
    bands: &["B2", "B3", "B4", "B8", "QA60", "SCL"],
};

/// MODIS 16-day vegetation indices, 250 m. Values are fixed-point (x 0.0001).
pub const MODIS_MOD13Q1: Dataset = Dataset {
    id: "MODIS/061/MOD13Q1",
    bands: &["NDVI", "EVI", "SummaryQA"],
};

/// MODIS daily albedo, 500 m.
pub const MODIS_MCD43A3: Dataset = Dataset {
    id: "MODIS/061/MCD43A3",
    bands: &["Albedo_BSA_shortwave", "Albedo_WSA_shortwave"],
};

/// Fixed-point scale of MOD13Q1 index bands.
pub const MOD13Q1_SCALE: f64 = 0.0001;

impl Dataset {
    pub fn band_names(&self) -> Vec<String> {
        self.bands.iter().map(|b| b.to_string()).collect()
    }

    pub fn has_band(&self, band: &str) -> bool {
        self.bands.contains(&band)
    }
}
