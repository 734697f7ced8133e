//! Common fixtures: grids, regions and scenes.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use raster_expr::dataset::{CLOUDY_PIXEL_PERCENTAGE, MODIS_MCD43A3, MODIS_MOD13Q1, SENTINEL2_SR};
use verdant_common::{BoundingBox, GaulRegistry, Geometry, RegionRegistry, Roi};

use crate::generators::{constant_grid, reflectance_for_ndvi};

/// Extent and size of an in-memory raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub width: usize,
    pub height: usize,
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GridSpec {
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }

    fn dx(&self) -> f64 {
        (self.max_lon - self.min_lon) / self.width as f64
    }

    fn dy(&self) -> f64 {
        (self.max_lat - self.min_lat) / self.height as f64
    }

    /// Center of pixel `index`.
    pub fn center(&self, index: usize) -> (f64, f64) {
        let (row, col) = (index / self.width, index % self.width);
        (
            self.min_lon + (col as f64 + 0.5) * self.dx(),
            self.max_lat - (row as f64 + 0.5) * self.dy(),
        )
    }

    /// Pixel containing a point, if it lies inside the extent.
    pub fn index_at(&self, lon: f64, lat: f64) -> Option<usize> {
        if !self.bbox().contains_point(lon, lat) {
            return None;
        }
        let col = (((lon - self.min_lon) / self.dx()) as usize).min(self.width - 1);
        let row = (((self.max_lat - lat) / self.dy()) as usize).min(self.height - 1);
        Some(row * self.width + col)
    }
}

/// Grid specifications used across the suite.
pub mod grid {
    use super::GridSpec;

    /// 2x2 pixels over Faridpur.
    pub const FARIDPUR_2X2: GridSpec = GridSpec {
        width: 2,
        height: 2,
        min_lon: 89.6,
        max_lon: 90.0,
        min_lat: 23.4,
        max_lat: 23.8,
    };

    /// 4x4 pixels over Faridpur.
    pub const FARIDPUR_4X4: GridSpec = GridSpec {
        width: 4,
        height: 4,
        min_lon: 89.6,
        max_lon: 90.0,
        min_lat: 23.4,
        max_lat: 23.8,
    };
}

/// One timestamped scene: band values plus metadata properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub date: NaiveDate,
    pub properties: BTreeMap<String, f64>,
    pub bands: Vec<(String, Vec<Option<f64>>)>,
}

impl Scene {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            properties: BTreeMap::new(),
            bands: Vec::new(),
        }
    }

    pub fn band(mut self, name: &str, values: Vec<Option<f64>>) -> Self {
        self.bands.retain(|(n, _)| n != name);
        self.bands.push((name.to_string(), values));
        self
    }

    pub fn property(mut self, key: &str, value: f64) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, band: &str) -> Option<&Vec<Option<f64>>> {
        self.bands.iter().find(|(n, _)| n == band).map(|(_, v)| v)
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The default region, as the registry resolves it.
pub fn faridpur() -> Roi {
    GaulRegistry
        .lookup("Faridpur")
        .unwrap_or_else(|| Roi::new("Faridpur", Geometry::Rectangle(grid::FARIDPUR_2X2.bbox())))
}

/// A rectangular ROI covering a grid.
pub fn rectangle_roi(name: &str, spec: &GridSpec) -> Roi {
    Roi::new(name, Geometry::Rectangle(spec.bbox()))
}

/// Sentinel-2 scene with the given per-pixel NDVI and SCL classes, QA60
/// clear and 10 % cloudy pixels.
pub fn s2_scene(date: NaiveDate, ndvi: &[f64], scl: &[u16]) -> Scene {
    let (nir, red) = reflectance_for_ndvi(ndvi);
    let len = ndvi.len();
    Scene::new(date)
        .band("B2", constant_grid(len, 800.0))
        .band("B3", constant_grid(len, 900.0))
        .band("B4", red)
        .band("B8", nir)
        .band("QA60", constant_grid(len, 0.0))
        .band("SCL", scl.iter().map(|c| Some(*c as f64)).collect())
        .property(CLOUDY_PIXEL_PERCENTAGE, 10.0)
}

/// Clear Sentinel-2 scene (SCL 4, vegetation) with uniform NDVI.
pub fn clear_s2_scene(date: NaiveDate, len: usize, ndvi: f64) -> Scene {
    s2_scene(date, &vec![ndvi; len], &vec![4; len])
}

/// MOD13Q1 scene with raw fixed-point NDVI values.
pub fn modis_ndvi_scene(date: NaiveDate, raw_ndvi: Vec<Option<f64>>) -> Scene {
    let len = raw_ndvi.len();
    Scene::new(date)
        .band("NDVI", raw_ndvi)
        .band("EVI", constant_grid(len, 3000.0))
        .band("SummaryQA", constant_grid(len, 0.0))
}

/// MCD43A3 scene with the given black-sky albedo.
pub fn albedo_scene(date: NaiveDate, bsa: Vec<Option<f64>>) -> Scene {
    let len = bsa.len();
    Scene::new(date)
        .band("Albedo_BSA_shortwave", bsa)
        .band("Albedo_WSA_shortwave", constant_grid(len, 0.2))
}

/// Dataset ids by name, for `InMemoryPlatform::with_scenes`.
pub mod datasets {
    use super::*;

    pub fn sentinel2() -> &'static str {
        SENTINEL2_SR.id
    }

    pub fn mod13q1() -> &'static str {
        MODIS_MOD13Q1.id
    }

    pub fn mcd43a3() -> &'static str {
        MODIS_MCD43A3.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_centers_and_lookup() {
        let spec = grid::FARIDPUR_2X2;
        for i in 0..spec.len() {
            let (lon, lat) = spec.center(i);
            assert_eq!(spec.index_at(lon, lat), Some(i));
        }
        assert_eq!(spec.index_at(0.0, 0.0), None);
    }

    #[test]
    fn test_faridpur_is_admin_boundary() {
        assert!(matches!(faridpur().geometry, Geometry::Admin { .. }));
    }
}
