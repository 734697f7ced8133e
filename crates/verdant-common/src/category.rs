//! Indicator categories offered to the analyst.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CommonError, CommonResult, Palette, VisParams, NODATA};

/// Two cut points splitting an indicator into low / moderate / good.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Values below this are class 0.
    pub low: f64,
    /// Values below this (and at least `low`) are class 1; the rest are class 2.
    pub high: f64,
}

impl Thresholds {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Reference classification of a single value. Nodata is always class 0.
    pub fn classify(&self, value: f64) -> u8 {
        if value <= NODATA || value < self.low {
            0
        } else if value < self.high {
            1
        } else {
            2
        }
    }
}

/// Static description of a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategorySpec {
    pub id: &'static str,
    pub label: &'static str,
    /// Name of the continuous band, used for palettes and display.
    pub main_band: &'static str,
    pub thresholds: Thresholds,
    pub description: &'static str,
    /// Prefix that selects this category from free-form labels.
    prefix: &'static str,
}

/// The indicator categories with a registered calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    VegetationTrend,
    VegetationIndices,
    Crops,
    RainfallProxy,
    Mineral,
}

/// Label prefixes of categories that were listed but never given a calculator.
const UNIMPLEMENTED_PREFIXES: &[&str] = &[
    "surface groundwater",
    "photosynthesis",
    "phenology",
    "deforestation",
    "water evaporation",
];

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::VegetationTrend,
            Category::VegetationIndices,
            Category::Crops,
            Category::RainfallProxy,
            Category::Mineral,
        ]
    }

    pub fn spec(&self) -> CategorySpec {
        match self {
            Category::VegetationTrend => CategorySpec {
                id: "vegetation-trend",
                label: "Vegetation Trend (VCF - percent tree cover from Sentinel-2 NDVI >0.3)",
                main_band: "VCF",
                thresholds: Thresholds::new(10.0, 50.0),
                description: "Sentinel-2: percent of pixels with NDVI > 0.3 (vegetation fraction). 2015+ only.",
                prefix: "vegetation trend",
            },
            Category::VegetationIndices => CategorySpec {
                id: "vegetation-indices",
                label: "Vegetation Indices (MODIS NDVI - annual mean)",
                main_band: "NDVI",
                thresholds: Thresholds::new(0.2, 0.5),
                description: "MODIS MOD13Q1: annual mean NDVI (scale 0.0001).",
                prefix: "vegetation indices",
            },
            Category::Crops => CategorySpec {
                id: "crops",
                label: "Crops & Agri Health (Sentinel-2 NDVI median)",
                main_band: "NDVI",
                thresholds: Thresholds::new(0.2, 0.5),
                description: "Sentinel-2 L2A/SR: NDVI median (cloud-masked). 2015+ only.",
                prefix: "crops",
            },
            Category::RainfallProxy => CategorySpec {
                id: "rainfall-proxy",
                label: "Rainfall Proxy (MODIS NDVI mean)",
                main_band: "RainfallProxy",
                thresholds: Thresholds::new(0.2, 0.5),
                description: "Rainfall proxy: MODIS NDVI annual mean (vegetation response).",
                prefix: "rainfall proxy",
            },
            Category::Mineral => CategorySpec {
                id: "mineral",
                label: "Mineral/Nutrients (MODIS MCD43A3 Albedo_BSA_shortwave mean)",
                main_band: "Mineral",
                thresholds: Thresholds::new(0.08, 0.18),
                description: "MCD43A3 Albedo: Albedo_BSA_shortwave mean as proxy.",
                prefix: "mineral",
            },
        }
    }

    pub fn id(&self) -> &'static str {
        self.spec().id
    }

    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    pub fn main_band(&self) -> &'static str {
        self.spec().main_band
    }

    pub fn thresholds(&self) -> Thresholds {
        self.spec().thresholds
    }

    /// Visualization for the indicator band.
    pub fn vis_params(&self) -> VisParams {
        Palette::for_band(self.main_band()).vis_params()
    }

    /// Resolve an id, an exact label, or a label prefix.
    pub fn parse(input: &str) -> CommonResult<Self> {
        let trimmed = input.trim();
        let lower = trimmed.to_lowercase();

        if UNIMPLEMENTED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return Err(CommonError::UnknownCategory(trimmed.to_string()));
        }

        Category::all()
            .iter()
            .copied()
            .find(|c| {
                let spec = c.spec();
                spec.id == lower || spec.label == trimmed || lower.starts_with(spec.prefix)
            })
            .ok_or_else(|| CommonError::UnknownCategory(trimmed.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_id_label_and_prefix() {
        assert_eq!(Category::parse("crops").unwrap(), Category::Crops);
        assert_eq!(
            Category::parse("Crops & Agri Health (Sentinel-2 NDVI median)").unwrap(),
            Category::Crops
        );
        assert_eq!(
            Category::parse("Vegetation Trend (anything)").unwrap(),
            Category::VegetationTrend
        );
        assert_eq!(Category::parse("MINERAL").unwrap(), Category::Mineral);
    }

    #[test]
    fn test_unimplemented_categories_are_unknown() {
        for label in ["Phenology (MODIS)", "Photosynthesis GPP", "Deforestation", "Water Evaporation"] {
            assert!(matches!(
                Category::parse(label),
                Err(CommonError::UnknownCategory(_))
            ));
        }
        assert!(Category::parse("Soil moisture").is_err());
    }

    #[test]
    fn test_every_label_round_trips() {
        for c in Category::all() {
            assert_eq!(Category::parse(c.label()).unwrap(), *c);
            assert_eq!(Category::parse(c.id()).unwrap(), *c);
        }
    }

    #[test]
    fn test_thresholds_classify() {
        let t = Category::VegetationTrend.thresholds();
        assert_eq!(t.classify(NODATA), 0);
        assert_eq!(t.classify(5.0), 0);
        assert_eq!(t.classify(10.0), 1);
        assert_eq!(t.classify(49.9), 1);
        assert_eq!(t.classify(50.0), 2);
    }

    #[test]
    fn test_thresholds_are_monotonic() {
        for c in Category::all() {
            let t = c.thresholds();
            let mut last = 0;
            let mut v = NODATA + 1.0;
            while v < 200.0 {
                let class = t.classify(v);
                assert!(class >= last, "{:?} not monotonic at {}", c, v);
                last = class;
                v += 0.37;
            }
        }
    }
}
