//! Region reductions and single-row feature tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use verdant_common::Geometry;

use crate::image::{Image, ImageExpr};
use crate::ops::RegionReducer;

/// Reduce an image's pixels inside `geometry` at `scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReduction {
    pub image: ImageExpr,
    pub bands: Vec<String>,
    pub geometry: Geometry,
    pub reducers: Vec<RegionReducer>,
    pub scale: f64,
    pub max_pixels: f64,
}

impl RegionReduction {
    pub fn new(
        image: &Image,
        geometry: Geometry,
        reducers: Vec<RegionReducer>,
        scale: f64,
        max_pixels: f64,
    ) -> Self {
        Self {
            image: image.expr().clone(),
            bands: image.band_names().to_vec(),
            geometry,
            reducers,
            scale,
            max_pixels,
        }
    }

    /// Keys of the result dictionary, as `(key, band, reducer)`.
    ///
    /// A single reducer is keyed by band name. Several reducers over a
    /// single band are keyed by reducer name. Otherwise `{band}_{reducer}`.
    pub fn output_keys(&self) -> Vec<(String, String, RegionReducer)> {
        let mut keys = Vec::with_capacity(self.bands.len() * self.reducers.len());
        for band in &self.bands {
            for reducer in &self.reducers {
                let key = if self.reducers.len() == 1 {
                    band.clone()
                } else if self.bands.len() == 1 {
                    reducer.name().to_string()
                } else {
                    format!("{}_{}", band, reducer.name())
                };
                keys.push((key, band.clone(), *reducer));
            }
        }
        keys
    }
}

/// One table row: optional reduced values plus literal properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub values: Option<RegionReduction>,
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Feature {
    pub fn new(values: Option<RegionReduction>) -> Self {
        Self {
            values,
            properties: BTreeMap::new(),
        }
    }

    pub fn set(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// A table of features exported as CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub features: Vec<Feature>,
    /// Column order of the exported file.
    pub columns: Vec<String>,
}

impl FeatureTable {
    pub fn new(features: Vec<Feature>, columns: &[&str]) -> Self {
        Self {
            features,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}
