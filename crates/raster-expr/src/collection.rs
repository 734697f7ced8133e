//! Lazy image collections.

use serde::{Deserialize, Serialize};
use verdant_common::{Geometry, TimeWindow};

use crate::dataset::Dataset;
use crate::error::{ExprError, Result};
use crate::image::{Image, ImageExpr};
use crate::ops::{CollectionReducer, MaskRule, QualityFilter};

/// Operation applied to every scene of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneOp {
    /// Invalidate pixels flagged by any rule in every band, then copy the
    /// listed properties from the source scene.
    UpdateMask {
        rules: Vec<MaskRule>,
        keep_properties: Vec<String>,
    },
    /// Append `(a - b) / (a + b)` as a new band.
    NormalizedDifference { a: String, b: String, name: String },
    /// Replace the scene with a single 0/1 band: `band > above`.
    Threshold { band: String, above: f64, name: String },
    /// Keep only the listed bands.
    Select { bands: Vec<String> },
}

/// Node of a collection expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum CollectionExpr {
    Query {
        dataset: String,
        bounds: Geometry,
        window: TimeWindow,
    },
    Filter {
        input: Box<CollectionExpr>,
        filter: QualityFilter,
    },
    Map {
        input: Box<CollectionExpr>,
        scene_op: SceneOp,
    },
}

/// A lazy, filterable set of scenes. Nothing is fetched until the remote
/// service evaluates an expression that reduces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    expr: CollectionExpr,
    bands: Vec<String>,
}

impl Collection {
    /// Scenes of `dataset` intersecting `bounds` within `window`.
    pub fn query(dataset: &Dataset, bounds: Geometry, window: TimeWindow) -> Self {
        Self {
            expr: CollectionExpr::Query {
                dataset: dataset.id.to_string(),
                bounds,
                window,
            },
            bands: dataset.band_names(),
        }
    }

    pub fn expr(&self) -> &CollectionExpr {
        &self.expr
    }

    pub fn band_names(&self) -> &[String] {
        &self.bands
    }

    pub fn has_band(&self, band: &str) -> bool {
        self.bands.iter().any(|b| b == band)
    }

    fn require_band(&self, band: &str) -> Result<()> {
        if self.has_band(band) {
            Ok(())
        } else {
            Err(ExprError::missing_band(band, &self.bands))
        }
    }

    fn map(self, scene_op: SceneOp, bands: Vec<String>) -> Self {
        Self {
            expr: CollectionExpr::Map {
                input: Box::new(self.expr),
                scene_op,
            },
            bands,
        }
    }

    /// Keep scenes whose metadata passes the filter.
    pub fn filter(self, filter: QualityFilter) -> Self {
        Self {
            expr: CollectionExpr::Filter {
                input: Box::new(self.expr),
                filter,
            },
            bands: self.bands,
        }
    }

    /// Mask flagged pixels in every scene. Applying the same rules twice is
    /// a no-op.
    pub fn update_mask(self, rules: Vec<MaskRule>, keep_properties: Vec<String>) -> Result<Self> {
        for rule in &rules {
            self.require_band(rule.band())?;
        }
        if self.mask_rules().iter().any(|applied| **applied == rules) {
            return Ok(self);
        }
        let bands = self.bands.clone();
        Ok(self.map(
            SceneOp::UpdateMask {
                rules,
                keep_properties,
            },
            bands,
        ))
    }

    /// Rule sets already applied anywhere in this collection's history.
    pub fn mask_rules(&self) -> Vec<&Vec<MaskRule>> {
        let mut found = Vec::new();
        let mut node = &self.expr;
        loop {
            match node {
                CollectionExpr::Query { .. } => break,
                CollectionExpr::Filter { input, .. } => node = input,
                CollectionExpr::Map { input, scene_op } => {
                    if let SceneOp::UpdateMask { rules, .. } = scene_op {
                        found.push(rules);
                    }
                    node = input;
                }
            }
        }
        found
    }

    /// Append a normalized-difference band to every scene.
    pub fn add_normalized_difference(self, a: &str, b: &str, name: &str) -> Result<Self> {
        self.require_band(a)?;
        self.require_band(b)?;
        if self.has_band(name) {
            return Err(ExprError::DuplicateBand(name.to_string()));
        }
        let mut bands = self.bands.clone();
        bands.push(name.to_string());
        Ok(self.map(
            SceneOp::NormalizedDifference {
                a: a.to_string(),
                b: b.to_string(),
                name: name.to_string(),
            },
            bands,
        ))
    }

    /// Turn every scene into a binary `band > above` layer named `name`.
    /// Masked pixels stay masked.
    pub fn threshold(self, band: &str, above: f64, name: &str) -> Result<Self> {
        self.require_band(band)?;
        Ok(self.map(
            SceneOp::Threshold {
                band: band.to_string(),
                above,
                name: name.to_string(),
            },
            vec![name.to_string()],
        ))
    }

    pub fn select(self, bands: &[&str]) -> Result<Self> {
        for band in bands {
            self.require_band(band)?;
        }
        let selected: Vec<String> = bands.iter().map(|b| b.to_string()).collect();
        Ok(self.map(
            SceneOp::Select {
                bands: selected.clone(),
            },
            selected,
        ))
    }

    /// Reduce the scenes pixel-wise into one image with the same band names.
    pub fn reduce(&self, reducer: CollectionReducer) -> Image {
        Image::from_parts(
            ImageExpr::Reduce {
                collection: Box::new(self.expr.clone()),
                reducer,
            },
            self.bands.clone(),
        )
    }

    pub fn mean(&self) -> Image {
        self.reduce(CollectionReducer::Mean)
    }

    pub fn median(&self) -> Image {
        self.reduce(CollectionReducer::Median)
    }

    pub fn count(&self) -> Image {
        self.reduce(CollectionReducer::Count)
    }

    pub fn sum(&self) -> Image {
        self.reduce(CollectionReducer::Sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{MODIS_MOD13Q1, SENTINEL2_SR};

    fn s2() -> Collection {
        Collection::query(
            &SENTINEL2_SR,
            Geometry::point(89.8, 23.6),
            TimeWindow::year(2019).unwrap(),
        )
    }

    #[test]
    fn test_select_missing_band_fails() {
        let err = s2().select(&["NDVI"]).unwrap_err();
        assert!(matches!(err, ExprError::MissingBand { .. }));
    }

    #[test]
    fn test_normalized_difference_adds_band() {
        let col = s2().add_normalized_difference("B8", "B4", "NDVI").unwrap();
        assert!(col.has_band("NDVI"));
        let ndvi = col.select(&["NDVI"]).unwrap();
        assert_eq!(ndvi.band_names(), ["NDVI".to_string()]);
    }

    #[test]
    fn test_update_mask_is_idempotent() {
        let rules = vec![MaskRule::ExcludeClasses {
            band: "SCL".to_string(),
            classes: vec![3, 8, 9, 10],
        }];
        let once = s2().update_mask(rules.clone(), vec![]).unwrap();
        let twice = once.clone().update_mask(rules, vec![]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_mask_requires_quality_band() {
        let modis = Collection::query(
            &MODIS_MOD13Q1,
            Geometry::point(0.0, 0.0),
            TimeWindow::year(2019).unwrap(),
        );
        let rules = vec![MaskRule::ExcludeBits {
            band: "QA60".to_string(),
            bits: vec![10],
        }];
        assert!(modis.update_mask(rules, vec![]).is_err());
    }
}
