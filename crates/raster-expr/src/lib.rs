//! Raster expression graph.
//!
//! Nothing in this crate touches pixels. Builders produce a serializable
//! description of a computation which a remote raster-compute service
//! evaluates:
//!
//! ```text
//! Collection::query(dataset, bounds, window)
//!      │
//!      ├─► filter / update_mask / add_normalized_difference / select
//!      │
//!      └─► reduce (mean | median | count | sum)  ──►  Image
//!                                                      │
//!                      arithmetic, where, unmask, classify, clip, visualize
//!                                                      │
//!                                                      ▼
//!                                   RegionReduction / FeatureTable / export
//! ```
//!
//! Every image carries its band names, so referencing an absent band fails
//! while the graph is built rather than on the remote side. Building the
//! same inputs twice yields byte-identical JSON; [`fingerprint`] hashes it.

pub mod collection;
pub mod dataset;
pub mod error;
pub mod image;
pub mod ops;
pub mod reduction;

pub use collection::{Collection, CollectionExpr, SceneOp};
pub use dataset::Dataset;
pub use error::{ExprError, Result};
pub use image::{Image, ImageExpr, Operand, VIS_BANDS};
pub use ops::{BinaryOp, CollectionReducer, MaskRule, PixelType, QualityFilter, RegionReducer};
pub use reduction::{Feature, FeatureTable, RegionReduction};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of a value's JSON form, hex encoded.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value)?;
    Ok(hex::encode(Sha256::digest(&json)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_common::{Geometry, TimeWindow};

    fn plan() -> Image {
        Collection::query(
            &dataset::MODIS_MOD13Q1,
            Geometry::point(89.8, 23.6),
            TimeWindow::year(2019).unwrap(),
        )
        .select(&["NDVI"])
        .unwrap()
        .mean()
        .multiply(dataset::MOD13Q1_SCALE)
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = fingerprint(plan().expr()).unwrap();
        let b = fingerprint(plan().expr()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_changes_with_inputs() {
        let a = fingerprint(plan().expr()).unwrap();
        let b = fingerprint(plan().multiply(2.0).expr()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_of_known_json() {
        // sha256("1")
        assert_eq!(
            fingerprint(&1).unwrap(),
            "6b86b273ff34fce19d6b804eff5a3f5747ada4eaa22f1d49c01e52ddb7875b4b"
        );
    }

    #[test]
    fn test_expression_json_round_trips() {
        let expr = plan().into_expr();
        let json = serde_json::to_string(&expr).unwrap();
        let back: ImageExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(expr, back);
    }
}
