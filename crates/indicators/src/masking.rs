//! Cloud, cirrus and shadow masking of optical scenes.

use raster_expr::dataset::TIME_START;
use raster_expr::{Collection, MaskRule};

use crate::error::Result;

/// Scene-classification band of Sentinel-2 L2A.
pub const SCL_BAND: &str = "SCL";

/// SCL classes treated as unusable: cloud shadow, medium and high
/// probability cloud, thin cirrus.
pub const SCL_EXCLUDED: [u16; 4] = [3, 8, 9, 10];

/// Bit-flag quality band of Sentinel-2.
pub const QA60_BAND: &str = "QA60";

/// QA60 bits: 10 opaque cloud, 11 cirrus.
pub const QA60_EXCLUDED_BITS: [u8; 2] = [10, 11];

/// Rules applicable to a collection, given the quality bands it carries.
pub fn cloud_rules(collection: &Collection) -> Vec<MaskRule> {
    let mut rules = Vec::new();
    if collection.has_band(SCL_BAND) {
        rules.push(MaskRule::ExcludeClasses {
            band: SCL_BAND.to_string(),
            classes: SCL_EXCLUDED.to_vec(),
        });
    }
    if collection.has_band(QA60_BAND) {
        rules.push(MaskRule::ExcludeBits {
            band: QA60_BAND.to_string(),
            bits: QA60_EXCLUDED_BITS.to_vec(),
        });
    }
    rules
}

/// Mark flagged pixels invalid in every band of every scene, keeping the
/// acquisition time. Collections without a quality band pass through.
/// Idempotent.
pub fn mask_clouds(collection: Collection) -> Result<Collection> {
    let rules = cloud_rules(&collection);
    if rules.is_empty() {
        return Ok(collection);
    }
    Ok(collection.update_mask(rules, vec![TIME_START.to_string()])?)
}
