//! Operators, reducers and per-scene rules used by the expression graph.

use serde::{Deserialize, Serialize};

/// Pixel-wise binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Gt,
    Lt,
    Eq,
    Neq,
    And,
}

impl BinaryOp {
    /// Apply the operator to two valid values. Comparisons yield 0 or 1.
    pub fn apply(&self, a: f64, b: f64) -> Option<f64> {
        let truth = |t: bool| if t { 1.0 } else { 0.0 };
        match self {
            BinaryOp::Add => Some(a + b),
            BinaryOp::Subtract => Some(a - b),
            BinaryOp::Multiply => Some(a * b),
            BinaryOp::Divide => {
                if b == 0.0 {
                    None
                } else {
                    Some(a / b)
                }
            }
            BinaryOp::Gt => Some(truth(a > b)),
            BinaryOp::Lt => Some(truth(a < b)),
            BinaryOp::Eq => Some(truth(a == b)),
            BinaryOp::Neq => Some(truth(a != b)),
            BinaryOp::And => Some(truth(a != 0.0 && b != 0.0)),
        }
    }
}

/// Per-pixel reducers over the scenes of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionReducer {
    Mean,
    Median,
    /// Number of valid (unmasked) observations.
    Count,
    Sum,
}

/// Reducers over the pixels of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionReducer {
    Min,
    Max,
    Mean,
    /// First valid value encountered.
    First,
}

impl RegionReducer {
    pub fn name(&self) -> &'static str {
        match self {
            RegionReducer::Min => "min",
            RegionReducer::Max => "max",
            RegionReducer::Mean => "mean",
            RegionReducer::First => "first",
        }
    }
}

/// Output pixel type of an exported raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelType {
    Float32,
    Int32,
}

/// A rule invalidating pixels based on a scene's quality descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MaskRule {
    /// Invalidate pixels whose classification band holds one of `classes`.
    ExcludeClasses { band: String, classes: Vec<u16> },
    /// Invalidate pixels with any of `bits` set in a bit-flag band.
    ExcludeBits { band: String, bits: Vec<u8> },
}

impl MaskRule {
    /// Quality band the rule reads.
    pub fn band(&self) -> &str {
        match self {
            MaskRule::ExcludeClasses { band, .. } | MaskRule::ExcludeBits { band, .. } => band,
        }
    }

    /// Whether a quality value keeps the pixel valid.
    pub fn keeps(&self, quality: f64) -> bool {
        match self {
            MaskRule::ExcludeClasses { classes, .. } => {
                !classes.iter().any(|c| *c as f64 == quality)
            }
            MaskRule::ExcludeBits { bits, .. } => {
                let flags = quality as u64;
                bits.iter().all(|bit| flags & (1u64 << bit) == 0)
            }
        }
    }
}

/// Scene-level metadata filter: keep scenes whose `property` is below `max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFilter {
    pub property: String,
    pub max: f64,
}

impl QualityFilter {
    pub fn less_than(property: impl Into<String>, max: f64) -> Self {
        Self {
            property: property.into(),
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_by_zero_is_undefined() {
        assert_eq!(BinaryOp::Divide.apply(1.0, 0.0), None);
        assert_eq!(BinaryOp::Divide.apply(3.0, 2.0), Some(1.5));
    }

    #[test]
    fn test_bit_rule() {
        let rule = MaskRule::ExcludeBits {
            band: "QA60".to_string(),
            bits: vec![10, 11],
        };
        assert!(rule.keeps(0.0));
        assert!(!rule.keeps((1 << 10) as f64));
        assert!(!rule.keeps((1 << 11) as f64));
        assert!(rule.keeps((1 << 9) as f64));
    }

    #[test]
    fn test_class_rule() {
        let rule = MaskRule::ExcludeClasses {
            band: "SCL".to_string(),
            classes: vec![3, 8, 9, 10],
        };
        assert!(rule.keeps(4.0));
        assert!(!rule.keeps(9.0));
    }
}
