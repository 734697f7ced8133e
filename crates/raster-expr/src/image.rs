//! Lazy single images and the operations that derive new ones.

use serde::{Deserialize, Serialize};
use verdant_common::{Geometry, Thresholds, VisParams};

use crate::collection::CollectionExpr;
use crate::error::{ExprError, Result};
use crate::ops::{BinaryOp, CollectionReducer, PixelType};

/// Band names produced by `visualize`.
pub const VIS_BANDS: [&str; 3] = ["vis-red", "vis-green", "vis-blue"];

/// Right-hand side of a binary operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Operand {
    Scalar(f64),
    Image(Box<ImageExpr>),
}

/// Node of an image expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ImageExpr {
    /// Same value everywhere, never masked.
    Constant { value: f64, band: String },
    Reduce {
        collection: Box<CollectionExpr>,
        reducer: CollectionReducer,
    },
    Select {
        input: Box<ImageExpr>,
        bands: Vec<String>,
    },
    Rename {
        input: Box<ImageExpr>,
        names: Vec<String>,
    },
    AddBands {
        input: Box<ImageExpr>,
        other: Box<ImageExpr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<ImageExpr>,
        rhs: Operand,
    },
    /// Replace pixels where `condition` is non-zero with `value`. Masked
    /// input pixels under a true condition become valid.
    Where {
        input: Box<ImageExpr>,
        condition: Box<ImageExpr>,
        value: f64,
    },
    /// Fill masked pixels with `value`.
    Unmask { input: Box<ImageExpr>, value: f64 },
    /// Three-level classification by two cut points; `nodata` maps to 0.
    Classify {
        input: Box<ImageExpr>,
        thresholds: Thresholds,
        nodata: f64,
        name: String,
    },
    Clip {
        input: Box<ImageExpr>,
        geometry: Geometry,
    },
    Cast {
        input: Box<ImageExpr>,
        pixel_type: PixelType,
    },
    /// Render to an 8-bit RGB image.
    Visualize {
        input: Box<ImageExpr>,
        vis: VisParams,
    },
}

/// A lazy image with statically known band names.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    expr: ImageExpr,
    bands: Vec<String>,
}

impl Image {
    pub(crate) fn from_parts(expr: ImageExpr, bands: Vec<String>) -> Self {
        Self { expr, bands }
    }

    /// Constant single-band image.
    pub fn constant(value: f64, band: &str) -> Self {
        Self {
            expr: ImageExpr::Constant {
                value,
                band: band.to_string(),
            },
            bands: vec![band.to_string()],
        }
    }

    pub fn expr(&self) -> &ImageExpr {
        &self.expr
    }

    pub fn into_expr(self) -> ImageExpr {
        self.expr
    }

    pub fn band_names(&self) -> &[String] {
        &self.bands
    }

    pub fn has_band(&self, band: &str) -> bool {
        self.bands.iter().any(|b| b == band)
    }

    fn wrap(self, f: impl FnOnce(Box<ImageExpr>) -> ImageExpr) -> Self {
        Self {
            expr: f(Box::new(self.expr)),
            bands: self.bands,
        }
    }

    fn require_single_band(&self) -> Result<()> {
        match self.bands.len() {
            1 => Ok(()),
            n => Err(ExprError::SingleBandRequired(n)),
        }
    }

    pub fn select(&self, bands: &[&str]) -> Result<Self> {
        for band in bands {
            if !self.has_band(band) {
                return Err(ExprError::missing_band(*band, &self.bands));
            }
        }
        Ok(Self {
            expr: ImageExpr::Select {
                input: Box::new(self.expr.clone()),
                bands: bands.iter().map(|b| b.to_string()).collect(),
            },
            bands: bands.iter().map(|b| b.to_string()).collect(),
        })
    }

    /// Rename a single-band image.
    pub fn rename(self, name: &str) -> Result<Self> {
        self.require_single_band()?;
        Ok(Self {
            expr: ImageExpr::Rename {
                input: Box::new(self.expr),
                names: vec![name.to_string()],
            },
            bands: vec![name.to_string()],
        })
    }

    pub fn add_bands(self, other: Image) -> Result<Self> {
        if let Some(dup) = other.bands.iter().find(|b| self.has_band(b)) {
            return Err(ExprError::DuplicateBand(dup.clone()));
        }
        let mut bands = self.bands;
        bands.extend(other.bands);
        Ok(Self {
            expr: ImageExpr::AddBands {
                input: Box::new(self.expr),
                other: Box::new(other.expr),
            },
            bands,
        })
    }

    fn binary_scalar(self, op: BinaryOp, value: f64) -> Self {
        self.wrap(|lhs| ImageExpr::Binary {
            op,
            lhs,
            rhs: Operand::Scalar(value),
        })
    }

    fn binary_image(self, op: BinaryOp, rhs: &Image) -> Result<Self> {
        if rhs.bands.len() != 1 && rhs.bands.len() != self.bands.len() {
            return Err(ExprError::BandCountMismatch {
                left: self.bands.len(),
                right: rhs.bands.len(),
            });
        }
        let rhs = Operand::Image(Box::new(rhs.expr.clone()));
        Ok(self.wrap(|lhs| ImageExpr::Binary { op, lhs, rhs }))
    }

    pub fn multiply(self, value: f64) -> Self {
        self.binary_scalar(BinaryOp::Multiply, value)
    }

    pub fn gt(self, value: f64) -> Self {
        self.binary_scalar(BinaryOp::Gt, value)
    }

    pub fn equals(self, value: f64) -> Self {
        self.binary_scalar(BinaryOp::Eq, value)
    }

    pub fn divide_by(self, rhs: &Image) -> Result<Self> {
        self.binary_image(BinaryOp::Divide, rhs)
    }

    /// Replace pixels where the single-band `condition` is true.
    pub fn replace_where(self, condition: &Image, value: f64) -> Result<Self> {
        condition.require_single_band()?;
        let condition = Box::new(condition.expr.clone());
        Ok(self.wrap(|input| ImageExpr::Where {
            input,
            condition,
            value,
        }))
    }

    pub fn unmask(self, value: f64) -> Self {
        self.wrap(|input| ImageExpr::Unmask { input, value })
    }

    /// Classify a single-band image, naming the output `name`.
    pub fn classify(self, thresholds: Thresholds, nodata: f64, name: &str) -> Result<Self> {
        self.require_single_band()?;
        Ok(Self {
            expr: ImageExpr::Classify {
                input: Box::new(self.expr),
                thresholds,
                nodata,
                name: name.to_string(),
            },
            bands: vec![name.to_string()],
        })
    }

    pub fn clip(self, geometry: &Geometry) -> Self {
        let geometry = geometry.clone();
        self.wrap(|input| ImageExpr::Clip { input, geometry })
    }

    pub fn to_float(self) -> Self {
        self.wrap(|input| ImageExpr::Cast {
            input,
            pixel_type: PixelType::Float32,
        })
    }

    pub fn to_int(self) -> Self {
        self.wrap(|input| ImageExpr::Cast {
            input,
            pixel_type: PixelType::Int32,
        })
    }

    /// Color-map a single-band image.
    pub fn visualize(self, vis: VisParams) -> Result<Self> {
        self.require_single_band()?;
        Ok(Self {
            expr: ImageExpr::Visualize {
                input: Box::new(self.expr),
                vis,
            },
            bands: VIS_BANDS.iter().map(|b| b.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_tracking() {
        let a = Image::constant(1.0, "a");
        let b = Image::constant(2.0, "b");
        let ab = a.add_bands(b).unwrap();
        assert_eq!(ab.band_names(), ["a".to_string(), "b".to_string()]);
        assert!(ab.select(&["c"]).is_err());
        assert!(ab.clone().rename("x").is_err());
        assert!(ab.select(&["b"]).unwrap().rename("x").is_ok());
    }

    #[test]
    fn test_duplicate_band_rejected() {
        let a = Image::constant(1.0, "a");
        let err = a.clone().add_bands(a).unwrap_err();
        assert!(matches!(err, ExprError::DuplicateBand(_)));
    }

    #[test]
    fn test_binary_node_serializes_operator() {
        let expr = Image::constant(0.3, "v").gt(0.2).into_expr();
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["node"], "binary");
        assert_eq!(json["op"], "gt");
        assert_eq!(json["rhs"]["kind"], "scalar");

        let back: ImageExpr = serde_json::from_value(json).unwrap();
        assert_eq!(back, expr);
    }

    #[test]
    fn test_visualize_outputs_rgb() {
        let vis = VisParams::new(0.0, 1.0, &["#000000", "#ffffff"]);
        let img = Image::constant(0.5, "v").visualize(vis).unwrap();
        assert_eq!(img.band_names().len(), 3);
    }
}
