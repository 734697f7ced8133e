//! The raster product handed to export and the pixel inspector.

use serde::Serialize;

use raster_expr::{fingerprint, Image};
use verdant_common::{bands, Category, Roi, TimeWindow};

use crate::aggregate::Aggregate;
use crate::classify::classify;
use crate::error::Result;

/// Whether a product was derived from scenes or is the nodata placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Computed { scenes: u64 },
    NoData,
}

/// `indicator`, `obs_count` and `class` for one category, ROI and window,
/// clipped to the ROI.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterProduct {
    pub category: Category,
    pub roi: Roi,
    pub window: TimeWindow,
    pub availability: Availability,
    image: Image,
}

impl RasterProduct {
    /// Classify an aggregate and stack the three bands.
    pub fn assemble(
        category: Category,
        roi: Roi,
        window: TimeWindow,
        aggregate: Aggregate,
    ) -> Result<Self> {
        let availability = match &aggregate {
            Aggregate::Computed { scenes, .. } => Availability::Computed { scenes: *scenes },
            Aggregate::NoData => Availability::NoData,
        };

        let parts = aggregate.into_bands();
        let class = classify(category, &parts.indicator)?;
        let image = parts
            .indicator
            .add_bands(parts.obs_count)?
            .add_bands(class)?
            .clip(&roi.geometry);

        Ok(Self {
            category,
            roi,
            window,
            availability,
            image,
        })
    }

    /// Wrap an already built image. No band layout is enforced.
    pub fn from_image(
        category: Category,
        roi: Roi,
        window: TimeWindow,
        availability: Availability,
        image: Image,
    ) -> Self {
        Self {
            category,
            roi,
            window,
            availability,
            image,
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn has_band(&self, band: &str) -> bool {
        self.image.has_band(band)
    }

    /// A single band of the product.
    pub fn band(&self, band: &str) -> Result<Image> {
        Ok(self.image.select(&[band])?)
    }

    pub fn indicator(&self) -> Result<Image> {
        self.band(bands::INDICATOR)
    }

    pub fn is_nodata(&self) -> bool {
        self.availability == Availability::NoData
    }

    /// Stable identifier of the product's expression.
    pub fn fingerprint(&self) -> Result<String> {
        Ok(fingerprint(self.image.expr())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_common::Geometry;

    fn roi() -> Roi {
        Roi::new("Test", Geometry::point(89.8, 23.6))
    }

    #[test]
    fn test_nodata_product_has_three_bands() {
        let product = RasterProduct::assemble(
            Category::Crops,
            roi(),
            TimeWindow::year(2019).unwrap(),
            Aggregate::NoData,
        )
        .unwrap();

        assert!(product.is_nodata());
        assert_eq!(
            product.image().band_names(),
            ["indicator".to_string(), "obs_count".to_string(), "class".to_string()]
        );
        assert!(product.band("VCF").is_err());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let make = || {
            RasterProduct::assemble(
                Category::Mineral,
                roi(),
                TimeWindow::year(2020).unwrap(),
                Aggregate::NoData,
            )
            .unwrap()
        };
        assert_eq!(make().fingerprint().unwrap(), make().fingerprint().unwrap());
    }
}
