//! Three-level classification of an indicator band.

use raster_expr::Image;
use verdant_common::{bands, Category, NODATA};

use crate::error::Result;

/// `class` band for a category: 0 low, 1 moderate, 2 good. NODATA pixels
/// are class 0.
pub fn classify(category: Category, indicator: &Image) -> Result<Image> {
    Ok(indicator
        .clone()
        .classify(category.thresholds(), NODATA, bands::CLASS)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_expr::ImageExpr;

    #[test]
    fn test_class_band_carries_category_cuts() {
        let indicator = Image::constant(0.3, bands::INDICATOR);
        let class = classify(Category::Mineral, &indicator).unwrap();
        assert_eq!(class.band_names(), [bands::CLASS.to_string()]);
        match class.expr() {
            ImageExpr::Classify {
                thresholds, nodata, ..
            } => {
                assert_eq!(*thresholds, Category::Mineral.thresholds());
                assert_eq!(*nodata, NODATA);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_multi_band_input_rejected() {
        let two = Image::constant(1.0, "a")
            .add_bands(Image::constant(2.0, "b"))
            .unwrap();
        assert!(classify(Category::Crops, &two).is_err());
    }
}
