//! Percent of valid observations in which a pixel was vegetated.

use platform::CollectionProvider;
use raster_expr::Collection;

use super::{sentinel2_ndvi, IndicatorCalculator, IndicatorRequest, NDVI_BAND};
use crate::aggregate::{guard_nodata, observation_count, Bands};
use crate::error::Result;

/// `100 * (scenes with NDVI > threshold) / (valid scenes)` per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VegetationFraction {
    pub threshold: f64,
}

impl Default for VegetationFraction {
    fn default() -> Self {
        Self { threshold: 0.3 }
    }
}

impl IndicatorCalculator for VegetationFraction {
    fn name(&self) -> &'static str {
        "vegetation_fraction"
    }

    fn collection(
        &self,
        provider: &dyn CollectionProvider,
        request: &IndicatorRequest,
    ) -> Result<Collection> {
        sentinel2_ndvi(provider, request)
    }

    fn derive(&self, collection: &Collection) -> Result<Bands> {
        let obs_count = observation_count(collection, NDVI_BAND)?;
        let vegetated = collection
            .clone()
            .threshold(NDVI_BAND, self.threshold, "vegetated")?
            .sum()
            .unmask(0.0);

        // Divide by one where there is nothing to count; overwritten below
        let denominator = obs_count
            .clone()
            .replace_where(&obs_count.clone().equals(0.0), 1.0)?;
        let percent = vegetated.divide_by(&denominator)?.multiply(100.0);

        Ok(Bands {
            indicator: guard_nodata(percent, &obs_count)?,
            obs_count,
        })
    }
}
