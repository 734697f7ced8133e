//! Mean of a periodic composite index band.

use platform::CollectionProvider;
use raster_expr::dataset::{MODIS_MOD13Q1, MOD13Q1_SCALE};
use raster_expr::{Collection, Dataset};

use super::{IndicatorCalculator, IndicatorRequest};
use crate::aggregate::{mean_bands, Bands};
use crate::error::Result;
use crate::masking::mask_clouds;

/// Safe mean of one index band, rescaled from fixed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicMean {
    pub dataset: &'static Dataset,
    pub band: &'static str,
    pub scale: f64,
}

impl PeriodicMean {
    /// MOD13Q1 NDVI as a float.
    pub fn modis_ndvi() -> Self {
        Self {
            dataset: &MODIS_MOD13Q1,
            band: "NDVI",
            scale: MOD13Q1_SCALE,
        }
    }
}

impl IndicatorCalculator for PeriodicMean {
    fn name(&self) -> &'static str {
        "periodic_mean"
    }

    fn collection(
        &self,
        provider: &dyn CollectionProvider,
        request: &IndicatorRequest,
    ) -> Result<Collection> {
        let scenes = provider.query(
            self.dataset,
            request.roi.geometry.clone(),
            request.window,
            None,
        );
        mask_clouds(scenes)
    }

    fn derive(&self, collection: &Collection) -> Result<Bands> {
        mean_bands(collection, self.band, self.scale)
    }
}
