//! Mean of a single physical band used as a proxy.

use platform::CollectionProvider;
use raster_expr::dataset::MODIS_MCD43A3;
use raster_expr::{Collection, Dataset};

use super::{IndicatorCalculator, IndicatorRequest};
use crate::aggregate::{mean_bands, Bands};
use crate::error::Result;
use crate::masking::mask_clouds;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMean {
    pub dataset: &'static Dataset,
    pub band: &'static str,
    pub multiplier: f64,
}

impl BandMean {
    /// Black-sky shortwave albedo, unscaled.
    pub fn shortwave_albedo() -> Self {
        Self {
            dataset: &MODIS_MCD43A3,
            band: "Albedo_BSA_shortwave",
            multiplier: 1.0,
        }
    }
}

impl IndicatorCalculator for BandMean {
    fn name(&self) -> &'static str {
        "band_mean"
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
        Ok(mask_clouds(scenes)?.select(&[self.band])?)
    }

    fn derive(&self, collection: &Collection) -> Result<Bands> {
        mean_bands(collection, self.band, self.multiplier)
    }
}
