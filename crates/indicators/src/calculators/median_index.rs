//! Per-pixel median of Sentinel-2 NDVI.

use platform::CollectionProvider;
use raster_expr::Collection;

use super::{sentinel2_ndvi, IndicatorCalculator, IndicatorRequest, NDVI_BAND};
use crate::aggregate::{guard_nodata, observation_count, Bands};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MedianIndex;

impl IndicatorCalculator for MedianIndex {
    fn name(&self) -> &'static str {
        "median_index"
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
        let median = collection.clone().select(&[NDVI_BAND])?.median();
        Ok(Bands {
            indicator: guard_nodata(median, &obs_count)?,
            obs_count,
        })
    }
}
