//! Indicator calculators.
//!
//! A calculator describes which scenes feed a category and how a non-empty
//! collection turns into an indicator band plus an observation count. The
//! empty-collection fallback is shared and lives in [`IndicatorCalculator::calculate`].

mod band_mean;
mod median_index;
mod periodic_mean;
mod vegetation_fraction;

pub use band_mean::BandMean;
pub use median_index::MedianIndex;
pub use periodic_mean::PeriodicMean;
pub use vegetation_fraction::VegetationFraction;

use async_trait::async_trait;

use platform::CollectionProvider;
use raster_expr::dataset::{CLOUDY_PIXEL_PERCENTAGE, SENTINEL2_SR};
use raster_expr::{Collection, QualityFilter};
use verdant_common::{Roi, TimeWindow};

use crate::aggregate::{guarded, Aggregate, Bands};
use crate::error::Result;
use crate::masking::mask_clouds;

/// Name of the per-scene NDVI band added to Sentinel-2 collections.
pub const NDVI_BAND: &str = "NDVI";

/// Inputs every calculator is a function of.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRequest {
    pub roi: Roi,
    pub window: TimeWindow,
    /// Drop scenes whose cloudy-pixel percentage is not below this.
    pub max_cloud_cover: Option<f64>,
}

impl IndicatorRequest {
    pub fn new(roi: Roi, window: TimeWindow) -> Self {
        Self {
            roi,
            window,
            max_cloud_cover: None,
        }
    }

    pub fn with_max_cloud_cover(mut self, max: Option<f64>) -> Self {
        self.max_cloud_cover = max;
        self
    }
}

/// Derives one category's indicator from a scene collection.
#[async_trait]
pub trait IndicatorCalculator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The scenes feeding the indicator, already quality-masked.
    fn collection(
        &self,
        provider: &dyn CollectionProvider,
        request: &IndicatorRequest,
    ) -> Result<Collection>;

    /// Indicator and observation count of a non-empty collection.
    fn derive(&self, collection: &Collection) -> Result<Bands>;

    /// Query, check for emptiness, then derive or fall back to nodata.
    async fn calculate(
        &self,
        provider: &dyn CollectionProvider,
        request: &IndicatorRequest,
    ) -> Result<Aggregate> {
        let collection = self.collection(provider, request)?;
        guarded(provider, &collection, |c| self.derive(c)).await
    }
}

/// Cloud-masked Sentinel-2 scenes with an NDVI band.
pub(crate) fn sentinel2_ndvi(
    provider: &dyn CollectionProvider,
    request: &IndicatorRequest,
) -> Result<Collection> {
    let quality = request
        .max_cloud_cover
        .map(|max| QualityFilter::less_than(CLOUDY_PIXEL_PERCENTAGE, max));
    let scenes = provider.query(
        &SENTINEL2_SR,
        request.roi.geometry.clone(),
        request.window,
        quality,
    );
    Ok(mask_clouds(scenes)?.add_normalized_difference("B8", "B4", NDVI_BAND)?)
}
