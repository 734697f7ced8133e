//! Summary statistics of the indicator band over the ROI.

use serde::Serialize;
use std::fmt;
use tracing::instrument;

use indicators::RasterProduct;
use platform::{ComputeService, ReducedValues};
use raster_expr::{Feature, FeatureTable, RegionReducer, RegionReduction};

use crate::error::Result;
use crate::settings::ExportSettings;

/// Columns of the exported stats table, in order.
pub const STATS_COLUMNS: [&str; 6] = ["min", "max", "mean", "Category", "Year", "AOI"];

/// {min, max, mean} of `indicator` over the ROI at the export scale.
pub fn stats_reduction(product: &RasterProduct, settings: &ExportSettings) -> Result<RegionReduction> {
    Ok(RegionReduction::new(
        &product.indicator()?,
        product.roi.geometry.clone(),
        vec![RegionReducer::Min, RegionReducer::Max, RegionReducer::Mean],
        settings.scale,
        settings.max_pixels,
    ))
}

/// Single-row table: the reduction plus Category, Year and AOI.
pub fn stats_table(
    product: &RasterProduct,
    settings: &ExportSettings,
    category: &str,
    year: i32,
    aoi: &str,
) -> Result<FeatureTable> {
    let feature = Feature::new(Some(stats_reduction(product, settings)?))
        .set("Category", category)
        .set("Year", year)
        .set("AOI", aoi);
    Ok(FeatureTable::new(vec![feature], &STATS_COLUMNS))
}

/// Reduced statistics; `None` where the region had no valid pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl SummaryStats {
    pub fn from_values(values: &ReducedValues) -> Self {
        let get = |key: &str| values.get(key).copied().flatten();
        Self {
            min: get("min"),
            max: get("max"),
            mean: get("mean"),
        }
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map_or_else(|| "null".to_string(), |v| format!("{}", v));
        write!(
            f,
            "min={} max={} mean={}",
            show(self.min),
            show(self.max),
            show(self.mean)
        )
    }
}

/// Ask the compute service for the summary statistics.
#[instrument(skip_all, fields(category = %product.category.id(), roi = %product.roi.name))]
pub async fn summarize(
    compute: &dyn ComputeService,
    product: &RasterProduct,
    settings: &ExportSettings,
) -> Result<SummaryStats> {
    let reduction = stats_reduction(product, settings)?;
    let values = compute.reduce_region(&reduction).await?;
    Ok(SummaryStats::from_values(&values))
}
