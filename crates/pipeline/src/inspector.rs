//! Point sampling of the last computed product.

use serde::Serialize;
use tracing::{debug, instrument};

use platform::{ComputeService, ReducedValues};
use raster_expr::{RegionReducer, RegionReduction};
use verdant_common::{Coordinate, Geometry};

use crate::error::Result;
use crate::session::Session;

/// Pixel budget of an inspector query.
pub const INSPECTOR_MAX_PIXELS: f64 = 1e9;

/// Result of clicking the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Inspection {
    /// No product has been computed in this session yet.
    NothingComputed,
    /// First valid value of every band at the nearest pixel.
    Sampled {
        coordinate: Coordinate,
        values: ReducedValues,
    },
}

/// Sample every band of the session's product at `coordinate`.
#[instrument(skip(compute, session), fields(lon = coordinate.lon, lat = coordinate.lat))]
pub async fn inspect(
    compute: &dyn ComputeService,
    session: &Session,
    coordinate: Coordinate,
    scale: f64,
    max_pixels: f64,
) -> Result<Inspection> {
    let Some(product) = session.last_product() else {
        debug!("Nothing computed yet");
        return Ok(Inspection::NothingComputed);
    };

    let reduction = RegionReduction::new(
        product.image(),
        Geometry::Point(coordinate),
        vec![RegionReducer::First],
        scale,
        max_pixels,
    );
    let values = compute.reduce_region(&reduction).await?;
    Ok(Inspection::Sampled { coordinate, values })
}
