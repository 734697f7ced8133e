//! Safe aggregation of a possibly empty collection.
//!
//! Whether a collection is empty is only known after a size round trip to
//! the provider. That answer selects between building the real expression
//! and the constant nodata placeholder, locally, before anything is sent
//! for evaluation.

use tracing::debug;

use platform::CollectionProvider;
use raster_expr::{Collection, Image};
use verdant_common::{bands, NODATA};

use crate::error::Result;

/// Indicator plus observation count, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub indicator: Image,
    pub obs_count: Image,
}

impl Bands {
    /// `indicator = NODATA`, `obs_count = 0` everywhere.
    pub fn nodata() -> Self {
        Self {
            indicator: Image::constant(NODATA, bands::INDICATOR),
            obs_count: Image::constant(0.0, bands::OBS_COUNT),
        }
    }
}

/// Outcome of aggregating a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    /// The collection had scenes; `bands` is the derived expression.
    Computed { bands: Bands, scenes: u64 },
    /// No scene passed the filters.
    NoData,
}

impl Aggregate {
    pub fn is_nodata(&self) -> bool {
        matches!(self, Aggregate::NoData)
    }

    pub fn scenes(&self) -> u64 {
        match self {
            Aggregate::Computed { scenes, .. } => *scenes,
            Aggregate::NoData => 0,
        }
    }

    /// The bands to publish: the computed ones or the nodata placeholder.
    pub fn into_bands(self) -> Bands {
        match self {
            Aggregate::Computed { bands, .. } => bands,
            Aggregate::NoData => Bands::nodata(),
        }
    }
}

/// Per-pixel count of valid values of `band`, zero where there are none.
pub fn observation_count(collection: &Collection, band: &str) -> Result<Image> {
    Ok(collection
        .clone()
        .select(&[band])?
        .count()
        .unmask(0.0)
        .rename(bands::OBS_COUNT)?)
}

/// Overwrite pixels with no contributing observation with NODATA and name
/// the result `indicator`.
pub fn guard_nodata(value: Image, obs_count: &Image) -> Result<Image> {
    let empty = obs_count.clone().equals(0.0);
    Ok(value
        .unmask(NODATA)
        .replace_where(&empty, NODATA)?
        .rename(bands::INDICATOR)?)
}

/// Mean of `band` times `multiplier`, with its observation count. Assumes a
/// non-empty collection; pixels masked in every scene become NODATA.
pub fn mean_bands(collection: &Collection, band: &str, multiplier: f64) -> Result<Bands> {
    let obs_count = observation_count(collection, band)?;
    let mean = collection.clone().select(&[band])?.mean().multiply(multiplier);
    let indicator = guard_nodata(mean, &obs_count)?;
    Ok(Bands {
        indicator,
        obs_count,
    })
}

/// Run `derive` on the collection if it has scenes, otherwise report
/// [`Aggregate::NoData`]. The size query is the only suspension point.
pub async fn guarded<F>(
    provider: &dyn CollectionProvider,
    collection: &Collection,
    derive: F,
) -> Result<Aggregate>
where
    F: FnOnce(&Collection) -> Result<Bands> + Send,
{
    let scenes = provider.size(collection.expr()).await?;
    if scenes == 0 {
        debug!("Empty collection, using nodata placeholder");
        return Ok(Aggregate::NoData);
    }

    debug!(scenes, "Collection has scenes");
    Ok(Aggregate::Computed {
        bands: derive(collection)?,
        scenes,
    })
}

/// Safe mean of `band` scaled by `multiplier`.
pub async fn safe_mean(
    provider: &dyn CollectionProvider,
    collection: &Collection,
    band: &str,
    multiplier: f64,
) -> Result<Aggregate> {
    guarded(provider, collection, |c| mean_bands(c, band, multiplier)).await
}
