//! Interfaces of the remote raster-compute platform.
//!
//! The core never evaluates pixels. It hands expressions to these services
//! and treats every call as possibly failing.

use async_trait::async_trait;
use std::collections::BTreeMap;

use raster_expr::{Collection, CollectionExpr, Dataset, QualityFilter, RegionReduction};
use verdant_common::{Geometry, TimeWindow};

use crate::error::PlatformResult;
use crate::job::{ExportJob, JobHandle};

/// Named values returned by a region reduction. `None` marks a key for which
/// no valid pixel was found.
pub type ReducedValues = BTreeMap<String, Option<f64>>;

/// Source of lazy scene collections.
#[async_trait]
pub trait CollectionProvider: Send + Sync {
    /// Describe the scenes of `dataset` matching bounds, window and an
    /// optional scene-level quality filter. Nothing is fetched.
    fn query(
        &self,
        dataset: &Dataset,
        bounds: Geometry,
        window: TimeWindow,
        quality: Option<QualityFilter>,
    ) -> Collection {
        let collection = Collection::query(dataset, bounds, window);
        match quality {
            Some(filter) => collection.filter(filter),
            None => collection,
        }
    }

    /// Number of scenes in a collection. One round trip.
    async fn size(&self, collection: &CollectionExpr) -> PlatformResult<u64>;
}

/// Synchronous-result computations on the remote service.
#[async_trait]
pub trait ComputeService: Send + Sync {
    async fn reduce_region(&self, reduction: &RegionReduction) -> PlatformResult<ReducedValues>;
}

/// Where export jobs are sent. Submission returns as soon as the job is
/// accepted; completion is never awaited.
#[async_trait]
pub trait ExportDestination: Send + Sync {
    async fn submit(&self, job: &ExportJob) -> PlatformResult<JobHandle>;
}
