//! Five-artifact export of a finished product.
//!
//! Jobs are built locally, then submitted concurrently. Each artifact
//! succeeds, is skipped (a band it needs is absent) or fails on its own;
//! nothing waits for the exports themselves to finish.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, instrument, warn};

use indicators::RasterProduct;
use platform::{ArtifactKind, ExportDestination, ExportJob, JobHandle};
use raster_expr::Image;
use verdant_common::bands;

use crate::error::{ExportError, Result};
use crate::naming::{artifact_name, base_name};
use crate::settings::ExportSettings;
use crate::stats::stats_table;
use crate::thumbnail::thumbnail;

/// Labels and settings of one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub category: String,
    pub year: i32,
    pub aoi: String,
    pub settings: ExportSettings,
}

impl ExportRequest {
    pub fn base_name(&self) -> String {
        base_name(&self.category, self.year, &self.aoi)
    }
}

/// What happened to one artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ArtifactOutcome {
    Submitted(JobHandle),
    Skipped(String),
    Failed(String),
}

/// Per-artifact outcomes, in artifact order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub base_name: String,
    pub artifacts: Vec<(ArtifactKind, ArtifactOutcome)>,
}

impl ExportReport {
    pub fn outcome(&self, artifact: ArtifactKind) -> Option<&ArtifactOutcome> {
        self.artifacts
            .iter()
            .find(|(kind, _)| *kind == artifact)
            .map(|(_, outcome)| outcome)
    }

    pub fn handle(&self, artifact: ArtifactKind) -> Option<&JobHandle> {
        match self.outcome(artifact) {
            Some(ArtifactOutcome::Submitted(handle)) => Some(handle),
            _ => None,
        }
    }

    pub fn submitted(&self) -> usize {
        self.count(|o| matches!(o, ArtifactOutcome::Submitted(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ArtifactOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ArtifactOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&ArtifactOutcome) -> bool) -> usize {
        self.artifacts.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Build the job for one artifact.
pub fn build_job(
    product: &RasterProduct,
    request: &ExportRequest,
    artifact: ArtifactKind,
) -> Result<ExportJob> {
    let settings = &request.settings;
    let name = artifact_name(&request.base_name(), artifact);
    let region = product.roi.geometry.clone();
    let crs = Some(settings.crs.clone());

    let raster = |image: Image, scale: f64, crs: Option<String>| {
        ExportJob::raster(
            artifact,
            name.clone(),
            settings.folder.clone(),
            &image,
            region.clone(),
            scale,
            crs,
            settings.max_pixels,
        )
    };

    let job = match artifact {
        ArtifactKind::Main => raster(product.band(bands::INDICATOR)?.to_float(), settings.scale, crs),
        ArtifactKind::Class => raster(product.band(bands::CLASS)?.to_int(), settings.scale, crs),
        ArtifactKind::ObsCount => {
            raster(product.band(bands::OBS_COUNT)?.to_int(), settings.scale, crs)
        }
        ArtifactKind::Stats => ExportJob::table(
            artifact,
            name.clone(),
            settings.folder.clone(),
            stats_table(product, settings, &request.category, request.year, &request.aoi)?,
        ),
        ArtifactKind::Thumbnail => raster(thumbnail(product)?, settings.thumbnail_scale(), None),
    };
    Ok(job)
}

/// Build every artifact's job, keeping per-artifact build errors.
pub fn plan_jobs(
    product: &RasterProduct,
    request: &ExportRequest,
) -> Vec<(ArtifactKind, Result<ExportJob>)> {
    ArtifactKind::all()
        .iter()
        .map(|artifact| (*artifact, build_job(product, request, *artifact)))
        .collect()
}

/// Submits a product's artifacts to an export destination.
pub struct ExportCoordinator<'a> {
    destination: &'a dyn ExportDestination,
}

impl<'a> ExportCoordinator<'a> {
    pub fn new(destination: &'a dyn ExportDestination) -> Self {
        Self { destination }
    }

    #[instrument(skip_all, fields(category = %request.category, year = request.year, aoi = %request.aoi))]
    pub async fn export_all(&self, product: &RasterProduct, request: &ExportRequest) -> ExportReport {
        let base_name = request.base_name();
        let planned = plan_jobs(product, request);

        let submissions = planned.into_iter().map(|(artifact, job)| async move {
            let outcome = match job {
                Ok(job) => self.submit(artifact, &job).await,
                Err(e) if e.is_missing_band() => {
                    warn!(artifact = %artifact, error = %e, "Skipping artifact");
                    ArtifactOutcome::Skipped(e.to_string())
                }
                Err(e) => {
                    warn!(artifact = %artifact, error = %e, "Could not build export");
                    ArtifactOutcome::Failed(e.to_string())
                }
            };
            (artifact, outcome)
        });
        let artifacts = join_all(submissions).await;

        let report = ExportReport {
            base_name,
            artifacts,
        };
        info!(
            base = %report.base_name,
            submitted = report.submitted(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Export scheduled"
        );
        report
    }

    async fn submit(&self, artifact: ArtifactKind, job: &ExportJob) -> ArtifactOutcome {
        match self.destination.submit(job).await {
            Ok(handle) => {
                info!(artifact = %artifact, job = %handle, name = %job.name, "Export submitted");
                ArtifactOutcome::Submitted(handle)
            }
            Err(e) => {
                let e = ExportError::from(e);
                warn!(artifact = %artifact, error = %e, "Export submission failed");
                ArtifactOutcome::Failed(e.to_string())
            }
        }
    }
}
