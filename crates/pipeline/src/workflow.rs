//! The "compute and export" action.

use serde::Serialize;
use tracing::{info, instrument, warn};

use export::coordinator::plan_jobs;
use export::{summarize, ExportCoordinator, ExportReport, ExportRequest, ExportSettings, SummaryStats};
use indicators::{Availability, IndicatorRegistry, IndicatorRequest, RasterProduct};
use platform::{CollectionProvider, ComputeService, ExportDestination, ExportJob};
use raster_expr::ImageExpr;
use verdant_common::{Category, CommonError, Coordinate, Season, TimeWindow};

use crate::error::Result;
use crate::inspector::{inspect, Inspection};
use crate::session::Session;

/// The remote services a workflow talks to.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub provider: &'a dyn CollectionProvider,
    pub compute: &'a dyn ComputeService,
    pub destination: &'a dyn ExportDestination,
}

impl<'a> Services<'a> {
    /// One backend implementing every interface.
    pub fn uniform<P>(platform: &'a P) -> Self
    where
        P: CollectionProvider + ComputeService + ExportDestination,
    {
        Self {
            provider: platform,
            compute: platform,
            destination: platform,
        }
    }
}

/// Defaults and limits of the workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    /// Years offered for selection.
    pub years: Vec<i32>,
    pub export: ExportSettings,
    pub max_cloud_cover: Option<f64>,
    pub inspector_max_pixels: f64,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            years: vec![2018, 2019, 2020],
            export: ExportSettings::default(),
            max_cloud_cover: None,
            inspector_max_pixels: crate::inspector::INSPECTOR_MAX_PIXELS,
        }
    }
}

/// One analyst action: the panel's selections as entered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunRequest {
    pub category: String,
    pub year: i32,
    pub season: Season,
    /// Raw scale text; unusable input falls back to the default.
    pub scale: Option<String>,
    /// Raw folder text; blank falls back to the default.
    pub folder: Option<String>,
}

/// Result of a completed action.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub category: Category,
    pub year: i32,
    pub season: Season,
    pub aoi: String,
    pub availability: Availability,
    pub fingerprint: String,
    pub export: ExportReport,
    /// `None` when the statistics request failed.
    pub stats: Option<SummaryStats>,
}

/// Expressions and jobs an action would submit, for inspection.
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    pub category: Category,
    pub fingerprint: String,
    pub product: ImageExpr,
    pub jobs: Vec<ExportJob>,
    /// Artifacts that could not be built, with the reason.
    pub skipped: Vec<(String, String)>,
}

pub struct Workflow<'a> {
    services: Services<'a>,
    registry: IndicatorRegistry,
    settings: WorkflowSettings,
}

impl<'a> Workflow<'a> {
    pub fn new(services: Services<'a>, settings: WorkflowSettings) -> Self {
        Self {
            services,
            registry: IndicatorRegistry::new(),
            settings,
        }
    }

    pub fn with_registry(mut self, registry: IndicatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Export settings after applying the request's raw panel input.
    pub fn export_settings(&self, request: &RunRequest) -> ExportSettings {
        self.settings
            .export
            .clone()
            .with_panel_input(request.scale.as_deref(), request.folder.as_deref())
    }

    fn resolve(&self, session: &Session, request: &RunRequest) -> Result<(Category, IndicatorRequest)> {
        if !self.settings.years.contains(&request.year) {
            return Err(CommonError::InvalidYear {
                year: request.year,
                available: self.settings.years.clone(),
            }
            .into());
        }

        let category = self.registry.resolve(&request.category)?.category;
        let window = TimeWindow::for_season(request.year, request.season)?;
        let indicator_request = IndicatorRequest::new(session.roi().clone(), window)
            .with_max_cloud_cover(self.settings.max_cloud_cover);
        Ok((category, indicator_request))
    }

    fn export_request(&self, session: &Session, category: Category, request: &RunRequest) -> ExportRequest {
        ExportRequest {
            category: category.label().to_string(),
            year: request.year,
            aoi: session.roi().name.clone(),
            settings: self.export_settings(request),
        }
    }

    /// Compute the product, keep it as the session's last product, schedule
    /// the exports and log summary statistics.
    ///
    /// An unimplemented category or unavailable year is returned as a
    /// notice error before anything is computed.
    #[instrument(skip(self, session), fields(aoi = %session.roi().name))]
    pub async fn run(&self, session: &mut Session, request: &RunRequest) -> Result<RunSummary> {
        let (category, indicator_request) = self.resolve(session, request)?;

        let product = self
            .registry
            .compute(self.services.provider, category, &indicator_request)
            .await?;
        let fingerprint = product.fingerprint()?;
        session.store_product(product.clone());

        let export_request = self.export_request(session, category, request);
        let export = ExportCoordinator::new(self.services.destination)
            .export_all(&product, &export_request)
            .await;

        let stats = self.log_stats(&product, &export_request.settings, request.year).await;

        Ok(RunSummary {
            category,
            year: request.year,
            season: request.season,
            aoi: session.roi().name.clone(),
            availability: product.availability,
            fingerprint,
            export,
            stats,
        })
    }

    async fn log_stats(
        &self,
        product: &RasterProduct,
        settings: &ExportSettings,
        year: i32,
    ) -> Option<SummaryStats> {
        match summarize(self.services.compute, product, settings).await {
            Ok(stats) => {
                info!(
                    category = %product.category,
                    year,
                    stats = %stats,
                    "Summary statistics (min, max, mean)"
                );
                Some(stats)
            }
            Err(e) => {
                warn!(error = %e, "Summary statistics unavailable");
                None
            }
        }
    }

    /// Build the product and export jobs without calling the platform.
    pub fn plan(&self, session: &Session, request: &RunRequest) -> Result<RunPlan> {
        let (category, indicator_request) = self.resolve(session, request)?;
        let product = self
            .registry
            .plan(self.services.provider, category, &indicator_request)?;
        let export_request = self.export_request(session, category, request);

        let mut jobs = Vec::new();
        let mut skipped = Vec::new();
        for (artifact, job) in plan_jobs(&product, &export_request) {
            match job {
                Ok(job) => jobs.push(job),
                Err(e) => skipped.push((artifact.to_string(), e.to_string())),
            }
        }

        Ok(RunPlan {
            category,
            fingerprint: product.fingerprint()?,
            product: product.image().expr().clone(),
            jobs,
            skipped,
        })
    }

    /// Sample the last product at a map coordinate.
    pub async fn inspect(
        &self,
        session: &Session,
        coordinate: Coordinate,
        scale_text: Option<&str>,
    ) -> Result<Inspection> {
        let scale = self
            .settings
            .export
            .clone()
            .with_panel_input(scale_text, None)
            .scale;
        inspect(
            self.services.compute,
            session,
            coordinate,
            scale,
            self.settings.inspector_max_pixels,
        )
        .await
    }
}
