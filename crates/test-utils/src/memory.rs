//! In-memory stand-in for the remote raster-compute platform.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use platform::{
    ArtifactKind, CollectionProvider, ComputeService, ExportDestination, ExportJob,
    ExportPayload, JobHandle, PlatformError, PlatformResult, ReducedValues,
};
use raster_expr::{CollectionExpr, ImageExpr, RegionReduction};

use crate::eval::{EvalResult, Evaluator, Raster};
use crate::fixtures::{GridSpec, Scene};

/// Implements every platform trait against a catalog of in-memory scenes.
/// Submitted jobs are recorded and can be evaluated afterwards.
pub struct InMemoryPlatform {
    spec: GridSpec,
    catalog: HashMap<String, Vec<Scene>>,
    submitted: Mutex<Vec<(JobHandle, ExportJob)>>,
    failing: HashSet<ArtifactKind>,
    fail_size: bool,
    fail_reduce: bool,
    size_calls: AtomicUsize,
    reduce_calls: AtomicUsize,
}

impl InMemoryPlatform {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            catalog: HashMap::new(),
            submitted: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            fail_size: false,
            fail_reduce: false,
            size_calls: AtomicUsize::new(0),
            reduce_calls: AtomicUsize::new(0),
        }
    }

    /// Add scenes to a dataset.
    pub fn with_scenes(mut self, dataset: &str, scenes: Vec<Scene>) -> Self {
        self.catalog
            .entry(dataset.to_string())
            .or_default()
            .extend(scenes);
        self
    }

    /// Reject submissions of this artifact.
    pub fn failing_artifact(mut self, artifact: ArtifactKind) -> Self {
        self.failing.insert(artifact);
        self
    }

    /// Fail every collection-size query.
    pub fn failing_size(mut self) -> Self {
        self.fail_size = true;
        self
    }

    /// Fail every region reduction.
    pub fn failing_reduce(mut self) -> Self {
        self.fail_reduce = true;
        self
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn size_calls(&self) -> usize {
        self.size_calls.load(Ordering::SeqCst)
    }

    pub fn reduce_calls(&self) -> usize {
        self.reduce_calls.load(Ordering::SeqCst)
    }

    /// Jobs accepted so far, in submission order.
    pub fn submitted(&self) -> Vec<ExportJob> {
        self.lock().iter().map(|(_, job)| job.clone()).collect()
    }

    pub fn handles(&self) -> Vec<JobHandle> {
        self.lock().iter().map(|(h, _)| h.clone()).collect()
    }

    pub fn job(&self, artifact: ArtifactKind) -> Option<ExportJob> {
        self.lock()
            .iter()
            .find(|(_, job)| job.artifact == artifact)
            .map(|(_, job)| job.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(JobHandle, ExportJob)>> {
        self.submitted.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.spec, &self.catalog)
    }

    /// Evaluate an image expression.
    pub fn evaluate(&self, expr: &ImageExpr) -> EvalResult<Raster> {
        self.evaluator().image(expr)
    }

    /// Evaluate what a raster export job would write.
    pub fn evaluate_raster_job(&self, job: &ExportJob) -> EvalResult<Raster> {
        match &job.payload {
            ExportPayload::Raster { image, .. } => self.evaluate(image),
            ExportPayload::Table { .. } => Err(format!("{} is a table job", job.name)),
        }
    }

    /// Evaluate the rows a table export job would write.
    pub fn evaluate_table_job(
        &self,
        job: &ExportJob,
    ) -> EvalResult<Vec<HashMap<String, serde_json::Value>>> {
        let table = match &job.payload {
            ExportPayload::Table { table } => table,
            ExportPayload::Raster { .. } => return Err(format!("{} is a raster job", job.name)),
        };

        let mut rows = Vec::new();
        for feature in &table.features {
            let mut row: HashMap<String, serde_json::Value> = feature
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if let Some(reduction) = &feature.values {
                for (key, value) in self.evaluator().reduce_region(reduction)? {
                    row.insert(key, serde_json::json!(value));
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

fn rejected(message: impl Into<String>) -> PlatformError {
    PlatformError::from_status(400, message)
}

#[async_trait]
impl CollectionProvider for InMemoryPlatform {
    async fn size(&self, collection: &CollectionExpr) -> PlatformResult<u64> {
        self.size_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_size {
            return Err(PlatformError::Transport("injected size failure".to_string()));
        }
        let scenes = self.evaluator().collection(collection).map_err(rejected)?;
        Ok(scenes.len() as u64)
    }
}

#[async_trait]
impl ComputeService for InMemoryPlatform {
    async fn reduce_region(&self, reduction: &RegionReduction) -> PlatformResult<ReducedValues> {
        self.reduce_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reduce {
            return Err(PlatformError::QuotaExceeded("injected reduce failure".to_string()));
        }
        self.evaluator().reduce_region(reduction).map_err(rejected)
    }
}

#[async_trait]
impl ExportDestination for InMemoryPlatform {
    async fn submit(&self, job: &ExportJob) -> PlatformResult<JobHandle> {
        if self.failing.contains(&job.artifact) {
            return Err(PlatformError::from_status(
                500,
                format!("injected failure for {}", job.artifact),
            ));
        }
        let mut submitted = self.lock();
        let handle = JobHandle::new(format!("mem-{}", submitted.len() + 1));
        submitted.push((handle.clone(), job.clone()));
        Ok(handle)
    }
}
