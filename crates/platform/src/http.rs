//! HTTP client for the remote raster-compute platform.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

use raster_expr::{CollectionExpr, RegionReduction};

use crate::config::PlatformConfig;
use crate::error::{PlatformError, PlatformResult};
use crate::job::{ExportJob, JobHandle};
use crate::service::{CollectionProvider, ComputeService, ExportDestination, ReducedValues};

const SIZE_PATH: &str = "v1/collections/size";
const REDUCE_PATH: &str = "v1/reduce-region";
const EXPORT_PATH: &str = "v1/exports";

#[derive(Serialize)]
struct SizeRequest<'a> {
    collection: &'a CollectionExpr,
}

#[derive(Deserialize)]
struct SizeResponse {
    size: u64,
}

#[derive(Deserialize)]
struct ReduceResponse {
    values: ReducedValues,
}

#[derive(Deserialize)]
struct ExportResponse {
    task_id: String,
}

/// Talks JSON to the platform's REST surface.
pub struct HttpPlatform {
    client: Client,
    config: PlatformConfig,
}

impl HttpPlatform {
    pub fn new(config: PlatformConfig) -> PlatformResult<Self> {
        config.validate().map_err(PlatformError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlatformError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> PlatformResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.url(path);
        debug!(url = %url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::from_status(status.as_u16(), body));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| PlatformError::InvalidResponse(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl CollectionProvider for HttpPlatform {
    #[instrument(skip(self, collection))]
    async fn size(&self, collection: &CollectionExpr) -> PlatformResult<u64> {
        let response: SizeResponse = self.post(SIZE_PATH, &SizeRequest { collection }).await?;
        debug!(size = response.size, "Collection size");
        Ok(response.size)
    }
}

#[async_trait]
impl ComputeService for HttpPlatform {
    #[instrument(skip(self, reduction), fields(scale = reduction.scale))]
    async fn reduce_region(&self, reduction: &RegionReduction) -> PlatformResult<ReducedValues> {
        let response: ReduceResponse = self.post(REDUCE_PATH, reduction).await?;
        Ok(response.values)
    }
}

#[async_trait]
impl ExportDestination for HttpPlatform {
    #[instrument(skip(self, job), fields(artifact = %job.artifact, name = %job.name))]
    async fn submit(&self, job: &ExportJob) -> PlatformResult<JobHandle> {
        let response: ExportResponse = self.post(EXPORT_PATH, job).await?;
        info!(task = %response.task_id, folder = %job.folder, "Export submitted");
        Ok(JobHandle::new(response.task_id))
    }
}
