//! Redis Streams export queue, for deployments where a worker pool drains
//! export jobs and forwards them to the platform.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, streams::StreamInfoStreamReply, AsyncCommands, Client};
use tracing::{info, instrument};

use crate::error::{PlatformError, PlatformResult};
use crate::job::{ExportJob, JobHandle};
use crate::service::ExportDestination;

const STREAM_KEY: &str = "verdant:exports";
const CONSUMER_GROUP: &str = "exporters";

/// Export destination backed by a Redis stream.
pub struct ExportQueue {
    conn: MultiplexedConnection,
}

impl ExportQueue {
    /// Connect and make sure the stream and consumer group exist.
    pub async fn connect(redis_url: &str) -> PlatformResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| PlatformError::Queue(format!("Redis connection failed: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| PlatformError::Queue(format!("Redis connection failed: {}", e)))?;

        // Fails with BUSYGROUP when the group already exists
        let _: Result<(), _> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(STREAM_KEY)
            .arg(CONSUMER_GROUP)
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        Ok(Self { conn })
    }

    /// Number of entries in the stream.
    pub async fn queue_depth(&self) -> PlatformResult<u64> {
        let mut conn = self.conn.clone();
        let info: StreamInfoStreamReply = conn.xinfo_stream(STREAM_KEY).await?;
        Ok(info.length as u64)
    }
}

#[async_trait]
impl ExportDestination for ExportQueue {
    #[instrument(skip(self, job), fields(artifact = %job.artifact, name = %job.name))]
    async fn submit(&self, job: &ExportJob) -> PlatformResult<JobHandle> {
        let job_json = serde_json::to_string(job)?;
        let mut conn = self.conn.clone();

        let entry_id: String = redis::cmd("XADD")
            .arg(STREAM_KEY)
            .arg("*")
            .arg("job_id")
            .arg(job.id.to_string())
            .arg("artifact")
            .arg(job.artifact.suffix())
            .arg("data")
            .arg(&job_json)
            .query_async(&mut conn)
            .await
            .map_err(|e| PlatformError::Queue(format!("Enqueue failed: {}", e)))?;

        info!(entry = %entry_id, "Export enqueued");
        Ok(JobHandle::new(entry_id))
    }
}
