//! Remote platform interfaces.
//!
//! Three services stand between the indicator pipeline and the outside
//! world:
//!
//! - [`CollectionProvider`]: lazy scene collections and their size
//! - [`ComputeService`]: region reductions (statistics, point samples)
//! - [`ExportDestination`]: fire-and-forget export submission
//!
//! [`HttpPlatform`] implements all three against the platform's REST API;
//! [`ExportQueue`] is an alternative export destination on Redis Streams.

pub mod config;
pub mod error;
pub mod http;
pub mod job;
pub mod queue;
pub mod service;

pub use config::PlatformConfig;
pub use error::{PlatformError, PlatformResult};
pub use http::HttpPlatform;
pub use job::{ArtifactKind, ExportJob, ExportPayload, FileFormat, JobHandle};
pub use queue::ExportQueue;
pub use service::{CollectionProvider, ComputeService, ExportDestination, ReducedValues};
