//! The analyst-facing workflow.
//!
//! ```text
//! Session (ROI, last product)
//!    │
//!    ├─ run:     resolve category/year ─► compute ─► store ─► export ─► stats
//!    ├─ plan:    same expressions, nothing submitted
//!    └─ inspect: first valid value per band at a point
//! ```

pub mod error;
pub mod inspector;
pub mod session;
pub mod workflow;

pub use error::{PipelineError, Result};
pub use inspector::Inspection;
pub use session::Session;
pub use workflow::{RunPlan, RunRequest, RunSummary, Services, Workflow, WorkflowSettings};
