//! Export of finished raster products.
//!
//! Every product yields five artifacts named `{category}{year}{aoi}_{suffix}`
//! (whitespace stripped):
//!
//! | suffix      | content                               | scale                  |
//! |-------------|---------------------------------------|------------------------|
//! | `main`      | `indicator` as float                  | export scale           |
//! | `class`     | `class` as integer                    | export scale           |
//! | `obs_count` | `obs_count` as integer, if present    | export scale           |
//! | `stats`     | CSV row: min, max, mean, Category, Year, AOI | export scale    |
//! | `thumbnail` | palette-rendered `indicator`          | max(30, 4 x scale)     |

pub mod coordinator;
pub mod error;
pub mod naming;
pub mod settings;
pub mod stats;
pub mod thumbnail;

pub use coordinator::{ArtifactOutcome, ExportCoordinator, ExportReport, ExportRequest};
pub use error::{ExportError, Result};
pub use settings::ExportSettings;
pub use stats::{summarize, SummaryStats};
