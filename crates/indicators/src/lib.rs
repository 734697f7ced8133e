//! Indicator computation.
//!
//! For a category, ROI and time window this crate builds the expression of
//! a three-band raster product:
//!
//! | band        | meaning                                             |
//! |-------------|-----------------------------------------------------|
//! | `indicator` | continuous value, unit per category, NODATA = -9999 |
//! | `obs_count` | valid observations contributing to the pixel        |
//! | `class`     | 0 low, 1 moderate, 2 good; 0 wherever NODATA        |
//!
//! Scenes are cloud-masked ([`masking`]), aggregated with an empty-collection
//! fallback ([`aggregate`]) by the category's calculator ([`calculators`]),
//! then classified ([`classify`]).

pub mod aggregate;
pub mod calculators;
pub mod classify;
pub mod error;
pub mod masking;
pub mod product;
pub mod registry;

pub use aggregate::{Aggregate, Bands};
pub use calculators::{IndicatorCalculator, IndicatorRequest};
pub use error::{IndicatorError, Result};
pub use product::{Availability, RasterProduct};
pub use registry::{CategoryEntry, IndicatorRegistry};
