//! Common types shared across the verdant-view crates.

pub mod bbox;
pub mod category;
pub mod error;
pub mod geometry;
pub mod region;
pub mod style;
pub mod time;

pub use bbox::BoundingBox;
pub use category::{Category, CategorySpec, Thresholds};
pub use error::{CommonError, CommonResult};
pub use geometry::{Coordinate, Geometry};
pub use region::{GaulRegistry, RegionRegistry, Roi};
pub use style::{Color, Palette, VisParams};
pub use time::{Season, TimeWindow};

/// Sentinel written into the indicator band wherever nothing could be computed.
pub const NODATA: f64 = -9999.0;

/// Canonical band names of a raster product.
pub mod bands {
    pub const INDICATOR: &str = "indicator";
    pub const OBS_COUNT: &str = "obs_count";
    pub const CLASS: &str = "class";
}
