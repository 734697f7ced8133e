//! Test support for the workspace.
//!
//! [`InMemoryPlatform`] stands in for the remote compute platform: it
//! answers collection sizes, evaluates expression graphs over a tiny grid
//! of synthetic scenes and records the export jobs it is handed, so
//! calculators and exports can be checked pixel by pixel.
//!
//! ```ignore
//! use test_utils::grid::FARIDPUR_2X2;
//! use test_utils::{clear_s2_scene, date, datasets, InMemoryPlatform};
//!
//! let platform = InMemoryPlatform::new(FARIDPUR_2X2)
//!     .with_scenes(datasets::sentinel2(), vec![clear_s2_scene(date(2019, 2, 1), 4, 0.6)]);
//! ```

pub mod eval;
pub mod fixtures;
pub mod generators;
pub mod memory;

pub use eval::{Evaluator, Raster};
pub use fixtures::*;
pub use generators::*;
pub use memory::InMemoryPlatform;

/// Assert `|left - right| <= epsilon`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon): (f64, f64, f64) = ($left as f64, $right as f64, $epsilon as f64);
        assert!(
            (left - right).abs() <= epsilon,
            "{} is not within {} of {}",
            left,
            epsilon,
            right
        );
    }};
}

/// Assert every pixel of a raster band equals `expected`.
///
/// ```ignore
/// assert_band_eq!(raster, "obs_count", Some(0.0));
/// ```
#[macro_export]
macro_rules! assert_band_eq {
    ($raster:expr, $band:expr, $expected:expr) => {{
        let pixels = $raster
            .band($band)
            .unwrap_or_else(|| panic!("band '{}' missing from {:?}", $band, $raster.names()));
        for (i, v) in pixels.iter().enumerate() {
            assert_eq!(*v, $expected, "band '{}' pixel {}", $band, i);
        }
    }};
}
