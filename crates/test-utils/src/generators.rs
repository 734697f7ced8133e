//! Synthetic pixel data.
//!
//! Grids are row-major, row 0 at the north edge. `None` is a masked pixel.

/// Every pixel set to `value`.
pub fn constant_grid(len: usize, value: f64) -> Vec<Option<f64>> {
    vec![Some(value); len]
}

/// Every pixel masked.
pub fn masked_grid(len: usize) -> Vec<Option<f64>> {
    vec![None; len]
}

/// `start, start + step, ...` in pixel order.
///
/// ```
/// use test_utils::ramp_grid;
///
/// let grid = ramp_grid(4, 0.1, 0.2);
/// assert_eq!(grid[3], Some(0.1 + 3.0 * 0.2));
/// ```
pub fn ramp_grid(len: usize, start: f64, step: f64) -> Vec<Option<f64>> {
    (0..len).map(|i| Some(start + i as f64 * step)).collect()
}

/// `value` everywhere except `masked`, which holds `None`.
pub fn grid_with_hole(len: usize, value: f64, masked: usize) -> Vec<Option<f64>> {
    let mut grid = constant_grid(len, value);
    if let Some(pixel) = grid.get_mut(masked) {
        *pixel = None;
    }
    grid
}

/// Red and near-infrared reflectance pairs producing the given NDVI values.
/// NDVI must be in `(-1, 1)`.
pub fn reflectance_for_ndvi(ndvi: &[f64]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    const RED: f64 = 1000.0;
    let nir = ndvi
        .iter()
        .map(|n| Some(RED * (1.0 + n) / (1.0 - n)))
        .collect();
    (nir, vec![Some(RED); ndvi.len()])
}
