//! Color-mapped quicklook of the indicator.

use indicators::RasterProduct;
use raster_expr::Image;

use crate::error::Result;

/// The indicator rendered with its category's palette and stretch.
pub fn thumbnail(product: &RasterProduct) -> Result<Image> {
    Ok(product
        .indicator()?
        .visualize(product.category.vis_params())?)
}
