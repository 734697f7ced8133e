//! Per-analyst session state.

use indicators::RasterProduct;
use verdant_common::region::DEFAULT_REGION;
use verdant_common::{RegionRegistry, Roi};

use crate::error::Result;

/// Selected region and the most recently computed product.
///
/// The product slot is written only after a successful compute and is
/// cleared whenever the region changes.
#[derive(Debug, Clone)]
pub struct Session {
    roi: Roi,
    last_product: Option<RasterProduct>,
}

impl Session {
    pub fn new(roi: Roi) -> Self {
        Self {
            roi,
            last_product: None,
        }
    }

    /// Session on the registry's default region.
    pub fn with_default_region(regions: &dyn RegionRegistry) -> Result<Self> {
        Ok(Self::new(regions.resolve(DEFAULT_REGION)?))
    }

    pub fn roi(&self) -> &Roi {
        &self.roi
    }

    /// Switch region by name. Unknown names leave the session untouched.
    pub fn select_region(&mut self, regions: &dyn RegionRegistry, name: &str) -> Result<&Roi> {
        let roi = regions.resolve(name)?;
        self.set_roi(roi);
        Ok(&self.roi)
    }

    pub fn set_roi(&mut self, roi: Roi) {
        self.roi = roi;
        self.clear_product();
    }

    pub fn last_product(&self) -> Option<&RasterProduct> {
        self.last_product.as_ref()
    }

    pub fn store_product(&mut self, product: RasterProduct) {
        self.last_product = Some(product);
    }

    pub fn clear_product(&mut self) {
        self.last_product = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicators::{Aggregate, RasterProduct};
    use verdant_common::{Category, GaulRegistry, TimeWindow};

    fn product(roi: &Roi) -> RasterProduct {
        RasterProduct::assemble(
            Category::Mineral,
            roi.clone(),
            TimeWindow::year(2019).unwrap(),
            Aggregate::NoData,
        )
        .unwrap()
    }

    #[test]
    fn test_default_region() {
        let session = Session::with_default_region(&GaulRegistry).unwrap();
        assert_eq!(session.roi().name, "Faridpur");
        assert!(session.last_product().is_none());
    }

    #[test]
    fn test_region_change_invalidates_product() {
        let mut session = Session::with_default_region(&GaulRegistry).unwrap();
        let p = product(session.roi());
        session.store_product(p);
        assert!(session.last_product().is_some());

        session.select_region(&GaulRegistry, "Dhaka").unwrap();
        assert_eq!(session.roi().name, "Dhaka");
        assert!(session.last_product().is_none());
    }

    #[test]
    fn test_clear_product() {
        let mut session = Session::with_default_region(&GaulRegistry).unwrap();
        let p = product(session.roi());
        session.store_product(p);
        session.clear_product();
        assert!(session.last_product().is_none());
        assert_eq!(session.roi().name, "Faridpur");
    }

    #[test]
    fn test_unknown_region_keeps_state() {
        let mut session = Session::with_default_region(&GaulRegistry).unwrap();
        let p = product(session.roi());
        session.store_product(p);

        assert!(session.select_region(&GaulRegistry, "Atlantis").is_err());
        assert_eq!(session.roi().name, "Faridpur");
        assert!(session.last_product().is_some());
    }
}
