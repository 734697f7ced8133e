//! Category dispatch table.

use std::collections::HashMap;
use tracing::{info, instrument};

use platform::CollectionProvider;
use verdant_common::{Category, CommonError, Thresholds};

use crate::aggregate::Aggregate;
use crate::calculators::{
    BandMean, IndicatorCalculator, IndicatorRequest, MedianIndex, PeriodicMean,
    VegetationFraction,
};
use crate::error::Result;
use crate::product::RasterProduct;

/// One row of the dispatch table.
pub struct CategoryEntry {
    pub category: Category,
    pub main_band: &'static str,
    pub thresholds: Thresholds,
    pub calculator: Box<dyn IndicatorCalculator>,
}

impl CategoryEntry {
    pub fn new(category: Category, calculator: Box<dyn IndicatorCalculator>) -> Self {
        Self {
            category,
            main_band: category.main_band(),
            thresholds: category.thresholds(),
            calculator,
        }
    }
}

/// Maps every category to its calculator, main band and thresholds.
pub struct IndicatorRegistry {
    entries: HashMap<Category, CategoryEntry>,
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorRegistry {
    /// The built-in categories.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };
        for category in Category::all() {
            let calculator: Box<dyn IndicatorCalculator> = match category {
                Category::VegetationTrend => Box::new(VegetationFraction::default()),
                Category::VegetationIndices | Category::RainfallProxy => {
                    Box::new(PeriodicMean::modis_ndvi())
                }
                Category::Crops => Box::new(MedianIndex),
                Category::Mineral => Box::new(BandMean::shortwave_albedo()),
            };
            registry.register(CategoryEntry::new(*category, calculator));
        }
        registry
    }

    /// Empty table, for callers wiring their own calculators.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register(&mut self, entry: CategoryEntry) {
        self.entries.insert(entry.category, entry);
    }

    pub fn get(&self, category: Category) -> Result<&CategoryEntry> {
        self.entries
            .get(&category)
            .ok_or_else(|| CommonError::UnknownCategory(category.label().to_string()).into())
    }

    /// Resolve a free-form category selection.
    pub fn resolve(&self, label: &str) -> Result<&CategoryEntry> {
        let category = Category::parse(label)?;
        self.get(category)
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.entries.keys().copied().collect();
        categories.sort_by_key(|c| Category::all().iter().position(|x| x == c));
        categories
    }

    /// Compute and classify a category's product. Costs one collection-size
    /// round trip.
    #[instrument(skip(self, provider, request), fields(category = %category.id(), roi = %request.roi.name))]
    pub async fn compute(
        &self,
        provider: &dyn CollectionProvider,
        category: Category,
        request: &IndicatorRequest,
    ) -> Result<RasterProduct> {
        let entry = self.get(category)?;
        let aggregate = entry.calculator.calculate(provider, request).await?;

        info!(
            calculator = entry.calculator.name(),
            scenes = aggregate.scenes(),
            nodata = aggregate.is_nodata(),
            "Indicator computed"
        );

        RasterProduct::assemble(category, request.roi.clone(), request.window, aggregate)
    }

    /// Build the product expression assuming the collection has scenes,
    /// without contacting the provider.
    pub fn plan(
        &self,
        provider: &dyn CollectionProvider,
        category: Category,
        request: &IndicatorRequest,
    ) -> Result<RasterProduct> {
        let entry = self.get(category)?;
        let collection = entry.calculator.collection(provider, request)?;
        let bands = entry.calculator.derive(&collection)?;
        RasterProduct::assemble(
            category,
            request.roi.clone(),
            request.window,
            Aggregate::Computed { bands, scenes: 0 },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_registered() {
        let registry = IndicatorRegistry::new();
        for category in Category::all() {
            let entry = registry.get(*category).unwrap();
            assert_eq!(entry.main_band, category.main_band());
            assert_eq!(entry.thresholds, category.thresholds());
        }
        assert_eq!(registry.categories(), Category::all().to_vec());
    }

    #[test]
    fn test_unregistered_category_is_unknown() {
        let registry = IndicatorRegistry::empty();
        assert!(matches!(
            registry.get(Category::Crops),
            Err(crate::IndicatorError::Common(CommonError::UnknownCategory(_)))
        ));
    }

    #[test]
    fn test_resolve_dead_category() {
        let registry = IndicatorRegistry::new();
        assert!(registry.resolve("Phenology (MODIS)").is_err());
        assert_eq!(
            registry.resolve("Mineral/Nutrients").unwrap().category,
            Category::Mineral
        );
    }
}
