//! Output naming: `{category}{year}{aoi}_{suffix}` with whitespace removed.

use platform::ArtifactKind;

/// Remove every whitespace character.
pub fn sanitize(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Shared prefix of all artifacts of one product.
pub fn base_name(category: &str, year: i32, aoi: &str) -> String {
    format!("{}{}{}", sanitize(category), year, sanitize(aoi))
}

pub fn artifact_name(base: &str, artifact: ArtifactKind) -> String {
    format!("{}_{}", base, artifact.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use verdant_common::{Category, GaulRegistry, RegionRegistry};

    #[test]
    fn test_crops_faridpur_base() {
        assert_eq!(
            base_name("Crops & Agri Health (Sentinel-2 NDVI median)", 2019, "Faridpur"),
            "Crops&AgriHealth(Sentinel-2NDVImedian)2019Faridpur"
        );
    }

    #[test]
    fn test_strips_all_whitespace() {
        assert_eq!(sanitize(" Cox s\tBazar\n"), "CoxsBazar");
    }

    #[test]
    fn test_suffixes() {
        let base = base_name("Mineral", 2020, "Dhaka");
        let names: Vec<String> = ArtifactKind::all()
            .iter()
            .map(|a| artifact_name(&base, *a))
            .collect();
        assert_eq!(
            names,
            vec![
                "Mineral2020Dhaka_main",
                "Mineral2020Dhaka_class",
                "Mineral2020Dhaka_obs_count",
                "Mineral2020Dhaka_stats",
                "Mineral2020Dhaka_thumbnail",
            ]
        );
    }

    #[test]
    fn test_base_names_unique_across_offered_choices() {
        let mut seen = HashSet::new();
        for category in Category::all() {
            for year in [2018, 2019, 2020] {
                for region in GaulRegistry.names() {
                    assert!(seen.insert(base_name(category.label(), year, &region)));
                }
            }
        }
    }
}
