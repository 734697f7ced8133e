//! Named regions of interest and the static registry that resolves them.

use serde::{Deserialize, Serialize};

use crate::{CommonError, CommonResult, Geometry};

/// Feature collection the built-in boundaries are filtered from.
pub const GAUL_DATASET: &str = "FAO/GAUL/2015";

/// Region shown when nothing else has been selected.
pub const DEFAULT_REGION: &str = "Faridpur";

/// A named region of interest. Immutable once selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub name: String,
    pub geometry: Geometry,
}

impl Roi {
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }
}

/// Lookup of region names to boundary geometries.
pub trait RegionRegistry: Send + Sync {
    /// Resolve a region by its display name.
    fn lookup(&self, name: &str) -> Option<Roi>;

    /// All region names, in display order.
    fn names(&self) -> Vec<String>;

    /// Resolve a region or fail with `UnknownRegion`.
    fn resolve(&self, name: &str) -> CommonResult<Roi> {
        self.lookup(name)
            .ok_or_else(|| CommonError::UnknownRegion(name.to_string()))
    }
}

/// (display name, GAUL level, GAUL admin name)
const GAUL_REGIONS: &[(&str, u8, &str)] = &[
    ("Faridpur", 2, "Faridpur"),
    ("Barisal", 1, "Barisal"),
    ("Khulna", 1, "Khulna"),
    ("Dhaka", 2, "Dhaka"),
    ("Gazipur", 2, "Gazipur"),
    ("Gopalganj", 2, "Gopalganj"),
    ("Jamalpur", 2, "Jamalpur"),
    ("Kishoreganj", 2, "Kishoreganj"),
    ("Madaripur", 2, "Madaripur"),
    ("Manikganj", 2, "Manikganj"),
    ("Munshiganj", 2, "Munshiganj"),
    ("Mymensingh", 1, "Mymensingh"),
    ("Narayanganj", 2, "Narayanganj"),
    ("Narsingdi", 2, "Narsingdi"),
    ("Netrokona", 2, "Netrokona"),
    ("Rajbari", 2, "Rajbari"),
    ("Shariatpur", 2, "Shariatpur"),
    ("Sherpur", 2, "Sherpur"),
    ("Tangail", 2, "Tangail"),
    ("Bogra", 2, "Bogra"),
    ("Joypurhat", 2, "Joypurhat"),
    ("Naogaon", 2, "Naogaon"),
    ("Natore", 2, "Natore"),
    ("Nawabganj", 2, "Nawabganj"),
    ("Pabna", 2, "Pabna"),
    ("Rajshahi", 1, "Rajshahi"),
    ("Sirajgonj", 2, "Sirajganj"),
    ("Dinajpur", 2, "Dinajpur"),
    ("Gaibandha", 2, "Gaibandha"),
    ("Kurigram", 2, "Kurigram"),
    ("Lalmonirhat", 2, "Lalmonirhat"),
    ("Nilphamari", 2, "Nilphamari"),
    ("Panchagarh", 2, "Panchagarh"),
    ("Rangpur", 1, "Rangpur"),
    ("Thakurgaon", 2, "Thakurgaon"),
    ("Barguna", 2, "Barguna"),
    ("Bhola", 2, "Bhola"),
    ("Jhalokati", 2, "Jhalokati"),
    ("Patuakhali", 2, "Patuakhali"),
    ("Pirojpur", 2, "Pirojpur"),
    ("Bandarban", 2, "Bandarban"),
    ("Brahmanbaria", 2, "Brahmanbaria"),
    ("Chandpur", 2, "Chandpur"),
    ("Chittagong", 1, "Chittagong"),
    ("Comilla", 2, "Comilla"),
    ("CoxsBazar", 2, "Feni"),
    ("Khagrachari", 2, "Khagrachhari"),
    ("Lakshmipur", 2, "Lakshmipur"),
    ("Noakhali", 2, "Noakhali"),
    ("Rangamati", 2, "Rangamati"),
    ("Habiganj", 2, "Habiganj"),
    ("Maulvibazar", 2, "Maulvibazar"),
    ("Sunamganj", 2, "Sunamganj"),
    ("Sylhet", 1, "Sylhet"),
    ("Bagerhat", 2, "Bagerhat"),
    ("Chuadanga", 2, "Chuadanga"),
    ("Jessore", 2, "Jessore"),
    ("Jhenaidah", 2, "Jhenaidah"),
    ("Kushtia", 2, "Kushtia"),
    ("Magura", 2, "Magura"),
    ("Meherpur", 2, "Meherpur"),
    ("Narail", 2, "Narail"),
    ("Satkhira", 2, "Satkhira"),
];

/// Built-in registry of Bangladesh divisions and districts (GAUL 2015).
#[derive(Debug, Clone, Copy, Default)]
pub struct GaulRegistry;

impl RegionRegistry for GaulRegistry {
    fn lookup(&self, name: &str) -> Option<Roi> {
        GAUL_REGIONS
            .iter()
            .find(|(display, _, _)| *display == name)
            .map(|(display, level, admin)| {
                Roi::new(
                    *display,
                    Geometry::admin(format!("{}/level{}", GAUL_DATASET, level), *level, *admin),
                )
            })
    }

    fn names(&self) -> Vec<String> {
        GAUL_REGIONS.iter().map(|(n, _, _)| n.to_string()).collect()
    }
}
