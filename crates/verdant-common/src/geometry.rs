//! Geometries understood by the remote raster-compute service.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, CommonError};

/// A map coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Parse a "lon,lat" pair.
    pub fn parse(s: &str) -> Result<Self, CommonError> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| CommonError::InvalidCoordinate(s.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CommonError::InvalidCoordinate(s.to_string()))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CommonError::InvalidCoordinate(s.to_string()))?;

        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(CommonError::InvalidCoordinate(s.to_string()));
        }
        Ok(Self { lon, lat })
    }
}

/// A geometry reference. Boundaries are never materialized locally; the
/// remote service resolves them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    /// Administrative boundary selected from a feature collection.
    Admin {
        dataset: String,
        level: u8,
        /// Feature property the name is matched against, e.g. `ADM2_NAME`.
        property: String,
        name: String,
    },
    /// Rectangle in WGS84.
    Rectangle(BoundingBox),
    /// Single point.
    Point(Coordinate),
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point(Coordinate::new(lon, lat))
    }

    /// Admin unit `name` at a GAUL `level` of `dataset`.
    pub fn admin(dataset: impl Into<String>, level: u8, name: impl Into<String>) -> Self {
        Geometry::Admin {
            dataset: dataset.into(),
            level,
            property: Self::admin_property(level),
            name: name.into(),
        }
    }

    /// Property holding the admin unit name at the given GAUL level.
    pub fn admin_property(level: u8) -> String {
        format!("ADM{}_NAME", level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let c = Coordinate::parse("89.8, 23.6").unwrap();
        assert_eq!(c, Coordinate::new(89.8, 23.6));
        assert!(Coordinate::parse("89.8").is_err());
        assert!(Coordinate::parse("200,0").is_err());
        assert!(Coordinate::parse("a,b").is_err());
    }

    #[test]
    fn test_geometry_serialization_is_tagged() {
        let g = Geometry::point(1.0, 2.0);
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"type\":\"point\""));
    }

    #[test]
    fn test_admin_carries_name_property() {
        let g = Geometry::admin("FAO/GAUL/2015/level2", 2, "Faridpur");
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["type"], "admin");
        assert_eq!(json["property"], "ADM2_NAME");
        assert_eq!(json["name"], "Faridpur");
    }
}
