//! Lon/lat rectangles.

use serde::{Deserialize, Serialize};

use crate::{CommonError, Coordinate};

/// An axis-aligned extent in WGS84 degrees. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Parse "west,south,east,north" as typed into a rectangle field.
    pub fn parse(s: &str) -> Result<Self, CommonError> {
        let invalid = || CommonError::InvalidBbox(s.to_string());
        let edges = s
            .split(',')
            .map(|p| p.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let [west, south, east, north] = edges[..] else {
            return Err(invalid());
        };
        if west > east || south > north || !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(invalid());
        }
        Ok(Self::new(west, south, east, north))
    }

    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        (self.west..=self.east).contains(&lon) && (self.south..=self.north).contains(&lat)
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.contains_point(coordinate.lon, coordinate.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rectangle() {
        let bbox = BoundingBox::parse("89.5, 23.2, 90.2, 23.9").unwrap();
        assert_eq!(bbox.west, 89.5);
        assert_eq!(bbox.north, 23.9);
        assert!(bbox.contains(&Coordinate::new(89.8, 23.5)));
        assert!(!bbox.contains_point(91.0, 23.5));
    }

    #[test]
    fn test_edges_are_inclusive() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(bbox.contains_point(1.0, 0.0));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(BoundingBox::parse("10,10,5,5").is_err());
        assert!(BoundingBox::parse("1,2,3").is_err());
        assert!(BoundingBox::parse("0,-95,1,1").is_err());
        assert!(BoundingBox::parse("a,b,c,d").is_err());
    }
}
