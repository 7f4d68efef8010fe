use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;

/// Slack in degrees (about 10 micrometres) applied to cell edges.
pub const EDGE_TOLERANCE: f64 = 1e-10;

/// The cell a decoded Plus Code covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodeArea {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
    /// Number of significant digits in the decoded code
    pub code_length: usize,
}

impl CodeArea {
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: ((self.south + self.north) / 2.0).min(90.0),
            lon: ((self.west + self.east) / 2.0).min(180.0),
        }
    }

    /// Inclusive containment test.
    ///
    /// Longitude 180 is folded onto -180, matching how it was encoded. Edges
    /// are widened by [`EDGE_TOLERANCE`] because the encoder snaps inputs
    /// within a millionth of a grid step onto the next cell.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let lon = if point.lon >= 180.0 {
            point.lon - 360.0
        } else {
            point.lon
        };
        (self.south - EDGE_TOLERANCE..=self.north + EDGE_TOLERANCE).contains(&point.lat)
            && (self.west - EDGE_TOLERANCE..=self.east + EDGE_TOLERANCE).contains(&lon)
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> CodeArea {
        CodeArea {
            south: 20.0,
            west: 2.0,
            north: 21.0,
            east: 3.0,
            code_length: 4,
        }
    }

    #[test]
    fn test_center() {
        assert_eq!(area().center(), GeoPoint::new(20.5, 2.5));
    }

    #[test]
    fn test_contains_edges() {
        let a = area();
        assert!(a.contains(GeoPoint::new(20.0, 2.0)));
        assert!(a.contains(GeoPoint::new(21.0, 3.0)));
        assert!(!a.contains(GeoPoint::new(21.01, 2.5)));
        assert!(!a.contains(GeoPoint::new(20.5, 1.99)));
        assert!(a.contains(GeoPoint::new(20.0 - 1e-13, 2.5)));
        assert!(!a.contains(GeoPoint::new(20.0 - 1e-6, 2.5)));
    }

    #[test]
    fn test_contains_antimeridian() {
        let a = CodeArea {
            south: 1.0,
            west: -180.0,
            north: 2.0,
            east: -179.0,
            code_length: 4,
        };
        assert!(a.contains(GeoPoint::new(1.5, 180.0)));
    }
}
