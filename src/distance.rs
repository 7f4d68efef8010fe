//! Distance between the reference point and a candidate.

use std::fmt;

use geo::{Distance, Euclidean, Geodesic, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::GeoPoint;

/// How distances are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Great-circle distance on a spherical Earth, in meters
    #[default]
    Haversine,
    /// Ellipsoidal (WGS84) distance, in meters
    Geodesic,
    /// Euclidean distance over raw lon/lat, in degrees
    Planar,
}

impl DistanceMetric {
    /// Distance from `a` to `b`; both points must be valid coordinates.
    pub fn distance(self, a: GeoPoint, b: GeoPoint) -> Result<f64> {
        let a: Point<f64> = a.validate()?.into();
        let b: Point<f64> = b.validate()?.into();

        Ok(match self {
            DistanceMetric::Haversine => Haversine.distance(a, b),
            DistanceMetric::Geodesic => Geodesic.distance(a, b),
            DistanceMetric::Planar => Euclidean.distance(a, b),
        })
    }

    pub fn unit(self) -> &'static str {
        match self {
            DistanceMetric::Haversine | DistanceMetric::Geodesic => "m",
            DistanceMetric::Planar => "deg",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Haversine => write!(f, "haversine"),
            DistanceMetric::Geodesic => write!(f, "geodesic"),
            DistanceMetric::Planar => write!(f, "planar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocateError;

    const ALL: [DistanceMetric; 3] = [
        DistanceMetric::Haversine,
        DistanceMetric::Geodesic,
        DistanceMetric::Planar,
    ];

    #[test]
    fn test_zero_to_self() {
        let p = GeoPoint::new(-22.951916, -43.210487);
        for metric in ALL {
            assert!(metric.distance(p, p).unwrap().abs() < 1e-9, "{metric}");
        }
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(-22.951916, -43.210487);
        let b = GeoPoint::new(-23.0, -44.0);
        for metric in ALL {
            let ab = metric.distance(a, b).unwrap();
            let ba = metric.distance(b, a).unwrap();
            assert!((ab - ba).abs() < 1e-6, "{metric}: {ab} vs {ba}");
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = DistanceMetric::Haversine
            .distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0))
            .unwrap();
        assert!((d - 111_195.0).abs() < 100.0);

        let planar = DistanceMetric::Planar
            .distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0))
            .unwrap();
        assert!((planar - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ranks_nearby_candidate_first() {
        let reference = GeoPoint::new(-22.951916, -43.210487);
        let near = GeoPoint::new(-22.9519, -43.2105);
        let far = GeoPoint::new(-23.0, -44.0);
        for metric in ALL {
            let d_near = metric.distance(reference, near).unwrap();
            let d_far = metric.distance(reference, far).unwrap();
            assert!(d_near < d_far, "{metric}");
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        let ok = GeoPoint::new(0.0, 0.0);
        let bad = GeoPoint::new(95.0, 0.0);
        for metric in ALL {
            assert!(matches!(
                metric.distance(ok, bad),
                Err(LocateError::InvalidCoordinate { .. })
            ));
            assert!(metric.distance(bad, ok).is_err());
        }
    }
}
