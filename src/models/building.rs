//! Building records as read from an Open Buildings style dataset.

use serde::{Deserialize, Serialize};

use crate::error::{LocateError, Result};

/// Geographic point (lat/lon), in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Ensure latitude is within -90..=90 and longitude within -180..=180.
    pub fn validate(self) -> Result<Self> {
        let lat_ok = (-90.0..=90.0).contains(&self.lat);
        let lon_ok = (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(self)
        } else {
            Err(LocateError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lon, p.lat)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(p: geo::Point<f64>) -> Self {
        Self {
            lat: p.y(),
            lon: p.x(),
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Label given to a reference point configured without a name.
pub const CUSTOM_REFERENCE_NAME: &str = "custom";

fn default_reference_name() -> String {
    CUSTOM_REFERENCE_NAME.to_string()
}

/// The fixed point of interest a run measures against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    #[serde(default = "default_reference_name")]
    pub name: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

impl ReferencePoint {
    pub fn new(name: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            point: GeoPoint::new(lat, lon),
        }
    }

    /// Cristo Redentor, Rio de Janeiro.
    pub fn cristo_redentor() -> Self {
        Self::new("Cristo Redentor", -22.951916, -43.210487)
    }
}

impl Default for ReferencePoint {
    fn default() -> Self {
        Self::cristo_redentor()
    }
}

/// One candidate building.
///
/// Polygon footprints are reduced to their centroid at load time, so every
/// record carries a single representative point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Dataset `id` column, or the 1-based data row number when absent
    pub id: String,

    /// Representative point (dataset centroid or computed footprint centroid)
    pub point: GeoPoint,

    /// Footprint area in square meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_in_meters: Option<f64>,

    /// Model confidence score (0.65 to 1.0 in Open Buildings)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Plus Code shipped with the dataset, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_plus_code: Option<String>,
}

impl Building {
    /// Create a building with only the required fields
    pub fn new(id: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            id: id.into(),
            point,
            area_in_meters: None,
            confidence: None,
            full_plus_code: None,
        }
    }
}
