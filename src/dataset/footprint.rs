use geo::Centroid;
use geo_types::Geometry;
use wkt::TryFromWkt;

use crate::error::FootprintError;
use crate::models::GeoPoint;

/// Reduce a WKT footprint (`POLYGON`, `MULTIPOLYGON`, `POINT`, ...) to its centroid.
pub fn footprint_centroid(wkt: &str) -> Result<GeoPoint, FootprintError> {
    let geometry: Geometry<f64> = Geometry::try_from_wkt_str(wkt)
        .map_err(|e| FootprintError::Parse(e.to_string()))?;
    geometry
        .centroid()
        .map(GeoPoint::from)
        .ok_or(FootprintError::Empty)
}
