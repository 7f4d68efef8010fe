use geo::{BoundingRect, MultiPoint, Point, Rect};

use crate::models::Building;

/// Quick statistics over a loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub count: usize,
    /// Bounding box of all representative points (x = lon, y = lat)
    pub bounds: Option<Rect<f64>>,
    pub total_area: f64,
    pub mean_area: Option<f64>,
    /// (min, max) confidence over rows that carry one
    pub confidence_range: Option<(f64, f64)>,
}

impl DatasetSummary {
    pub fn from_buildings(buildings: &[Building]) -> Self {
        let points: MultiPoint<f64> = buildings
            .iter()
            .map(|b| Point::from(b.point))
            .collect::<Vec<_>>()
            .into();

        let areas: Vec<f64> = buildings.iter().filter_map(|b| b.area_in_meters).collect();
        let total_area: f64 = areas.iter().sum();
        let mean_area = (!areas.is_empty()).then(|| total_area / areas.len() as f64);

        let confidence_range = buildings
            .iter()
            .filter_map(|b| b.confidence)
            .fold(None, |acc: Option<(f64, f64)>, c| match acc {
                None => Some((c, c)),
                Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
            });

        Self {
            count: buildings.len(),
            bounds: points.bounding_rect(),
            total_area,
            mean_area,
            confidence_range,
        }
    }
}
