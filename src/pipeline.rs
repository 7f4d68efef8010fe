//! Loader output → distance evaluation → nearest selection → Plus Code.

use tracing::{debug, info, warn};

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::models::{Answer, Building, GeoPoint, ReferencePoint};
use crate::nearest::{rank, select_nearest, TieBreak};
use crate::pluscode::{self, DEFAULT_CODE_LENGTH};

/// Parameters of a single nearest-building query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub reference: ReferencePoint,
    pub metric: DistanceMetric,
    pub tie_break: TieBreak,
    pub code_length: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            reference: ReferencePoint::default(),
            metric: DistanceMetric::default(),
            tie_break: TieBreak::default(),
            code_length: DEFAULT_CODE_LENGTH,
        }
    }
}

/// Distance from `reference` to every building, in input order.
pub fn evaluate<'a>(
    buildings: &'a [Building],
    reference: GeoPoint,
    metric: DistanceMetric,
) -> Result<Vec<(&'a Building, f64)>> {
    buildings
        .iter()
        .map(|b| Ok((b, metric.distance(reference, b.point)?)))
        .collect()
}

/// Find the building nearest to the query's reference point and encode it.
pub fn locate(buildings: &[Building], query: &Query) -> Result<Answer> {
    let (answer, _) = locate_ranked(buildings, query, 0)?;
    Ok(answer)
}

/// [`locate`], also returning the `k` nearest buildings (nearest first).
///
/// Distances are evaluated once and shared by the answer and the ranking.
pub fn locate_ranked<'a>(
    buildings: &'a [Building],
    query: &Query,
    k: usize,
) -> Result<(Answer, Vec<(&'a Building, f64)>)> {
    let reference = query.reference.point.validate()?;

    info!(
        "Searching {} buildings for the nearest to {} {} ({} metric)",
        buildings.len(),
        query.reference.name,
        reference,
        query.metric
    );

    let distances = evaluate(buildings, reference, query.metric)?;
    let ranked = if k > 0 {
        rank(distances.iter().copied(), k)
    } else {
        Vec::new()
    };
    let (building, distance) = select_nearest(distances, query.tie_break)?;

    let plus_code = pluscode::encode(building.point, query.code_length)?;
    let area = pluscode::decode(&plus_code)?;
    debug_assert!(area.contains(building.point));
    debug!("Building {} encodes to {} ({:?})", building.id, plus_code, area);

    let matches_dataset_code = check_dataset_code(building);

    let answer = Answer {
        reference: query.reference.clone(),
        building: building.clone(),
        distance,
        metric: query.metric,
        unit: query.metric.unit(),
        plus_code,
        area,
        matches_dataset_code,
    };
    Ok((answer, ranked))
}

/// The `k` nearest buildings, nearest first.
pub fn nearest_k<'a>(
    buildings: &'a [Building],
    query: &Query,
    k: usize,
) -> Result<Vec<(&'a Building, f64)>> {
    let reference = query.reference.point.validate()?;
    let distances = evaluate(buildings, reference, query.metric)?;
    Ok(rank(distances, k))
}

/// Re-encode the building at the length of its dataset Plus Code and compare.
///
/// `None` when the dataset carries no code. A code that does not parse as a
/// full Plus Code counts as a mismatch.
fn check_dataset_code(building: &Building) -> Option<bool> {
    let dataset_code = building.full_plus_code.as_deref()?;
    let computed = pluscode::decode(dataset_code)
        .and_then(|area| pluscode::encode(building.point, area.code_length));

    let matches = match computed {
        Ok(ref code) => code.eq_ignore_ascii_case(dataset_code),
        Err(_) => false,
    };
    if !matches {
        warn!(
            "Dataset Plus Code {} does not match building {} at {} (computed {:?})",
            dataset_code,
            building.id,
            building.point,
            computed.ok()
        );
    }
    Some(matches)
}
