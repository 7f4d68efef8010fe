//! The single output artifact of a run.

use serde::Serialize;

use super::{Building, ReferencePoint};
use crate::distance::DistanceMetric;
use crate::pluscode::CodeArea;

/// The building nearest to the reference point, with its Plus Code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub reference: ReferencePoint,

    pub building: Building,

    /// Distance from the reference point, in `unit`
    pub distance: f64,

    pub metric: DistanceMetric,

    pub unit: &'static str,

    /// Plus Code of the building's representative point
    pub plus_code: String,

    /// Cell the Plus Code decodes to; always contains the building's point
    pub area: CodeArea,

    /// Whether `plus_code` agrees with the dataset's own `full_plus_code`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_dataset_code: Option<bool>,
}
