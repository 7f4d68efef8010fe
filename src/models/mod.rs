//! Core data models for the nearest-building query.

pub mod answer;
pub mod building;

pub use answer::Answer;
pub use building::{Building, GeoPoint, ReferencePoint, CUSTOM_REFERENCE_NAME};
