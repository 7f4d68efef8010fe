//! Redentor - find the building closest to a point of interest and emit its Plus Code.
//!
//! This library provides shared types and modules for the locate and fetch binaries.

pub mod config;
pub mod dataset;
pub mod distance;
pub mod download;
pub mod error;
pub mod models;
pub mod nearest;
pub mod pipeline;
pub mod pluscode;

pub use error::{FootprintError, LocateError, Result};
pub use models::{Answer, Building, GeoPoint, ReferencePoint};
pub use pipeline::{locate, Query};
