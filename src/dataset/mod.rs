//! Building dataset loading.
//!
//! Reads Open Buildings style CSV (optionally gzipped), reducing polygon
//! footprints to a representative point.

mod footprint;
mod loader;
mod summary;

pub use footprint::footprint_centroid;
pub use loader::{load_buildings, read_buildings, LoadOptions};
pub use summary::DatasetSummary;
