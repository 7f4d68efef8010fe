//! Error type shared by the loader, evaluator, selector and Plus Code codec.

use thiserror::Error;

/// Every failure is fatal to a run; callers surface it and stop.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("invalid coordinate: latitude {lat}, longitude {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("dataset contains no candidate buildings")]
    EmptyDataset,

    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: invalid geometry")]
    InvalidGeometry {
        row: usize,
        #[source]
        source: FootprintError,
    },

    #[error("invalid Plus Code length {0} (expected 2, 4, 6, 8 or 10..=15)")]
    InvalidCodeLength(usize),

    #[error("invalid or non-full Plus Code '{0}'")]
    InvalidCode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Why a WKT footprint could not be reduced to a point.
#[derive(Debug, Error, PartialEq)]
pub enum FootprintError {
    #[error("unparseable WKT: {0}")]
    Parse(String),

    #[error("geometry is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, LocateError>;
