use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use flate2::read::MultiGzDecoder;
use serde::Deserialize;
use tracing::{debug, info};

use super::footprint::footprint_centroid;
use crate::error::{LocateError, Result};
use crate::models::{Building, GeoPoint};

/// Options applied while reading rows.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Skip buildings whose confidence is below this score
    pub min_confidence: Option<f64>,
}

//schema (Open Buildings v3 polygons)

//latitude,longitude,area_in_meters,confidence,geometry,full_plus_code
//-22.91,-43.17,59.98,0.7812,"POLYGON((-43.17 -22.91, ...))",589RGRQJ+2V

/// One CSV row; columns are matched by header name and extras ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    id: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    area_in_meters: Option<f64>,
    confidence: Option<f64>,
    geometry: Option<String>,
    full_plus_code: Option<String>,
}

/// Load buildings from a CSV file, gunzipping when the name ends in `.gz`.
pub fn load_buildings(path: &Path, options: &LoadOptions) -> Result<Vec<Building>> {
    info!("Loading buildings from {}", path.display());

    let file = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let buildings = read_buildings(reader, options)?;
    info!("Loaded {} buildings", buildings.len());
    Ok(buildings)
}

/// Read buildings from any CSV source, keeping input order.
pub fn read_buildings<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<Building>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut buildings = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in csv_reader.deserialize::<RawRow>().enumerate() {
        let row = idx + 1;
        let raw = result?;

        if let (Some(min), Some(confidence)) = (options.min_confidence, raw.confidence) {
            if confidence < min {
                skipped += 1;
                continue;
            }
        }

        let point = match (raw.latitude, raw.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            (lat, _) => match raw.geometry.as_deref().filter(|g| !g.is_empty()) {
                Some(wkt) => footprint_centroid(wkt)
                    .map_err(|source| LocateError::InvalidGeometry { row, source })?,
                None => {
                    return Err(LocateError::MissingField {
                        row,
                        field: if lat.is_none() { "latitude" } else { "longitude" },
                    })
                }
            },
        };

        buildings.push(Building {
            id: raw.id.unwrap_or_else(|| row.to_string()),
            point,
            area_in_meters: raw.area_in_meters,
            confidence: raw.confidence,
            full_plus_code: raw.full_plus_code,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} buildings below the confidence threshold", skipped);
    }

    Ok(buildings)
}
