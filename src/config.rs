use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::LoadOptions;
use crate::distance::DistanceMetric;
use crate::models::ReferencePoint;
use crate::nearest::TieBreak;
use crate::pipeline::Query;
use crate::pluscode::DEFAULT_CODE_LENGTH;

/// Open Buildings v3 tile covering Rio de Janeiro.
pub const DEFAULT_DATASET_URL: &str =
    "https://storage.googleapis.com/open-buildings-data/v3/polygons_s2_level_4_gzip/009_buildings.csv.gz";

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub reference: ReferencePoint,
    pub dataset: DatasetConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub url: String,
    pub min_confidence: Option<f64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/009_buildings.csv.gz"),
            url: DEFAULT_DATASET_URL.to_string(),
            min_confidence: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    pub metric: DistanceMetric,
    pub tie_break: TieBreak,
    pub code_length: usize,
    /// Number of nearest candidates to log alongside the answer
    pub top: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            tie_break: TieBreak::default(),
            code_length: DEFAULT_CODE_LENGTH,
            top: 0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn query(&self) -> Query {
        Query {
            reference: self.reference.clone(),
            metric: self.query.metric,
            tie_break: self.query.tie_break,
            code_length: self.query.code_length,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            min_confidence: self.dataset.min_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.reference, ReferencePoint::cristo_redentor());
        assert_eq!(config.query().code_length, 10);
        assert_eq!(config.query.metric, DistanceMetric::Haversine);
        assert_eq!(config.query.tie_break, TieBreak::First);
        assert!(config.load_options().min_confidence.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [dataset]
            path = "buildings.csv"
            min_confidence = 0.75

            [query]
            metric = "planar"
            tie_break = "last"
            "#,
        )
        .unwrap();

        assert_eq!(config.dataset.path, PathBuf::from("buildings.csv"));
        assert_eq!(config.dataset.url, DEFAULT_DATASET_URL);
        assert_eq!(config.load_options().min_confidence, Some(0.75));
        assert_eq!(config.query.metric, DistanceMetric::Planar);
        assert_eq!(config.query.tie_break, TieBreak::Last);
        assert_eq!(config.query.code_length, 10);
        assert_eq!(config.reference, ReferencePoint::cristo_redentor());
    }

    #[test]
    fn test_reference_override() {
        let config: Config = toml::from_str(
            r#"
            [reference]
            name = "Pão de Açúcar"
            lat = -22.9486
            lon = -43.1553
            "#,
        )
        .unwrap();
        assert_eq!(config.query().reference.name, "Pão de Açúcar");
        assert_eq!(config.reference.point.lat, -22.9486);
    }

    #[test]
    fn test_reference_without_name() {
        let config: Config = toml::from_str(
            r#"
            [reference]
            lat = -22.95
            lon = -43.21
            "#,
        )
        .unwrap();
        assert_eq!(config.reference.name, crate::models::CUSTOM_REFERENCE_NAME);
        assert_eq!(config.reference.point, crate::models::GeoPoint::new(-22.95, -43.21));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redentor.toml");
        std::fs::write(&path, "[query]\ncode_length = 11\ntop = 5\n").unwrap();

        let config = Config::load_or_default(Some(path.as_path())).unwrap();
        assert_eq!(config.query.code_length, 11);
        assert_eq!(config.query.top, 5);

        assert!(Config::load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
