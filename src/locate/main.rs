//! Nearest-building locator.
//!
//! Loads a building dataset, finds the building closest to the reference
//! point (Cristo Redentor by default) and prints its Plus Code.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use redentor::config::Config;
use redentor::dataset::{load_buildings, DatasetSummary};
use redentor::distance::DistanceMetric;
use redentor::nearest::TieBreak;
use redentor::pipeline::locate_ranked;
use redentor::models::CUSTOM_REFERENCE_NAME;
use redentor::{Answer, ReferencePoint};

#[derive(Parser, Debug)]
#[command(name = "locate")]
#[command(about = "Find the building closest to a point of interest and print its Plus Code")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Building dataset (CSV, optionally gzipped)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Reference latitude
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Reference longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Label for a custom reference point
    #[arg(long, default_value = CUSTOM_REFERENCE_NAME)]
    name: String,

    /// Distance metric
    #[arg(long, value_enum)]
    metric: Option<DistanceMetric>,

    /// Which building wins on an exact distance tie
    #[arg(long, value_enum)]
    tie_break: Option<TieBreak>,

    /// Plus Code length (2, 4, 6, 8 or 10..=15)
    #[arg(long)]
    code_length: Option<usize>,

    /// Ignore buildings below this confidence score
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Also log the N nearest buildings
    #[arg(long)]
    top: Option<usize>,

    /// Print the full answer as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Command line flags take precedence over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(ref path) = self.dataset {
            config.dataset.path = path.clone();
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.reference = ReferencePoint::new(&self.name, lat, lon);
        }
        if let Some(metric) = self.metric {
            config.query.metric = metric;
        }
        if let Some(tie_break) = self.tie_break {
            config.query.tie_break = tie_break;
        }
        if let Some(code_length) = self.code_length {
            config.query.code_length = code_length;
        }
        if self.min_confidence.is_some() {
            config.dataset.min_confidence = self.min_confidence;
        }
        if let Some(top) = self.top {
            config.query.top = top;
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    answer: &'a Answer,
}

fn main() -> Result<()> {
    // Initialize logging; stdout carries only the result
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    args.apply(&mut config);

    info!("Redentor locator");
    info!("Dataset: {}", config.dataset.path.display());

    let buildings = load_buildings(&config.dataset.path, &config.load_options())
        .with_context(|| format!("Failed to load {}", config.dataset.path.display()))?;

    let summary = DatasetSummary::from_buildings(&buildings);
    info!("Dataset length: {} rows", summary.count);
    if let Some(bounds) = summary.bounds {
        info!(
            "Extent: lat {:.5}..{:.5}, lon {:.5}..{:.5}",
            bounds.min().y,
            bounds.max().y,
            bounds.min().x,
            bounds.max().x
        );
    }
    if let Some(mean) = summary.mean_area {
        info!("Footprint area: {:.0} m² total, {:.1} m² mean", summary.total_area, mean);
    }
    if let Some((lo, hi)) = summary.confidence_range {
        info!("Confidence: {:.3}..{:.3}", lo, hi);
    }

    let query = config.query();
    let (answer, ranked) = locate_ranked(&buildings, &query, config.query.top)?;

    for (i, (building, distance)) in ranked.iter().enumerate() {
        info!(
            "  #{} {} at {} ({:.2} {})",
            i + 1,
            building.id,
            building.point,
            distance,
            query.metric.unit()
        );
    }

    info!(
        "Closest building to {}: {} at {} ({:.2} {}), area {:?} m², confidence {:?}",
        answer.reference.name,
        answer.building.id,
        answer.building.point,
        answer.distance,
        answer.unit,
        answer.building.area_in_meters,
        answer.building.confidence
    );

    if args.json {
        let report = Report {
            generated_at: Utc::now(),
            answer: &answer,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", answer.plus_code);
    }

    Ok(())
}
