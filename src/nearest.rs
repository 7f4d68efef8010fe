//! Nearest-candidate selection over precomputed distances.
//!
//! A linear scan; the datasets this runs against are small enough that no
//! spatial index is needed.

use serde::{Deserialize, Serialize};

use crate::error::{LocateError, Result};

/// Which candidate wins when distances are exactly equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Earliest in input order
    #[default]
    First,
    /// Latest in input order
    Last,
}

/// Return the pair with the smallest distance.
pub fn select_nearest<T, I>(candidates: I, tie_break: TieBreak) -> Result<(T, f64)>
where
    I: IntoIterator<Item = (T, f64)>,
{
    let mut best: Option<(T, f64)> = None;

    for (item, distance) in candidates {
        let replace = match &best {
            None => true,
            Some((_, current)) => match tie_break {
                TieBreak::First => distance < *current,
                TieBreak::Last => distance <= *current,
            },
        };
        if replace {
            best = Some((item, distance));
        }
    }

    best.ok_or(LocateError::EmptyDataset)
}

/// The `k` nearest pairs in ascending distance order.
///
/// The sort is stable, so equal distances keep their input order.
pub fn rank<T, I>(candidates: I, k: usize) -> Vec<(T, f64)>
where
    I: IntoIterator<Item = (T, f64)>,
{
    let mut all: Vec<(T, f64)> = candidates.into_iter().collect();
    all.sort_by(|a, b| a.1.total_cmp(&b.1));
    all.truncate(k);
    all
}
