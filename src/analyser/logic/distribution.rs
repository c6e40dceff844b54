//! Per-column distribution shape: quartiles, a Sturges histogram and a
//! Shapiro-Wilk normality verdict.

use super::classify::ClassifiedDataset;
use super::frame::series_stats;
use super::normality::shapiro_wilk;
use super::types::{DistributionProfile, Histogram};
use crate::config::ProfilerConfig;
use crate::error::Result;
use std::collections::BTreeMap;

/// Columns whose quartiles cannot be represented (an empty sample, or a range
/// that overflows `f64`) are left out.
///
/// # Errors
///
/// Only if polars rejects a column computation.
pub fn analyse_distributions(
    data: &ClassifiedDataset<'_>,
    config: &ProfilerConfig,
) -> Result<BTreeMap<String, DistributionProfile>> {
    let mut profiles = BTreeMap::new();
    for col in data.numeric_columns() {
        match distribution_profile(&col.numeric_values(), config)? {
            Some(profile) => {
                profiles.insert(col.name.clone(), profile);
            }
            None => tracing::debug!(column = %col.name, "No distribution for column"),
        }
    }
    Ok(profiles)
}

pub fn distribution_profile(
    values: &[f64],
    config: &ProfilerConfig,
) -> Result<Option<DistributionProfile>> {
    let stats = series_stats(values)?;
    let (Some(quartiles), Some(min), Some(max)) = (stats.quartiles, stats.min, stats.max) else {
        return Ok(None);
    };
    let sorted = sorted_values(values.to_vec());

    Ok(Some(DistributionProfile {
        mean: stats.mean,
        median: quartiles.q2,
        std: stats.std,
        min,
        max,
        quartiles,
        histogram: build_histogram(&sorted),
        normality: shapiro_wilk(&sorted, config),
    }))
}

pub fn sorted_values(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

/// Sturges' rule: `ceil(log2 n) + 1` bins.
pub fn sturges_bin_count(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// Equal-width histogram over `[min, max]`. Every value lands in exactly one bin.
pub fn build_histogram(sorted: &[f64]) -> Histogram {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Histogram::default();
    };

    if max <= min {
        // ±0.5 vanishes once |v| passes 2^53, so widen by at least one ulp
        return Histogram {
            bin_edges: vec![(min - 0.5).min(min.next_down()), (max + 0.5).max(max.next_up())],
            counts: vec![sorted.len()],
        };
    }

    let bins = sturges_bin_count(sorted.len());
    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
    edges.push(max);

    if !edges.windows(2).all(|w| matches!(w, [a, b] if a < b)) {
        // Range too wide or too narrow for the float grid
        return Histogram {
            bin_edges: vec![min, max],
            counts: vec![sorted.len()],
        };
    }

    let mut counts = vec![0usize; bins];
    for &v in sorted {
        let idx = edges
            .partition_point(|e| *e <= v)
            .saturating_sub(1)
            .min(bins - 1);
        if let Some(slot) = counts.get_mut(idx) {
            *slot += 1;
        }
    }

    Histogram {
        bin_edges: edges,
        counts,
    }
}
