//! Descriptive statistics, shape moments, Tukey outliers and the pairwise
//! Pearson matrix for numeric columns.

use super::classify::{ClassifiedColumn, ClassifiedDataset};
use super::frame::{pearson, series_stats};
use super::types::{CorrelationMatrix, DescribeStats, NumericSummary, OutlierSummary, Quartiles};
use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::utils::{finite, percentage, round_to};
use std::collections::BTreeMap;

/// Everything the summariser knows about one numeric column.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericColumnReport {
    pub describe: DescribeStats,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub outliers: OutlierSummary,
    pub zero_variance: bool,
}

/// # Errors
///
/// Only if polars rejects a column computation.
pub fn analyse_numeric(data: &ClassifiedDataset<'_>, config: &ProfilerConfig) -> Result<NumericSummary> {
    let mut summary = NumericSummary::default();

    for col in data.numeric_columns() {
        let report = analyse_numeric_column(&col.numeric_values(), config)?;
        summary.skewness.insert(col.name.clone(), report.skewness);
        summary.kurtosis.insert(col.name.clone(), report.kurtosis);
        summary.outliers.insert(col.name.clone(), report.outliers);
        summary.describe.insert(col.name.clone(), report.describe);
    }

    let numeric: Vec<&ClassifiedColumn> = data.numeric_columns().collect();
    summary.correlation_matrix = correlation_matrix(&numeric);
    summary.significant_correlations =
        significant_pairs(&summary.correlation_matrix, config.significant_correlation);
    Ok(summary)
}

pub fn analyse_numeric_column(values: &[f64], config: &ProfilerConfig) -> Result<NumericColumnReport> {
    let stats = series_stats(values)?;

    let describe = DescribeStats {
        count: stats.count,
        mean: stats.mean,
        std: stats.std,
        min: stats.min,
        q1: stats.quartiles.map(|q| q.q1),
        median: stats.quartiles.map(|q| q.q2),
        q3: stats.quartiles.map(|q| q.q3),
        max: stats.max,
    };

    Ok(NumericColumnReport {
        outliers: tukey_outliers(values, stats.quartiles, config),
        zero_variance: stats.zero_variance(),
        skewness: stats.skewness,
        kurtosis: stats.kurtosis,
        describe,
    })
}

/// Values outside `[Q1 − k·IQR, Q3 + k·IQR]`.
pub fn tukey_outliers(
    values: &[f64],
    quartiles: Option<Quartiles>,
    config: &ProfilerConfig,
) -> OutlierSummary {
    let Some(q) = quartiles else {
        return OutlierSummary::default();
    };
    let iqr = q.iqr();
    let lower = finite(q.q1 - config.iqr_multiplier * iqr);
    let upper = finite(q.q3 + config.iqr_multiplier * iqr);

    let count = if values.len() < config.min_outlier_samples {
        0
    } else {
        values
            .iter()
            .filter(|&&v| lower.is_some_and(|lo| v < lo) || upper.is_some_and(|hi| v > hi))
            .count()
    };

    OutlierSummary {
        count,
        percentage: percentage(count, values.len()),
        lower_bound: lower,
        upper_bound: upper,
    }
}

/// Pearson r over rows where both values are present. 0 when undefined.
pub fn pairwise_pearson(a: &ClassifiedColumn, b: &ClassifiedColumn) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .values
        .iter()
        .zip(&b.values)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .unzip();
    pearson(&xs, &ys).unwrap_or(0.0)
}

pub fn correlation_matrix(columns: &[&ClassifiedColumn]) -> CorrelationMatrix {
    let k = columns.len();
    let mut data = vec![vec![0.0; k]; k];

    for (i, a) in columns.iter().enumerate() {
        if let Some(cell) = data.get_mut(i).and_then(|row| row.get_mut(i)) {
            *cell = 1.0;
        }
        for (j, b) in columns.iter().enumerate().skip(i + 1) {
            let r = pairwise_pearson(a, b);
            if let Some(cell) = data.get_mut(i).and_then(|row| row.get_mut(j)) {
                *cell = r;
            }
            if let Some(cell) = data.get_mut(j).and_then(|row| row.get_mut(i)) {
                *cell = r;
            }
        }
    }

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        data,
    }
}

/// Off-diagonal pairs with `|r| > threshold`, keyed `"{a}_{b}"`, rounded to 3 places.
pub fn significant_pairs(matrix: &CorrelationMatrix, threshold: f64) -> BTreeMap<String, f64> {
    let mut pairs = BTreeMap::new();
    for (i, a) in matrix.columns.iter().enumerate() {
        for (j, b) in matrix.columns.iter().enumerate().skip(i + 1) {
            let r = matrix
                .data
                .get(i)
                .and_then(|row| row.get(j))
                .copied()
                .unwrap_or_default();
            if r.abs() > threshold {
                pairs.insert(format!("{a}_{b}"), round_to(r, 3));
            }
        }
    }
    pairs
}
