//! Polars-backed column statistics.
//!
//! Classification stays on [`ParsedValue`](super::classify::ParsedValue) so that
//! the untyped input keeps its exact identity. Once a column is known to be
//! numeric (or its values have a display key), the arithmetic is handed to polars
//! chunked arrays.

use super::types::Quartiles;
use crate::utils::finite;
use polars::prelude::*;
use std::collections::HashMap;

const VALUE: &str = "value";
const COUNT: &str = "count";
const ROW_KEY: &str = "row_key";

/// Dense statistics of one numeric sample. Unavailable values are `None`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (ddof = 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub quartiles: Option<Quartiles>,
    /// Adjusted Fisher-Pearson skewness, needs 3 values and some spread.
    pub skewness: Option<f64>,
    /// Adjusted excess kurtosis, needs 4 values and some spread.
    pub kurtosis: Option<f64>,
}

impl SeriesStats {
    pub fn zero_variance(&self) -> bool {
        self.min == self.max
    }
}

pub fn float_chunked(values: &[f64]) -> Float64Chunked {
    Float64Chunked::from_slice(VALUE.into(), values)
}

pub fn series_stats(values: &[f64]) -> PolarsResult<SeriesStats> {
    let ca = float_chunked(values);
    let count = ca.len();
    let (min, max) = (ca.min(), ca.max());
    let spread = count > 0 && min != max;

    let series = ca.clone().into_series();
    let skewness = if spread && count >= 3 {
        series.skew(false)?.and_then(finite)
    } else {
        None
    };
    let kurtosis = if spread && count >= 4 {
        series.kurtosis(true, false)?.and_then(finite)
    } else {
        None
    };

    Ok(SeriesStats {
        count,
        mean: ca.mean().and_then(finite),
        std: if count >= 2 { ca.std(1).and_then(finite) } else { None },
        min,
        max,
        quartiles: linear_quartiles(&ca, min, max)?,
        skewness,
        kurtosis,
    })
}

fn linear_quartiles(
    ca: &Float64Chunked,
    min: Option<f64>,
    max: Option<f64>,
) -> PolarsResult<Option<Quartiles>> {
    let (Some(lo), Some(hi)) = (min, max) else {
        return Ok(None);
    };
    let at = |q: f64| -> PolarsResult<Option<f64>> {
        Ok(ca
            .quantile(q, QuantileMethod::Linear)?
            .and_then(finite)
            .map(|v| v.clamp(lo, hi)))
    };

    let (Some(q1), Some(q2), Some(q3)) = (at(0.25)?, at(0.5)?, at(0.75)?) else {
        return Ok(None);
    };
    // Interpolation can round past a rank shared by two quartiles
    let q2 = q2.max(q1);
    let q3 = q3.max(q2);
    Ok(Some(Quartiles { q1, q2, q3 }))
}

/// Pearson r of two aligned dense samples. `None` with fewer than two pairs
/// or when either side is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let (a, b) = (float_chunked(xs), float_chunked(ys));
    if a.len() < 2 || a.len() != b.len() || a.min() == a.max() || b.min() == b.max() {
        return None;
    }
    polars::prelude::cov::pearson_corr(&a, &b)
        .and_then(finite)
        .map(|r| r.clamp(-1.0, 1.0))
}

/// Occurrences of each non-null key.
pub fn value_frequencies(keys: &[Option<String>]) -> PolarsResult<HashMap<String, usize>> {
    let series = Series::new(VALUE.into(), keys).drop_nulls();
    let counted = series.value_counts(false, false, COUNT.into(), false)?;

    let values = counted.column(VALUE)?.as_materialized_series().str()?;
    let count_series = counted
        .column(COUNT)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    let counts = count_series.u64()?;

    Ok(values
        .into_iter()
        .zip(counts)
        .filter_map(|(value, count)| Some((value?.to_owned(), usize::try_from(count?).ok()?)))
        .collect())
}

/// Number of distinct row keys.
pub fn distinct_count(keys: Vec<String>) -> PolarsResult<usize> {
    if keys.is_empty() {
        return Ok(0);
    }
    Series::new(ROW_KEY.into(), keys).n_unique()
}
