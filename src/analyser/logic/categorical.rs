use super::classify::{ClassifiedColumn, ClassifiedDataset, ParsedValue};
use super::frame::value_frequencies;
use super::types::{CategoricalSummary, ColumnKind, ValueCount};
use crate::config::ProfilerConfig;
use crate::error::Result;
use crate::utils::percentage;
use std::collections::{BTreeMap, HashSet};

/// # Errors
///
/// Only if polars fails to count a column.
pub fn analyse_categorical(
    data: &ClassifiedDataset<'_>,
    config: &ProfilerConfig,
) -> Result<BTreeMap<String, CategoricalSummary>> {
    data.columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Categorical)
        .map(|col| -> Result<(String, CategoricalSummary)> {
            let summary = summarise_column(col, data.row_count(), config.top_n_values)?;
            Ok((col.name.clone(), summary))
        })
        .collect()
}

pub fn summarise_column(
    col: &ClassifiedColumn,
    rows: usize,
    top_n: usize,
) -> Result<CategoricalSummary> {
    let counts = value_counts(col)?;
    let unique_count = counts.len();

    let (mode, mode_frequency) = counts
        .first()
        .map_or((None, 0), |vc| (Some(vc.value.clone()), vc.count));

    Ok(CategoricalSummary {
        unique_count,
        unique_percentage: percentage(unique_count, rows),
        top_values: counts.into_iter().take(top_n).collect(),
        mode,
        mode_frequency,
    })
}

/// Frequencies of the non-null values, most frequent first.
/// Equal counts keep the order in which the values were first seen.
pub fn value_counts(col: &ClassifiedColumn) -> Result<Vec<ValueCount>> {
    let keys: Vec<Option<String>> = col.values.iter().map(value_key).collect();
    let frequencies = value_frequencies(&keys)?;

    let mut seen = HashSet::with_capacity(frequencies.len());
    let mut order: Vec<ValueCount> = keys
        .into_iter()
        .flatten()
        .filter(|key| seen.insert(key.clone()))
        .map(|value| ValueCount {
            count: frequencies.get(&value).copied().unwrap_or_default(),
            value,
        })
        .collect();

    // sort_by is stable, so ties stay in first-seen order
    order.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(order)
}

/// Display form used for counting and sampling. `None` for missing cells.
pub fn value_key(value: &ParsedValue) -> Option<String> {
    match value {
        ParsedValue::Numeric(v) => Some(v.to_string()),
        ParsedValue::Date(d) => Some(d.format("%Y-%m-%dT%H:%M:%S").to_string()),
        ParsedValue::Boolean(b) => Some(b.to_string()),
        ParsedValue::Text(s) => Some(s.clone()),
        ParsedValue::Missing => None,
    }
}
