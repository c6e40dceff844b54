//! Profile assembly: classify once, fan the four analysers out, score, and
//! build the immutable [`DatasetProfile`].

use super::categorical::{analyse_categorical, value_counts, value_key};
use super::classify::{ClassifiedColumn, ClassifiedDataset, ParsedValue, classify_dataset};
use super::dataset::Dataset;
use super::distribution::analyse_distributions;
use super::health::{QualityInputs, assess_quality, detect_leakage};
use super::missing::{analyse_duplicates, analyse_missing};
use super::numeric::analyse_numeric;
use super::types::{
    BooleanColumnStats, CategoricalSummary, ColumnKind, ColumnProfile, DatasetInfo,
    DatasetProfile, DatetimeColumnStats, DistributionProfile, DtypesInfo, NormalityStatus,
    NumericColumnStats, NumericSummary,
};
use crate::config::ProfilerConfig;
use crate::error::{InputError, Result};
use crate::session::DatasetSource;
use crate::utils::{format_kib, percentage};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

const DATETIME_DISPLAY: &str = "%Y-%m-%dT%H:%M:%S";
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Runs profiling passes with a fixed configuration. Holds no per-run state,
/// so one instance can serve concurrent runs.
#[derive(Clone, Debug, Default)]
pub struct Profiler {
    config: ProfilerConfig,
}

impl Profiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    pub fn profile(&self, dataset: &Dataset, session_id: &str) -> Result<DatasetProfile> {
        self.profile_with_target(dataset, session_id, None)
    }

    pub fn profile_with_target(
        &self,
        dataset: &Dataset,
        session_id: &str,
        target: Option<&str>,
    ) -> Result<DatasetProfile> {
        self.profile_at(dataset, session_id, target, Utc::now())
    }

    /// Looks the dataset up by session id, then profiles it.
    ///
    /// # Errors
    ///
    /// [`InputError::SessionNotFound`] when the source has nothing under `session_id`,
    /// plus everything [`Profiler::profile_at`] can return.
    pub fn profile_session<S: DatasetSource + ?Sized>(
        &self,
        source: &S,
        session_id: &str,
        target: Option<&str>,
    ) -> Result<DatasetProfile> {
        let dataset = source
            .dataset(session_id)
            .ok_or_else(|| InputError::SessionNotFound(session_id.to_owned()))?;
        self.profile_with_target(&dataset, session_id, target)
    }

    /// Deterministic for a given `created_at`: the same dataset and session id
    /// always produce an equal profile.
    ///
    /// # Errors
    ///
    /// [`InputError`] for a dataset without columns or rows, or an unknown target;
    /// [`ProfileError::Polars`](crate::error::ProfileError::Polars) if a column
    /// computation is rejected.
    pub fn profile_at(
        &self,
        dataset: &Dataset,
        session_id: &str,
        target: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<DatasetProfile> {
        if dataset.column_count() == 0 {
            return Err(InputError::NoColumns.into());
        }
        if dataset.row_count() == 0 {
            return Err(InputError::EmptyDataset.into());
        }
        if let Some(t) = target
            && !dataset.columns().iter().any(|c| c == t)
        {
            return Err(InputError::UnknownTarget(t.to_owned()).into());
        }

        let start = Instant::now();
        tracing::info!(
            session_id,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Profiling dataset"
        );

        let data = classify_dataset(dataset);
        let config = &self.config;

        let (((missing, duplicates), categorical), (numeric, distributions)) =
            rayon::join(
                || {
                    rayon::join(
                        || (analyse_missing(&data), analyse_duplicates(&data)),
                        || analyse_categorical(&data, config),
                    )
                },
                || {
                    rayon::join(
                        || analyse_numeric(&data, config),
                        || analyse_distributions(&data, config),
                    )
                },
            );

        let duplicates = duplicates?;
        let categorical_summary = categorical?;
        let numeric_summary = numeric?;
        let distribution_analysis = distributions?;

        log_sentinels(&numeric_summary, &distribution_analysis);

        let column_profiles = data
            .columns
            .iter()
            .map(|col| -> Result<(String, ColumnProfile)> {
                let profile = self.column_profile(col, data.row_count(), &numeric_summary, &categorical_summary)?;
                Ok((col.name.clone(), profile))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let potential_leakage = target
            .map(|t| detect_leakage(&data, t, &numeric_summary, config))
            .unwrap_or_default();

        let quality_assessment = assess_quality(QualityInputs {
            rows: data.row_count(),
            column_order: dataset.columns(),
            column_profiles: &column_profiles,
            missing: &missing,
            duplicates: &duplicates,
            numeric: &numeric_summary,
            potential_leakage,
        });

        let memory_bytes = dataset.estimated_size_bytes();
        let dataset_info = DatasetInfo {
            rows: dataset.row_count(),
            columns: dataset.column_count(),
            column_names: dataset.columns().to_vec(),
            memory_usage: format_kib(memory_bytes),
            memory_bytes,
            missing_values_total: missing.total_missing,
            duplicate_rows: duplicates.duplicate_rows,
        };

        tracing::info!(
            session_id,
            overall_quality = quality_assessment.overall_quality,
            grade = quality_assessment.quality_grade.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Profile complete"
        );

        Ok(DatasetProfile {
            session_id: session_id.to_owned(),
            created_at,
            target_column: target.map(str::to_owned),
            dataset_info,
            dtypes_info: dtypes_info(&data),
            column_profiles,
            missing_analysis: missing,
            duplicate_analysis: duplicates,
            numeric_summary,
            categorical_summary,
            distribution_analysis,
            quality_assessment,
        })
    }

    fn column_profile(
        &self,
        col: &ClassifiedColumn,
        rows: usize,
        numeric: &NumericSummary,
        categorical: &BTreeMap<String, CategoricalSummary>,
    ) -> Result<ColumnProfile> {
        let null_count = col.null_count();
        let count = rows - null_count;
        let counts = value_counts(col)?;
        let unique_count = counts.len();
        let mode_frequency = counts.first().map_or(0, |vc| vc.count);

        Ok(ColumnProfile {
            kind: col.kind,
            count,
            null_count,
            null_percentage: percentage(null_count, rows),
            unique_count,
            is_high_cardinality: unique_count as f64 > rows as f64 * self.config.high_cardinality_ratio,
            is_constant: count > 0 && percentage(mode_frequency, count) >= self.config.constant_ratio * 100.0,
            sample_values: sample_values(col, self.config.sample_values),
            numeric: (col.kind == ColumnKind::Numeric).then(|| numeric_stats(&col.name, numeric)),
            categorical: categorical.get(&col.name).cloned(),
            datetime: (col.kind == ColumnKind::Datetime).then(|| datetime_stats(col)),
            boolean: (col.kind == ColumnKind::Boolean).then(|| boolean_stats(col)),
        })
    }
}

/// Profiles with the default configuration.
pub fn profile_dataset(dataset: &Dataset, session_id: &str) -> Result<DatasetProfile> {
    Profiler::default().profile(dataset, session_id)
}

fn numeric_stats(name: &str, summary: &NumericSummary) -> NumericColumnStats {
    let describe = summary.describe.get(name).cloned().unwrap_or_default();
    NumericColumnStats {
        mean: describe.mean,
        std: describe.std,
        min: describe.min,
        max: describe.max,
        skewness: summary.skewness.get(name).copied().flatten(),
        kurtosis: summary.kurtosis.get(name).copied().flatten(),
        outlier_count: summary.outliers.get(name).map_or(0, |o| o.count),
    }
}

fn datetime_stats(col: &ClassifiedColumn) -> DatetimeColumnStats {
    let dates: Vec<NaiveDateTime> = col
        .values
        .iter()
        .filter_map(|v| match v {
            ParsedValue::Date(d) => Some(*d),
            _ => None,
        })
        .collect();
    let min = dates.iter().min().copied();
    let max = dates.iter().max().copied();

    DatetimeColumnStats {
        min: min.map(|d| d.format(DATETIME_DISPLAY).to_string()),
        max: max.map(|d| d.format(DATETIME_DISPLAY).to_string()),
        range_days: min
            .zip(max)
            .map(|(lo, hi)| (hi - lo).num_seconds() as f64 / SECONDS_PER_DAY),
    }
}

fn boolean_stats(col: &ClassifiedColumn) -> BooleanColumnStats {
    col.values
        .iter()
        .fold(BooleanColumnStats::default(), |mut acc, v| {
            match v {
                ParsedValue::Boolean(true) => acc.true_count += 1,
                ParsedValue::Boolean(false) => acc.false_count += 1,
                _ => {}
            }
            acc
        })
}

/// First `limit` distinct non-null values in row order.
fn sample_values(col: &ClassifiedColumn, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    col.values
        .iter()
        .filter_map(value_key)
        .filter(|v| seen.insert(v.clone()))
        .take(limit)
        .collect()
}

fn dtypes_info(data: &ClassifiedDataset<'_>) -> DtypesInfo {
    let type_counts = ColumnKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_owned(), data.columns_of(*kind).len()))
        .collect();

    DtypesInfo {
        numeric_columns: data.columns_of(ColumnKind::Numeric),
        categorical_columns: data.columns_of(ColumnKind::Categorical),
        datetime_columns: data.columns_of(ColumnKind::Datetime),
        boolean_columns: data.columns_of(ColumnKind::Boolean),
        type_counts,
    }
}

fn log_sentinels(numeric: &NumericSummary, distributions: &BTreeMap<String, DistributionProfile>) {
    for (name, stats) in &numeric.describe {
        if stats.std.is_none() || numeric.skewness.get(name).is_some_and(Option::is_none) {
            tracing::debug!(column = %name, count = stats.count, "Spread statistics unavailable, reporting null");
        }
    }
    for (name, dist) in distributions {
        if dist.normality.status != NormalityStatus::Computed {
            tracing::debug!(column = %name, status = ?dist.normality.status, "Normality test not run");
        }
    }
}
