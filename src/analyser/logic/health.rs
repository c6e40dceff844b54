use super::classify::ClassifiedDataset;
use super::types::{
    ColumnKind, ColumnProfile, DuplicateAnalysis, MissingAnalysis, NumericSummary,
    QualityAssessment, QualityGrade,
};
use crate::config::ProfilerConfig;
use crate::utils::percentage;
use std::collections::BTreeMap;

pub const COMPLETENESS_WEIGHT: f64 = 0.3;
pub const UNIQUENESS_WEIGHT: f64 = 0.2;
pub const CONSISTENCY_WEIGHT: f64 = 0.3;
pub const VALIDITY_WEIGHT: f64 = 0.2;

/// Each outlier costs a numeric column this many validity points.
pub const OUTLIER_PENALTY: f64 = 2.0;
pub const COMPLETENESS_WARNING: f64 = 80.0;
pub const VALIDITY_WARNING: f64 = 90.0;

/// Everything the scorer reads. Columns are visited in `column_order`.
pub struct QualityInputs<'a> {
    pub rows: usize,
    pub column_order: &'a [String],
    pub column_profiles: &'a BTreeMap<String, ColumnProfile>,
    pub missing: &'a MissingAnalysis,
    pub duplicates: &'a DuplicateAnalysis,
    pub numeric: &'a NumericSummary,
    pub potential_leakage: Vec<String>,
}

pub fn assess_quality(inputs: QualityInputs<'_>) -> QualityAssessment {
    let cols = inputs.column_order.len();
    let cells = inputs.rows.saturating_mul(cols);

    let completeness = clamp_score(100.0 - percentage(inputs.missing.total_missing, cells));
    let uniqueness = clamp_score(100.0 - percentage(inputs.duplicates.duplicate_rows, inputs.rows));

    let consistency = if cols == 0 {
        100.0
    } else {
        let total: f64 = inputs
            .column_order
            .iter()
            .map(|name| {
                let null_pct = inputs
                    .missing
                    .missing_percentage_by_column
                    .get(name)
                    .copied()
                    .unwrap_or_default();
                100.0 - null_pct
            })
            .sum();
        clamp_score(total / cols as f64)
    };

    let validity = clamp_score(validity_score(inputs.numeric));

    let overall_quality = clamp_score(
        completeness * COMPLETENESS_WEIGHT
            + uniqueness * UNIQUENESS_WEIGHT
            + consistency * CONSISTENCY_WEIGHT
            + validity * VALIDITY_WEIGHT,
    );

    let mut empty_columns = Vec::new();
    let mut constant_columns = Vec::new();
    for name in inputs.column_order {
        let Some(profile) = inputs.column_profiles.get(name) else {
            continue;
        };
        if profile.count == 0 {
            empty_columns.push(name.clone());
        } else if profile.is_constant {
            constant_columns.push(name.clone());
        }
    }

    let mut assessment = QualityAssessment {
        completeness,
        uniqueness,
        consistency,
        validity,
        overall_quality,
        quality_grade: QualityGrade::from_score(overall_quality),
        empty_columns,
        constant_columns,
        potential_leakage: inputs.potential_leakage,
        recommendations: Vec::new(),
    };
    assessment.recommendations = recommendations(&assessment, inputs.duplicates, inputs.numeric);
    assessment
}

/// Mean of `max(0, 100 − 2·outliers)` over numeric columns with spread.
/// Vacuously 100 when there are none.
pub fn validity_score(numeric: &NumericSummary) -> f64 {
    let scores: Vec<f64> = numeric
        .describe
        .iter()
        .filter(|(_, stats)| matches!((stats.min, stats.max), (Some(lo), Some(hi)) if hi > lo))
        .map(|(name, _)| {
            let outliers = numeric.outliers.get(name).map_or(0, |o| o.count);
            (100.0 - outliers as f64 * OUTLIER_PENALTY).max(0.0)
        })
        .collect();

    if scores.is_empty() {
        100.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Columns that look like they encode the target: identical values, or a
/// Pearson |r| above the configured threshold against a numeric target.
pub fn detect_leakage(
    data: &ClassifiedDataset<'_>,
    target: &str,
    numeric: &NumericSummary,
    config: &ProfilerConfig,
) -> Vec<String> {
    let Some(target_idx) = data.source.columns().iter().position(|c| c == target) else {
        return Vec::new();
    };
    let target_kind = data.columns.get(target_idx).map(|c| c.kind);

    data.source
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != target_idx)
        .filter(|(idx, name)| {
            let identical = data
                .source
                .column_values(*idx)
                .eq(data.source.column_values(target_idx));
            let correlated = target_kind == Some(ColumnKind::Numeric)
                && numeric
                    .correlation_matrix
                    .get(name, target)
                    .is_some_and(|r| r.abs() > config.leakage_correlation);
            identical || correlated
        })
        .map(|(_, name)| name.clone())
        .collect()
}

fn recommendations(
    assessment: &QualityAssessment,
    duplicates: &DuplicateAnalysis,
    numeric: &NumericSummary,
) -> Vec<String> {
    let mut recs = Vec::new();

    if assessment.completeness < COMPLETENESS_WARNING {
        recs.push(format!(
            "Consider handling missing values: completeness is {:.1}%",
            assessment.completeness
        ));
    }
    if duplicates.duplicate_rows > 0 {
        recs.push(format!("Remove {} duplicate rows", duplicates.duplicate_rows));
    }
    if !assessment.empty_columns.is_empty() {
        recs.push(format!(
            "Consider removing empty columns: {}",
            assessment.empty_columns.join(", ")
        ));
    }
    if !assessment.constant_columns.is_empty() {
        recs.push(format!(
            "Consider removing constant columns: {}",
            assessment.constant_columns.join(", ")
        ));
    }
    if assessment.validity < VALIDITY_WARNING {
        let noisy: Vec<&str> = numeric
            .outliers
            .iter()
            .filter(|(_, o)| o.count > 0)
            .map(|(name, _)| name.as_str())
            .collect();
        recs.push(format!("Review outliers in: {}", noisy.join(", ")));
    }
    if !assessment.potential_leakage.is_empty() {
        recs.push(format!(
            "Review potential target leakage in: {}",
            assessment.potential_leakage.join(", ")
        ));
    }

    if recs.is_empty() {
        recs.push("Data quality looks good, no major issues detected".to_owned());
    }
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::logic::types::{DescribeStats, OutlierSummary};

    fn numeric_with(columns: &[(&str, f64, f64, usize)]) -> NumericSummary {
        let mut summary = NumericSummary::default();
        for &(name, min, max, outliers) in columns {
            summary.describe.insert(
                name.to_owned(),
                DescribeStats {
                    count: 10,
                    min: Some(min),
                    max: Some(max),
                    ..DescribeStats::default()
                },
            );
            summary.outliers.insert(
                name.to_owned(),
                OutlierSummary {
                    count: outliers,
                    ..OutlierSummary::default()
                },
            );
        }
        summary
    }

    #[test]
    fn test_validity_without_numeric_columns_is_perfect() {
        assert_eq!(validity_score(&NumericSummary::default()), 100.0);
    }

    #[test]
    fn test_validity_penalises_outliers() {
        let numeric = numeric_with(&[("a", 0.0, 10.0, 5), ("b", 0.0, 1.0, 0)]);
        assert_eq!(validity_score(&numeric), 95.0);

        let saturated = numeric_with(&[("a", 0.0, 10.0, 80)]);
        assert_eq!(validity_score(&saturated), 0.0);
    }

    #[test]
    fn test_validity_skips_zero_variance_columns() {
        let numeric = numeric_with(&[("flat", 3.0, 3.0, 0), ("a", 0.0, 10.0, 10)]);
        assert_eq!(validity_score(&numeric), 80.0);
    }

    #[test]
    fn test_scores_and_grade() {
        let columns = vec!["a".to_owned(), "b".to_owned()];
        let mut missing = MissingAnalysis {
            total_missing: 5,
            ..MissingAnalysis::default()
        };
        missing.missing_percentage_by_column.insert("a".to_owned(), 50.0);
        missing.missing_percentage_by_column.insert("b".to_owned(), 0.0);
        let duplicates = DuplicateAnalysis {
            duplicate_rows: 1,
            unique_rows: 9,
            duplicate_percentage: 10.0,
        };
        let numeric = NumericSummary::default();
        let profiles = BTreeMap::new();

        let q = assess_quality(QualityInputs {
            rows: 10,
            column_order: &columns,
            column_profiles: &profiles,
            missing: &missing,
            duplicates: &duplicates,
            numeric: &numeric,
            potential_leakage: Vec::new(),
        });

        assert_eq!(q.completeness, 75.0);
        assert_eq!(q.uniqueness, 90.0);
        assert_eq!(q.consistency, 75.0);
        assert_eq!(q.validity, 100.0);
        let expected = 75.0 * 0.3 + 90.0 * 0.2 + 75.0 * 0.3 + 100.0 * 0.2;
        assert!((q.overall_quality - expected).abs() < 1e-9);
        assert_eq!(q.quality_grade, QualityGrade::Good);
        assert!(q.recommendations.iter().any(|r| r.contains("missing values")));
        assert!(q.recommendations.iter().any(|r| r == "Remove 1 duplicate rows"));
    }

    #[test]
    fn test_grade_ladder_boundaries() {
        assert_eq!(QualityGrade::from_score(90.0), QualityGrade::Excellent);
        assert_eq!(QualityGrade::from_score(89.999), QualityGrade::Good);
        assert_eq!(QualityGrade::from_score(70.0), QualityGrade::Good);
        assert_eq!(QualityGrade::from_score(50.0), QualityGrade::Fair);
        assert_eq!(QualityGrade::from_score(49.9), QualityGrade::Poor);
        assert_eq!(QualityGrade::from_score(0.0), QualityGrade::Poor);
    }

    #[test]
    fn test_clean_data_gets_positive_recommendation() {
        let columns = vec!["a".to_owned()];
        let mut missing = MissingAnalysis::default();
        missing.missing_percentage_by_column.insert("a".to_owned(), 0.0);
        let q = assess_quality(QualityInputs {
            rows: 3,
            column_order: &columns,
            column_profiles: &BTreeMap::new(),
            missing: &missing,
            duplicates: &DuplicateAnalysis::default(),
            numeric: &NumericSummary::default(),
            potential_leakage: Vec::new(),
        });
        assert_eq!(q.overall_quality, 100.0);
        assert_eq!(q.quality_grade, QualityGrade::Excellent);
        assert_eq!(q.recommendations.len(), 1);
        assert!(q.recommendations[0].starts_with("Data quality looks good"));
    }
}
