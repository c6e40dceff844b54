use super::{grid, numeric_column};
use crate::analyser::logic::dataset::{Dataset, RawValue};
use crate::analyser::logic::types::{ColumnKind, NormalityStatus, QualityGrade};
use crate::analyser::logic::{Profiler, profile_dataset};
use crate::config::ProfilerConfig;
use crate::error::{InputError, ProfileError};
use anyhow::Result;
use approx::assert_abs_diff_eq;
use chrono::{TimeZone as _, Utc};

fn outlier_dataset() -> Dataset {
    // 1..=97, a repeat of the 97 row, then two extreme values: 100 rows, one duplicate pair
    let mut values: Vec<f64> = (1..=97).map(f64::from).collect();
    values.push(97.0);
    values.push(1000.0);
    values.push(-900.0);

    let rows = values
        .iter()
        .map(|v| {
            let group = if *v as i64 % 2 == 0 { "even" } else { "odd" };
            vec![RawValue::Float(*v), RawValue::from(group)]
        })
        .collect();
    Dataset::new(vec!["value".to_owned(), "group".to_owned()], rows).unwrap()
}

#[test]
fn test_duplicates_and_outliers_scenario() -> Result<()> {
    let profile = profile_dataset(&outlier_dataset(), "s-1")?;

    assert_eq!(profile.dataset_info.rows, 100);
    assert_eq!(profile.duplicate_analysis.duplicate_rows, 1);
    assert_eq!(profile.duplicate_analysis.unique_rows, 99);
    assert_eq!(profile.dataset_info.duplicate_rows, 1);

    let outliers = &profile.numeric_summary.outliers["value"];
    assert!(outliers.count >= 2, "expected 1000 and -900 outside the fence");
    let column = &profile.column_profiles["value"];
    assert_eq!(column.kind, ColumnKind::Numeric);
    assert_eq!(column.numeric.as_ref().unwrap().outlier_count, outliers.count);
    assert_eq!(profile.quality_assessment.uniqueness, 99.0);
    Ok(())
}

#[test]
fn test_all_null_column_scenario() -> Result<()> {
    let dataset = grid(
        &["amount", "notes"],
        &[&["1.5", ""], &["2.5", ""], &["4.0", ""], &["8.0", ""]],
    );
    let profile = profile_dataset(&dataset, "s-2")?;

    let notes = &profile.column_profiles["notes"];
    assert_eq!(notes.kind, ColumnKind::Categorical);
    assert_eq!(notes.null_percentage, 100.0);
    assert_eq!(notes.count, 0);
    assert!(notes.numeric.is_none());
    assert!(!profile.numeric_summary.describe.contains_key("notes"));
    assert!(!profile.distribution_analysis.contains_key("notes"));

    // One complete column and one empty column
    assert_eq!(profile.quality_assessment.consistency, 50.0);
    assert_eq!(profile.quality_assessment.empty_columns, vec!["notes"]);
    assert!(
        profile
            .quality_assessment
            .recommendations
            .iter()
            .any(|r| r.contains("empty columns: notes"))
    );
    Ok(())
}

#[test]
fn test_zero_rows_is_input_error() {
    let dataset = Dataset::new(vec!["a".to_owned()], vec![]).unwrap();
    let err = profile_dataset(&dataset, "s-3").unwrap_err();
    assert!(matches!(err, ProfileError::Input(InputError::EmptyDataset)));
    assert!(err.is_input_error());
}

#[test]
fn test_zero_columns_is_input_error() {
    let dataset = Dataset::new(vec![], vec![]).unwrap();
    let err = profile_dataset(&dataset, "s-4").unwrap_err();
    assert!(matches!(err, ProfileError::Input(InputError::NoColumns)));
}

#[test]
fn test_linear_columns_correlate_perfectly() -> Result<()> {
    let rows = (1..=20)
        .map(|i| vec![RawValue::Int(i), RawValue::Int(2 * i)])
        .collect();
    let dataset = Dataset::new(vec!["x".to_owned(), "y".to_owned()], rows)?;
    let profile = profile_dataset(&dataset, "s-5")?;

    let matrix = &profile.numeric_summary.correlation_matrix;
    assert_abs_diff_eq!(matrix.get("x", "y").unwrap(), 1.0, epsilon = 1e-6);
    assert_eq!(matrix.get("x", "x"), Some(1.0));
    assert_eq!(profile.numeric_summary.significant_correlations["x_y"], 1.0);
    Ok(())
}

#[test]
fn test_profiling_is_deterministic() -> Result<()> {
    let profiler = Profiler::default();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let dataset = outlier_dataset();

    let first = profiler.profile_at(&dataset, "same", None, at)?;
    let second = profiler.profile_at(&dataset, "same", None, at)?;
    assert_eq!(first, second);
    assert_eq!(serde_json::to_string(&first)?, serde_json::to_string(&second)?);
    Ok(())
}

#[test]
fn test_report_field_names() -> Result<()> {
    let dataset = grid(
        &["n", "c"],
        &[&["1", "a"], &["2", "b"], &["3", "a"], &["5", "c"]],
    );
    let json = serde_json::to_value(profile_dataset(&dataset, "s-6")?)?;

    for key in [
        "dataset_info",
        "dtypes_info",
        "missing_analysis",
        "duplicate_analysis",
        "numeric_summary",
        "categorical_summary",
        "quality_assessment",
        "distribution_analysis",
    ] {
        assert!(json.get(key).is_some(), "missing section {key}");
    }
    for key in ["describe", "correlation_matrix", "skewness", "kurtosis", "outliers"] {
        assert!(json["numeric_summary"].get(key).is_some(), "missing numeric_summary.{key}");
    }
    assert_eq!(json["column_profiles"]["n"]["type"], "numeric");
    assert_eq!(json["column_profiles"]["c"]["type"], "categorical");
    assert!(json["numeric_summary"]["describe"]["n"].get("50%").is_some());
    assert_eq!(json["quality_assessment"]["quality_grade"], "excellent");
    Ok(())
}

#[test]
fn test_mixed_column_types() -> Result<()> {
    let dataset = grid(
        &["active", "joined", "city", "score"],
        &[
            &["yes", "2024-01-01", "Oslo", "3"],
            &["no", "2024-01-11", "Bergen", "4"],
            &["Yes", "2024-01-21", "Oslo", ""],
        ],
    );
    let profile = profile_dataset(&dataset, "s-7")?;

    assert_eq!(profile.dtypes_info.boolean_columns, vec!["active"]);
    assert_eq!(profile.dtypes_info.datetime_columns, vec!["joined"]);
    assert_eq!(profile.dtypes_info.categorical_columns, vec!["city"]);
    assert_eq!(profile.dtypes_info.numeric_columns, vec!["score"]);
    assert_eq!(profile.dtypes_info.type_counts["numeric"], 1);

    let active = profile.column_profiles["active"].boolean.as_ref().unwrap();
    assert_eq!((active.true_count, active.false_count), (2, 1));

    let joined = profile.column_profiles["joined"].datetime.as_ref().unwrap();
    assert_eq!(joined.min.as_deref(), Some("2024-01-01T00:00:00"));
    assert_eq!(joined.range_days, Some(20.0));

    let city = &profile.categorical_summary["city"];
    assert_eq!(city.mode.as_deref(), Some("Oslo"));
    assert_eq!(city.mode_frequency, 2);
    assert!(!profile.categorical_summary.contains_key("active"));

    let score = &profile.column_profiles["score"];
    assert_eq!(score.null_count, 1);
    assert_abs_diff_eq!(score.null_percentage, 100.0 / 3.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_small_numeric_column_reports_sentinels() -> Result<()> {
    let profile = profile_dataset(&numeric_column("v", &[4.0, 9.0]), "s-8")?;

    let dist = &profile.distribution_analysis["v"];
    assert_eq!(dist.normality.status, NormalityStatus::InsufficientData);
    assert!(!dist.normality.is_normal);
    assert!(dist.normality.p_value.is_none());
    assert_eq!(dist.histogram.total(), 2);

    assert!(profile.numeric_summary.skewness["v"].is_none());
    assert!(profile.numeric_summary.kurtosis["v"].is_none());
    assert!(profile.numeric_summary.describe["v"].std.is_some());
    Ok(())
}

#[test]
fn test_constant_column_flags() -> Result<()> {
    let dataset = grid(&["k", "v"], &[&["7", "a"], &["7", "b"], &["7", "c"]]);
    let profile = profile_dataset(&dataset, "s-9")?;

    assert!(profile.column_profiles["k"].is_constant);
    assert!(profile.column_profiles["v"].is_high_cardinality);
    assert_eq!(profile.quality_assessment.constant_columns, vec!["k"]);
    assert_eq!(profile.quality_assessment.validity, 100.0);
    assert_eq!(profile.numeric_summary.correlation_matrix.data, vec![vec![1.0]]);
    assert_eq!(profile.distribution_analysis["k"].normality.status, NormalityStatus::ZeroRange);
    Ok(())
}

#[test]
fn test_large_constant_ids_keep_histogram_edges_increasing() -> Result<()> {
    let profile = profile_dataset(&numeric_column("id", &[1e17; 3]), "s-9b")?;
    let hist = &profile.distribution_analysis["id"].histogram;

    assert_eq!(hist.counts, vec![3]);
    assert!(
        hist.bin_edges.windows(2).all(|w| w[0] < w[1]),
        "edges not strictly increasing: {:?}",
        hist.bin_edges
    );
    Ok(())
}

#[test]
fn test_target_leakage_detection() -> Result<()> {
    let rows = (1..=10)
        .map(|i| {
            vec![
                RawValue::Int(i),
                RawValue::Float(i as f64 * 3.0 + 1.0),
                RawValue::Int(i % 3),
                RawValue::Int(i),
            ]
        })
        .collect();
    let dataset = Dataset::new(
        vec!["target".to_owned(), "scaled".to_owned(), "noise".to_owned(), "copy".to_owned()],
        rows,
    )?;

    let profile = Profiler::default().profile_with_target(&dataset, "s-10", Some("target"))?;
    assert_eq!(profile.target_column.as_deref(), Some("target"));
    assert_eq!(profile.quality_assessment.potential_leakage, vec!["scaled", "copy"]);

    let err = Profiler::default()
        .profile_with_target(&dataset, "s-10", Some("nope"))
        .unwrap_err();
    assert!(matches!(err, ProfileError::Input(InputError::UnknownTarget(_))));
    Ok(())
}

#[test]
fn test_config_changes_outlier_fence() -> Result<()> {
    let dataset = outlier_dataset();
    let wide = Profiler::new(ProfilerConfig {
        iqr_multiplier: 100.0,
        ..ProfilerConfig::default()
    });
    let profile = wide.profile(&dataset, "s-11")?;
    assert_eq!(profile.numeric_summary.outliers["value"].count, 0);
    Ok(())
}

#[test]
fn test_key_insights() -> Result<()> {
    let profile = profile_dataset(&outlier_dataset(), "s-12")?;
    let insights = profile.key_insights();

    assert!(insights.iter().any(|i| i.contains("100 rows")));
    assert!(insights.iter().any(|i| i.contains("duplicate rows")));
    assert!(insights.iter().any(|i| i == "No missing values."));
    assert_ne!(profile.quality_assessment.quality_grade, QualityGrade::Poor);
    Ok(())
}
