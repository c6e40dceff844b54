use super::classify::ClassifiedDataset;
use super::types::{DuplicateAnalysis, MissingAnalysis};
use crate::error::Result;
use crate::utils::percentage;

pub fn analyse_missing(data: &ClassifiedDataset<'_>) -> MissingAnalysis {
    let rows = data.row_count();
    let mut analysis = MissingAnalysis::default();

    for col in &data.columns {
        let nulls = col.null_count();
        analysis.total_missing += nulls;
        analysis.missing_by_column.insert(col.name.clone(), nulls);
        analysis
            .missing_percentage_by_column
            .insert(col.name.clone(), percentage(nulls, rows));
        if nulls > 0 {
            analysis.columns_with_missing.push(col.name.clone());
        }
    }

    let cells = rows.saturating_mul(data.columns.len());
    analysis.missing_percentage = percentage(analysis.total_missing, cells);
    analysis
}

/// # Errors
///
/// Only if polars fails to count distinct rows.
pub fn analyse_duplicates(data: &ClassifiedDataset<'_>) -> Result<DuplicateAnalysis> {
    let rows = data.row_count();
    let duplicate_rows = data.source.count_duplicate_rows()?;
    Ok(DuplicateAnalysis {
        duplicate_rows,
        unique_rows: rows - duplicate_rows,
        duplicate_percentage: percentage(duplicate_rows, rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::logic::classify::classify_dataset;
    use crate::analyser::logic::dataset::{Dataset, RawValue};

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["a".to_owned(), "b".to_owned()],
            vec![
                vec![RawValue::Int(1), RawValue::from("x")],
                vec![RawValue::Null, RawValue::from("y")],
                vec![RawValue::Int(1), RawValue::from("x")],
                vec![RawValue::Null, RawValue::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_missing_counts_and_percentages() {
        let ds = dataset();
        let missing = analyse_missing(&classify_dataset(&ds));

        assert_eq!(missing.total_missing, 3);
        assert_eq!(missing.missing_by_column["a"], 2);
        assert_eq!(missing.missing_percentage_by_column["a"], 50.0);
        assert_eq!(missing.missing_percentage_by_column["b"], 25.0);
        assert_eq!(missing.missing_percentage, 37.5);
        assert_eq!(missing.columns_with_missing, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_rows() {
        let ds = dataset();
        let dups = analyse_duplicates(&classify_dataset(&ds)).unwrap();
        assert_eq!(dups.duplicate_rows, 1);
        assert_eq!(dups.unique_rows, 3);
        assert_eq!(dups.duplicate_percentage, 25.0);
    }

    #[test]
    fn test_zero_rows_do_not_divide_by_zero() {
        let ds = Dataset::new(vec!["a".to_owned()], vec![]).unwrap();
        let data = classify_dataset(&ds);
        let missing = analyse_missing(&data);
        assert_eq!(missing.missing_percentage_by_column["a"], 0.0);
        assert_eq!(missing.missing_percentage, 0.0);
        assert_eq!(analyse_duplicates(&data).unwrap().unique_rows, 0);
    }
}
