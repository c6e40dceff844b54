use super::types::{CategoricalSummary, ColumnKind, DatasetProfile, QualityGrade};
use serde::{Deserialize, Serialize};

pub const IDENTIFIER_THRESHOLD: f64 = 90.0;
pub const HIGH_DIVERSITY_THRESHOLD: f64 = 50.0;
pub const MODERATE_DIVERSITY_THRESHOLD: f64 = 20.0;

pub const LARGE_DATASET_ROWS: usize = 10_000;
pub const SMALL_DATASET_ROWS: usize = 100;
pub const MISSING_DATA_HIGH: f64 = 20.0;
pub const MISSING_DATA_MEDIUM: f64 = 5.0;

/// Presentation hint derived from `unique_percentage`; never stored in the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalityHint {
    LikelyIdentifier,
    HighDiversity,
    Moderate,
    LowDiversity,
}

impl CardinalityHint {
    /// > 90 identifier, 50–90 high, 20–50 moderate, < 20 low.
    pub fn from_unique_percentage(pct: f64) -> Self {
        if pct > IDENTIFIER_THRESHOLD {
            Self::LikelyIdentifier
        } else if pct >= HIGH_DIVERSITY_THRESHOLD {
            Self::HighDiversity
        } else if pct >= MODERATE_DIVERSITY_THRESHOLD {
            Self::Moderate
        } else {
            Self::LowDiversity
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LikelyIdentifier => "likely identifier",
            Self::HighDiversity => "high diversity",
            Self::Moderate => "moderate",
            Self::LowDiversity => "low diversity",
        }
    }
}

impl CategoricalSummary {
    pub fn cardinality_hint(&self) -> CardinalityHint {
        CardinalityHint::from_unique_percentage(self.unique_percentage)
    }
}

impl DatasetProfile {
    /// Short plain-language observations about the dataset as a whole.
    pub fn key_insights(&self) -> Vec<String> {
        let mut insights = Vec::new();
        let (rows, cols) = self.shape();

        if rows >= LARGE_DATASET_ROWS {
            insights.push(format!("Large dataset with {rows} rows, suitable for complex models."));
        } else if rows < SMALL_DATASET_ROWS {
            insights.push(format!(
                "Small dataset with {rows} rows; consider simpler models or gathering more data."
            ));
        } else {
            insights.push(format!("Medium-sized dataset with {rows} rows and {cols} columns."));
        }

        let quality = &self.quality_assessment;
        insights.push(match quality.quality_grade {
            QualityGrade::Excellent => "Excellent data quality, ready for modelling.".to_owned(),
            QualityGrade::Good => format!(
                "Good data quality ({:.1}/100) with minor issues.",
                quality.overall_quality
            ),
            QualityGrade::Fair | QualityGrade::Poor => format!(
                "Data quality is {} ({:.1}/100); cleaning is recommended.",
                quality.quality_grade.as_str(),
                quality.overall_quality
            ),
        });

        let missing = self.missing_analysis.missing_percentage;
        if missing > MISSING_DATA_HIGH {
            insights.push(format!(
                "High share of missing values ({missing:.1}%) needs careful handling."
            ));
        } else if missing > MISSING_DATA_MEDIUM {
            insights.push(format!("Some missing values present ({missing:.1}%)."));
        } else if self.missing_analysis.total_missing == 0 {
            insights.push("No missing values.".to_owned());
        }

        if self.duplicate_analysis.duplicate_rows > 0 {
            insights.push(format!(
                "{} duplicate rows ({:.1}%) should be reviewed.",
                self.duplicate_analysis.duplicate_rows, self.duplicate_analysis.duplicate_percentage
            ));
        }

        let counts = &self.dtypes_info.type_counts;
        let numeric = counts.get(ColumnKind::Numeric.as_str()).copied().unwrap_or_default();
        let categorical = counts
            .get(ColumnKind::Categorical.as_str())
            .copied()
            .unwrap_or_default();
        if numeric > 0 && categorical == 0 {
            insights.push("All feature columns are numeric.".to_owned());
        } else if numeric == 0 && categorical > 0 {
            insights.push("No numeric columns; categorical encoding will be needed.".to_owned());
        } else if numeric > 0 {
            insights.push(format!(
                "Mixed column types: {numeric} numeric and {categorical} categorical."
            ));
        }

        let identifiers: Vec<&str> = self
            .categorical_summary
            .iter()
            .filter(|(_, s)| s.cardinality_hint() == CardinalityHint::LikelyIdentifier)
            .map(|(name, _)| name.as_str())
            .collect();
        if !identifiers.is_empty() {
            insights.push(format!("Likely identifier columns: {}.", identifiers.join(", ")));
        }

        insights
    }
}
