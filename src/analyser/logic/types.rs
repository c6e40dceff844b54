use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Datetime,
    Boolean,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnKind {
    pub const ALL: [Self; 4] = [Self::Numeric, Self::Categorical, Self::Datetime, Self::Boolean];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
        }
    }
}

/// Complete profiling report for one dataset. Built once, never mutated.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct DatasetProfile {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub target_column: Option<String>,
    pub dataset_info: DatasetInfo,
    pub dtypes_info: DtypesInfo,
    pub column_profiles: BTreeMap<String, ColumnProfile>,
    pub missing_analysis: MissingAnalysis,
    pub duplicate_analysis: DuplicateAnalysis,
    pub numeric_summary: NumericSummary,
    pub categorical_summary: BTreeMap<String, CategoricalSummary>,
    pub distribution_analysis: BTreeMap<String, DistributionProfile>,
    pub quality_assessment: QualityAssessment,
}

impl DatasetProfile {
    pub fn shape(&self) -> (usize, usize) {
        (self.dataset_info.rows, self.dataset_info.columns)
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    /// Human readable estimate, e.g. `"12.4KB"`
    pub memory_usage: String,
    pub memory_bytes: usize,
    pub missing_values_total: usize,
    pub duplicate_rows: usize,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct DtypesInfo {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub datetime_columns: Vec<String>,
    pub boolean_columns: Vec<String>,
    pub type_counts: BTreeMap<String, usize>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct ColumnProfile {
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    /// Non-null values
    pub count: usize,
    pub null_count: usize,
    /// 0–100, relative to the dataset row count
    pub null_percentage: f64,
    pub unique_count: usize,
    pub is_high_cardinality: bool,
    pub is_constant: bool,
    pub sample_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericColumnStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorical: Option<CategoricalSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DatetimeColumnStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<BooleanColumnStats>,
}

/// `None` means the statistic could not be computed for this column
/// (too few values, zero variance, or a non-finite intermediate result).
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct NumericColumnStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub outlier_count: usize,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct DatetimeColumnStats {
    pub min: Option<String>,
    pub max: Option<String>,
    pub range_days: Option<f64>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
pub struct BooleanColumnStats {
    pub true_count: usize,
    pub false_count: usize,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct MissingAnalysis {
    pub total_missing: usize,
    /// Share of all cells that are missing, 0–100
    pub missing_percentage: f64,
    pub missing_by_column: BTreeMap<String, usize>,
    pub missing_percentage_by_column: BTreeMap<String, f64>,
    pub columns_with_missing: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct DuplicateAnalysis {
    pub duplicate_rows: usize,
    pub unique_rows: usize,
    pub duplicate_percentage: f64,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct NumericSummary {
    pub describe: BTreeMap<String, DescribeStats>,
    pub correlation_matrix: CorrelationMatrix,
    /// Column pairs with |r| above the configured threshold, keyed `"a_b"`
    pub significant_correlations: BTreeMap<String, f64>,
    pub skewness: BTreeMap<String, Option<f64>>,
    pub kurtosis: BTreeMap<String, Option<f64>>,
    pub outliers: BTreeMap<String, OutlierSummary>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct DescribeStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q1: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct OutlierSummary {
    pub count: usize,
    pub percentage: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

/// Square, symmetric Pearson matrix over the numeric columns, in column order.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.data.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct CategoricalSummary {
    pub unique_count: usize,
    /// unique_count / rows × 100
    pub unique_percentage: f64,
    /// Most frequent values, descending; ties keep first-seen order
    pub top_values: Vec<ValueCount>,
    pub mode: Option<String>,
    pub mode_frequency: usize,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct DistributionProfile {
    pub mean: Option<f64>,
    pub median: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub quartiles: Quartiles,
    pub histogram: Histogram,
    pub normality: NormalityTest,
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// `bin_edges.len() == counts.len() + 1`; the last bin is closed on the right.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug, Default)]
pub struct Histogram {
    pub bin_edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum NormalityStatus {
    Computed,
    InsufficientData,
    TooManySamples,
    ZeroRange,
    Failed,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct NormalityTest {
    pub test: String,
    pub status: NormalityStatus,
    pub statistic: Option<f64>,
    /// Within [0, 1] when present
    pub p_value: Option<f64>,
    pub is_normal: bool,
}

impl NormalityTest {
    pub const SHAPIRO_WILK: &'static str = "shapiro_wilk";

    pub fn unavailable(status: NormalityStatus) -> Self {
        Self {
            test: Self::SHAPIRO_WILK.to_owned(),
            status,
            statistic: None,
            p_value: None,
            is_normal: false,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityGrade {
    /// ≥ 90 excellent, ≥ 70 good, ≥ 50 fair, otherwise poor.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 70.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct QualityAssessment {
    pub completeness: f64,
    pub uniqueness: f64,
    pub consistency: f64,
    pub validity: f64,
    pub overall_quality: f64,
    pub quality_grade: QualityGrade,
    pub empty_columns: Vec<String>,
    pub constant_columns: Vec<String>,
    pub potential_leakage: Vec<String>,
    pub recommendations: Vec<String>,
}
