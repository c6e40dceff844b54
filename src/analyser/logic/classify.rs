//! Column type inference.
//!
//! Every non-null cell is parsed into a [`ParsedValue`] and the column as a whole
//! gets exactly one [`ColumnKind`]. Rules are tried in a fixed order and the first
//! rule that accepts *every* non-null value wins:
//!
//! 1. numeric  (native ints/floats, or text that parses as a finite `f64`)
//! 2. boolean  (native bools, or `true/false/yes/no`, case-insensitive)
//! 3. datetime (text matching one of [`DATE_FORMATS`] / [`DATETIME_FORMATS`] or RFC 3339)
//! 4. categorical, the fallback
//!
//! A column with no non-null values is categorical.

use super::dataset::{Dataset, RawValue};
use super::types::ColumnKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const BOOLEAN_TRUE: [&str; 2] = ["true", "yes"];
pub const BOOLEAN_FALSE: [&str; 2] = ["false", "no"];

pub const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
pub const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y",
];

/// A cell after the classifier has settled the column type.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedValue {
    Numeric(f64),
    Date(NaiveDateTime),
    Boolean(bool),
    Text(String),
    Missing,
}

impl ParsedValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// One column with its inferred kind and typed values, aligned with the dataset rows.
#[derive(Clone, Debug)]
pub struct ClassifiedColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<ParsedValue>,
}

impl ClassifiedColumn {
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    /// Non-null numeric values in row order. Empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(ParsedValue::as_f64).collect()
    }
}

/// The whole dataset after classification.
#[derive(Clone, Debug)]
pub struct ClassifiedDataset<'a> {
    pub source: &'a Dataset,
    pub columns: Vec<ClassifiedColumn>,
}

impl ClassifiedDataset<'_> {
    pub fn row_count(&self) -> usize {
        self.source.row_count()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ClassifiedColumn> + '_ {
        self.columns.iter().filter(|c| c.kind == ColumnKind::Numeric)
    }

    pub fn columns_of(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.name.clone())
            .collect()
    }
}

pub fn classify_dataset(dataset: &Dataset) -> ClassifiedDataset<'_> {
    let columns = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let raw: Vec<&RawValue> = dataset.column_values(idx).collect();
            classify_column(name, &raw)
        })
        .collect();

    ClassifiedDataset {
        source: dataset,
        columns,
    }
}

pub fn classify_column(name: &str, raw: &[&RawValue]) -> ClassifiedColumn {
    let kind = infer_kind(raw);
    let values = raw.iter().map(|v| parse_as(kind, v)).collect();
    ClassifiedColumn {
        name: name.to_owned(),
        kind,
        values,
    }
}

pub fn infer_kind(raw: &[&RawValue]) -> ColumnKind {
    let mut present = raw.iter().filter(|v| !v.is_null()).peekable();
    if present.peek().is_none() {
        return ColumnKind::Categorical;
    }

    let present: Vec<&RawValue> = present.copied().collect();
    if present.iter().all(|v| parse_numeric(v).is_some()) {
        ColumnKind::Numeric
    } else if present.iter().all(|v| parse_boolean(v).is_some()) {
        ColumnKind::Boolean
    } else if present.iter().all(|v| parse_datetime(v).is_some()) {
        ColumnKind::Datetime
    } else {
        ColumnKind::Categorical
    }
}

fn parse_as(kind: ColumnKind, raw: &RawValue) -> ParsedValue {
    if raw.is_null() {
        return ParsedValue::Missing;
    }

    let parsed = match kind {
        ColumnKind::Numeric => parse_numeric(raw).map(ParsedValue::Numeric),
        ColumnKind::Boolean => parse_boolean(raw).map(ParsedValue::Boolean),
        ColumnKind::Datetime => parse_datetime(raw).map(ParsedValue::Date),
        ColumnKind::Categorical => None,
    };
    parsed.unwrap_or_else(|| ParsedValue::Text(raw.render()))
}

pub fn parse_numeric(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Int(i) => Some(*i as f64),
        RawValue::Float(f) if f.is_finite() => Some(*f),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            // f64::from_str accepts "inf" and "NaN"; those are not numbers in a CSV sense
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .filter(|_| trimmed.bytes().any(|b| b.is_ascii_digit()))
        }
        _ => None,
    }
}

pub fn parse_boolean(raw: &RawValue) -> Option<bool> {
    match raw {
        RawValue::Bool(b) => Some(*b),
        RawValue::Text(s) => {
            let lowered = s.trim().to_lowercase();
            if BOOLEAN_TRUE.contains(&lowered.as_str()) {
                Some(true)
            } else if BOOLEAN_FALSE.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn parse_datetime(raw: &RawValue) -> Option<NaiveDateTime> {
    let RawValue::Text(s) = raw else {
        return None;
    };
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
