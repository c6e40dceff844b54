use super::dataset::{Dataset, RawValue};
use crate::error::Result;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Cell contents read as missing, compared after trimming.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na_token(cell: &str) -> bool {
    NA_TOKENS.contains(&cell.trim())
}

/// Loads a delimited text file with a header row. `.tsv` files are tab separated.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let delimiter = if ext == "tsv" { b'\t' } else { b',' };

    let file = std::fs::File::open(path)?;
    let dataset = read_delimited(file, delimiter)?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Loaded dataset"
    );
    Ok(dataset)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    read_delimited(reader, b',')
}

/// Every cell becomes text or [`RawValue::Null`]; typing is left to the classifier.
/// Short rows are padded with nulls and long rows truncated to the header width.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.len() != width {
            ragged += 1;
        }
        let mut row: Vec<RawValue> = record
            .iter()
            .take(width)
            .map(|cell| {
                if is_na_token(cell) {
                    RawValue::Null
                } else {
                    RawValue::Text(cell.to_owned())
                }
            })
            .collect();
        row.resize(width, RawValue::Null);
        rows.push(row);
    }

    if ragged > 0 {
        tracing::warn!(ragged, expected = width, "Rows with a different field count than the header were padded or truncated");
    }

    Dataset::new(columns, rows)
}

pub fn write_json<T: Serialize>(value: &T, path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let content = to_json(value, pretty)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
