use crate::analyser::logic::dataset::RawValue;
use crate::analyser::logic::io::{is_na_token, load_csv, read_csv, read_delimited, write_json};
use crate::analyser::logic::profile_dataset;
use crate::error::{InputError, ProfileError};
use anyhow::Result;
use std::io::Write as _;

#[test]
fn test_read_csv_maps_na_tokens_to_null() -> Result<()> {
    let data = "id,name,score\n1,alice,3.5\n2,NA,\n3,bob,null\n";
    let dataset = read_csv(data.as_bytes())?;

    assert_eq!(dataset.columns(), ["id", "name", "score"]);
    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.rows()[1][1], RawValue::Null);
    assert_eq!(dataset.rows()[1][2], RawValue::Null);
    assert_eq!(dataset.rows()[2][2], RawValue::Null);
    assert_eq!(dataset.rows()[0][1], RawValue::Text("alice".to_owned()));
    Ok(())
}

#[test]
fn test_ragged_rows_are_padded_and_truncated() -> Result<()> {
    let data = "a,b,c\n1,2\n4,5,6,7\n";
    let dataset = read_csv(data.as_bytes())?;

    assert_eq!(dataset.rows()[0], vec![RawValue::from("1"), RawValue::from("2"), RawValue::Null]);
    assert_eq!(dataset.rows()[1].len(), 3);
    Ok(())
}

#[test]
fn test_duplicate_header_is_rejected() {
    let err = read_csv("a,a\n1,2\n".as_bytes()).unwrap_err();
    assert!(matches!(err, ProfileError::Input(InputError::DuplicateColumn(ref c)) if c == "a"));
}

#[test]
fn test_header_only_file_profiles_as_empty() -> Result<()> {
    let dataset = read_csv("a,b\n".as_bytes())?;
    assert_eq!(dataset.row_count(), 0);
    let err = profile_dataset(&dataset, "empty").unwrap_err();
    assert!(matches!(err, ProfileError::Input(InputError::EmptyDataset)));
    Ok(())
}

#[test]
fn test_tab_separated() -> Result<()> {
    let dataset = read_delimited("x\ty\n1\t2\n".as_bytes(), b'\t')?;
    assert_eq!(dataset.columns(), ["x", "y"]);
    Ok(())
}

#[test]
fn test_load_csv_from_disk_and_write_report() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("input.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "x,y")?;
    for i in 0..10 {
        writeln!(file, "{i},{}", i * 2)?;
    }
    drop(file);

    let dataset = load_csv(&path)?;
    let profile = profile_dataset(&dataset, "disk")?;

    let out = dir.path().join("reports").join("profile.json");
    write_json(&profile, &out, true)?;
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(written["dataset_info"]["rows"], 10);
    assert_eq!(written["session_id"], "disk");
    Ok(())
}

#[test]
fn test_na_tokens() {
    for token in ["", " ", "NA", "N/A", "nan", "NULL", "None", "#N/A", "<NA>"] {
        assert!(is_na_token(token), "{token:?} should be missing");
    }
    for token in ["0", "no", "-", "none"] {
        assert!(!is_na_token(token), "{token:?} should be a value");
    }
}
