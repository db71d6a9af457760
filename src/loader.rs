use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;
use walkdir::WalkDir;

use crate::models::RawRecord;

const DATA_EXTENSIONS: &[&str] = &["json"];

/// Object member that wraps the record list in some export formats.
const WRAPPER_FIELD: &str = "history";

/// Check if a path has a recognized data file extension.
fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| DATA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively scan a directory tree for data files, deduplicated and
/// sorted by path so runs over the same input are reproducible.
pub fn scan_data_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_data_file(path))
        .collect();
    files.sort();
    files.dedup();
    files
}

/// Extract the record sequence from a decoded payload. A payload is either
/// a bare list of records or an object wrapping the list under `history`;
/// anything else yields no records.
fn unwrap_payload(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(WRAPPER_FIELD) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Load every record from every data file under `root`, concatenated in
/// file-sorted order. Files that fail to read or decode are skipped, as are
/// non-object list elements; only a directory with no data files at all is
/// an error.
pub fn load_records(root: &Path) -> Result<Vec<RawRecord>> {
    let files = scan_data_files(root);
    if files.is_empty() {
        anyhow::bail!("No .json files found under {}", root.display());
    }

    let mut records = Vec::new();
    for path in &files {
        let Ok(data) = std::fs::read_to_string(path) else {
            continue;
        };
        let Ok(payload) = serde_json::from_str::<Value>(&data) else {
            continue;
        };
        for element in unwrap_payload(payload) {
            if let Value::Object(record) = element {
                records.push(record);
            }
        }
    }
    Ok(records)
}
