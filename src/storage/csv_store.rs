use crate::model::{CATEGORY_COLUMN, MergedDataset, STRATEGY_COLUMN, StorageError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes a UTF-8 CSV with byte-order mark. The file is only created once the
/// whole content has been encoded.
pub fn write_table(
    path: &Path,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<(), StorageError> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }

    ensure_parent(path)?;
    fs::write(path, buf)?;
    info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Writes the merged records: source columns followed by category and strategy.
pub fn write_dataset(path: &Path, dataset: &MergedDataset) -> Result<(), StorageError> {
    let mut headers = dataset.columns.clone();
    headers.push(CATEGORY_COLUMN.to_string());
    headers.push(STRATEGY_COLUMN.to_string());

    let rows: Vec<Vec<String>> = dataset
        .records
        .iter()
        .map(|record| {
            let mut row = record.fields.clone();
            row.push(record.category.clone());
            row.push(record.strategy.code().to_string());
            row
        })
        .collect();

    write_table(path, &headers, &rows)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value)?;
    ensure_parent(path)?;
    fs::write(path, content)?;
    info!("Saved summary to {}", path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
