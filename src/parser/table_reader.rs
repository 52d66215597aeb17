// CSV parsing with UTF-8 -> GBK fallback
use crate::model::{Table, TableError};
use crate::parser::XlsxTableReader;
use encoding_rs::GBK;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub trait TableReader {
    fn read(&self, path: &Path) -> Result<Table, TableError>;
}

pub struct CsvTableReader;

impl CsvTableReader {
    pub fn new() -> Self {
        Self
    }
}

impl TableReader for CsvTableReader {
    fn read(&self, path: &Path) -> Result<Table, TableError> {
        if !path.exists() {
            return Err(TableError::MissingInput(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let text = decode(&bytes, path)?;
        let table = parse_table(&text)?;
        debug!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }
}

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// Picks the spreadsheet or CSV reader from the file extension.
pub struct FileTableReader {
    csv: CsvTableReader,
    xlsx: XlsxTableReader,
}

impl FileTableReader {
    pub fn new() -> Self {
        Self {
            csv: CsvTableReader::new(),
            xlsx: XlsxTableReader::new(),
        }
    }

    pub fn is_spreadsheet(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }
}

impl TableReader for FileTableReader {
    fn read(&self, path: &Path) -> Result<Table, TableError> {
        if Self::is_spreadsheet(path) {
            self.xlsx.read(path)
        } else {
            self.csv.read(path)
        }
    }
}

/// Decodes file bytes as UTF-8 (BOM stripped), falling back to GBK.
pub fn decode(bytes: &[u8], path: &Path) -> Result<String, TableError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            warn!("UTF-8 failed for {}, trying GBK...", path.display());
            GBK.decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned())
                .ok_or_else(|| TableError::DecodeFailure(path.to_path_buf()))
        }
    }
}

/// Parses decoded CSV text. Rows whose width differs from the header are skipped.
pub fn parse_table(text: &str) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(e) => {
                debug!("Skipping malformed row: {}", e);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!("Skipped {} malformed rows", skipped);
    }

    Ok(Table::new(headers, rows))
}
