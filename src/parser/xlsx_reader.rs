// Spreadsheet parsing: first worksheet, first row as header
use crate::model::{Table, TableError};
use crate::parser::TableReader;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use tracing::{debug, warn};

pub struct XlsxTableReader;

impl XlsxTableReader {
    pub fn new() -> Self {
        Self
    }
}

impl TableReader for XlsxTableReader {
    fn read(&self, path: &Path) -> Result<Table, TableError> {
        if !path.exists() {
            return Err(TableError::MissingInput(path.to_path_buf()));
        }
        let mut workbook = open_workbook_auto(path)?;
        let Some(range) = workbook.worksheet_range_at(0) else {
            warn!("{} has no worksheet", path.display());
            return Ok(Table::default());
        };
        let range = range?;

        let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
        let headers = rows.next().unwrap_or_default();
        let table = Table::new(headers, rows.collect());
        debug!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
