// Core structs: AdRecord, Strategy, Table, SurveyResponse
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Columns appended to the merged dataset.
pub const CATEGORY_COLUMN: &str = "Category";
pub const STRATEGY_COLUMN: &str = "Strategy";

/// Persuasive appeal assigned to an advertisement headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strategy {
    Unclassified,
    FearAppeal,
    ScientificAuthority,
    VisionDesire,
}

impl Strategy {
    /// Scored strategies in tie-break order: the first one holding the maximum wins.
    pub const PRIORITY: [Strategy; 3] = [
        Strategy::FearAppeal,
        Strategy::VisionDesire,
        Strategy::ScientificAuthority,
    ];

    /// Label written to the merged dataset.
    pub fn code(&self) -> &'static str {
        match self {
            Strategy::Unclassified => "0_Unclassified",
            Strategy::FearAppeal => "1_Fear_Appeal",
            Strategy::ScientificAuthority => "2_Scientific_Authority",
            Strategy::VisionDesire => "3_Vision_Desire",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One advertisement of the merged dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct AdRecord {
    pub headline: Option<String>,
    pub category: String,
    pub strategy: Strategy,
    /// Source cells aligned with `MergedDataset::columns`.
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedDataset {
    pub columns: Vec<String>,
    pub records: Vec<AdRecord>,
}

/// A decoded tabular file: header row plus well-formed data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Cell value, `None` when the cell is empty or out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Cell value, `None` only when the cell is empty or out of range.
    pub fn raw_cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// One category's rows as handed to the aggregator.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub category: String,
    pub table: Table,
}

/// A respondent's cleaned answers, values aligned with the cleaner's variable list.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponse {
    pub values: Vec<Option<f64>>,
    pub passed_check: bool,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),
    #[error("could not decode {0} as UTF-8 or GBK")]
    DecodeFailure(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no source tables could be loaded")]
    NoSources,
    #[error("no column found for '{0}'")]
    SchemaMismatch(String),
    #[error("{0}: no rows left, nothing written")]
    EmptyResult(&'static str),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
