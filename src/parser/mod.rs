// Tabular input parsing
pub mod table_reader;
pub mod xlsx_reader;

pub use table_reader::{CsvTableReader, FileTableReader, TableReader};
pub use xlsx_reader::XlsxTableReader;
