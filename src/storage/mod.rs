pub mod csv_store;

pub use csv_store::{write_dataset, write_json, write_table};
