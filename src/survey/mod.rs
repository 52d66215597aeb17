// Survey cleaning: categorical answers -> numeric model input
pub mod cleaner;

pub use cleaner::clean_survey;
