// Analyzer module: headline classification, dataset merging and strategy shares.

pub mod aggregate;
pub mod classifier;
pub mod distribution;

// Re-export the main entry points for ease of use.
pub use aggregate::{aggregate, load_sources};
pub use classifier::{KeywordClassifier, KeywordDictionary};
pub use distribution::build_distribution;
