use crate::config::ChartConfig;
use crate::model::{PipelineError, Table};
use crate::normalizer::{LabelNormalizer, bind_column};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Strategy shares of one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: String,
    /// Classified records of this category, including strategies not charted.
    pub total: usize,
    /// Aligned with `StrategyDistribution::strategies`.
    pub counts: Vec<usize>,
    pub percentages: Vec<f64>,
}

/// Input of the stacked bar chart: category x strategy percentages.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyDistribution {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub strategies: Vec<String>,
    pub categories: Vec<CategoryShare>,
}

impl StrategyDistribution {
    pub fn headers(&self) -> Vec<String> {
        std::iter::once("Category".to_string())
            .chain(self.strategies.iter().cloned())
            .collect()
    }

    /// One row per category with percentages rounded to two decimals.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.categories
            .iter()
            .map(|share| {
                std::iter::once(share.category.clone())
                    .chain(share.percentages.iter().map(|p| format!("{:.2}", p)))
                    .collect()
            })
            .collect()
    }
}

/// Cross-tabulates translated category and strategy labels of the merged dataset.
/// Unclassified rows and rows missing either label are left out.
pub fn build_distribution(
    table: &Table,
    cfg: &ChartConfig,
    normalizer: &LabelNormalizer,
) -> Result<StrategyDistribution, PipelineError> {
    let category_col = bind_column(&table.headers, &cfg.category_columns)
        .ok_or_else(|| PipelineError::SchemaMismatch(cfg.category_columns.join(" | ")))?;
    let strategy_col = bind_column(&table.headers, &cfg.strategy_columns)
        .ok_or_else(|| PipelineError::SchemaMismatch(cfg.strategy_columns.join(" | ")))?;

    let mut pivot: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut passthrough: BTreeSet<String> = BTreeSet::new();
    let mut total_records = 0usize;

    for i in 0..table.len() {
        let (Some(category), Some(strategy)) =
            (table.cell(i, category_col), table.cell(i, strategy_col))
        else {
            continue;
        };
        if cfg.unclassified_labels.iter().any(|l| l == strategy.trim()) {
            continue;
        }

        if normalizer.is_unknown_category(category) {
            passthrough.insert(category.trim().to_string());
        }
        if normalizer.is_unknown_strategy(strategy) {
            passthrough.insert(strategy.trim().to_string());
        }

        *pivot
            .entry(normalizer.category(category))
            .or_default()
            .entry(normalizer.strategy(strategy))
            .or_default() += 1;
        total_records += 1;
    }

    if !passthrough.is_empty() {
        warn!("Labels without translation passed through: {:?}", passthrough);
    }
    if total_records == 0 {
        return Err(PipelineError::EmptyResult("chart-data"));
    }

    let strategies: Vec<String> = cfg
        .strategy_order
        .iter()
        .filter(|s| pivot.values().any(|row| row.contains_key(*s)))
        .cloned()
        .collect();

    let categories = pivot
        .into_iter()
        .map(|(category, row)| {
            let total: usize = row.values().sum();
            let counts: Vec<usize> = strategies
                .iter()
                .map(|s| row.get(s).copied().unwrap_or(0))
                .collect();
            let percentages = counts
                .iter()
                .map(|&c| c as f64 * 100.0 / total as f64)
                .collect();
            CategoryShare { category, total, counts, percentages }
        })
        .collect::<Vec<_>>();

    info!(
        "Distribution over {} records in {} categories",
        total_records,
        categories.len()
    );

    Ok(StrategyDistribution {
        generated_at: Utc::now(),
        total_records,
        strategies,
        categories,
    })
}
