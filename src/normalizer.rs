use crate::config::ChartConfig;
use std::collections::HashMap;

/// Index of the first header equal to one of `aliases`, tried in alias order.
pub fn bind_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

/// Index of the first header containing `keyword`.
pub fn find_column_containing(headers: &[String], keyword: &str) -> Option<usize> {
    headers.iter().position(|h| h.contains(keyword))
}

/// Translates native category/strategy labels to the English chart labels.
/// Unknown labels are returned unchanged.
pub struct LabelNormalizer {
    categories: HashMap<String, String>,
    strategies: HashMap<String, String>,
}

impl LabelNormalizer {
    pub fn new(categories: HashMap<String, String>, strategies: HashMap<String, String>) -> Self {
        Self { categories, strategies }
    }

    pub fn from_config(cfg: &ChartConfig) -> Self {
        Self::new(cfg.category_labels.clone(), cfg.strategy_labels.clone())
    }

    pub fn category(&self, raw: &str) -> String {
        translate(&self.categories, raw)
    }

    pub fn strategy(&self, raw: &str) -> String {
        translate(&self.strategies, raw)
    }

    /// True when `raw` has no entry in the category map and is not already a target label.
    pub fn is_unknown_category(&self, raw: &str) -> bool {
        is_unknown(&self.categories, raw)
    }

    pub fn is_unknown_strategy(&self, raw: &str) -> bool {
        is_unknown(&self.strategies, raw)
    }
}

fn translate(map: &HashMap<String, String>, raw: &str) -> String {
    let key = raw.trim();
    map.get(key).cloned().unwrap_or_else(|| key.to_string())
}

fn is_unknown(map: &HashMap<String, String>, raw: &str) -> bool {
    let key = raw.trim();
    !map.contains_key(key) && !map.values().any(|v| v == key)
}
