// Word-cloud input: cleaned headline text per category
use crate::config::ChartConfig;
use crate::model::{PipelineError, StorageError, Table};
use crate::normalizer::{LabelNormalizer, bind_column};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Keeps only CJK Unified Ideographs (U+4E00..=U+9FA5).
pub fn han_only(text: &str) -> String {
    text.chars()
        .filter(|c| ('\u{4e00}'..='\u{9fa5}').contains(c))
        .collect()
}

/// Removes every multi-character stop-word, longest first. Single-character
/// entries are ignored.
pub struct StopwordFilter {
    words: Vec<String>,
}

impl StopwordFilter {
    pub fn new(words: &[String]) -> Self {
        let mut words: Vec<String> = words
            .iter()
            .filter(|w| w.chars().count() > 1)
            .cloned()
            .collect();
        words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
        words.dedup();
        Self { words }
    }

    pub fn apply(&self, text: &str) -> String {
        self.words
            .iter()
            .fold(text.to_string(), |acc, word| acc.replace(word.as_str(), ""))
    }
}

/// Groups cleaned headlines by translated category. Rows without text are skipped.
pub fn collect_corpus(
    table: &Table,
    cfg: &ChartConfig,
    normalizer: &LabelNormalizer,
) -> Result<BTreeMap<String, Vec<String>>, PipelineError> {
    let category_col = bind_column(&table.headers, &cfg.category_columns)
        .ok_or_else(|| PipelineError::SchemaMismatch(cfg.category_columns.join(" | ")))?;
    let text_col = bind_column(&table.headers, &cfg.text_columns)
        .ok_or_else(|| PipelineError::SchemaMismatch(cfg.text_columns.join(" | ")))?;

    let stopwords = StopwordFilter::new(&cfg.stopwords);
    let mut corpus: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for i in 0..table.len() {
        let Some(category) = table.cell(i, category_col) else {
            continue;
        };
        let lines = corpus.entry(normalizer.category(category)).or_default();
        if let Some(text) = table.cell(i, text_col) {
            let cleaned = stopwords.apply(&han_only(text));
            if !cleaned.is_empty() {
                lines.push(cleaned);
            }
        }
    }
    Ok(corpus)
}

/// Writes `wordcloud_<category>.txt` for every category that kept some text.
pub fn write_corpus(
    dir: &Path,
    corpus: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<PathBuf>, StorageError> {
    let mut written = Vec::new();
    for (category, lines) in corpus {
        if lines.is_empty() {
            warn!("No valid words found for {} after cleaning.", category);
            continue;
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("wordcloud_{}.txt", file_safe(category)));
        fs::write(&path, lines.join("\n") + "\n")?;
        info!("Saved: {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_everything_but_han() {
        assert_eq!(han_only("Dr. 韦廉士红色补丸！(1930)"), "韦廉士红色补丸");
        assert_eq!(han_only("ABC 123"), "");
    }

    #[test]
    fn stopwords_are_removed_longest_first() {
        let filter = StopwordFilter::new(&[
            "上海".to_string(),
            "上海市".to_string(),
            "广告".to_string(),
            "的".to_string(),
        ]);
        assert_eq!(filter.apply("上海市广告雅霜的美白"), "雅霜的美白");
        assert_eq!(filter.apply("上海雅霜"), "雅霜");
    }

    #[test]
    fn headline_made_of_stopwords_is_dropped() {
        let cfg = ChartConfig::default();
        let table = Table::new(
            vec!["完整标题".into(), "Category".into()],
            vec![
                vec!["上海申报广告".into(), "Beauty".into()],
                vec!["上海 摩登 雅霜".into(), "Beauty".into()],
            ],
        );
        let corpus = collect_corpus(&table, &cfg, &LabelNormalizer::from_config(&cfg)).unwrap();
        assert_eq!(corpus["Beauty"], vec!["摩登"]);
    }

    #[test]
    fn corpus_per_category() {
        let mut cfg = ChartConfig::default();
        cfg.stopwords.clear();
        let table = Table::new(
            vec!["完整标题".into(), "关键词".into()],
            vec![
                vec!["雅霜 美容".into(), "美容".into()],
                vec!["".into(), "补脑".into()],
                vec!["Tonic".into(), "神经衰弱".into()],
                vec!["函授学校".into(), "函授".into()],
            ],
        );
        let corpus = collect_corpus(&table, &cfg, &LabelNormalizer::from_config(&cfg)).unwrap();
        assert_eq!(corpus["Beauty"], vec!["雅霜美容"]);
        assert!(corpus["Health"].is_empty());

        let dir = tempfile::tempdir().unwrap();
        let written = write_corpus(dir.path(), &corpus).unwrap();
        assert_eq!(written.len(), 2);
        let beauty = fs::read_to_string(dir.path().join("wordcloud_Beauty.txt")).unwrap();
        assert_eq!(beauty, "雅霜美容\n");
        assert!(!dir.path().join("wordcloud_Health.txt").exists());
    }

    #[test]
    fn slashes_never_reach_file_names() {
        assert_eq!(file_safe("Vision/Desire"), "Vision_Desire");
    }
}
