use crate::config::KeywordConfig;
use crate::model::Strategy;

/// Trait defining the interface for a headline classifier.
pub trait Classifier {
    /// `None` stands for an absent or non-text cell.
    fn classify(&self, text: Option<&str>) -> Strategy;
}

/// Immutable keyword sets for the scored strategies.
#[derive(Debug, Clone)]
pub struct KeywordDictionary {
    entries: Vec<(Strategy, Vec<String>)>,
}

impl KeywordDictionary {
    /// Builds the dictionary, dropping empty and repeated keywords within a set.
    pub fn new(entries: Vec<(Strategy, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|(strategy, _)| *strategy != Strategy::Unclassified)
            .map(|(strategy, keywords)| {
                let mut unique: Vec<String> = Vec::with_capacity(keywords.len());
                for kw in keywords {
                    if !kw.is_empty() && !unique.contains(&kw) {
                        unique.push(kw);
                    }
                }
                (strategy, unique)
            })
            .collect();
        Self { entries }
    }

    pub fn keywords(&self, strategy: Strategy) -> &[String] {
        self.entries
            .iter()
            .find(|(s, _)| *s == strategy)
            .map(|(_, kws)| kws.as_slice())
            .unwrap_or(&[])
    }
}

impl From<&KeywordConfig> for KeywordDictionary {
    fn from(cfg: &KeywordConfig) -> Self {
        Self::new(
            Strategy::PRIORITY
                .iter()
                .map(|&s| (s, cfg.keywords_for(s).to_vec()))
                .collect(),
        )
    }
}

impl Default for KeywordDictionary {
    fn default() -> Self {
        Self::from(&KeywordConfig::default())
    }
}

/// Scores text against each keyword set and resolves ties by `Strategy::PRIORITY`.
pub struct KeywordClassifier {
    dictionary: KeywordDictionary,
}

impl KeywordClassifier {
    pub fn new(dictionary: KeywordDictionary) -> Self {
        Self { dictionary }
    }

    /// Number of distinct keywords of `strategy` occurring in `text`.
    pub fn score(&self, text: &str, strategy: Strategy) -> usize {
        self.dictionary
            .keywords(strategy)
            .iter()
            .filter(|kw| text.contains(kw.as_str()))
            .count()
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: Option<&str>) -> Strategy {
        let Some(text) = text else {
            return Strategy::Unclassified;
        };

        let scores: Vec<(Strategy, usize)> = Strategy::PRIORITY
            .iter()
            .map(|&s| (s, self.score(text, s)))
            .collect();

        let max_score = scores.iter().map(|(_, score)| *score).max().unwrap_or(0);
        if max_score == 0 {
            return Strategy::Unclassified;
        }

        scores
            .into_iter()
            .find(|(_, score)| *score == max_score)
            .map(|(strategy, _)| strategy)
            .unwrap_or(Strategy::Unclassified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(KeywordDictionary::default())
    }

    #[test]
    fn empty_and_absent_text_is_unclassified() {
        let c = classifier();
        assert_eq!(c.classify(Some("")), Strategy::Unclassified);
        assert_eq!(c.classify(None), Strategy::Unclassified);
        assert_eq!(c.classify(Some("上海南京路")), Strategy::Unclassified);
    }

    #[test]
    fn single_category_match() {
        let c = classifier();
        assert_eq!(c.classify(Some("摩登女士")), Strategy::VisionDesire);
        assert_eq!(c.classify(Some("德国化学")), Strategy::ScientificAuthority);
        assert_eq!(c.classify(Some("失业之惨")), Strategy::FearAppeal);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let c = classifier();
        assert_eq!(c.score("苦苦苦", Strategy::FearAppeal), 1);
        // one fear keyword repeated vs two distinct vision keywords
        assert_eq!(c.classify(Some("苦苦苦摩登时髦")), Strategy::VisionDesire);
    }

    #[test]
    fn fear_wins_tie_with_vision() {
        assert_eq!(classifier().classify(Some("丑变摩登")), Strategy::FearAppeal);
    }

    #[test]
    fn vision_wins_tie_with_science() {
        assert_eq!(classifier().classify(Some("博士之摩登")), Strategy::VisionDesire);
    }

    #[test]
    fn three_way_tie_goes_to_fear() {
        assert_eq!(classifier().classify(Some("憔悴 博士 摩登")), Strategy::FearAppeal);
    }

    #[test]
    fn higher_score_beats_priority() {
        assert_eq!(
            classifier().classify(Some("憔悴 德国博士研究")),
            Strategy::ScientificAuthority
        );
    }

    #[test]
    fn classification_is_repeatable() {
        let c = classifier();
        let text = Some("韦廉士红色补丸 专治贫血 面色枯黄");
        assert_eq!(c.classify(text), c.classify(text));
    }

    #[test]
    fn dictionary_drops_duplicates_and_unclassified() {
        let dict = KeywordDictionary::new(vec![
            (Strategy::FearAppeal, vec!["苦".into(), "苦".into(), "".into()]),
            (Strategy::Unclassified, vec!["x".into()]),
        ]);
        assert_eq!(dict.keywords(Strategy::FearAppeal), ["苦".to_string()]);
        assert!(dict.keywords(Strategy::Unclassified).is_empty());
        assert!(dict.keywords(Strategy::VisionDesire).is_empty());
    }
}
