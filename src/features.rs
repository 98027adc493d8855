use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};

use crate::stopwords::StopWords;

/// Bag of words for a single message: stem -> occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    counts: HashMap<String, usize>,
}

impl FeatureSet {
    fn insert(&mut self, token: String) {
        *self.counts.entry(token).or_default() += 1;
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

pub struct FeatureExtractor {
    stemmer: Stemmer,
    stopwords: StopWords,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        FeatureExtractor::new(StopWords::english())
    }
}

impl FeatureExtractor {
    pub fn new(stopwords: StopWords) -> Self {
        FeatureExtractor {
            stemmer: Stemmer::create(Algorithm::English),
            stopwords,
        }
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    /// Splits `text` on whitespace, lowercases and stems every word, and
    /// counts the stems that survive [`FeatureExtractor::is_feature`].
    pub fn extract(&self, text: &str) -> FeatureSet {
        let text = text.to_lowercase();

        let mut features = FeatureSet::default();
        for word in text.split_whitespace() {
            let stem = self.stemmer.stem(word);
            if self.is_feature(&stem) {
                features.insert(stem.into_owned());
            }
        }
        features
    }

    fn is_feature(&self, stem: &str) -> bool {
        !stem.is_empty()
            && !stem.chars().all(|c| c.is_ascii_punctuation())
            && stem.chars().all(char::is_alphabetic)
            && !self.stopwords.contains(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_headers_stopwords_and_punctuation() {
        let extractor = FeatureExtractor::default();
        let features = extractor.extract("Subject: the FREE money !!!");

        assert_eq!(features.len(), 2);
        assert_eq!(features.count("free"), 1);
        assert_eq!(features.count("money"), 1);
        assert!(!features.contains("subject"));
        assert!(!features.contains("the"));
    }

    #[test]
    fn counts_repeated_stems() {
        let extractor = FeatureExtractor::default();
        let features = extractor.extract("Money money MONEY offers offer");

        assert_eq!(features.count("money"), 3);
        assert_eq!(features.count("offer"), 2);
    }

    #[test]
    fn stems_words() {
        let extractor = FeatureExtractor::default();
        let features = extractor.extract("running meetings");

        assert!(features.contains("run"));
        assert!(features.contains("meet"));
    }

    #[test]
    fn rejects_non_alphabetic_tokens() {
        let extractor = FeatureExtractor::default();
        let features = extractor.extract("win! 100% abc123 e-mail $$$ - cash");

        assert_eq!(features.tokens().collect::<Vec<_>>(), vec!["cash"]);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let extractor = FeatureExtractor::default();

        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \t ").is_empty());
        assert!(extractor.extract("the to from ... !!!").is_empty());
    }

    #[test]
    fn custom_stopwords_are_honoured() {
        let extractor = FeatureExtractor::new(StopWords::new(["cash"]));
        assert_eq!(extractor.stopwords().len(), 1);
        let features = extractor.extract("cash the gold");

        assert!(!features.contains("cash"));
        assert!(features.contains("the"));
        assert!(features.contains("gold"));
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = FeatureExtractor::default();
        let text = "Limited offer: claim your free prize today, winners announced";

        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
