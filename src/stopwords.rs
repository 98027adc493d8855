use std::collections::HashSet;

use stop_words::LANGUAGE;

/// Mail headers that show up as words once the message body is flattened.
pub const HEADER_WORDS: [&str; 5] = ["subject", "from", "to", "cc", "bcc"];

/// Immutable set of words dropped during feature extraction.
///
/// Build it completely before handing it to a
/// [`FeatureExtractor`](crate::features::FeatureExtractor); there is no way to
/// change it afterwards.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopWords {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// NLTK English stopwords plus [`HEADER_WORDS`].
    pub fn english() -> Self {
        Self::new(
            stop_words::get(LANGUAGE::English)
                .iter()
                .map(|word| word.to_string()),
        )
        .with_words(HEADER_WORDS)
    }

    pub fn with_words<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
