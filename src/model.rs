use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::features::{FeatureExtractor, FeatureSet};

/// Posterior above which a message is labelled spam.
pub const THRESHOLD: f64 = 0.5;

/// Laplace-smoothed presence probabilities of one token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordProbability {
    /// P(token present | spam)
    pub spam: f64,
    /// P(token present | ham)
    pub ham: f64,
}

/// Number of non-empty messages each class contributed to training.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingCounts {
    pub spam: usize,
    pub ham: usize,
}

impl TrainingCounts {
    pub fn total(&self) -> usize {
        self.spam + self.ham
    }

    pub fn prior_spam(&self) -> f64 {
        (self.spam + 1) as f64 / (self.total() + 2) as f64
    }

    pub fn prior_ham(&self) -> f64 {
        (self.ham + 1) as f64 / (self.total() + 2) as f64
    }
}

/// Word statistics and class sizes produced by one training pass.
///
/// The model keeps the extractor it was trained with so that inference always
/// tokenizes and stems exactly like training did. It is immutable; retraining
/// builds a new model.
pub struct TrainedModel {
    extractor: Arc<FeatureExtractor>,
    words: BTreeMap<String, WordProbability>,
    counts: TrainingCounts,
}

impl TrainedModel {
    /// Trains with the default English extractor.
    pub fn train<S, H>(spam: &[S], ham: &[H]) -> Result<Self>
    where
        S: AsRef<str> + Sync,
        H: AsRef<str> + Sync,
    {
        Self::fit(Arc::new(FeatureExtractor::default()), spam, ham)
    }

    pub fn fit<S, H>(extractor: Arc<FeatureExtractor>, spam: &[S], ham: &[H]) -> Result<Self>
    where
        S: AsRef<str> + Sync,
        H: AsRef<str> + Sync,
    {
        let spam_sets = extract_all(&extractor, spam);
        let ham_sets = extract_all(&extractor, ham);

        let counts = TrainingCounts {
            spam: spam_sets.len(),
            ham: ham_sets.len(),
        };
        debug!(
            "Discarded {} spam and {} ham messages without features",
            spam.len() - counts.spam,
            ham.len() - counts.ham
        );

        if counts.total() == 0 {
            return Err(Error::InsufficientTrainingData);
        }

        let (spam_freq, ham_freq) = rayon::join(
            || document_frequency(&spam_sets),
            || document_frequency(&ham_sets),
        );

        let mut words = BTreeMap::new();
        for token in spam_freq.keys().chain(ham_freq.keys()) {
            if words.contains_key(*token) {
                continue;
            }
            let spam_hits = spam_freq.get(token).copied().unwrap_or(0);
            let ham_hits = ham_freq.get(token).copied().unwrap_or(0);
            words.insert(
                token.to_string(),
                WordProbability {
                    spam: smoothed(spam_hits, counts.spam),
                    ham: smoothed(ham_hits, counts.ham),
                },
            );
        }

        info!(
            spam = counts.spam,
            ham = counts.ham,
            vocabulary = words.len(),
            "Model trained"
        );

        Ok(TrainedModel {
            extractor,
            words,
            counts,
        })
    }

    pub fn counts(&self) -> TrainingCounts {
        self.counts
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn vocabulary_len(&self) -> usize {
        self.words.len()
    }

    pub fn word(&self, token: &str) -> Option<&WordProbability> {
        self.words.get(token)
    }

    /// Trained vocabulary in token order.
    pub fn words(&self) -> impl Iterator<Item = (&str, &WordProbability)> {
        self.words.iter().map(|(token, prob)| (token.as_str(), prob))
    }

    /// Posterior probability that `text` is spam.
    ///
    /// Every word of the vocabulary contributes: present words with
    /// P(word | class), absent words with 1 - P(word | class). Words unknown
    /// to the model are ignored. Likelihoods are accumulated as sums of logs.
    pub fn classify(&self, text: &str) -> f64 {
        let features = self.extractor.extract(text);
        self.posterior(&features)
    }

    pub fn is_spam(&self, text: &str) -> bool {
        self.classify(text) > THRESHOLD
    }

    fn posterior(&self, features: &FeatureSet) -> f64 {
        let mut log_spam = self.counts.prior_spam().ln();
        let mut log_ham = self.counts.prior_ham().ln();

        for (token, prob) in &self.words {
            if features.contains(token) {
                log_spam += prob.spam.ln();
                log_ham += prob.ham.ln();
            } else {
                log_spam += (-prob.spam).ln_1p();
                log_ham += (-prob.ham).ln_1p();
            }
        }

        1. / (1. + (log_ham - log_spam).exp())
    }
}

fn extract_all<T: AsRef<str> + Sync>(extractor: &FeatureExtractor, messages: &[T]) -> Vec<FeatureSet> {
    messages
        .par_iter()
        .map(|message| extractor.extract(message.as_ref()))
        .filter(|features| !features.is_empty())
        .collect()
}

/// Number of feature sets each token appears in.
fn document_frequency(sets: &[FeatureSet]) -> HashMap<&str, usize> {
    let mut frequency = HashMap::new();
    for features in sets {
        for token in features.tokens() {
            *frequency.entry(token).or_default() += 1;
        }
    }
    frequency
}

fn smoothed(hits: usize, total: usize) -> f64 {
    (hits + 1) as f64 / (total + 2) as f64
}

/// Estimator holding at most one trained model.
///
/// Training takes `&mut self` and classification `&self`, so a shared
/// classifier cannot be retrained while it is being read.
pub struct EmailClassifier {
    extractor: Arc<FeatureExtractor>,
    model: Option<TrainedModel>,
}

impl Default for EmailClassifier {
    fn default() -> Self {
        EmailClassifier::new(FeatureExtractor::default())
    }
}

impl EmailClassifier {
    pub fn new(extractor: FeatureExtractor) -> Self {
        EmailClassifier {
            extractor: Arc::new(extractor),
            model: None,
        }
    }

    /// Replaces the current model. On error the previous model is kept.
    pub fn train<S, H>(&mut self, spam: &[S], ham: &[H]) -> Result<()>
    where
        S: AsRef<str> + Sync,
        H: AsRef<str> + Sync,
    {
        let model = TrainedModel::fit(Arc::clone(&self.extractor), spam, ham)?;
        self.model = Some(model);
        Ok(())
    }

    pub fn model(&self) -> Result<&TrainedModel> {
        self.model.as_ref().ok_or(Error::UntrainedModel)
    }

    pub fn classify(&self, text: &str) -> Result<f64> {
        Ok(self.model()?.classify(text))
    }

    pub fn is_spam(&self, text: &str) -> Result<bool> {
        Ok(self.model()?.is_spam(text))
    }
}
