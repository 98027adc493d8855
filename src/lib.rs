//! Naive Bayes spam filter over stemmed word-presence features.
//!
//! ```no_run
//! use spam_bayes::EmailClassifier;
//!
//! let mut classifier = EmailClassifier::default();
//! classifier.train(&["free money offer"], &["project update"])?;
//! assert!(classifier.classify("free money")? > 0.5);
//! # Ok::<(), spam_bayes::Error>(())
//! ```

pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod report;
pub mod stopwords;

pub use dataset::{Corpus, Label};
pub use error::{Error, Result};
pub use features::{FeatureExtractor, FeatureSet};
pub use model::{EmailClassifier, THRESHOLD, TrainedModel, TrainingCounts, WordProbability};
pub use report::{ConfusionMatrix, evaluate};
pub use stopwords::StopWords;
