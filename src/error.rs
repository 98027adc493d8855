use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no usable training messages: every message reduced to an empty feature set")]
    InsufficientTrainingData,

    #[error("classifier has not been trained")]
    UntrainedModel,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("split ratio must be within [0, 1], got {0}")]
    InvalidRatio(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
