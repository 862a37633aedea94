use std::path::PathBuf;
use thiserror::Error;

/// The raw vocabulary could not be turned into an index. Fatal at startup.
#[derive(Debug, Error)]
pub enum IndexBuildError {
    #[error("Vocabulary term #{position} is not valid UTF-8: {source}")]
    Decode {
        position: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Failed to read vocabulary file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A semantic query against the model failed.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("word '{0}' not in vocabulary")]
    NotInVocabulary(String),

    #[error("cannot compute {0} with no input words")]
    EmptyQuery(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// The model file could not be loaded. Fatal at startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("Failed to open model file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read model data: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid model header: {0}")]
    Header(String),

    #[error("Invalid model record #{index}: {reason}")]
    Record { index: usize, reason: String },
}

/// Errors raised by the HTTP handlers while decoding their parameters.
#[derive(Debug, Error)]
pub enum W2vError {
    #[error("Invalid input: {0}")]
    Validation(String),
}

pub type W2vResult<T> = Result<T, W2vError>;
