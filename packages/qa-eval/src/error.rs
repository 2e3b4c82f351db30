//! Error types for the evaluation harness.

use thiserror::Error;

/// Errors from a dataset store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("dataset '{0}' already exists")]
    AlreadyExists(String),

    #[error("dataset '{0}' not found")]
    NotFound(String),

    #[error("store API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors that stop an evaluation before any item is scored.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A fixture item cannot be turned into a question plus expectation.
    #[error("dataset '{dataset}' item {index}: {reason}")]
    Fixture {
        dataset: String,
        index: usize,
        reason: String,
    },

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("dataset store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(#[from] qa_agent::ConfigError),
}

pub type Result<T> = std::result::Result<T, EvalError>;
