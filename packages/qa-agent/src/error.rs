//! Typed errors for the question-answering pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Only generation
//! failures and checkpoint failures end a run; search failures are absorbed
//! by the search stage and malformed classifications are resolved fail-closed.

use thiserror::Error;

use crate::types::Stage;

/// Errors from an LLM completion service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration error (missing API key, invalid settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors from a web search service.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("search API error: {0}")]
    Api(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Violations of the write-once rules of [`crate::PipelineState`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A stage tried to write a field or record that already exists.
    #[error("stage '{0}' has already been recorded")]
    AlreadyRecorded(Stage),

    /// A stage record was attached to the wrong transition.
    #[error("expected a record for stage '{expected}', got '{found}'")]
    StageMismatch { expected: Stage, found: Stage },

    /// A stage ran before the stage it depends on.
    #[error("stage '{stage}' requires '{requires}' to run first")]
    OutOfOrder { stage: Stage, requires: Stage },
}

/// Errors from a checkpoint store.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("checkpoint storage failed: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors that terminate a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The LLM failed during a stage that has no fallback (verify or answer).
    #[error("generation failed during {stage}: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    /// A stage broke the state invariants.
    #[error("invalid state transition: {0}")]
    State(#[from] StateError),

    /// Persisting a checkpoint failed.
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

impl PipelineError {
    /// The stage whose generation failed, if this is a generation failure.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Generation { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Result type alias for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;
