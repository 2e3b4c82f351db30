//! Scope-Gated Question Answering
//!
//! A three-stage pipeline that answers questions about one topic (Saudi
//! Arabia by default) and politely refuses everything else.
//!
//! # Flow
//!
//! ```text
//! verify ──in scope──▶ search ──▶ answer ──▶ done
//!    └────out of scope──(skip)────▶ answer
//! ```
//!
//! - **verify** asks the LLM for a strict `true`/`false` classification.
//!   Anything else counts as out of scope.
//! - **search** queries the web through trusted domains only. Provider
//!   failures are written into the payload instead of ending the run.
//! - **answer** returns a fixed refusal out of scope, or an answer grounded
//!   in the search payload.
//!
//! Every stage appends one [`StageRecord`] to the run's audit log, and every
//! field of [`PipelineState`] is written at most once.
//!
//! # Usage
//!
//! ```rust,ignore
//! use qa_agent::{AgentConfig, OpenAiChatModel, Pipeline, TavilySearcher};
//!
//! let config = AgentConfig::from_env()?;
//! let pipeline = Pipeline::new(
//!     OpenAiChatModel::from_config(&config),
//!     TavilySearcher::from_config(&config)?,
//! );
//!
//! let state = pipeline.run("What is the capital of Saudi Arabia?").await?;
//! println!("{}", state.final_answer());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Service seams (LanguageModel, WebSearcher, PipelineTracer, CheckpointStore)
//! - [`types`] - Run state, stage records, search types
//! - [`pipeline`] - Prompts, stages, and the graph driver
//! - [`providers`] - OpenAI and Tavily adapters
//! - [`testing`] - Scripted mocks for tests and offline evaluation

pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::{missing_vars, AgentConfig};
pub use error::{CheckpointError, ConfigError, LlmError, PipelineError, SearchError, StateError};
pub use pipeline::{Node, Pipeline, Route};
pub use providers::{OpenAiChatModel, TavilySearcher};
pub use security::SecretString;
pub use traits::{
    checkpoint::{Checkpoint, CheckpointStore, MemoryCheckpointStore, NoopCheckpointStore},
    llm::LanguageModel,
    searcher::WebSearcher,
    tracer::{LogTracer, NoopTracer, PipelineTracer},
};
pub use types::{
    format_hits, PipelineState, RunId, SearchDepth, SearchHit, SearchRequest, Stage, StageOutput,
    StageRecord, TopicScope,
};

pub use testing::{RecordingTracer, ScriptedModel, StaticSearcher};
