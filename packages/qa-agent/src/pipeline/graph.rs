//! The verify → (search | skip) → answer graph and its driver.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::Result;
use crate::pipeline::nodes;
use crate::traits::{
    checkpoint::{Checkpoint, CheckpointStore, NoopCheckpointStore},
    llm::LanguageModel,
    searcher::WebSearcher,
    tracer::{NoopTracer, PipelineTracer},
};
use crate::types::{PipelineState, RunId, Stage, TopicScope};

/// Graph nodes. `Verify` is always the entry point, `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Verify,
    Search,
    Answer,
    Done,
}

/// Outcome of the only branch point, evaluated right after verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// In scope: run the search node.
    Search,
    /// Out of scope: record an empty payload and go straight to the answer.
    SkipSearch,
}

/// Conditional edge after `Verify`.
pub fn route_after_verify(state: &PipelineState) -> Route {
    if state.in_scope() {
        Route::Search
    } else {
        Route::SkipSearch
    }
}

/// The question-answering pipeline.
///
/// Owns the two remote services plus the injected tracer and checkpoint
/// store. A `Pipeline` holds no per-run state, so one instance can serve
/// many concurrent runs.
pub struct Pipeline<L, S> {
    llm: L,
    searcher: S,
    scope: TopicScope,
    tracer: Arc<dyn PipelineTracer>,
    checkpoints: Arc<dyn CheckpointStore>,
}

impl<L, S> Pipeline<L, S>
where
    L: LanguageModel,
    S: WebSearcher,
{
    /// Create a pipeline with the default scope, no tracing, and no persistence.
    pub fn new(llm: L, searcher: S) -> Self {
        Self {
            llm,
            searcher,
            scope: TopicScope::default(),
            tracer: Arc::new(NoopTracer),
            checkpoints: Arc::new(NoopCheckpointStore),
        }
    }

    pub fn with_scope(mut self, scope: TopicScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_tracer(mut self, tracer: Arc<dyn PipelineTracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_checkpoints(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = store;
        self
    }

    pub fn scope(&self) -> &TopicScope {
        &self.scope
    }

    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    /// Answer a question under a fresh run id.
    pub async fn run(&self, question: &str) -> Result<PipelineState> {
        self.run_with_id(RunId::new(), question).await
    }

    /// Answer a question under a caller-supplied run id.
    #[instrument(skip_all, fields(run_id = %run_id))]
    pub async fn run_with_id(&self, run_id: RunId, question: &str) -> Result<PipelineState> {
        info!(question, "Pipeline run started");

        match self.drive(run_id, PipelineState::new(question)).await {
            Ok(state) => {
                self.tracer.run_completed(run_id, &state);
                Ok(state)
            }
            Err(e) => {
                self.tracer.run_failed(run_id, &e);
                Err(e)
            }
        }
    }

    async fn drive(&self, run_id: RunId, mut state: PipelineState) -> Result<PipelineState> {
        let mut node = Node::Verify;

        loop {
            let next = match node {
                Node::Verify => {
                    state = nodes::verify(state, &self.llm, &self.scope).await?;
                    self.trace(run_id, &state, Stage::Verify);
                    match route_after_verify(&state) {
                        Route::Search => Node::Search,
                        Route::SkipSearch => {
                            state = nodes::skip_search(state, &self.scope)?;
                            self.trace(run_id, &state, Stage::Search);
                            Node::Answer
                        }
                    }
                }
                Node::Search => {
                    state = nodes::search(state, &self.searcher, &self.scope).await?;
                    self.trace(run_id, &state, Stage::Search);
                    Node::Answer
                }
                Node::Answer => {
                    state = nodes::answer(state, &self.llm, &self.scope).await?;
                    self.trace(run_id, &state, Stage::Answer);
                    Node::Done
                }
                Node::Done => return Ok(state),
            };

            self.checkpoints
                .save(&Checkpoint {
                    run_id,
                    next,
                    state: state.clone(),
                })
                .await?;
            node = next;
        }
    }

    fn trace(&self, run_id: RunId, state: &PipelineState, stage: Stage) {
        if let Some(record) = state.record(stage) {
            self.tracer.stage_completed(run_id, record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_after_verify() {
        use crate::types::StageRecord;

        let yes = PipelineState::new("q")
            .with_verdict(true, StageRecord::new(Stage::Verify, "q", true, "r"))
            .unwrap();
        let no = PipelineState::new("q")
            .with_verdict(false, StageRecord::new(Stage::Verify, "q", false, "r"))
            .unwrap();

        assert_eq!(route_after_verify(&yes), Route::Search);
        assert_eq!(route_after_verify(&no), Route::SkipSearch);
        assert_eq!(route_after_verify(&PipelineState::new("q")), Route::SkipSearch);
    }

    #[test]
    fn test_node_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Node::Done).unwrap(), "\"done\"");
    }
}
