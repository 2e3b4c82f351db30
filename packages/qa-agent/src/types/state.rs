//! The state record threaded through the pipeline.
//!
//! `PipelineState` is a value type: every transition consumes the state and
//! returns a new one, and each field can be written exactly once by the stage
//! that owns it. The stage log is append-only and keeps execution order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::types::stage::{Stage, StageRecord};

/// State of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    question: String,
    in_scope: Option<bool>,
    search_payload: Option<String>,
    final_answer: Option<String>,
    stage_log: IndexMap<Stage, StageRecord>,
}

impl PipelineState {
    /// Initial state for a question. Nothing has run yet.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            in_scope: None,
            search_payload: None,
            final_answer: None,
            stage_log: IndexMap::new(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Whether the question was classified as in scope. `false` until verified.
    pub fn in_scope(&self) -> bool {
        self.in_scope.unwrap_or(false)
    }

    /// Formatted search results, an error description, or empty when skipped.
    pub fn search_payload(&self) -> &str {
        self.search_payload.as_deref().unwrap_or("")
    }

    pub fn final_answer(&self) -> &str {
        self.final_answer.as_deref().unwrap_or("")
    }

    /// Stage records in execution order.
    pub fn stage_log(&self) -> &IndexMap<Stage, StageRecord> {
        &self.stage_log
    }

    pub fn record(&self, stage: Stage) -> Option<&StageRecord> {
        self.stage_log.get(&stage)
    }

    pub fn has_run(&self, stage: Stage) -> bool {
        self.stage_log.contains_key(&stage)
    }

    /// Stages executed so far, in order.
    pub fn executed_stages(&self) -> Vec<Stage> {
        self.stage_log.keys().copied().collect()
    }

    /// True once the answer stage has written its result.
    pub fn is_complete(&self) -> bool {
        self.final_answer.is_some()
    }

    /// Record the verification verdict.
    pub fn with_verdict(self, in_scope: bool, record: StageRecord) -> Result<Self, StateError> {
        let mut next = self.append(Stage::Verify, record, None)?;
        if next.in_scope.is_some() {
            return Err(StateError::AlreadyRecorded(Stage::Verify));
        }
        next.in_scope = Some(in_scope);
        Ok(next)
    }

    /// Record the search payload (empty when the search was skipped).
    pub fn with_search_payload(
        self,
        payload: impl Into<String>,
        record: StageRecord,
    ) -> Result<Self, StateError> {
        let mut next = self.append(Stage::Search, record, Some(Stage::Verify))?;
        if next.search_payload.is_some() {
            return Err(StateError::AlreadyRecorded(Stage::Search));
        }
        next.search_payload = Some(payload.into());
        Ok(next)
    }

    /// Record the final answer, stored untruncated.
    pub fn with_answer(
        self,
        answer: impl Into<String>,
        record: StageRecord,
    ) -> Result<Self, StateError> {
        let mut next = self.append(Stage::Answer, record, Some(Stage::Verify))?;
        if next.final_answer.is_some() {
            return Err(StateError::AlreadyRecorded(Stage::Answer));
        }
        next.final_answer = Some(answer.into());
        Ok(next)
    }

    fn append(
        mut self,
        stage: Stage,
        record: StageRecord,
        requires: Option<Stage>,
    ) -> Result<Self, StateError> {
        if record.stage() != stage {
            return Err(StateError::StageMismatch {
                expected: stage,
                found: record.stage(),
            });
        }
        if let Some(requires) = requires {
            if !self.has_run(requires) {
                return Err(StateError::OutOfOrder { stage, requires });
            }
        }
        if self.has_run(stage) {
            return Err(StateError::AlreadyRecorded(stage));
        }
        self.stage_log.insert(stage, record);
        Ok(self)
    }
}
