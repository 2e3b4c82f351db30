//! Testing utilities including mock implementations.
//!
//! These let applications and the evaluation harness drive the pipeline
//! without making real LLM or search calls.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use crate::error::{LlmError, PipelineError, SearchError};
use crate::traits::{llm::LanguageModel, searcher::WebSearcher, tracer::PipelineTracer};
use crate::types::{PipelineState, RunId, SearchHit, SearchRequest, Stage, StageRecord};

/// A language model that replays scripted responses.
///
/// Resolution order for each prompt: the next queued response, then the
/// first rule whose needle appears in the prompt, then the fallback. With
/// none of those the call fails.
#[derive(Default, Clone)]
pub struct ScriptedModel {
    queue: Arc<Mutex<VecDeque<Result<String, String>>>>,
    rules: Arc<RwLock<Vec<(String, String)>>>,
    fallback: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
    model_id: String,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            model_id: "scripted".to_string(),
            ..Default::default()
        }
    }

    /// Queue a successful response.
    pub fn with_response(self, response: &str) -> Self {
        self.queue.lock().unwrap().push_back(Ok(response.to_string()));
        self
    }

    /// Queue a failed call.
    pub fn with_failure(self, message: &str) -> Self {
        self.queue.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    /// Answer any prompt containing `needle` with `response`.
    pub fn when(self, needle: &str, response: &str) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((needle.to_string(), response.to_string()));
        self
    }

    /// Response used when nothing else matches.
    pub fn with_fallback(mut self, response: &str) -> Self {
        self.fallback = Some(response.to_string());
        self
    }

    pub fn with_model_id(mut self, model_id: &str) -> Self {
        self.model_id = model_id.to_string();
        self
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            return next.map_err(LlmError::Network);
        }

        let ruled = self
            .rules
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone());

        ruled
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| LlmError::Api("no scripted response".into()))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// A searcher returning fixed hits (or a fixed failure) for every request.
#[derive(Default, Clone)]
pub struct StaticSearcher {
    hits: Vec<SearchHit>,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl StaticSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.hits = hits;
        self
    }

    /// Fail every request with an API error.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for StaticSearcher {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.failure {
            Some(message) => Err(SearchError::Api(message.clone())),
            None => Ok(self
                .hits
                .iter()
                .take(request.max_results)
                .cloned()
                .collect()),
        }
    }
}

/// Event captured by [`RecordingTracer`].
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Stage { run_id: RunId, stage: Stage },
    Completed { run_id: RunId },
    Failed { run_id: RunId, stage: Option<Stage> },
}

/// Tracer that keeps every event for assertions.
#[derive(Debug, Default, Clone)]
pub struct RecordingTracer {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Stages reported for one run, in order.
    pub fn stages_for(&self, run_id: RunId) -> Vec<Stage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TraceEvent::Stage { run_id: id, stage } if id == run_id => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl PipelineTracer for RecordingTracer {
    fn stage_completed(&self, run_id: RunId, record: &StageRecord) {
        self.events.lock().unwrap().push(TraceEvent::Stage {
            run_id,
            stage: record.stage(),
        });
    }

    fn run_completed(&self, run_id: RunId, _state: &PipelineState) {
        self.events
            .lock()
            .unwrap()
            .push(TraceEvent::Completed { run_id });
    }

    fn run_failed(&self, run_id: RunId, error: &PipelineError) {
        self.events.lock().unwrap().push(TraceEvent::Failed {
            run_id,
            stage: error.failed_stage(),
        });
    }
}
