//! Runs the pipeline over a dataset and scores each run.
//!
//! Items run concurrently with a bounded number in flight, each under its
//! own timeout and its own run id. A run that fails or times out is kept in
//! the report but excluded from the metric means; `coverage` says how many
//! items were actually scored.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use qa_agent::pipeline::preview;
use qa_agent::{LanguageModel, Pipeline, PipelineError, PipelineState, RunId, Stage, WebSearcher};

use crate::error::Result;
use crate::fixtures::{self, Case, Dataset};
use crate::metrics::{composite_score, MetricGroup, ScorerRegistry, Weights};
use crate::observation::{validate_observation, Observation};
use crate::plan::success_criterion;
use crate::run_name::evaluation_run_name;

/// Something that answers a question and returns the final pipeline state.
#[async_trait]
pub trait EvaluationTask: Send + Sync {
    async fn execute(&self, run_id: RunId, question: &str) -> std::result::Result<PipelineState, PipelineError>;

    /// Model identifier used in run names.
    fn model_id(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<L, S> EvaluationTask for Pipeline<L, S>
where
    L: LanguageModel,
    S: WebSearcher,
{
    async fn execute(&self, run_id: RunId, question: &str) -> std::result::Result<PipelineState, PipelineError> {
        self.run_with_id(run_id, question).await
    }

    fn model_id(&self) -> &str {
        Pipeline::model_id(self)
    }
}

/// Concurrency and timeout settings for one evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    pub max_concurrency: usize,
    pub timeout: Duration,
    pub run_name: Option<String>,
    pub weights: Option<Weights>,
}

impl EvaluationConfig {
    /// Node-level evaluations: 5 in flight, 60 s per run.
    pub fn node_level() -> Self {
        Self {
            max_concurrency: 5,
            timeout: Duration::from_secs(60),
            run_name: None,
            weights: None,
        }
    }

    /// End-to-end evaluations: 3 in flight, 120 s per run.
    pub fn end_to_end() -> Self {
        Self {
            max_concurrency: 3,
            timeout: Duration::from_secs(120),
            ..Self::node_level()
        }
    }

    pub fn for_group(group: MetricGroup) -> Self {
        match group {
            MetricGroup::EndToEnd => Self::end_to_end(),
            _ => Self::node_level(),
        }
    }

    pub fn with_run_name(mut self, name: impl Into<String>) -> Self {
        self.run_name = Some(name.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// What happened to one dataset item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Scored { scores: IndexMap<String, f64> },
    /// The run returned an error; not scored.
    Errored { stage: Option<Stage>, error: String },
    /// The run exceeded its timeout and was abandoned; not scored.
    TimedOut,
    /// The run finished but lacks fields the metric group needs; not scored.
    Invalid { missing: Vec<String> },
}

impl ItemOutcome {
    pub fn scores(&self) -> Option<&IndexMap<String, f64>> {
        match self {
            Self::Scored { scores } => Some(scores),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemResult {
    pub index: usize,
    pub run_id: RunId,
    pub question: String,
    pub elapsed_ms: Option<u64>,
    pub outcome: ItemOutcome,
}

/// Mean of one metric over the scored items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub threshold: Option<f64>,
    /// `None` when the metric has no success criterion.
    pub passed: Option<bool>,
}

/// Result of evaluating one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub run_name: Option<String>,
    pub dataset: String,
    pub group: MetricGroup,
    pub model: String,
    pub total: usize,
    pub scored: usize,
    pub errored: usize,
    pub timed_out: usize,
    pub invalid: usize,
    /// `scored / total`.
    pub coverage: f64,
    pub metrics: IndexMap<String, MetricSummary>,
    pub composite: f64,
    pub items: Vec<ItemResult>,
}

impl EvaluationReport {
    /// True when every metric with a success criterion passed.
    pub fn all_passed(&self) -> bool {
        self.metrics.values().all(|m| m.passed != Some(false))
    }
}

/// Runs one task over datasets.
pub struct Evaluator<'a, T: ?Sized> {
    task: &'a T,
    config: EvaluationConfig,
    registry: Option<ScorerRegistry>,
}

impl<'a, T> Evaluator<'a, T>
where
    T: EvaluationTask + ?Sized,
{
    pub fn new(task: &'a T, config: EvaluationConfig) -> Self {
        Self {
            task,
            config,
            registry: None,
        }
    }

    /// Score with a custom registry instead of the group's standard one.
    pub fn with_registry(mut self, registry: ScorerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Evaluate a dataset with the metric group its name routes to.
    pub async fn evaluate_dataset(&self, dataset: &Dataset) -> Result<EvaluationReport> {
        self.evaluate(dataset, MetricGroup::for_dataset(&dataset.name))
            .await
    }

    /// Evaluate a dataset with an explicit metric group.
    pub async fn evaluate(&self, dataset: &Dataset, group: MetricGroup) -> Result<EvaluationReport> {
        let cases = dataset.cases()?;
        let standard;
        let registry = match &self.registry {
            Some(registry) => registry,
            None => {
                standard = ScorerRegistry::for_group(group);
                &standard
            }
        };

        info!(
            dataset = %dataset.name,
            group = %group,
            items = cases.len(),
            max_concurrency = self.config.max_concurrency,
            run_name = self.config.run_name.as_deref().unwrap_or("unnamed"),
            "Evaluation started"
        );

        let runs = cases.iter().map(|case| self.run_case(case, group, registry));
        let mut items: Vec<ItemResult> = stream::iter(runs)
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;
        items.sort_by_key(|item| item.index);

        let report = self.summarize(dataset, group, registry, items);

        info!(
            dataset = %report.dataset,
            scored = report.scored,
            total = report.total,
            composite = report.composite,
            "Evaluation completed"
        );

        Ok(report)
    }

    async fn run_case(&self, case: &Case, group: MetricGroup, registry: &ScorerRegistry) -> ItemResult {
        let run_id = RunId::new();
        let start = Instant::now();

        let result = timeout(self.config.timeout, self.task.execute(run_id, &case.question)).await;
        let elapsed = start.elapsed();

        let (outcome, elapsed) = match result {
            Err(_) => {
                warn!(run_id = %run_id, question = %case.question, "Evaluation run timed out");
                (ItemOutcome::TimedOut, None)
            }
            Ok(Err(e)) => {
                warn!(run_id = %run_id, question = %case.question, error = %e, "Evaluation run failed");
                (
                    ItemOutcome::Errored {
                        stage: e.failed_stage(),
                        error: e.to_string(),
                    },
                    Some(elapsed),
                )
            }
            Ok(Ok(state)) => {
                let obs = Observation::project(&state, group, Some(elapsed));
                let missing = validate_observation(&obs, group);
                let outcome = if missing.is_empty() {
                    ItemOutcome::Scored {
                        scores: registry.score(&obs, &case.expectation),
                    }
                } else {
                    warn!(run_id = %run_id, missing = ?missing, "Run output failed validation");
                    ItemOutcome::Invalid { missing }
                };
                (outcome, Some(elapsed))
            }
        };

        debug!(run_id = %run_id, index = case.index, "Evaluation item finished");

        ItemResult {
            index: case.index,
            run_id,
            question: case.question.clone(),
            elapsed_ms: elapsed.map(|d| d.as_millis() as u64),
            outcome,
        }
    }

    fn summarize(
        &self,
        dataset: &Dataset,
        group: MetricGroup,
        registry: &ScorerRegistry,
        items: Vec<ItemResult>,
    ) -> EvaluationReport {
        let count = |f: fn(&ItemOutcome) -> bool| items.iter().filter(|i| f(&i.outcome)).count();
        let scored = count(|o| matches!(o, ItemOutcome::Scored { .. }));
        let errored = count(|o| matches!(o, ItemOutcome::Errored { .. }));
        let timed_out = count(|o| matches!(o, ItemOutcome::TimedOut));
        let invalid = count(|o| matches!(o, ItemOutcome::Invalid { .. }));

        let mut means = IndexMap::new();
        if scored > 0 {
            for name in registry.names() {
                let sum: f64 = items
                    .iter()
                    .filter_map(|i| i.outcome.scores())
                    .filter_map(|s| s.get(name))
                    .sum();
                means.insert(name.to_string(), sum / scored as f64);
            }
        }

        let metrics = means
            .iter()
            .map(|(name, mean)| {
                let criterion = success_criterion(name);
                let summary = MetricSummary {
                    mean: *mean,
                    threshold: criterion.map(|c| c.threshold),
                    passed: criterion.map(|c| c.passes(*mean)),
                };
                (name.clone(), summary)
            })
            .collect();

        let total = items.len();
        EvaluationReport {
            run_name: self.config.run_name.clone(),
            dataset: dataset.name.clone(),
            group,
            model: self.task.model_id().to_string(),
            total,
            scored,
            errored,
            timed_out,
            invalid,
            coverage: if total == 0 {
                0.0
            } else {
                scored as f64 / total as f64
            },
            composite: composite_score(&means, self.config.weights.as_ref()),
            metrics,
            items,
        }
    }
}

/// Dataset used for each kind of evaluation. End-to-end reuses the
/// verification questions, which mix in-scope and out-of-scope items.
pub fn dataset_for(group: MetricGroup) -> &'static str {
    match group {
        MetricGroup::Verification | MetricGroup::EndToEnd => fixtures::VERIFICATION_DATASET,
        MetricGroup::Search => fixtures::SEARCH_DATASET,
        MetricGroup::Answer => fixtures::ANSWER_DATASET,
    }
}

/// Evaluate one group on its built-in dataset with a generated run name.
pub async fn evaluate_group<T>(
    task: &T,
    group: MetricGroup,
    now: NaiveDateTime,
    context: &str,
) -> Result<EvaluationReport>
where
    T: EvaluationTask + ?Sized,
{
    let dataset = fixtures::dataset(dataset_for(group))?;
    let run_name = evaluation_run_name(group.as_str(), Some(&dataset.name), task.model_id(), now, context);
    let config = EvaluationConfig::for_group(group).with_run_name(run_name);

    Evaluator::new(task, config).evaluate(&dataset, group).await
}

/// Outcome of one evaluation inside a comprehensive run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationStatus {
    Completed(EvaluationReport),
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveReport {
    pub evaluations: IndexMap<MetricGroup, EvaluationStatus>,
}

impl ComprehensiveReport {
    pub fn completed(&self) -> usize {
        self.evaluations
            .values()
            .filter(|s| matches!(s, EvaluationStatus::Completed(_)))
            .count()
    }

    pub fn total(&self) -> usize {
        self.evaluations.len()
    }

    pub fn all_completed(&self) -> bool {
        self.completed() == self.total()
    }
}

/// Verification, search, answer and end-to-end evaluations, in that order.
///
/// A failed evaluation is recorded and the rest still run.
pub async fn run_comprehensive<T>(task: &T, now: NaiveDateTime, context: &str) -> ComprehensiveReport
where
    T: EvaluationTask + ?Sized,
{
    let mut evaluations = IndexMap::new();

    for group in MetricGroup::ALL {
        let status = match evaluate_group(task, group, now, context).await {
            Ok(report) => EvaluationStatus::Completed(report),
            Err(e) => {
                warn!(group = %group, error = %e, "Evaluation failed");
                EvaluationStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        evaluations.insert(group, status);
    }

    let report = ComprehensiveReport { evaluations };
    info!(
        completed = report.completed(),
        total = report.total(),
        "Comprehensive evaluation finished"
    );
    report
}

/// Questions for a smoke test: two in scope, one out of scope.
pub const QUICK_TEST_QUESTIONS: [&str; 3] = [
    "What is the capital of Saudi Arabia?",
    "What is the weather in London?",
    "Tell me about Vision 2030",
];

#[derive(Debug, Clone, Serialize)]
pub struct QuickTestResult {
    pub question: String,
    pub in_scope: Option<bool>,
    pub answer_preview: Option<String>,
    pub stages: Vec<Stage>,
    pub error: Option<String>,
}

/// Run the smoke-test questions one after another. Failures are reported per question.
pub async fn quick_test<T>(task: &T) -> Vec<QuickTestResult>
where
    T: EvaluationTask + ?Sized,
{
    let mut results = Vec::with_capacity(QUICK_TEST_QUESTIONS.len());

    for question in QUICK_TEST_QUESTIONS {
        let result = match task.execute(RunId::new(), question).await {
            Ok(state) => QuickTestResult {
                question: question.to_string(),
                in_scope: Some(state.in_scope()),
                answer_preview: Some(preview(state.final_answer())),
                stages: state.executed_stages(),
                error: None,
            },
            Err(e) => QuickTestResult {
                question: question.to_string(),
                in_scope: None,
                answer_preview: None,
                stages: Vec::new(),
                error: Some(e.to_string()),
            },
        };
        results.push(result);
    }

    results
}
