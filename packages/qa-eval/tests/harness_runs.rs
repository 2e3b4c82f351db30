//! Dataset evaluations against scripted services.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

use qa_agent::{
    LanguageModel, LlmError, Pipeline, PipelineError, PipelineState, RunId, ScriptedModel,
    SearchHit, Stage, StaticSearcher,
};
use qa_eval::{
    dataset, run_comprehensive, EvaluationConfig, EvaluationStatus, EvaluationTask, Evaluator,
    ItemOutcome, MetricGroup,
};
use qa_eval::fixtures::{SEARCH_DATASET, VERIFICATION_DATASET};

const OUT_OF_SCOPE: &[&str] = &[
    "What is the capital of Egypt?",
    "Tell me about the weather in London",
    "Who is the President of the United States?",
    "What is machine learning?",
    "How do I cook pasta?",
    "What are the differences between Sunni and Shia Islam?",
    "Arab world oil production statistics",
    "What is the weather in London?",
    "What is the weather in Paris?",
];

/// Classifies every fixture question correctly and answers from the payload.
fn oracle() -> ScriptedModel {
    let model = OUT_OF_SCOPE.iter().fold(ScriptedModel::new(), |model, q| {
        model.when(&format!("Question: \"{}\"", q), "false")
    });
    model
        .when("Respond with ONLY", "true")
        .with_fallback("Riyadh is the capital of Saudi Arabia, the political and administrative center of the country.")
        .with_model_id("gpt-3.5-turbo")
}

fn hits() -> Vec<SearchHit> {
    vec![SearchHit::new(
        "https://en.wikipedia.org/wiki/Riyadh",
        "Riyadh - Wikipedia",
        "Riyadh is the capital of Saudi Arabia.",
    )]
}

/// Wraps a model, failing or stalling on prompts that mention one question.
struct GatedModel {
    inner: ScriptedModel,
    fail_on: Option<&'static str>,
    stall_on: Option<&'static str>,
}

#[async_trait]
impl LanguageModel for GatedModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if self.stall_on.is_some_and(|q| prompt.contains(q)) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        if self.fail_on.is_some_and(|q| prompt.contains(q)) {
            return Err(LlmError::Network("connection reset".into()));
        }
        self.inner.complete(prompt).await
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

/// A task that stops before any stage runs.
struct Unfinished;

#[async_trait]
impl EvaluationTask for Unfinished {
    async fn execute(&self, _run_id: RunId, question: &str) -> Result<PipelineState, PipelineError> {
        Ok(PipelineState::new(question))
    }
}

#[tokio::test]
async fn test_verification_scores_every_item() {
    let pipeline = Pipeline::new(oracle(), StaticSearcher::new().with_hits(hits()));
    let dataset = dataset(VERIFICATION_DATASET).unwrap();

    let report = Evaluator::new(&pipeline, EvaluationConfig::node_level())
        .evaluate_dataset(&dataset)
        .await
        .unwrap();

    assert_eq!(report.group, MetricGroup::Verification);
    assert_eq!(report.total, 16);
    assert_eq!(report.scored, 16);
    assert_eq!(report.coverage, 1.0);
    assert_eq!(report.model, "gpt-3.5-turbo");

    let exact = &report.metrics["exact_match"];
    assert_eq!(exact.mean, 1.0);
    assert_eq!(exact.passed, Some(true));
    assert!(report.all_passed());

    // Results come back in dataset order despite concurrent execution.
    let indices: Vec<usize> = report.items.iter().map(|i| i.index).collect();
    assert_eq!(indices, (0..16).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_verify_failure_is_excluded_from_means() {
    let llm = GatedModel {
        inner: oracle(),
        fail_on: Some("How do I cook pasta?"),
        stall_on: None,
    };
    let pipeline = Pipeline::new(llm, StaticSearcher::new().with_hits(hits()));
    let dataset = dataset(VERIFICATION_DATASET).unwrap();

    let report = Evaluator::new(&pipeline, EvaluationConfig::node_level())
        .evaluate_dataset(&dataset)
        .await
        .unwrap();

    assert_eq!(report.scored, 15);
    assert_eq!(report.errored, 1);
    assert!(report.coverage < 1.0);
    assert_eq!(report.metrics["exact_match"].mean, 1.0);

    let failed = report
        .items
        .iter()
        .find(|i| i.question == "How do I cook pasta?")
        .unwrap();
    match &failed.outcome {
        ItemOutcome::Errored { stage, error } => {
            assert_eq!(*stage, Some(Stage::Verify));
            assert!(error.contains("connection reset"));
        }
        other => panic!("expected an errored item, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_run_times_out() {
    let llm = GatedModel {
        inner: oracle(),
        fail_on: None,
        stall_on: Some("What is machine learning?"),
    };
    let pipeline = Pipeline::new(llm, StaticSearcher::new().with_hits(hits()));
    let dataset = dataset(VERIFICATION_DATASET).unwrap();
    let config = EvaluationConfig::node_level().with_timeout(Duration::from_millis(500));

    let report = Evaluator::new(&pipeline, config)
        .evaluate(&dataset, MetricGroup::Verification)
        .await
        .unwrap();

    assert_eq!(report.timed_out, 1);
    assert_eq!(report.scored, 15);

    let slow = report
        .items
        .iter()
        .find(|i| i.outcome == ItemOutcome::TimedOut)
        .unwrap();
    assert_eq!(slow.question, "What is machine learning?");
    assert_eq!(slow.elapsed_ms, None);
}

#[tokio::test]
async fn test_incomplete_state_is_invalid() {
    let dataset = dataset(VERIFICATION_DATASET).unwrap();

    let report = Evaluator::new(&Unfinished, EvaluationConfig::node_level())
        .evaluate_dataset(&dataset)
        .await
        .unwrap();

    assert_eq!(report.invalid, 16);
    assert_eq!(report.scored, 0);
    assert_eq!(report.coverage, 0.0);
    assert!(report.metrics.is_empty());
    assert_eq!(
        report.items[0].outcome,
        ItemOutcome::Invalid {
            missing: vec!["stage_log.verify".to_string()]
        }
    );
}

#[tokio::test]
async fn test_search_evaluation_skips_out_of_scope_item() {
    let searcher = StaticSearcher::new().with_hits(hits());
    let pipeline = Pipeline::new(oracle(), searcher.clone());
    let dataset = dataset(SEARCH_DATASET).unwrap();

    let report = Evaluator::new(&pipeline, EvaluationConfig::node_level())
        .evaluate_dataset(&dataset)
        .await
        .unwrap();

    assert_eq!(report.group, MetricGroup::Search);
    assert_eq!(report.scored, 4);
    // London is never searched.
    assert_eq!(searcher.requests().len(), 3);

    let london = report.items[3].outcome.scores().unwrap();
    assert_eq!(london["search_relevance"], 0.0);
    assert_eq!(london["search_execution_success"], 1.0);

    let capital = report.items[0].outcome.scores().unwrap();
    assert_eq!(capital["keyword_coverage"], 1.0);
    assert_eq!(capital["source_authority"], 0.2);
}

#[tokio::test]
async fn test_end_to_end_records_timing() {
    let pipeline = Pipeline::new(oracle(), StaticSearcher::new().with_hits(hits()));
    let dataset = dataset(VERIFICATION_DATASET).unwrap();

    let report = Evaluator::new(&pipeline, EvaluationConfig::end_to_end())
        .evaluate(&dataset, MetricGroup::EndToEnd)
        .await
        .unwrap();

    assert_eq!(report.scored, 16);
    assert!(report.items.iter().all(|i| i.elapsed_ms.is_some()));
    // Scripted services answer instantly.
    assert_eq!(report.metrics["response_time_score"].mean, 1.0);
}

#[tokio::test]
async fn test_comprehensive_runs_every_group() {
    let pipeline = Pipeline::new(oracle(), StaticSearcher::new().with_hits(hits()));
    let now = NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(9, 26, 53)
        .unwrap();

    let report = run_comprehensive(&pipeline, now, "ci").await;

    assert_eq!(report.total(), 4);
    assert!(report.all_completed());

    let groups: Vec<MetricGroup> = report.evaluations.keys().copied().collect();
    assert_eq!(groups, MetricGroup::ALL.to_vec());

    match &report.evaluations[&MetricGroup::Search] {
        EvaluationStatus::Completed(r) => assert_eq!(
            r.run_name.as_deref(),
            Some("SaudiQA_search_search_quality_gpt_3.5_turbo_20250314_092653_ci")
        ),
        EvaluationStatus::Failed { error } => panic!("search evaluation failed: {}", error),
    }
}
