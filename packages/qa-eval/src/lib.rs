//! Offline evaluation for the scope-gated QA pipeline.
//!
//! Runs the pipeline over built-in datasets, projects each final state into
//! the fields a metric group needs, and scores it with a registry of pure
//! scorers.
//!
//! # Metric groups
//!
//! | Group          | Dataset                        | Scorers |
//! |----------------|--------------------------------|---------|
//! | verification   | `saudi-qa-verification-v1`     | exact_match, verification_confidence |
//! | search         | `saudi-qa-search-quality-v1`   | search_relevance, keyword_coverage, source_authority, search_execution_success |
//! | answer         | `saudi-qa-answer-quality-v1`   | factual_accuracy, answer_completeness, answer_relevance, rejection_appropriateness |
//! | end_to_end     | `saudi-qa-verification-v1`     | overall_task_success, response_time_score, error_handling_quality |
//!
//! # Usage
//!
//! ```rust,ignore
//! use qa_eval::{evaluate_group, run_context, MetricGroup};
//!
//! let report = evaluate_group(&pipeline, MetricGroup::Search, now, &run_context()).await?;
//! println!("coverage {:.0}%", report.coverage * 100.0);
//! ```
//!
//! # Modules
//!
//! - [`fixtures`] - Built-in datasets
//! - [`metrics`] - Scorers and the registry
//! - [`harness`] - Concurrent dataset runs and reports
//! - [`store`] - Dataset upload and verification

pub mod config;
pub mod error;
pub mod expectation;
pub mod fixtures;
pub mod harness;
pub mod metrics;
pub mod observation;
pub mod plan;
pub mod run_name;
pub mod store;

pub use config::LangfuseConfig;
pub use error::{EvalError, Result, StoreError};
pub use expectation::Expectation;
pub use fixtures::{dataset, datasets, Case, Dataset, DatasetItem};
pub use harness::{
    dataset_for, evaluate_group, quick_test, run_comprehensive, ComprehensiveReport,
    EvaluationConfig, EvaluationReport, EvaluationStatus, EvaluationTask, Evaluator, ItemOutcome,
    ItemResult, MetricSummary, QuickTestResult,
};
pub use metrics::{composite_score, MetricGroup, Scorer, ScorerRegistry, Weights};
pub use observation::{validate_observation, Observation};
pub use plan::{evaluation_plan, success_criterion, EvaluationPlan, SuccessCriterion};
pub use run_name::{evaluation_run_name, run_context};
pub use store::{
    setup_datasets, verify_datasets, DatasetCheck, DatasetStore, LangfuseStore,
    MemoryDatasetStore, SetupOutcome,
};
