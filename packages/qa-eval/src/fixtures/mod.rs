//! Static evaluation datasets.
//!
//! Items are kept as raw JSON (`input`, `expected_output`, `metadata`) so
//! they can be uploaded to a dataset store unchanged. The harness turns each
//! item into a question plus an [`Expectation`] before running it.

mod answer;
mod search;
mod verification;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EvalError, Result};
use crate::expectation::Expectation;

pub const VERIFICATION_DATASET: &str = "saudi-qa-verification-v1";
pub const SEARCH_DATASET: &str = "saudi-qa-search-quality-v1";
pub const ANSWER_DATASET: &str = "saudi-qa-answer-quality-v1";

/// One (input, expected output, metadata) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub input: Value,
    pub expected_output: Value,
    #[serde(default)]
    pub metadata: Value,
}

impl DatasetItem {
    pub fn new(input: Value, expected_output: Value, metadata: Value) -> Self {
        Self {
            input,
            expected_output,
            metadata,
        }
    }

    /// The question to run, from `input.question`.
    pub fn question(&self) -> Option<&str> {
        self.input
            .get("question")
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        self.metadata.get("category").and_then(Value::as_str)
    }
}

/// A named collection of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub name: String,
    pub description: String,
    /// Metrics this dataset is designed to exercise.
    pub primary_metrics: Vec<String>,
    pub items: Vec<DatasetItem>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, description: impl Into<String>, items: Vec<DatasetItem>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            primary_metrics: Vec::new(),
            items,
        }
    }

    pub fn with_primary_metrics(mut self, metrics: &[&str]) -> Self {
        self.primary_metrics = metrics.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Parse every item into a question and expectation, failing on the first bad one.
    pub fn cases(&self) -> Result<Vec<Case>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let fixture_error = |reason: String| EvalError::Fixture {
                    dataset: self.name.clone(),
                    index,
                    reason,
                };

                let question = item
                    .question()
                    .ok_or_else(|| fixture_error("input.question is missing or empty".into()))?;
                let expectation = Expectation::from_value(&item.expected_output)
                    .map_err(|e| fixture_error(format!("expected_output: {}", e)))?;

                Ok(Case {
                    index,
                    question: question.to_string(),
                    expectation,
                })
            })
            .collect()
    }
}

/// A dataset item ready to run.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub index: usize,
    pub question: String,
    pub expectation: Expectation,
}

/// The three built-in datasets.
pub fn datasets() -> Vec<Dataset> {
    vec![
        verification::dataset(),
        search::dataset(),
        answer::dataset(),
    ]
}

/// Look up a built-in dataset by name.
pub fn dataset(name: &str) -> Result<Dataset> {
    datasets()
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| EvalError::UnknownDataset(name.to_string()))
}
