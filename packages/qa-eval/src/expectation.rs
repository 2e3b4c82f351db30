//! Expected outputs parsed from fixture items.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_completeness() -> f64 {
    0.5
}

/// What a run is expected to produce. Unknown fixture keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Expected classification. Absent when the fixture does not judge it.
    #[serde(rename = "is_saudi_question", default)]
    pub in_scope: Option<bool>,

    #[serde(default = "default_true")]
    pub should_search: bool,

    #[serde(default)]
    pub expected_keywords: Vec<String>,

    #[serde(default)]
    pub answer_should_contain: Vec<String>,

    #[serde(default)]
    pub answer_should_not_contain: Vec<String>,

    #[serde(default = "default_completeness")]
    pub completeness_score: f64,

    /// Whether the answer should be a refusal.
    #[serde(default)]
    pub rejection_response: bool,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            in_scope: None,
            should_search: true,
            expected_keywords: Vec::new(),
            answer_should_contain: Vec::new(),
            answer_should_not_contain: Vec::new(),
            completeness_score: default_completeness(),
            rejection_response: false,
        }
    }
}

impl Expectation {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}
