//! Heuristic scorers for each pipeline concern.
//!
//! Every scorer is a pure function of one run's [`Observation`] and its
//! [`Expectation`], returning a score in `[0, 1]`. Scorers never fail;
//! structural problems are caught earlier by
//! [`validate_observation`](crate::observation::validate_observation).

pub mod answer;
pub mod end_to_end;
pub mod registry;
pub mod search;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use qa_agent::Stage;

use crate::expectation::Expectation;
use crate::observation::Observation;

pub use registry::{composite_score, ScorerRegistry};

/// A named scoring function.
pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Score one run. Always returns a value in `[0, 1]`.
    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64;
}

/// The four metric groups, one per pipeline concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Verification,
    Search,
    Answer,
    EndToEnd,
}

impl MetricGroup {
    pub const ALL: [MetricGroup; 4] = [
        MetricGroup::Verification,
        MetricGroup::Search,
        MetricGroup::Answer,
        MetricGroup::EndToEnd,
    ];

    /// Route a dataset to a group by name. Unmatched names are end-to-end.
    pub fn for_dataset(name: &str) -> Self {
        if name.contains("verification") {
            Self::Verification
        } else if name.contains("search") {
            Self::Search
        } else if name.contains("answer") {
            Self::Answer
        } else {
            Self::EndToEnd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Search => "search",
            Self::Answer => "answer",
            Self::EndToEnd => "end_to_end",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == name)
    }

    /// Stage entries the group's projection must contain.
    pub fn required_stages(&self) -> &'static [Stage] {
        match self {
            Self::Verification => &[Stage::Verify],
            Self::Search => &[Stage::Search],
            Self::Answer => &[Stage::Answer],
            Self::EndToEnd => &Stage::ALL,
        }
    }
}

impl fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional per-metric weights for [`composite_score`].
pub type Weights = HashMap<String, f64>;

/// Case-insensitive substring test.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Fraction of `needles` found in `haystack`, case-insensitively.
pub(crate) fn fraction_found(haystack: &str, needles: &[String]) -> f64 {
    if needles.is_empty() {
        return 0.0;
    }
    let lower = haystack.to_lowercase();
    let found = needles
        .iter()
        .filter(|n| lower.contains(&n.to_lowercase()))
        .count();
    found as f64 / needles.len() as f64
}
