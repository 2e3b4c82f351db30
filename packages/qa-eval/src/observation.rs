//! What a scorer sees of a finished run.
//!
//! Node-level evaluations run the whole pipeline but only expose the fields
//! of the node under test. Fields outside the projection are `None`, which
//! is how a validation check tells "missing" apart from "empty".

use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

use qa_agent::{PipelineState, Stage, StageRecord};

use crate::metrics::MetricGroup;

/// Projected view of a pipeline state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observation {
    pub question: Option<String>,
    pub in_scope: Option<bool>,
    pub search_payload: Option<String>,
    pub final_answer: Option<String>,
    pub stage_log: Option<IndexMap<Stage, StageRecord>>,
    #[serde(skip)]
    pub elapsed: Option<Duration>,
}

impl Observation {
    /// Project a finished state for one metric group.
    pub fn project(state: &PipelineState, group: MetricGroup, elapsed: Option<Duration>) -> Self {
        let only = |stage: Stage| {
            let mut log = IndexMap::new();
            if let Some(record) = state.record(stage) {
                log.insert(stage, record.clone());
            }
            Some(log)
        };

        let base = Self {
            question: Some(state.question().to_string()),
            in_scope: Some(state.in_scope()),
            ..Default::default()
        };

        match group {
            MetricGroup::Verification => Self {
                stage_log: only(Stage::Verify),
                ..base
            },
            MetricGroup::Search => Self {
                search_payload: Some(state.search_payload().to_string()),
                stage_log: only(Stage::Search),
                ..base
            },
            MetricGroup::Answer => Self {
                final_answer: Some(state.final_answer().to_string()),
                stage_log: only(Stage::Answer),
                ..base
            },
            MetricGroup::EndToEnd => Self {
                search_payload: Some(state.search_payload().to_string()),
                final_answer: Some(state.final_answer().to_string()),
                stage_log: Some(state.stage_log().clone()),
                elapsed,
                ..base
            },
        }
    }

    /// Stage record from the projected log, if present.
    pub fn record(&self, stage: Stage) -> Option<&StageRecord> {
        self.stage_log.as_ref().and_then(|log| log.get(&stage))
    }

    pub fn payload(&self) -> &str {
        self.search_payload.as_deref().unwrap_or("")
    }

    pub fn answer(&self) -> &str {
        self.final_answer.as_deref().unwrap_or("")
    }
}

/// Fields and stage entries a metric group cannot be scored without.
///
/// Returns the missing names, e.g. `final_answer` or `stage_log.verify`.
/// An empty list means the observation is valid.
pub fn validate_observation(obs: &Observation, group: MetricGroup) -> Vec<String> {
    let mut missing = Vec::new();

    let mut require = |present: bool, name: &str| {
        if !present {
            missing.push(name.to_string());
        }
    };

    require(obs.question.is_some(), "question");
    require(obs.in_scope.is_some(), "in_scope");

    match group {
        MetricGroup::Search => require(obs.search_payload.is_some(), "search_payload"),
        MetricGroup::Answer | MetricGroup::EndToEnd => {
            require(obs.final_answer.is_some(), "final_answer")
        }
        MetricGroup::Verification => {}
    }

    require(obs.stage_log.is_some(), "stage_log");

    if let Some(log) = &obs.stage_log {
        for stage in group.required_stages() {
            if !log.contains_key(stage) {
                missing.push(format!("stage_log.{}", stage));
            }
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use qa_agent::StageRecord;

    fn finished_state() -> PipelineState {
        PipelineState::new("What is the capital of Saudi Arabia?")
            .with_verdict(true, StageRecord::new(Stage::Verify, "q", true, "Verified"))
            .and_then(|s| {
                s.with_search_payload(
                    "Source: https://en.wikipedia.org/wiki/Riyadh\nTitle: Riyadh\nContent: capital\n",
                    StageRecord::new(Stage::Search, "q", "Found 1 results", "ok"),
                )
            })
            .and_then(|s| {
                s.with_answer(
                    "Riyadh is the capital.",
                    StageRecord::new(Stage::Answer, "q", "Riyadh is the capital.", "ok"),
                )
            })
            .unwrap()
    }

    #[test]
    fn test_verification_projection_hides_other_fields() {
        let obs = Observation::project(&finished_state(), MetricGroup::Verification, None);
        assert_eq!(obs.in_scope, Some(true));
        assert!(obs.final_answer.is_none());
        assert!(obs.search_payload.is_none());
        assert_eq!(obs.stage_log.as_ref().unwrap().len(), 1);
        assert!(obs.record(Stage::Verify).is_some());
    }

    #[test]
    fn test_end_to_end_projection_keeps_everything() {
        let obs = Observation::project(
            &finished_state(),
            MetricGroup::EndToEnd,
            Some(Duration::from_secs(2)),
        );
        assert_eq!(obs.stage_log.as_ref().unwrap().len(), 3);
        assert_eq!(obs.elapsed, Some(Duration::from_secs(2)));
        assert!(validate_observation(&obs, MetricGroup::EndToEnd).is_empty());
    }

    #[test]
    fn test_validation_lists_every_missing_field() {
        let obs = Observation {
            question: Some("q".into()),
            ..Default::default()
        };
        assert_eq!(
            validate_observation(&obs, MetricGroup::EndToEnd),
            vec!["in_scope", "final_answer", "stage_log"]
        );
    }

    #[test]
    fn test_validation_reports_missing_stage_entries() {
        let state = PipelineState::new("q")
            .with_verdict(false, StageRecord::new(Stage::Verify, "q", false, "r"))
            .unwrap();
        let obs = Observation {
            final_answer: Some(String::new()),
            ..Observation::project(&state, MetricGroup::EndToEnd, None)
        };
        assert_eq!(
            validate_observation(&obs, MetricGroup::EndToEnd),
            vec!["stage_log.search", "stage_log.answer"]
        );
    }
}
