//! Whole-run scorers.

use std::time::Duration;

use qa_agent::Stage;

use super::{contains_ci, Scorer};
use crate::expectation::Expectation;
use crate::observation::Observation;

/// Answers this short (in characters) do not count as an answer.
const MIN_ANSWER_CHARS: usize = 10;

/// 0.6 for stage completion plus 0.4 for a non-trivial answer.
pub struct OverallTaskSuccess;

impl Scorer for OverallTaskSuccess {
    fn name(&self) -> &'static str {
        "overall_task_success"
    }

    fn evaluate(&self, actual: &Observation, _expected: &Expectation) -> f64 {
        let completed = Stage::ALL
            .iter()
            .filter(|s| actual.record(**s).is_some())
            .count();
        let step_completion = completed as f64 / Stage::ALL.len() as f64;

        let has_answer = if actual.answer().chars().count() > MIN_ANSWER_CHARS {
            1.0
        } else {
            0.0
        };

        step_completion * 0.6 + has_answer * 0.4
    }
}

/// Latency score from measured wall-clock time.
///
/// 1.0 up to `target`, falling linearly to 0.0 at `ceiling`. A run with no
/// recorded timing scores 0.0.
pub struct ResponseTimeScore {
    pub target: Duration,
    pub ceiling: Duration,
}

impl Default for ResponseTimeScore {
    fn default() -> Self {
        Self {
            target: Duration::from_secs(10),
            ceiling: Duration::from_secs(120),
        }
    }
}

impl Scorer for ResponseTimeScore {
    fn name(&self) -> &'static str {
        "response_time_score"
    }

    fn evaluate(&self, actual: &Observation, _expected: &Expectation) -> f64 {
        let Some(elapsed) = actual.elapsed else {
            return 0.0;
        };

        if elapsed <= self.target {
            return 1.0;
        }
        if elapsed >= self.ceiling || self.ceiling <= self.target {
            return 0.0;
        }

        let over = (elapsed - self.target).as_secs_f64();
        let span = (self.ceiling - self.target).as_secs_f64();
        (1.0 - over / span).clamp(0.0, 1.0)
    }
}

/// Credit for each stage: 0.3 when clean, 0.5 when an error was handled.
pub struct ErrorHandlingQuality;

impl Scorer for ErrorHandlingQuality {
    fn name(&self) -> &'static str {
        "error_handling_quality"
    }

    fn evaluate(&self, actual: &Observation, _expected: &Expectation) -> f64 {
        let Some(log) = &actual.stage_log else {
            return 0.0;
        };

        let total: f64 = log
            .values()
            .map(|record| {
                if record.output().mentions("error") {
                    let reasoning = record.reasoning();
                    if contains_ci(reasoning, "gracefully") || contains_ci(reasoning, "handled") {
                        0.5
                    } else {
                        0.0
                    }
                } else {
                    0.3
                }
            })
            .sum();

        total.min(1.0)
    }
}
