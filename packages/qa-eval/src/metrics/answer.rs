//! Answer-stage scorers.

use std::collections::HashSet;

use super::{fraction_found, Scorer};
use crate::expectation::Expectation;
use crate::observation::Observation;

/// Phrases that mark an answer as a refusal.
pub const REJECTION_INDICATORS: &[&str] = &[
    "only answer questions about saudi arabia",
    "saudi arabia",
    "cannot answer",
    "not about saudi arabia",
];

const REQUIRED_WEIGHT: f64 = 0.7;
const PROHIBITED_PENALTY: f64 = 0.3;

/// Required phrases earn up to 0.7; prohibited phrases cost up to 0.3.
pub struct FactualAccuracy;

impl Scorer for FactualAccuracy {
    fn name(&self) -> &'static str {
        "factual_accuracy"
    }

    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64 {
        let answer = actual.answer();
        if answer.is_empty() {
            return 0.0;
        }

        let earned = fraction_found(answer, &expected.answer_should_contain) * REQUIRED_WEIGHT;
        let penalty =
            fraction_found(answer, &expected.answer_should_not_contain) * PROHIBITED_PENALTY;

        (earned - penalty).clamp(0.0, 1.0)
    }
}

/// Completeness bucket for an answer of `words` words.
pub fn completeness_bucket(words: usize) -> f64 {
    match words {
        0..=9 => 0.2,
        10..=49 => 0.5,
        50..=149 => 0.8,
        _ => 1.0,
    }
}

/// Closeness of the answer's length bucket to the expected completeness.
pub struct AnswerCompleteness;

impl Scorer for AnswerCompleteness {
    fn name(&self) -> &'static str {
        "answer_completeness"
    }

    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64 {
        let answer = actual.answer();
        if answer.is_empty() {
            return 0.0;
        }

        let bucket = completeness_bucket(answer.split_whitespace().count());
        (1.0 - (bucket - expected.completeness_score).abs()).max(0.0)
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Share of question words echoed in the answer, doubled and capped at 1.0.
pub struct AnswerRelevance;

impl Scorer for AnswerRelevance {
    fn name(&self) -> &'static str {
        "answer_relevance"
    }

    fn evaluate(&self, actual: &Observation, _expected: &Expectation) -> f64 {
        let question = word_set(actual.question.as_deref().unwrap_or(""));
        let answer = word_set(actual.answer());
        if question.is_empty() || answer.is_empty() {
            return 0.0;
        }

        let common = question.intersection(&answer).count();
        (common as f64 / question.len() as f64 * 2.0).min(1.0)
    }
}

/// Whether an expected refusal reads like one. Not applicable (1.0) otherwise.
pub struct RejectionAppropriateness;

impl Scorer for RejectionAppropriateness {
    fn name(&self) -> &'static str {
        "rejection_appropriateness"
    }

    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64 {
        if !expected.rejection_response {
            return 1.0;
        }

        let answer = actual.answer().to_lowercase();
        if REJECTION_INDICATORS.iter().any(|i| answer.contains(i)) {
            1.0
        } else {
            0.0
        }
    }
}
