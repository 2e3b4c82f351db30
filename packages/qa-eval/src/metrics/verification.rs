//! Verification-stage scorers.

use qa_agent::Stage;

use super::{contains_ci, Scorer};
use crate::expectation::Expectation;
use crate::observation::Observation;

/// Words that suggest the classifier's reasoning was decisive.
pub const CONFIDENCE_INDICATORS: &[&str] = &[
    "verified",
    "analyzed",
    "determined",
    "confirmed",
    "saudi arabia",
    "clear",
    "explicit",
];

/// 1.0 iff the classification matches. 0.0 when either side is absent.
pub struct ExactMatch;

impl Scorer for ExactMatch {
    fn name(&self) -> &'static str {
        "exact_match"
    }

    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64 {
        match (actual.in_scope, expected.in_scope) {
            (Some(a), Some(e)) if a == e => 1.0,
            _ => 0.0,
        }
    }
}

/// Confidence indicators in the verify reasoning, a third of a point each.
pub struct VerificationConfidence;

impl Scorer for VerificationConfidence {
    fn name(&self) -> &'static str {
        "verification_confidence"
    }

    fn evaluate(&self, actual: &Observation, _expected: &Expectation) -> f64 {
        let reasoning = actual
            .record(Stage::Verify)
            .map(|r| r.reasoning())
            .unwrap_or("");

        let hits = CONFIDENCE_INDICATORS
            .iter()
            .filter(|i| contains_ci(reasoning, i))
            .count();

        (hits as f64 / 3.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use qa_agent::StageRecord;

    fn with_verdict(in_scope: Option<bool>) -> Observation {
        Observation {
            in_scope,
            ..Default::default()
        }
    }

    fn expecting(in_scope: Option<bool>) -> Expectation {
        Expectation {
            in_scope,
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_match_truth_table() {
        for a in [true, false] {
            for e in [true, false] {
                let score = ExactMatch.evaluate(&with_verdict(Some(a)), &expecting(Some(e)));
                assert_eq!(score, if a == e { 1.0 } else { 0.0 });
            }
        }
        assert_eq!(ExactMatch.evaluate(&with_verdict(None), &expecting(Some(true))), 0.0);
        assert_eq!(ExactMatch.evaluate(&with_verdict(Some(true)), &expecting(None)), 0.0);
    }

    #[test]
    fn test_confidence_from_reasoning() {
        let mut log = IndexMap::new();
        log.insert(
            Stage::Verify,
            StageRecord::new(
                Stage::Verify,
                "q",
                true,
                "Verified if question relates to Saudi Arabia",
            ),
        );
        let obs = Observation {
            stage_log: Some(log),
            ..Default::default()
        };

        // "verified" and "saudi arabia"
        let score = VerificationConfidence.evaluate(&obs, &Expectation::default());
        assert!((score - 2.0 / 3.0).abs() < 1e-9);

        assert_eq!(
            VerificationConfidence.evaluate(&Observation::default(), &Expectation::default()),
            0.0
        );
    }
}
