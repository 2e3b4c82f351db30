//! Name-keyed scorer registry and composite scoring.

use indexmap::IndexMap;

use super::answer::{AnswerCompleteness, AnswerRelevance, FactualAccuracy, RejectionAppropriateness};
use super::end_to_end::{ErrorHandlingQuality, OverallTaskSuccess, ResponseTimeScore};
use super::search::{KeywordCoverage, SearchExecutionSuccess, SearchRelevance, SourceAuthority};
use super::verification::{ExactMatch, VerificationConfidence};
use super::{MetricGroup, Scorer, Weights};
use crate::expectation::Expectation;
use crate::observation::Observation;

/// Scorers keyed by name, in registration order.
#[derive(Default)]
pub struct ScorerRegistry {
    scorers: IndexMap<&'static str, Box<dyn Scorer>>,
}

impl ScorerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard scorers of one group.
    pub fn for_group(group: MetricGroup) -> Self {
        let registry = Self::new();
        match group {
            MetricGroup::Verification => registry
                .with(ExactMatch)
                .with(VerificationConfidence),
            MetricGroup::Search => registry
                .with(SearchRelevance)
                .with(KeywordCoverage)
                .with(SourceAuthority)
                .with(SearchExecutionSuccess),
            MetricGroup::Answer => registry
                .with(FactualAccuracy)
                .with(AnswerCompleteness)
                .with(AnswerRelevance)
                .with(RejectionAppropriateness),
            MetricGroup::EndToEnd => registry
                .with(OverallTaskSuccess)
                .with(ResponseTimeScore::default())
                .with(ErrorHandlingQuality),
        }
    }

    /// Every standard scorer across all groups.
    pub fn all() -> Self {
        let mut registry = Self::new();
        for group in MetricGroup::ALL {
            for (name, scorer) in Self::for_group(group).scorers {
                registry.scorers.insert(name, scorer);
            }
        }
        registry
    }

    /// Add a scorer, replacing any scorer with the same name.
    pub fn with(mut self, scorer: impl Scorer + 'static) -> Self {
        self.register(Box::new(scorer));
        self
    }

    pub fn register(&mut self, scorer: Box<dyn Scorer>) {
        self.scorers.insert(scorer.name(), scorer);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Scorer> {
        self.scorers.get(name).map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.scorers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    /// Apply every scorer to one run.
    pub fn score(&self, actual: &Observation, expected: &Expectation) -> IndexMap<String, f64> {
        self.scorers
            .iter()
            .map(|(name, scorer)| (name.to_string(), scorer.evaluate(actual, expected)))
            .collect()
    }
}

/// Weighted mean of metric scores.
///
/// Without weights this is the arithmetic mean. Metrics missing from
/// `weights` get weight 1.0. No scores, or a zero total weight, gives 0.0.
pub fn composite_score(scores: &IndexMap<String, f64>, weights: Option<&Weights>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let Some(weights) = weights else {
        return scores.values().sum::<f64>() / scores.len() as f64;
    };

    let weight = |metric: &String| weights.get(metric).copied().unwrap_or(1.0);
    let total_weight: f64 = scores.keys().map(weight).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = scores.iter().map(|(m, s)| s * weight(m)).sum();
    weighted / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_group_registries() {
        assert_eq!(
            ScorerRegistry::for_group(MetricGroup::Verification).names(),
            vec!["exact_match", "verification_confidence"]
        );
        assert_eq!(
            ScorerRegistry::for_group(MetricGroup::Search).names(),
            vec![
                "search_relevance",
                "keyword_coverage",
                "source_authority",
                "search_execution_success"
            ]
        );
        assert_eq!(ScorerRegistry::for_group(MetricGroup::Answer).len(), 4);
        assert_eq!(
            ScorerRegistry::for_group(MetricGroup::EndToEnd).names(),
            vec!["overall_task_success", "response_time_score", "error_handling_quality"]
        );
        assert_eq!(ScorerRegistry::all().len(), 13);
    }

    #[test]
    fn test_registered_scorer_replaces_same_name() {
        struct AlwaysHalf;
        impl Scorer for AlwaysHalf {
            fn name(&self) -> &'static str {
                "exact_match"
            }
            fn evaluate(&self, _: &Observation, _: &Expectation) -> f64 {
                0.5
            }
        }

        let registry = ScorerRegistry::for_group(MetricGroup::Verification).with(AlwaysHalf);
        assert_eq!(registry.len(), 2);
        let scores = registry.score(&Observation::default(), &Expectation::default());
        assert_eq!(scores["exact_match"], 0.5);
    }

    #[test]
    fn test_composite_weights() {
        let scores: IndexMap<String, f64> =
            [("a".to_string(), 1.0), ("b".to_string(), 0.0)].into_iter().collect();

        assert_eq!(composite_score(&scores, None), 0.5);

        let weights: Weights = [("a".to_string(), 3.0)].into_iter().collect();
        assert_eq!(composite_score(&scores, Some(&weights)), 0.75);

        let zero: Weights = [("a".to_string(), 0.0), ("b".to_string(), 0.0)].into_iter().collect();
        assert_eq!(composite_score(&scores, Some(&zero)), 0.0);
        assert_eq!(composite_score(&IndexMap::new(), None), 0.0);
    }

    proptest! {
        #[test]
        fn composite_without_weights_is_mean(values in prop::collection::vec(0.0f64..=1.0, 1..12)) {
            let scores: IndexMap<String, f64> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("m{}", i), *v))
                .collect();
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            prop_assert!((composite_score(&scores, None) - mean).abs() < 1e-9);
        }

        #[test]
        fn composite_stays_in_unit_range(
            values in prop::collection::vec(0.0f64..=1.0, 1..8),
            weight in 0.01f64..10.0,
        ) {
            let scores: IndexMap<String, f64> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("m{}", i), *v))
                .collect();
            let weights: Weights = [("m0".to_string(), weight)].into_iter().collect();
            let score = composite_score(&scores, Some(&weights));
            prop_assert!((0.0..=1.0 + 1e-9).contains(&score));
        }
    }
}
