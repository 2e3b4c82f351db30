//! Evaluation plan and success criteria.

use serde::Serialize;

use crate::fixtures::{ANSWER_DATASET, SEARCH_DATASET, VERIFICATION_DATASET};
use crate::metrics::MetricGroup;

/// A metric mean must be strictly greater than `threshold` to pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuccessCriterion {
    pub metric: &'static str,
    pub threshold: f64,
}

impl SuccessCriterion {
    pub fn passes(&self, mean: f64) -> bool {
        mean > self.threshold
    }
}

/// How one pipeline node is evaluated.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentPlan {
    pub component: &'static str,
    pub group: MetricGroup,
    pub dataset: &'static str,
    pub key_metrics: Vec<&'static str>,
    pub success_criteria: Vec<SuccessCriterion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationPlan {
    pub components: Vec<ComponentPlan>,
    pub approach: Vec<(&'static str, &'static str)>,
}

const CRITERIA: &[SuccessCriterion] = &[
    SuccessCriterion {
        metric: "exact_match",
        threshold: 0.90,
    },
    SuccessCriterion {
        metric: "search_relevance",
        threshold: 0.80,
    },
    SuccessCriterion {
        metric: "keyword_coverage",
        threshold: 0.70,
    },
    SuccessCriterion {
        metric: "factual_accuracy",
        threshold: 0.85,
    },
    SuccessCriterion {
        metric: "answer_completeness",
        threshold: 0.75,
    },
];

/// The success criterion for a metric, if it has one.
pub fn success_criterion(metric: &str) -> Option<SuccessCriterion> {
    CRITERIA.iter().find(|c| c.metric == metric).copied()
}

fn criteria(metrics: &[&str]) -> Vec<SuccessCriterion> {
    metrics.iter().filter_map(|m| success_criterion(m)).collect()
}

pub fn evaluation_plan() -> EvaluationPlan {
    EvaluationPlan {
        components: vec![
            ComponentPlan {
                component: "Question Verification Node",
                group: MetricGroup::Verification,
                dataset: VERIFICATION_DATASET,
                key_metrics: vec!["exact_match", "verification_confidence"],
                success_criteria: criteria(&["exact_match"]),
            },
            ComponentPlan {
                component: "Web Search Node",
                group: MetricGroup::Search,
                dataset: SEARCH_DATASET,
                key_metrics: vec!["search_relevance", "keyword_coverage", "source_authority"],
                success_criteria: criteria(&["search_relevance", "keyword_coverage"]),
            },
            ComponentPlan {
                component: "Answer Generation Node",
                group: MetricGroup::Answer,
                dataset: ANSWER_DATASET,
                key_metrics: vec!["factual_accuracy", "answer_completeness", "answer_relevance"],
                success_criteria: criteria(&["factual_accuracy", "answer_completeness"]),
            },
        ],
        approach: vec![
            ("individual_nodes", "Test each node in isolation with specific datasets"),
            ("end_to_end", "Test complete agent flow with integrated scenarios"),
            ("error_scenarios", "Test error handling and edge cases"),
            ("performance", "Measure response times"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strict() {
        let exact = success_criterion("exact_match").unwrap();
        assert!(!exact.passes(0.90));
        assert!(exact.passes(0.9375));
        assert!(success_criterion("source_authority").is_none());
    }

    #[test]
    fn test_plan_covers_node_datasets() {
        let plan = evaluation_plan();
        let datasets: Vec<_> = plan.components.iter().map(|c| c.dataset).collect();
        assert_eq!(datasets, vec![VERIFICATION_DATASET, SEARCH_DATASET, ANSWER_DATASET]);
        assert_eq!(plan.components[1].success_criteria.len(), 2);
    }
}
