//! Search-stage scorers.

use qa_agent::Stage;

use super::{fraction_found, Scorer};
use crate::expectation::Expectation;
use crate::observation::Observation;

/// Domains counted as authoritative sources.
pub const AUTHORITATIVE_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "britannica.com",
    "bbc.com",
    "reuters.com",
    "cnn.com",
    "gov.sa",
    "spa.gov.sa",
    "aljazeera.com",
];

const AUTHORITY_PER_DOMAIN: f64 = 0.2;

fn keyword_fraction(actual: &Observation, expected: &Expectation) -> f64 {
    let payload = actual.payload();
    if payload.is_empty() {
        return 0.0;
    }
    fraction_found(payload, &expected.expected_keywords)
}

/// Fraction of expected keywords present in the search payload.
pub struct SearchRelevance;

impl Scorer for SearchRelevance {
    fn name(&self) -> &'static str {
        "search_relevance"
    }

    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64 {
        keyword_fraction(actual, expected)
    }
}

/// Same measure as [`SearchRelevance`], reported under its own name.
pub struct KeywordCoverage;

impl Scorer for KeywordCoverage {
    fn name(&self) -> &'static str {
        "keyword_coverage"
    }

    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64 {
        keyword_fraction(actual, expected)
    }
}

/// 0.2 per authoritative domain mentioned in the payload, capped at 1.0.
pub struct SourceAuthority;

impl Scorer for SourceAuthority {
    fn name(&self) -> &'static str {
        "source_authority"
    }

    fn evaluate(&self, actual: &Observation, _expected: &Expectation) -> f64 {
        let payload = actual.payload().to_lowercase();
        let found = AUTHORITATIVE_DOMAINS
            .iter()
            .filter(|d| payload.contains(*d))
            .count();
        (found as f64 * AUTHORITY_PER_DOMAIN).min(1.0)
    }
}

/// Whether the search ran (or was skipped) as expected.
pub struct SearchExecutionSuccess;

impl Scorer for SearchExecutionSuccess {
    fn name(&self) -> &'static str {
        "search_execution_success"
    }

    fn evaluate(&self, actual: &Observation, expected: &Expectation) -> f64 {
        let Some(record) = actual.record(Stage::Search) else {
            return if expected.should_search { 1.0 } else { 0.0 };
        };

        let passed = if expected.should_search {
            !record.output().mentions("error")
        } else {
            record.output().mentions("skipped")
        };
        if passed {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use qa_agent::StageRecord;

    fn payload(text: &str) -> Observation {
        Observation {
            search_payload: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn search_output(output: &str) -> Observation {
        let mut log = IndexMap::new();
        log.insert(
            Stage::Search,
            StageRecord::new(Stage::Search, "q", output, "reasoning"),
        );
        Observation {
            stage_log: Some(log),
            ..Default::default()
        }
    }

    fn keywords(words: &[&str]) -> Expectation {
        Expectation {
            expected_keywords: words.iter().map(|w| w.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_keyword_coverage() {
        let exp = keywords(&["Riyadh", "capital", "Saudi Arabia", "Najd"]);
        let obs = payload("Source: x\nTitle: Riyadh\nContent: The capital of saudi arabia\n");
        assert_eq!(KeywordCoverage.evaluate(&obs, &exp), 0.75);
        assert_eq!(SearchRelevance.evaluate(&obs, &exp), 0.75);
        assert_eq!(KeywordCoverage.evaluate(&payload(""), &exp), 0.0);
        assert_eq!(KeywordCoverage.evaluate(&obs, &keywords(&[])), 0.0);
    }

    #[test]
    fn test_source_authority_counts_domains() {
        let obs = payload(
            "Source: https://en.wikipedia.org/wiki/Riyadh\n\nSource: https://www.bbc.com/news\n",
        );
        assert!((SourceAuthority.evaluate(&obs, &Expectation::default()) - 0.4).abs() < 1e-9);

        let all = payload(&AUTHORITATIVE_DOMAINS.join(" "));
        assert_eq!(SourceAuthority.evaluate(&all, &Expectation::default()), 1.0);
    }

    #[test]
    fn test_search_execution_success() {
        let should_run = Expectation::default();
        let should_skip = Expectation {
            should_search: false,
            ..Default::default()
        };

        assert_eq!(SearchExecutionSuccess.evaluate(&search_output("Found 5 results"), &should_run), 1.0);
        assert_eq!(
            SearchExecutionSuccess.evaluate(&search_output("Search error: timeout"), &should_run),
            0.0
        );
        assert_eq!(
            SearchExecutionSuccess.evaluate(
                &search_output("Skipped - not a Saudi Arabia question"),
                &should_skip
            ),
            1.0
        );
        assert_eq!(SearchExecutionSuccess.evaluate(&search_output("Found 5 results"), &should_skip), 0.0);
    }
}
