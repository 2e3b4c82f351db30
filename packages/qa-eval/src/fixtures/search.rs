use serde_json::json;

use super::{Dataset, DatasetItem, SEARCH_DATASET};

pub(super) fn dataset() -> Dataset {
    Dataset::new(
        SEARCH_DATASET,
        "Dataset for evaluating web search quality and relevance",
        items(),
    )
    .with_primary_metrics(&[
        "search_relevance",
        "keyword_coverage",
        "source_authority",
        "search_execution_success",
    ])
}

fn items() -> Vec<DatasetItem> {
    vec![
        DatasetItem::new(
            json!({"question": "What is the capital of Saudi Arabia?", "is_saudi_question": true}),
            json!({"should_search": true, "expected_keywords": ["Riyadh", "capital", "Saudi Arabia"], "quality_criteria": ["accurate", "recent", "authoritative_source"]}),
            json!({"category": "geography", "search_complexity": "simple"}),
        ),
        DatasetItem::new(
            json!({"question": "What is Vision 2030 Saudi Arabia?", "is_saudi_question": true}),
            json!({"should_search": true, "expected_keywords": ["Vision 2030", "economic reform", "Mohammed bin Salman", "diversification"], "quality_criteria": ["comprehensive", "recent", "official_sources"]}),
            json!({"category": "economy", "search_complexity": "complex"}),
        ),
        DatasetItem::new(
            json!({"question": "Who is the current king of Saudi Arabia?", "is_saudi_question": true}),
            json!({"should_search": true, "expected_keywords": ["King Salman", "Saudi Arabia", "monarch", "royal family"], "quality_criteria": ["current", "accurate", "authoritative"]}),
            json!({"category": "politics", "search_complexity": "simple"}),
        ),
        DatasetItem::new(
            json!({"question": "What is the weather in London?", "is_saudi_question": false}),
            json!({"should_search": false, "search_results": "skipped", "reason": "not_saudi_question"}),
            json!({"category": "geography", "search_complexity": "skip"}),
        ),
    ]
}
