use serde_json::json;

use super::{Dataset, DatasetItem, ANSWER_DATASET};

pub(super) fn dataset() -> Dataset {
    Dataset::new(
        ANSWER_DATASET,
        "Dataset for assessing final answer quality and accuracy",
        items(),
    )
    .with_primary_metrics(&[
        "factual_accuracy",
        "answer_completeness",
        "answer_relevance",
        "rejection_appropriateness",
    ])
}

fn items() -> Vec<DatasetItem> {
    vec![
        DatasetItem::new(
            json!({"question": "What is the capital of Saudi Arabia?", "search_results": "Riyadh is the capital and largest city of Saudi Arabia. Located in the center of the country, it serves as the political and administrative center.", "is_saudi_question": true}),
            json!({"answer_should_contain": ["Riyadh", "capital", "Saudi Arabia"], "answer_should_not_contain": ["uncertain", "I don't know"], "factual_accuracy": true, "completeness_score": 0.9}),
            json!({"category": "geography", "answer_type": "factual"}),
        ),
        DatasetItem::new(
            json!({"question": "Tell me about Vision 2030", "search_results": "Vision 2030 is Saudi Arabia's strategic framework to reduce dependence on oil, diversify the economy, and develop public service sectors such as health, education, infrastructure, recreation, and tourism.", "is_saudi_question": true}),
            json!({"answer_should_contain": ["Vision 2030", "economic diversification", "oil dependence", "development"], "answer_should_not_contain": ["unclear", "insufficient information"], "factual_accuracy": true, "completeness_score": 0.8}),
            json!({"category": "economy", "answer_type": "explanatory"}),
        ),
        DatasetItem::new(
            json!({"question": "What is the weather in Paris?", "search_results": "", "is_saudi_question": false}),
            json!({"answer_should_contain": ["Saudi Arabia", "only answer questions about Saudi Arabia"], "rejection_response": true, "helpful_redirect": true}),
            json!({"category": "rejection", "answer_type": "redirect"}),
        ),
    ]
}
