use serde_json::json;

use super::{Dataset, DatasetItem, VERIFICATION_DATASET};

pub(super) fn dataset() -> Dataset {
    Dataset::new(
        VERIFICATION_DATASET,
        "Dataset for testing Saudi Arabia question verification accuracy",
        items(),
    )
    .with_primary_metrics(&["exact_match", "verification_confidence"])
}

fn items() -> Vec<DatasetItem> {
    vec![
        DatasetItem::new(
            json!({"question": "What is the capital of Saudi Arabia?"}),
            json!({"is_saudi_question": true}),
            json!({"category": "geography", "difficulty": "easy", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "Who is the current Crown Prince of Saudi Arabia?"}),
            json!({"is_saudi_question": true}),
            json!({"category": "politics", "difficulty": "medium", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "Tell me about the history of Mecca"}),
            json!({"is_saudi_question": true}),
            json!({"category": "history_religion", "difficulty": "medium", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "What is Vision 2030 in Saudi Arabia?"}),
            json!({"is_saudi_question": true}),
            json!({"category": "economy", "difficulty": "medium", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "How is the weather in Riyadh?"}),
            json!({"is_saudi_question": true}),
            json!({"category": "geography", "difficulty": "easy", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "What are the main industries in KSA?"}),
            json!({"is_saudi_question": true}),
            json!({"category": "economy", "difficulty": "medium", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "Describe Saudi Arabian culture and traditions"}),
            json!({"is_saudi_question": true}),
            json!({"category": "culture", "difficulty": "medium", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "What is the population of Jeddah?"}),
            json!({"is_saudi_question": true}),
            json!({"category": "geography", "difficulty": "easy", "type": "positive"}),
        ),
        DatasetItem::new(
            json!({"question": "What is the capital of Egypt?"}),
            json!({"is_saudi_question": false}),
            json!({"category": "geography", "difficulty": "easy", "type": "negative"}),
        ),
        DatasetItem::new(
            json!({"question": "Tell me about the weather in London"}),
            json!({"is_saudi_question": false}),
            json!({"category": "geography", "difficulty": "easy", "type": "negative"}),
        ),
        DatasetItem::new(
            json!({"question": "Who is the President of the United States?"}),
            json!({"is_saudi_question": false}),
            json!({"category": "politics", "difficulty": "easy", "type": "negative"}),
        ),
        DatasetItem::new(
            json!({"question": "What is machine learning?"}),
            json!({"is_saudi_question": false}),
            json!({"category": "technology", "difficulty": "easy", "type": "negative"}),
        ),
        DatasetItem::new(
            json!({"question": "How do I cook pasta?"}),
            json!({"is_saudi_question": false}),
            json!({"category": "cooking", "difficulty": "easy", "type": "negative"}),
        ),
        DatasetItem::new(
            json!({"question": "Compare Saudi Arabia with UAE economy"}),
            json!({"is_saudi_question": true}),
            json!({"category": "economy", "difficulty": "hard", "type": "edge_case"}),
        ),
        DatasetItem::new(
            json!({"question": "What are the differences between Sunni and Shia Islam?"}),
            json!({"is_saudi_question": false}),
            json!({"category": "religion", "difficulty": "hard", "type": "edge_case"}),
        ),
        DatasetItem::new(
            json!({"question": "Arab world oil production statistics"}),
            json!({"is_saudi_question": false}),
            json!({"category": "economy", "difficulty": "hard", "type": "edge_case"}),
        ),
    ]
}
