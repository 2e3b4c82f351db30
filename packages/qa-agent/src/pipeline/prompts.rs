//! LLM prompts for the verify and answer stages.

use crate::types::TopicScope;

/// Prompt asking whether a question falls within the restricted topic.
pub const VERIFY_PROMPT: &str = r#"Analyze the following question and determine if it is asking about {topic}.

Question: "{question}"

Consider these criteria:
{criteria}

Respond with ONLY "true" or "false" - nothing else."#;

/// Prompt for drafting an answer from search results.
pub const ANSWER_PROMPT: &str = r#"You are an expert on {topic}. Based on the search results below, provide a comprehensive and accurate answer to the user's question.

Question: {question}

Search Results:
{search_results}

Instructions:
- Answer using only the information in the search results above
- If the search results are insufficient, acknowledge the limitations
- Include relevant details about {topic}
- Maintain factual accuracy
- Structure your response clearly"#;

/// Format the classification prompt for a question.
pub fn format_verify_prompt(scope: &TopicScope, question: &str) -> String {
    let criteria = scope
        .criteria
        .iter()
        .map(|c| format!("- {}", c))
        .collect::<Vec<_>>()
        .join("\n");

    VERIFY_PROMPT
        .replace("{topic}", &scope.name)
        .replace("{criteria}", &criteria)
        .replace("{question}", question)
}

/// Format the answer prompt with the full search payload.
pub fn format_answer_prompt(scope: &TopicScope, question: &str, search_results: &str) -> String {
    ANSWER_PROMPT
        .replace("{topic}", &scope.name)
        .replace("{question}", question)
        .replace("{search_results}", search_results)
}

/// Interpret a classification response. Anything other than `true` is out of scope.
pub fn parse_verdict(response: &str) -> Verdict {
    match response.trim().to_lowercase().as_str() {
        "true" => Verdict::InScope,
        "false" => Verdict::OutOfScope,
        _ => Verdict::Unrecognized,
    }
}

/// Outcome of parsing a classification response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    InScope,
    OutOfScope,
    /// Malformed response; treated as out of scope.
    Unrecognized,
}

impl Verdict {
    pub fn in_scope(&self) -> bool {
        matches!(self, Self::InScope)
    }
}
