//! The three pipeline stages.
//!
//! Each stage consumes the state and returns the next one. Verify and answer
//! propagate LLM failures; search absorbs provider failures into its payload.

use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::pipeline::prompts::{format_answer_prompt, format_verify_prompt, parse_verdict, Verdict};
use crate::traits::{llm::LanguageModel, searcher::WebSearcher};
use crate::types::{format_hits, PipelineState, SearchDepth, SearchRequest, Stage, StageRecord, TopicScope};

/// Maximum number of search results requested.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Answer text kept in the audit record.
pub const ANSWER_PREVIEW_CHARS: usize = 100;

/// Classify the question and record the verdict.
pub async fn verify<L>(state: PipelineState, llm: &L, scope: &TopicScope) -> Result<PipelineState>
where
    L: LanguageModel + ?Sized,
{
    let prompt = format_verify_prompt(scope, state.question());
    let response = llm
        .complete(&prompt)
        .await
        .map_err(|source| PipelineError::Generation {
            stage: Stage::Verify,
            source,
        })?;

    let verdict = parse_verdict(&response);
    let reasoning = match verdict {
        Verdict::Unrecognized => {
            warn!(
                response = %response.trim(),
                "Unrecognized classification response, treating question as out of scope"
            );
            format!(
                "Verified if question relates to {}; unrecognized classification response defaulted to out of scope",
                scope.name
            )
        }
        _ => format!("Verified if question relates to {}", scope.name),
    };

    let in_scope = verdict.in_scope();
    debug!(in_scope, "Question verified");

    let record = StageRecord::new(Stage::Verify, state.question(), in_scope, reasoning);
    Ok(state.with_verdict(in_scope, record)?)
}

/// Search the web for an in-scope question.
///
/// Provider errors become a `Search failed: ...` payload and the run continues.
pub async fn search<S>(state: PipelineState, searcher: &S, scope: &TopicScope) -> Result<PipelineState>
where
    S: WebSearcher + ?Sized,
{
    let query = scope.search_query(state.question());
    let request = SearchRequest::new(&query)
        .with_depth(SearchDepth::Advanced)
        .with_max_results(MAX_SEARCH_RESULTS)
        .with_domains(scope.allowed_domains.iter().cloned());

    let (payload, record) = match searcher.search(&request).await {
        Ok(hits) => {
            debug!(query = %query, results = hits.len(), "Web search completed");
            let record = StageRecord::new(
                Stage::Search,
                &query,
                format!("Found {} results", hits.len()),
                format!("Web search completed with {} sources", hits.len()),
            );
            (format_hits(&hits), record)
        }
        Err(e) => {
            warn!(query = %query, error = %e, "Web search failed, continuing without results");
            let record = StageRecord::new(
                Stage::Search,
                &query,
                format!("Search error: {}", e),
                "Web search encountered an error; handled by answering without search context",
            );
            (format!("Search failed: {}", e), record)
        }
    };

    Ok(state.with_search_payload(payload, record)?)
}

/// Record a skipped search for an out-of-scope question.
pub fn skip_search(state: PipelineState, scope: &TopicScope) -> Result<PipelineState> {
    let record = StageRecord::new(
        Stage::Search,
        state.question(),
        format!("Skipped - not a {} question", scope.name),
        "Question verification failed",
    );
    Ok(state.with_search_payload("", record)?)
}

/// Produce the final answer: a fixed refusal out of scope, an LLM synthesis in scope.
pub async fn answer<L>(state: PipelineState, llm: &L, scope: &TopicScope) -> Result<PipelineState>
where
    L: LanguageModel + ?Sized,
{
    if !state.in_scope() {
        let record = StageRecord::new(
            Stage::Answer,
            format!("Non-{} question", scope.name),
            preview(&scope.refusal),
            format!("Provided standard response for non-{} questions", scope.name),
        );
        return Ok(state.with_answer(scope.refusal.clone(), record)?);
    }

    let prompt = format_answer_prompt(scope, state.question(), state.search_payload());
    let answer = llm
        .complete(&prompt)
        .await
        .map_err(|source| PipelineError::Generation {
            stage: Stage::Answer,
            source,
        })?;

    debug!(answer_len = answer.len(), "Answer generated");

    let record = StageRecord::new(
        Stage::Answer,
        state.question(),
        preview(&answer),
        "Generated answer based on search results",
    );
    Ok(state.with_answer(answer, record)?)
}

/// First 100 characters of an answer, with an ellipsis when cut.
pub fn preview(text: &str) -> String {
    if text.chars().count() <= ANSWER_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(ANSWER_PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}
