//! LLM completion trait.
//!
//! The pipeline needs exactly one capability from a language model: turn a
//! prompt into text. Classification and answer drafting both go through it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::LlmError;

/// Text completion service.
///
/// Implementations should run at a low, fixed temperature; the verify stage
/// relies on near-deterministic `true`/`false` answers.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a prompt and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for run metadata.
    fn model_id(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}
