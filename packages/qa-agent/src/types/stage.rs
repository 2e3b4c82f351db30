//! Stage identifiers and audit records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of pipeline work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Verify,
    Search,
    Answer,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 3] = [Stage::Verify, Stage::Search, Stage::Answer];

    /// Stable name used as the stage log key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Search => "search",
            Self::Answer => "answer",
        }
    }

    /// Parse a stage from its log key.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary result of a stage.
///
/// Verification produces a flag; search and answer produce text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageOutput {
    Flag(bool),
    Text(String),
}

impl StageOutput {
    /// Text form of the output, used by keyword-based metrics.
    pub fn as_text(&self) -> String {
        match self {
            Self::Flag(flag) => flag.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Case-insensitive substring test on the text form.
    pub fn mentions(&self, needle: &str) -> bool {
        self.as_text()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

impl From<bool> for StageOutput {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<String> for StageOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for StageOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Audit entry for one executed stage. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    stage: Stage,
    input: String,
    output: StageOutput,
    reasoning: String,
}

impl StageRecord {
    pub fn new(
        stage: Stage,
        input: impl Into<String>,
        output: impl Into<StageOutput>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            input: input.into(),
            output: output.into(),
            reasoning: reasoning.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Echo of what the stage consumed.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &StageOutput {
        &self.output
    }

    /// Free-text justification.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(Stage::parse("done"), None);
    }

    #[test]
    fn test_stage_serializes_lowercase() {
        let json = serde_json::to_string(&Stage::Answer).unwrap();
        assert_eq!(json, "\"answer\"");
    }

    #[test]
    fn test_output_mentions_is_case_insensitive() {
        let output = StageOutput::from("Skipped - question is out of scope");
        assert!(output.mentions("skipped"));
        assert!(!output.mentions("error"));
        assert!(StageOutput::Flag(true).mentions("TRUE"));
    }

    #[test]
    fn test_untagged_output_deserializes_both_forms() {
        let flag: StageOutput = serde_json::from_str("false").unwrap();
        assert_eq!(flag, StageOutput::Flag(false));
        let text: StageOutput = serde_json::from_str("\"Found 3 results\"").unwrap();
        assert_eq!(text, StageOutput::Text("Found 3 results".into()));
    }
}
