//! The restricted topic the assistant answers about.

/// Topic restriction applied by the verify, search, and answer stages.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicScope {
    /// Human-readable topic name, used in prompts and audit reasoning.
    pub name: String,

    /// Term prefixed to every search query.
    pub query_qualifier: String,

    /// Authoritative domains the search is restricted to.
    pub allowed_domains: Vec<String>,

    /// Answer given to out-of-scope questions.
    pub refusal: String,

    /// Criteria listed in the classification prompt.
    pub criteria: Vec<String>,
}

/// Domains searched for in-scope questions.
pub const SEARCH_DOMAINS: [&str; 4] = ["wikipedia.org", "britannica.com", "bbc.com", "reuters.com"];

/// Fixed refusal for out-of-scope questions.
pub const REFUSAL_MESSAGE: &str = "I can only answer questions about Saudi Arabia. Please ask a question related to Saudi Arabia's geography, culture, history, economy, or current affairs.";

impl TopicScope {
    pub fn saudi_arabia() -> Self {
        Self {
            name: "Saudi Arabia".to_string(),
            query_qualifier: "Saudi Arabia".to_string(),
            allowed_domains: SEARCH_DOMAINS.iter().map(|d| d.to_string()).collect(),
            refusal: REFUSAL_MESSAGE.to_string(),
            criteria: vec![
                "Does it explicitly mention Saudi Arabia, KSA, or Kingdom of Saudi Arabia?".into(),
                "Does it ask about Saudi cities (Riyadh, Jeddah, Mecca, Medina, etc.)?".into(),
                "Does it ask about Saudi culture, history, economy, politics, or geography?".into(),
                "Does it ask about Saudi rulers, royal family, or government?".into(),
                "Does it ask about Saudi landmarks, traditions, or events?".into(),
            ],
        }
    }

    /// Search query for a question: the qualifier followed by the raw question.
    pub fn search_query(&self, question: &str) -> String {
        format!("{} {}", self.query_qualifier, question)
    }
}

impl Default for TopicScope {
    fn default() -> Self {
        Self::saudi_arabia()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_prefixes_qualifier() {
        let scope = TopicScope::default();
        assert_eq!(
            scope.search_query("What is the capital?"),
            "Saudi Arabia What is the capital?"
        );
    }

    #[test]
    fn test_default_domains() {
        let scope = TopicScope::default();
        assert_eq!(scope.allowed_domains.len(), 4);
        assert!(scope.allowed_domains.iter().any(|d| d == "reuters.com"));
    }
}
