//! Tavily web search as a [`WebSearcher`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::error::SearchError;
use crate::security::SecretString;
use crate::traits::searcher::WebSearcher;
use crate::types::{SearchHit, SearchRequest};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Tavily search request.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'static str,
    include_domains: &'a [String],
    max_results: usize,
}

/// Tavily search response.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// A single Tavily search result. Any field may be missing.
#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: Option<String>,
    title: Option<String>,
    content: Option<String>,
}

impl From<TavilyResult> for SearchHit {
    fn from(r: TavilyResult) -> Self {
        SearchHit::new(
            r.url.unwrap_or_else(|| "Unknown".into()),
            r.title.unwrap_or_else(|| "No title".into()),
            r.content.unwrap_or_else(|| "No content".into()),
        )
    }
}

/// Searcher backed by the Tavily API.
pub struct TavilySearcher {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
}

impl TavilySearcher {
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
        })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, SearchError> {
        Self::new(config.tavily_api_key.clone())
    }

    /// Point at a different endpoint (for proxies or local stubs).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

fn to_tavily(request: &SearchRequest) -> TavilyRequest<'_> {
    TavilyRequest {
        query: &request.query,
        search_depth: request.depth.as_str(),
        include_domains: &request.include_domains,
        max_results: request.max_results,
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::Config("Tavily API key is empty".into()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&to_tavily(request))
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Tavily API error");
            return Err(SearchError::Api(format!("{}: {}", status, error_text)));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        let hits: Vec<SearchHit> = body
            .results
            .into_iter()
            .take(request.max_results)
            .map(SearchHit::from)
            .collect();

        debug!(query = %request.query, results = hits.len(), "Tavily search");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchDepth;

    #[test]
    fn test_request_body() {
        let request = SearchRequest::new("Saudi Arabia capital")
            .with_depth(SearchDepth::Advanced)
            .with_max_results(5)
            .with_domains(["wikipedia.org", "bbc.com"]);
        let body = serde_json::to_value(to_tavily(&request)).unwrap();

        assert_eq!(body["query"], "Saudi Arabia capital");
        assert_eq!(body["search_depth"], "advanced");
        assert_eq!(body["max_results"], 5);
        assert_eq!(body["include_domains"], serde_json::json!(["wikipedia.org", "bbc.com"]));
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let raw = r#"{"results":[{"url":"https://www.bbc.com/news"},{"title":"Only title"}]}"#;
        let parsed: TavilyResponse = serde_json::from_str(raw).unwrap();
        let hits: Vec<SearchHit> = parsed.results.into_iter().map(SearchHit::from).collect();

        assert_eq!(hits[0].title, "No title");
        assert_eq!(hits[0].content, "No content");
        assert_eq!(hits[1].url, "Unknown");
    }

    #[test]
    fn test_missing_results_is_empty() {
        let parsed: TavilyResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_key_is_config_error() {
        let searcher = TavilySearcher::new("").unwrap();
        let err = searcher.search(&SearchRequest::new("q")).await.unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[tokio::test]
    #[ignore = "requires TAVILY_API_KEY"]
    async fn test_live_search() {
        let config = AgentConfig::from_env().unwrap();
        let searcher = TavilySearcher::from_config(&config).unwrap();
        let hits = searcher
            .search(&SearchRequest::new("Saudi Arabia capital city"))
            .await
            .unwrap();
        assert!(hits.len() <= 5);
    }
}
