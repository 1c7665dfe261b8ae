//! Tavily-backed web searcher.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::security::{require_env, SecretString};
use crate::traits::WebSearcher;

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Web searcher over the Tavily search API.
pub struct TavilySearcher {
    client: reqwest::Client,
    api_key: SecretString,
    search_depth: String,
    max_results: usize,
}

#[derive(Serialize)]
struct SearchRequest {
    query: String,
    search_depth: String,
    max_results: usize,
}

impl TavilySearcher {
    /// Create a new Tavily searcher.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: SecretString::new(api_key),
            search_depth: "basic".to_string(),
            max_results: 10,
        }
    }

    /// Create from the `TAVILY_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = require_env("TAVILY_API_KEY")?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            search_depth: "basic".to_string(),
            max_results: 10,
        })
    }

    /// Set search depth ("basic" or "advanced").
    pub fn with_search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = depth.into();
        self
    }

    /// Set the per-query result limit.
    pub fn with_max_results(mut self, limit: usize) -> Self {
        self.max_results = limit;
        self
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, query: &str) -> Result<serde_json::Value> {
        let request = SearchRequest {
            query: query.to_string(),
            search_depth: self.search_depth.clone(),
            max_results: self.max_results,
        };

        let response = self
            .client
            .post(TAVILY_API_URL)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::search(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::search(format!(
                "Tavily API error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PipelineError::search(e.to_string()))
    }
}
