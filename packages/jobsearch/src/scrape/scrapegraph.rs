//! ScrapeGraph-backed page scraper.
//!
//! Uses the smartscraper endpoint: the page URL plus a natural-language
//! extraction instruction (which for this pipeline embeds the serialized
//! job schema) go in, a best-effort structured payload comes out.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::security::{require_env, SecretString};
use crate::traits::PageScraper;

const SCRAPEGRAPH_API_URL: &str = "https://api.scrapegraphai.com/v1";

/// Page scraper over the ScrapeGraph API.
pub struct ScrapeGraphScraper {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

#[derive(Serialize)]
struct SmartScraperRequest {
    website_url: String,
    user_prompt: String,
}

impl ScrapeGraphScraper {
    /// Create a new ScrapeGraph scraper.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| PipelineError::scrape(e.to_string()))?;

        Ok(Self {
            client,
            api_key: SecretString::new(api_key),
            base_url: SCRAPEGRAPH_API_URL.to_string(),
        })
    }

    /// Create from the `SCRAPEGRAPH_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = require_env("SCRAPEGRAPH_API_KEY")?;
        Self::new(api_key.expose().to_string())
    }

    /// Set a custom base URL (for proxies or self-hosted gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl PageScraper for ScrapeGraphScraper {
    async fn scrape(
        &self,
        page_url: &str,
        extraction_instruction: &str,
    ) -> Result<serde_json::Value> {
        let request = SmartScraperRequest {
            website_url: page_url.to_string(),
            user_prompt: extraction_instruction.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/smartscraper", self.base_url))
            .header("SGAI-APIKEY", self.api_key.expose())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::scrape(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::scrape(format!(
                "ScrapeGraph API error: {status} - {text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PipelineError::scrape(e.to_string()))
    }
}
