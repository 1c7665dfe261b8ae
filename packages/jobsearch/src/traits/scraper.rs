//! Page scraping trait for the stage 3 scrape tool.

use async_trait::async_trait;

use crate::error::Result;

/// Page scraping provider seam.
///
/// The extraction instruction carries the serialized target schema, so
/// the provider knows both what page to fetch and what shape to extract.
/// Best-effort: the payload is raw, semi-structured provider output.
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Extract structured data from a page.
    async fn scrape(
        &self,
        page_url: &str,
        extraction_instruction: &str,
    ) -> Result<serde_json::Value>;
}
