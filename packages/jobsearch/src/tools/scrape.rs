//! The `scrape` tool: stage 3's bridge to the scraping provider.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::PipelineError;
use crate::security::UrlValidator;
use crate::tools::Tool;
use crate::traits::PageScraper;

#[derive(Deserialize)]
struct ScrapeArgs {
    page_url: String,
}

/// Build the `scrape` tool over a scraping provider.
///
/// The extraction instruction (serialized target schema) is fixed when
/// the tool is built; the model only supplies the page URL. Target URLs
/// are SSRF-validated before any outbound call.
///
/// A failed scrape does not fail the run: the failure is logged and
/// returned to the model as an `{page_url, error}` payload, so the model
/// can skip that posting and the result is simply absent from the stage
/// artifact.
pub fn scrape_tool(
    scraper: Arc<dyn PageScraper>,
    validator: UrlValidator,
    extraction_instruction: String,
) -> Tool {
    Tool::new(
        "scrape",
        "Extract structured job details from a posting page. Returns the page URL with the extracted payload, or an error field if the page could not be scraped.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "page_url": {
                    "type": "string",
                    "description": "URL of the job posting page to scrape."
                }
            },
            "required": ["page_url"]
        }),
        Box::new(move |args| {
            let scraper = scraper.clone();
            let validator = validator.clone();
            let instruction = extraction_instruction.clone();
            Box::pin(async move {
                let args: ScrapeArgs = serde_json::from_value(args)
                    .map_err(|e| PipelineError::model(format!("bad scrape arguments: {e}")))?;

                if let Err(violation) = validator.validate(&args.page_url) {
                    tracing::warn!(url = %args.page_url, %violation, "scrape target blocked");
                    return Ok(serde_json::json!({
                        "page_url": args.page_url,
                        "error": format!("blocked: {violation}"),
                    }));
                }

                tracing::info!(url = %args.page_url, "scrape tool invoked");
                match scraper.scrape(&args.page_url, &instruction).await {
                    Ok(payload) => Ok(serde_json::json!({
                        "page_url": args.page_url,
                        "payload": payload,
                    })),
                    Err(e) => {
                        tracing::warn!(url = %args.page_url, error = %e, "scrape failed, dropping result");
                        Ok(serde_json::json!({
                            "page_url": args.page_url,
                            "error": e.to_string(),
                        }))
                    }
                }
            })
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::tools::ToolSet;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedScraper;

    #[async_trait]
    impl PageScraper for FixedScraper {
        async fn scrape(&self, page_url: &str, instruction: &str) -> Result<serde_json::Value> {
            assert!(instruction.contains("source_url"));
            Ok(json!({"title": "Data Engineer", "from": page_url}))
        }
    }

    struct FailingScraper;

    #[async_trait]
    impl PageScraper for FailingScraper {
        async fn scrape(&self, _: &str, _: &str) -> Result<serde_json::Value> {
            Err(PipelineError::scrape("HTTP 503"))
        }
    }

    fn instruction() -> String {
        r#"Extract {"source_url": "..."} from the page."#.to_string()
    }

    #[tokio::test]
    async fn wraps_payload_with_page_url() {
        let tools = ToolSet::new().with_tool(scrape_tool(
            Arc::new(FixedScraper),
            UrlValidator::new(),
            instruction(),
        ));
        let payload = tools
            .dispatch("scrape", json!({"page_url": "https://example.com/job"}))
            .await
            .unwrap();
        assert_eq!(payload["page_url"], "https://example.com/job");
        assert_eq!(payload["payload"]["title"], "Data Engineer");
    }

    #[tokio::test]
    async fn scrape_failure_becomes_error_payload() {
        let tools = ToolSet::new().with_tool(scrape_tool(
            Arc::new(FailingScraper),
            UrlValidator::new(),
            instruction(),
        ));
        let payload = tools
            .dispatch("scrape", json!({"page_url": "https://example.com/dead"}))
            .await
            .unwrap();
        assert_eq!(payload["page_url"], "https://example.com/dead");
        assert!(payload["error"].as_str().unwrap().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn blocked_url_becomes_error_payload_without_provider_call() {
        // FailingScraper would error if reached; the validator stops it.
        let tools = ToolSet::new().with_tool(scrape_tool(
            Arc::new(FailingScraper),
            UrlValidator::new(),
            instruction(),
        ));
        let payload = tools
            .dispatch("scrape", json!({"page_url": "http://169.254.169.254/meta"}))
            .await
            .unwrap();
        assert!(payload["error"].as_str().unwrap().contains("blocked"));
    }
}
