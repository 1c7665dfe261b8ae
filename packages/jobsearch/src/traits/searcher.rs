//! Web search trait for the stage 2 search tool.

use async_trait::async_trait;

use crate::error::Result;

/// Web search provider seam.
///
/// Returns the raw provider payload rather than a typed result list: the
/// tool invoker hands the payload straight back into the reasoning step,
/// and typing happens at the stage contract. No caching, no
/// deduplication, no retry - a transient failure propagates unchanged.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web for the given query.
    async fn search(&self, query: &str) -> Result<serde_json::Value>;
}
