//! The `search` tool: stage 2's bridge to the search provider.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::PipelineError;
use crate::tools::Tool;
use crate::traits::WebSearcher;

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
}

/// Build the `search` tool over a search provider.
///
/// Delegates straight through: the raw provider payload goes back to the
/// model unchanged, and a transient provider failure propagates to the
/// caller and fails the stage.
pub fn search_tool(searcher: Arc<dyn WebSearcher>) -> Tool {
    Tool::new(
        "search",
        "Search the web for job postings. Returns the raw search results for the query.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to run."
                }
            },
            "required": ["query"]
        }),
        Box::new(move |args| {
            let searcher = searcher.clone();
            Box::pin(async move {
                let args: SearchArgs = serde_json::from_value(args)
                    .map_err(|e| PipelineError::model(format!("bad search arguments: {e}")))?;
                tracing::info!(query = %args.query, "search tool invoked");
                searcher.search(&args.query).await
            })
        }),
    )
}
