//! Stage 2 artifact: collected search results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum number of results stage 2 must collect.
pub const MIN_SEARCH_HITS: usize = 20;

/// One search result, tagged with the query that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    /// Result title as reported by the search provider.
    pub title: String,

    /// URL of the result page.
    pub url: String,

    /// Snippet or content excerpt from the provider.
    pub snippet: String,

    /// The stage 1 query that surfaced this result.
    pub originating_query: String,
}

/// The validated stage 2 artifact.
///
/// Ownership passes to stage 3 as read-only input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHits {
    /// Collected results, at least [`MIN_SEARCH_HITS`] of them.
    pub hits: Vec<SearchHit>,
}
