//! Stage 1 artifact: suggested search queries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single search-engine query.
///
/// Immutable once emitted by stage 1; consumed as input to stage 2's
/// search tool calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchQuery {
    /// The query string, typically using search-engine operators.
    pub text: String,
}

impl SearchQuery {
    /// Create a new query.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The validated stage 1 artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestedQueries {
    /// Suggested search queries, 1 up to the configured query budget.
    pub queries: Vec<SearchQuery>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let artifact = SuggestedQueries {
            queries: vec![
                SearchQuery::new("\"Data Engineer\" jobs France"),
                SearchQuery::new("intitle:\"Data Engineer\" inurl:careers"),
            ],
        };
        let json = serde_json::to_value(&artifact).unwrap();
        let back: SuggestedQueries = serde_json::from_value(json).unwrap();
        assert_eq!(artifact, back);
    }
}
