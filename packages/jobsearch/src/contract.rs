//! Schema contracts for stage outputs.
//!
//! A [`Contract`] is the declared shape and cardinality a stage's raw
//! output must satisfy before it becomes an artifact. Validation is
//! structural, not semantic: it guarantees downstream stages receive
//! well-shaped data, not that the model-produced content is factually
//! correct.
//!
//! The same `schemars`-derived schema backs both the validator and the
//! shape-description embedded in the stage instruction, so there is one
//! canonical definition per stage.

use std::marker::PhantomData;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, ValidationError, Violation};
use crate::types::{ExtractedJobs, SearchHits, SuggestedQueries};

/// A type that can stand behind a stage contract.
///
/// Each stage output has one primary collection; cardinality bounds apply
/// to it. `check_content` adds type-specific constraints beyond shape.
pub trait StageOutput: DeserializeOwned + Serialize + JsonSchema + Send + Sync {
    /// Field name of the primary collection, for violation reporting.
    const COLLECTION: &'static str;

    /// Number of items in the primary collection.
    fn collection_len(&self) -> usize;

    /// Content constraints beyond shape and cardinality.
    fn check_content(&self) -> Vec<Violation> {
        Vec::new()
    }
}

impl StageOutput for SuggestedQueries {
    const COLLECTION: &'static str = "queries";

    fn collection_len(&self) -> usize {
        self.queries.len()
    }

    fn check_content(&self) -> Vec<Violation> {
        self.queries
            .iter()
            .enumerate()
            .filter(|(_, q)| q.text.trim().is_empty())
            .map(|(i, _)| Violation::new(format!("queries[{i}].text"), "must not be empty"))
            .collect()
    }
}

impl StageOutput for SearchHits {
    const COLLECTION: &'static str = "hits";

    fn collection_len(&self) -> usize {
        self.hits.len()
    }
}

impl StageOutput for ExtractedJobs {
    const COLLECTION: &'static str = "jobs";

    fn collection_len(&self) -> usize {
        self.jobs.len()
    }
}

/// Declared shape and cardinality constraints for one stage's output.
#[derive(Debug, Clone)]
pub struct Contract<T: StageOutput> {
    name: &'static str,
    min_items: Option<usize>,
    max_items: Option<usize>,
    _output: PhantomData<fn() -> T>,
}

impl<T: StageOutput> Contract<T> {
    /// Create a contract with no cardinality bounds.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            min_items: None,
            max_items: None,
            _output: PhantomData,
        }
    }

    /// Require at least `min` items in the primary collection.
    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    /// Allow at most `max` items in the primary collection.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Contract name, used in validation errors and logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The JSON schema for `T`, rendered for provider `response_format`
    /// and for embedding in the stage instruction.
    pub fn schema_json(&self) -> Result<serde_json::Value> {
        let schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
        Ok(serde_json::to_value(schema)?)
    }

    /// Validate a raw structured value against this contract.
    ///
    /// Pure check, no side effects. On failure, reports the specific
    /// field(s) and constraint(s) violated.
    pub fn validate(&self, raw: serde_json::Value) -> std::result::Result<T, ValidationError> {
        let artifact: T = serde_json::from_value(raw).map_err(|e| {
            ValidationError::new(self.name, vec![Violation::new("payload", e.to_string())])
        })?;

        let mut violations = Vec::new();
        let len = artifact.collection_len();
        if let Some(min) = self.min_items {
            if len < min {
                violations.push(Violation::new(
                    T::COLLECTION,
                    format!("expected at least {min} items, got {len}"),
                ));
            }
        }
        if let Some(max) = self.max_items {
            if len > max {
                violations.push(Violation::new(
                    T::COLLECTION,
                    format!("expected at most {max} items, got {len}"),
                ));
            }
        }
        violations.extend(artifact.check_content());

        if !violations.is_empty() {
            return Err(ValidationError::new(self.name, violations));
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SearchHit, SearchQuery, MIN_SEARCH_HITS};
    use serde_json::json;

    fn queries_contract(budget: usize) -> Contract<SuggestedQueries> {
        Contract::new("suggested_queries")
            .with_min_items(1)
            .with_max_items(budget)
    }

    fn hits_contract() -> Contract<SearchHits> {
        Contract::new("search_hits").with_min_items(MIN_SEARCH_HITS)
    }

    fn queries_payload(n: usize) -> serde_json::Value {
        let queries: Vec<_> = (0..n)
            .map(|i| json!({"text": format!("query {i}")}))
            .collect();
        json!({ "queries": queries })
    }

    fn hit_payload(i: usize) -> serde_json::Value {
        json!({
            "title": format!("Job {i}"),
            "url": format!("https://example.com/{i}"),
            "snippet": "a job",
            "originating_query": "query 0",
        })
    }

    #[test]
    fn accepts_within_bounds_verbatim() {
        let contract = queries_contract(5);
        let artifact = contract.validate(queries_payload(3)).unwrap();
        assert_eq!(artifact.queries.len(), 3);
        assert_eq!(artifact.queries[0], SearchQuery::new("query 0"));

        // Round-trip: accepted artifact serializes and re-parses to an
        // equal value.
        let json = serde_json::to_value(&artifact).unwrap();
        let back = contract.validate(json).unwrap();
        assert_eq!(artifact, back);
    }

    #[test]
    fn rejects_empty_query_list() {
        let err = queries_contract(5).validate(queries_payload(0)).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "queries");
    }

    #[test]
    fn rejects_over_budget() {
        let err = queries_contract(5).validate(queries_payload(6)).unwrap_err();
        assert!(err.violations[0].constraint.contains("at most 5"));
    }

    #[test]
    fn rejects_blank_query_text() {
        let payload = json!({"queries": [{"text": "ok"}, {"text": "  "}]});
        let err = queries_contract(5).validate(payload).unwrap_err();
        assert_eq!(err.violations[0].field, "queries[1].text");
    }

    #[test]
    fn rejects_fewer_than_minimum_hits() {
        let hits: Vec<_> = (0..3).map(hit_payload).collect();
        let err = hits_contract().validate(json!({"hits": hits})).unwrap_err();
        assert!(err.violations[0].constraint.contains("at least 20"));
    }

    #[test]
    fn accepts_minimum_hits() {
        let hits: Vec<_> = (0..MIN_SEARCH_HITS).map(hit_payload).collect();
        let artifact = hits_contract().validate(json!({"hits": hits})).unwrap();
        assert_eq!(artifact.hits.len(), MIN_SEARCH_HITS);
        assert_eq!(
            artifact.hits[0],
            SearchHit {
                title: "Job 0".into(),
                url: "https://example.com/0".into(),
                snippet: "a job".into(),
                originating_query: "query 0".into(),
            }
        );
    }

    #[test]
    fn rejects_job_missing_required_field() {
        // Everything present except `company`.
        let payload = json!({"jobs": [{
            "source_url": "https://example.com/job",
            "title": "Data Engineer",
            "location": "Paris",
            "posting_url": "https://example.com/job/apply",
            "posting_date": "2026-07-01",
            "specs": [],
            "rank": 1,
            "notes": [],
        }]});
        let err = Contract::<ExtractedJobs>::new("extracted_jobs")
            .validate(payload)
            .unwrap_err();
        assert!(err.violations[0].constraint.contains("company"));
    }

    #[test]
    fn accepts_job_missing_only_salary() {
        let payload = json!({"jobs": [{
            "source_url": "https://example.com/job",
            "title": "Data Engineer",
            "company": "Acme",
            "location": "Paris",
            "posting_url": "https://example.com/job/apply",
            "posting_date": "2026-07-01",
            "specs": [{"name": "remote", "value": "hybrid"}],
            "rank": 2,
            "notes": ["competitive"],
        }]});
        let artifact = Contract::<ExtractedJobs>::new("extracted_jobs")
            .validate(payload)
            .unwrap();
        assert!(artifact.jobs[0].salary.is_none());
    }

    #[test]
    fn rejects_wrong_field_type() {
        let payload = json!({"queries": [{"text": 42}]});
        let err = queries_contract(5).validate(payload).unwrap_err();
        assert_eq!(err.violations[0].field, "payload");
    }

    #[test]
    fn schema_includes_required_fields() {
        let schema = Contract::<ExtractedJobs>::new("extracted_jobs")
            .schema_json()
            .unwrap();
        let text = schema.to_string();
        assert!(text.contains("source_url"));
        assert!(text.contains("posting_date"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn budget_bounds_are_exact(n in 0usize..30) {
                let contract = queries_contract(10);
                let result = contract.validate(queries_payload(n));
                if (1..=10).contains(&n) {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert!(result.is_err());
                }
            }
        }
    }
}
