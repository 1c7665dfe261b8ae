//! Input parameter bundle for a pipeline run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Hard cap on the query budget.
pub const MAX_QUERY_BUDGET: usize = 20;

/// Default query budget when the caller doesn't set one.
pub const DEFAULT_QUERY_BUDGET: usize = 10;

/// The single parameter bundle supplied at process start.
///
/// No mid-run reconfiguration: the orchestrator reads this once when
/// `Pipeline::run` is called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Role titles to search for (e.g., "Data Engineer").
    pub titles: Vec<String>,

    /// Target country (e.g., "France").
    pub country: String,

    /// Target language for queries and report (e.g., "French").
    pub language: String,

    /// Maximum number of search queries stage 1 may produce.
    pub query_budget: usize,
}

impl SearchParameters {
    /// Create parameters with the default query budget.
    pub fn new(
        titles: impl IntoIterator<Item = impl Into<String>>,
        country: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            titles: titles.into_iter().map(|t| t.into()).collect(),
            country: country.into(),
            language: language.into(),
            query_budget: DEFAULT_QUERY_BUDGET,
        }
    }

    /// Set the query budget.
    pub fn with_query_budget(mut self, budget: usize) -> Self {
        self.query_budget = budget;
        self
    }

    /// Validate the bundle before any stage executes.
    pub fn validate(&self) -> Result<()> {
        if self.titles.is_empty() {
            return Err(PipelineError::config("at least one role title is required"));
        }
        if self.titles.iter().any(|t| t.trim().is_empty()) {
            return Err(PipelineError::config("role titles must not be blank"));
        }
        if self.country.trim().is_empty() {
            return Err(PipelineError::config("target country is required"));
        }
        if self.language.trim().is_empty() {
            return Err(PipelineError::config("target language is required"));
        }
        if self.query_budget == 0 {
            return Err(PipelineError::config("query budget must be at least 1"));
        }
        if self.query_budget > MAX_QUERY_BUDGET {
            return Err(PipelineError::config(format!(
                "query budget {} exceeds the cap of {}",
                self.query_budget, MAX_QUERY_BUDGET
            )));
        }
        Ok(())
    }

    /// Named placeholder bindings for instruction templates.
    pub fn bindings(&self) -> HashMap<String, String> {
        HashMap::from([
            ("job_titles".to_string(), self.titles.join(", ")),
            ("country".to_string(), self.country.clone()),
            ("language".to_string(), self.language.clone()),
            ("query_budget".to_string(), self.query_budget.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SearchParameters {
        SearchParameters::new(["Data Engineer"], "France", "French").with_query_budget(5)
    }

    #[test]
    fn accepts_valid_parameters() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_empty_titles() {
        let mut params = valid();
        params.titles.clear();
        assert!(matches!(
            params.validate(),
            Err(PipelineError::Config { .. })
        ));
    }

    #[test]
    fn rejects_blank_title() {
        let mut params = valid();
        params.titles.push("   ".to_string());
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_zero_budget() {
        let params = valid().with_query_budget(0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_budget_over_cap() {
        let params = valid().with_query_budget(MAX_QUERY_BUDGET + 1);
        assert!(params.validate().is_err());
    }

    #[test]
    fn bindings_cover_all_placeholders() {
        let params = SearchParameters::new(["AI Engineer", "ML Engineer"], "Egypt", "English");
        let bindings = params.bindings();
        assert_eq!(
            bindings.get("job_titles").unwrap(),
            "AI Engineer, ML Engineer"
        );
        assert_eq!(bindings.get("country").unwrap(), "Egypt");
        assert_eq!(bindings.get("query_budget").unwrap(), "10");
    }
}
