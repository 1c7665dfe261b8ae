//! Stage definitions - one unit of work each.
//!
//! A stage binds an instruction template to an output contract, a tool
//! requirement, and a persistence target. The four concrete stages of
//! the pipeline are constructed here.

use std::collections::HashMap;

use crate::artifacts::{STEP_1_FILE, STEP_2_FILE, STEP_3_FILE, STEP_4_FILE};
use crate::contract::{Contract, StageOutput};
use crate::error::Result;
use crate::prompts;
use crate::types::{ExtractedJobs, SearchHits, SuggestedQueries, MIN_SEARCH_HITS};

/// Which tool the stage's capability may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tooling {
    /// No tools; the capability answers from the instruction alone.
    None,
    /// The `search` tool.
    Search,
    /// The `scrape` tool.
    Scrape,
}

/// A schema-validated stage.
pub struct Stage<T: StageOutput> {
    /// Stage name, used in logs and context section headers.
    pub name: &'static str,

    /// Instruction template with `{name}` placeholders.
    pub template: &'static str,

    /// Tool allowlist requirement.
    pub tooling: Tooling,

    /// Output contract the raw completion must satisfy.
    pub contract: Contract<T>,

    /// File name of the persisted artifact.
    pub artifact_file: &'static str,
}

impl<T: StageOutput> Stage<T> {
    /// Render the instruction from parameter bindings.
    ///
    /// An unresolved placeholder is a configuration error raised before
    /// the capability is invoked.
    pub fn render(&self, bindings: &HashMap<String, String>) -> Result<String> {
        prompts::render(self.template, bindings)
    }
}

/// The report stage: free-form output, no contract, still persisted.
pub struct ReportStage {
    /// Stage name.
    pub name: &'static str,

    /// Instruction template.
    pub template: &'static str,

    /// File name of the persisted document.
    pub artifact_file: &'static str,
}

impl ReportStage {
    /// Render the instruction from parameter bindings.
    pub fn render(&self, bindings: &HashMap<String, String>) -> Result<String> {
        prompts::render(self.template, bindings)
    }
}

/// Stage 1: query generation, bounded by the run's query budget.
pub fn query_generation(query_budget: usize) -> Stage<SuggestedQueries> {
    Stage {
        name: "query_generation",
        template: prompts::QUERY_GENERATION_PROMPT,
        tooling: Tooling::None,
        contract: Contract::new("suggested_queries")
            .with_min_items(1)
            .with_max_items(query_budget),
        artifact_file: STEP_1_FILE,
    }
}

/// Stage 2: search collection, at least [`MIN_SEARCH_HITS`] results.
pub fn search_collection() -> Stage<SearchHits> {
    Stage {
        name: "search_collection",
        template: prompts::SEARCH_COLLECTION_PROMPT,
        tooling: Tooling::Search,
        contract: Contract::new("search_hits").with_min_items(MIN_SEARCH_HITS),
        artifact_file: STEP_2_FILE,
    }
}

/// Stage 3: job extraction. No cardinality bound - failed scrapes shrink
/// the collection legitimately.
pub fn job_extraction() -> Stage<ExtractedJobs> {
    Stage {
        name: "job_extraction",
        template: prompts::JOB_EXTRACTION_PROMPT,
        tooling: Tooling::Scrape,
        contract: Contract::new("extracted_jobs"),
        artifact_file: STEP_3_FILE,
    }
}

/// Stage 4: report composition.
pub fn report_composition() -> ReportStage {
    ReportStage {
        name: "report_composition",
        template: prompts::REPORT_PROMPT,
        artifact_file: STEP_4_FILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_one_bounds_follow_budget() {
        let stage = query_generation(5);
        assert!(stage
            .contract
            .validate(serde_json::json!({"queries": [{"text": "q"}]}))
            .is_ok());
        let six: Vec<_> = (0..6)
            .map(|i| serde_json::json!({"text": format!("q{i}")}))
            .collect();
        assert!(stage
            .contract
            .validate(serde_json::json!({"queries": six}))
            .is_err());
    }

    #[test]
    fn tooling_assignments() {
        assert_eq!(query_generation(3).tooling, Tooling::None);
        assert_eq!(search_collection().tooling, Tooling::Search);
        assert_eq!(job_extraction().tooling, Tooling::Scrape);
    }

    #[test]
    fn artifact_files_are_stage_indexed() {
        assert_eq!(query_generation(3).artifact_file, STEP_1_FILE);
        assert_eq!(search_collection().artifact_file, STEP_2_FILE);
        assert_eq!(job_extraction().artifact_file, STEP_3_FILE);
        assert_eq!(report_composition().artifact_file, STEP_4_FILE);
    }
}
