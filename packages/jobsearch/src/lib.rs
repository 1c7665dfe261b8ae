//! Job-Posting Collection Pipeline
//!
//! A fixed, four-stage pipeline that turns a set of search parameters
//! (role titles, target country, language, query budget) into a
//! structured, human-readable report of matching job postings:
//!
//! 1. **Query generation** - the model produces search-engine queries
//! 2. **Search collection** - the model gathers results via the `search` tool
//! 3. **Job extraction** - the model pulls structured details via the `scrape` tool
//! 4. **Report composition** - the model renders an HTML report
//!
//! # Design Philosophy
//!
//! **"Validate at every handoff"**
//!
//! - Each stage's output is checked against a schema contract before it
//!   is persisted or handed forward
//! - One canonical schema per stage backs both the validator and the
//!   shape-description embedded in the instruction
//! - Stages run strictly in order, once, with no retries: any failure
//!   aborts the run and leaves earlier artifacts as a diagnostic trail
//! - External collaborators (model, search, scrape) sit behind narrow
//!   trait seams and are never implemented here
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jobsearch::{
//!     ArtifactStore, OpenAiModel, Pipeline, ScrapeGraphScraper,
//!     SearchParameters, TavilySearcher,
//! };
//!
//! let pipeline = Pipeline::new(
//!     Arc::new(OpenAiModel::from_env()?),
//!     Arc::new(TavilySearcher::from_env()?),
//!     Arc::new(ScrapeGraphScraper::from_env()?),
//!     ArtifactStore::new("./output"),
//! );
//!
//! let params = SearchParameters::new(["Data Engineer"], "France", "French")
//!     .with_query_budget(5);
//! let outcome = pipeline.run(params).await?;
//! ```
//!
//! # Modules
//!
//! - [`contract`] - Schema contracts for stage outputs
//! - [`tools`] - Tool invokers bridging reasoning and external I/O
//! - [`stage`] - Stage definitions (instruction + contract + persistence)
//! - [`pipeline`] - The sequential orchestrator
//! - [`model`], [`search`], [`scrape`] - Provider implementations
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock collaborators for tests

pub mod artifacts;
pub mod contract;
pub mod error;
pub mod model;
pub mod params;
pub mod pipeline;
pub mod prompts;
pub mod scrape;
pub mod search;
pub mod security;
pub mod stage;
pub mod testing;
pub mod tools;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use artifacts::{ArtifactStore, STEP_1_FILE, STEP_2_FILE, STEP_3_FILE, STEP_4_FILE};
pub use contract::{Contract, StageOutput};
pub use error::{PipelineError, Result, ValidationError, Violation};
pub use model::OpenAiModel;
pub use params::{SearchParameters, DEFAULT_QUERY_BUDGET, MAX_QUERY_BUDGET};
pub use pipeline::{Pipeline, RunOutcome, RunState};
pub use scrape::ScrapeGraphScraper;
pub use search::TavilySearcher;
pub use security::{SecretString, UrlValidator};
pub use stage::{ReportStage, Stage, Tooling};
pub use tools::{scrape_tool, search_tool, Tool, ToolSet};
pub use traits::{CompletionModel, PageScraper, WebSearcher};
pub use types::{
    ExtractedJob, ExtractedJobs, JobSpecEntry, SearchHit, SearchHits, SearchQuery,
    SuggestedQueries, MIN_SEARCH_HITS,
};

// Re-export testing utilities
pub use testing::{MockModel, MockScraper, MockSearcher, ModelCall, ScriptedTurn};
