//! The pipeline orchestrator.
//!
//! Owns the fixed ordered list of stages and a single run's execution
//! lifecycle. Stages execute strictly one at a time; a stage never
//! starts until the previous stage's artifact has validated and been
//! persisted. Any error aborts the run - there is no retry transition
//! and no stage re-entry.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::artifacts::ArtifactStore;
use crate::contract::StageOutput;
use crate::error::Result;
use crate::params::SearchParameters;
use crate::security::UrlValidator;
use crate::stage::{self, ReportStage, Stage};
use crate::tools::{scrape_tool, search_tool, ToolSet};
use crate::traits::{CompletionModel, PageScraper, WebSearcher};
use crate::types::{ExtractedJob, MIN_SEARCH_HITS};

/// Lifecycle of a single run.
///
/// `NotStarted -> Running(stage) -> ... -> Completed`, or
/// `Running(stage) -> Failed` on any unhandled stage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No stage has executed yet.
    NotStarted,
    /// The named stage is executing.
    Running(&'static str),
    /// Stage 4 persisted its artifact; the run is terminal.
    Completed,
    /// A stage error aborted the run.
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Running(stage) => write!(f, "running({stage})"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// When the run started.
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// Queries stage 1 produced.
    pub query_count: usize,

    /// Results stage 2 collected.
    pub hit_count: usize,

    /// Jobs stage 3 extracted.
    pub job_count: usize,

    /// The four persisted artifact paths, in stage order.
    pub artifacts: Vec<PathBuf>,
}

/// Read-only, append-only context accumulated across the run.
///
/// Single writer (the orchestrator, at stage boundaries); each stage's
/// capability reads the whole accumulation.
struct RunContext {
    bindings: HashMap<String, String>,
    sections: Vec<(&'static str, String)>,
}

impl RunContext {
    fn new(params: &SearchParameters) -> Self {
        let mut bindings = params.bindings();
        bindings.insert("min_hits".to_string(), MIN_SEARCH_HITS.to_string());
        Self {
            bindings,
            sections: Vec::new(),
        }
    }

    fn bindings(&self) -> &HashMap<String, String> {
        &self.bindings
    }

    fn push(&mut self, stage: &'static str, artifact_json: String) {
        self.sections.push((stage, artifact_json));
    }

    /// Rendered context block, or None before any stage has finished.
    fn context_block(&self) -> Option<String> {
        if self.sections.is_empty() {
            return None;
        }
        let mut block = String::from("\n\n# Artifacts from prior stages\n");
        for (stage, json) in &self.sections {
            block.push_str(&format!("\n## {stage}\n```json\n{json}\n```\n"));
        }
        Some(block)
    }
}

/// The fixed four-stage pipeline.
pub struct Pipeline {
    model: Arc<dyn CompletionModel>,
    searcher: Arc<dyn WebSearcher>,
    scraper: Arc<dyn PageScraper>,
    store: ArtifactStore,
    validator: UrlValidator,
}

impl Pipeline {
    /// Assemble a pipeline from its collaborators and artifact store.
    pub fn new(
        model: Arc<dyn CompletionModel>,
        searcher: Arc<dyn WebSearcher>,
        scraper: Arc<dyn PageScraper>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            model,
            searcher,
            scraper,
            store,
            validator: UrlValidator::new(),
        }
    }

    /// Replace the scrape-target URL validator.
    pub fn with_url_validator(mut self, validator: UrlValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Execute one full run.
    ///
    /// Seeds stage 1 with the initial parameters; every later stage
    /// receives the parameters plus all prior validated artifacts as
    /// context. Two runs with identical parameters overwrite the same
    /// artifact paths; structural validity is guaranteed, content
    /// determinism is not (the capability is a generative model).
    pub async fn run(&self, params: SearchParameters) -> Result<RunOutcome> {
        params.validate()?;
        let started_at = chrono::Utc::now();
        tracing::info!(
            titles = ?params.titles,
            country = %params.country,
            language = %params.language,
            query_budget = params.query_budget,
            output_dir = %self.store.dir().display(),
            "starting pipeline run"
        );

        let mut state = RunState::NotStarted;
        match self.drive(&params, started_at, &mut state).await {
            Ok(outcome) => {
                transition(&mut state, RunState::Completed);
                tracing::info!(
                    elapsed_secs = (chrono::Utc::now() - outcome.started_at).num_seconds(),
                    "pipeline run completed"
                );
                Ok(outcome)
            }
            Err(e) => {
                transition(&mut state, RunState::Failed);
                tracing::error!(error = %e, "pipeline run failed");
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        params: &SearchParameters,
        started_at: chrono::DateTime<chrono::Utc>,
        state: &mut RunState,
    ) -> Result<RunOutcome> {
        let mut ctx = RunContext::new(params);

        let queries_stage = stage::query_generation(params.query_budget);
        transition(state, RunState::Running(queries_stage.name));
        let queries = self.execute(&queries_stage, None, &mut ctx).await?;

        let hits_stage = stage::search_collection();
        transition(state, RunState::Running(hits_stage.name));
        let search_tools = ToolSet::new().with_tool(search_tool(self.searcher.clone()));
        let hits = self
            .execute(&hits_stage, Some(&search_tools), &mut ctx)
            .await?;

        let jobs_stage = stage::job_extraction();
        transition(state, RunState::Running(jobs_stage.name));
        let scrape_tools = ToolSet::new().with_tool(scrape_tool(
            self.scraper.clone(),
            self.validator.clone(),
            extraction_instruction()?,
        ));
        let jobs = self
            .execute(&jobs_stage, Some(&scrape_tools), &mut ctx)
            .await?;

        let report_stage = stage::report_composition();
        transition(state, RunState::Running(report_stage.name));
        self.execute_report(&report_stage, &ctx).await?;

        Ok(RunOutcome {
            started_at,
            query_count: queries.queries.len(),
            hit_count: hits.hits.len(),
            job_count: jobs.jobs.len(),
            artifacts: vec![
                self.store.path_for(queries_stage.artifact_file),
                self.store.path_for(hits_stage.artifact_file),
                self.store.path_for(jobs_stage.artifact_file),
                self.store.path_for(report_stage.artifact_file),
            ],
        })
    }

    /// Execute one schema-validated stage.
    ///
    /// Order is fixed: render -> invoke capability -> validate ->
    /// persist -> append to context. An artifact that fails validation
    /// is never persisted and never handed forward.
    async fn execute<T: StageOutput>(
        &self,
        stage: &Stage<T>,
        tools: Option<&ToolSet>,
        ctx: &mut RunContext,
    ) -> Result<T> {
        let mut instruction = stage.render(ctx.bindings())?;
        if let Some(context) = ctx.context_block() {
            instruction.push_str(&context);
        }
        let schema = stage.contract.schema_json()?;
        instruction.push_str(&format!(
            "\n\nReturn a JSON object matching this schema exactly:\n```json\n{schema}\n```"
        ));

        tracing::info!(stage = stage.name, tools = tools.is_some(), "executing stage");
        let raw = match tools {
            Some(tools) => {
                self.model
                    .complete_with_tools(&instruction, tools, &schema)
                    .await?
            }
            None => self.model.complete_structured(&instruction, &schema).await?,
        };

        let artifact = stage.contract.validate(raw)?;
        let path = self.store.write_json(stage.artifact_file, &artifact)?;
        tracing::info!(
            stage = stage.name,
            items = artifact.collection_len(),
            path = %path.display(),
            "stage artifact persisted"
        );

        ctx.push(stage.name, serde_json::to_string_pretty(&artifact)?);
        Ok(artifact)
    }

    /// Execute the free-form report stage.
    async fn execute_report(&self, stage: &ReportStage, ctx: &RunContext) -> Result<PathBuf> {
        let mut instruction = stage.render(ctx.bindings())?;
        if let Some(context) = ctx.context_block() {
            instruction.push_str(&context);
        }

        tracing::info!(stage = stage.name, "executing stage");
        let document = self.model.complete(&instruction).await?;
        let path = self.store.write_text(stage.artifact_file, &document)?;
        tracing::info!(stage = stage.name, path = %path.display(), "report persisted");
        Ok(path)
    }
}

fn transition(state: &mut RunState, next: RunState) {
    tracing::info!(from = %state, to = %next, "run state transition");
    *state = next;
}

/// The extraction instruction handed to the scraping provider: the
/// serialized job schema, so "what shape to return" and "what to
/// extract" come from the same canonical definition.
fn extraction_instruction() -> Result<String> {
    let schema = serde_json::to_value(
        schemars::gen::SchemaGenerator::default().into_root_schema_for::<ExtractedJob>(),
    )?;
    Ok(format!(
        "Extract ```json\n{schema}\n``` from the job posting web page."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_state_display() {
        assert_eq!(RunState::NotStarted.to_string(), "not_started");
        assert_eq!(
            RunState::Running("query_generation").to_string(),
            "running(query_generation)"
        );
        assert_eq!(RunState::Completed.to_string(), "completed");
        assert_eq!(RunState::Failed.to_string(), "failed");
    }

    #[test]
    fn context_accumulates_in_order() {
        let params = SearchParameters::new(["Data Engineer"], "France", "French");
        let mut ctx = RunContext::new(&params);
        assert!(ctx.context_block().is_none());

        ctx.push("query_generation", "{\"queries\": []}".to_string());
        ctx.push("search_collection", "{\"hits\": []}".to_string());
        let block = ctx.context_block().unwrap();
        let first = block.find("## query_generation").unwrap();
        let second = block.find("## search_collection").unwrap();
        assert!(first < second);
    }

    #[test]
    fn bindings_include_min_hits() {
        let params = SearchParameters::new(["Data Engineer"], "France", "French");
        let ctx = RunContext::new(&params);
        assert_eq!(ctx.bindings().get("min_hits").unwrap(), "20");
    }

    #[test]
    fn extraction_instruction_embeds_job_schema() {
        let instruction = extraction_instruction().unwrap();
        assert!(instruction.contains("source_url"));
        assert!(instruction.contains("posting_date"));
        assert!(instruction.contains("salary"));
    }
}
