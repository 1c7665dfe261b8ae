//! `jobscout` - run the job-posting collection pipeline from the shell.
//!
//! Setup (env loading, logging, output directory) happens here; the
//! library assumes it is done before `Pipeline::run` is called.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobsearch::{
    ArtifactStore, OpenAiModel, Pipeline, ScrapeGraphScraper, SearchParameters, TavilySearcher,
    DEFAULT_QUERY_BUDGET,
};

/// Collect job postings into a validated, reported dataset.
#[derive(Debug, Parser)]
#[command(name = "jobscout", version, about)]
struct Args {
    /// Role title to search for. Repeat for multiple titles.
    #[arg(long = "title", required = true)]
    titles: Vec<String>,

    /// Target country.
    #[arg(long)]
    country: String,

    /// Target language for queries and the report.
    #[arg(long)]
    language: String,

    /// Maximum number of search queries to generate.
    #[arg(long = "queries", default_value_t = DEFAULT_QUERY_BUDGET)]
    query_budget: usize,

    /// Directory the four stage artifacts are written to.
    #[arg(long, default_value = "./ai-agent-output")]
    output_dir: PathBuf,

    /// Chat model to use.
    #[arg(long, default_value = "gpt-4o")]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let model = OpenAiModel::from_env()
        .context("model credentials")?
        .with_model(&args.model);
    let searcher = TavilySearcher::from_env().context("search credentials")?;
    let scraper = ScrapeGraphScraper::from_env().context("scrape credentials")?;

    let pipeline = Pipeline::new(
        Arc::new(model),
        Arc::new(searcher),
        Arc::new(scraper),
        ArtifactStore::new(&args.output_dir),
    );

    let params = SearchParameters::new(args.titles, args.country, args.language)
        .with_query_budget(args.query_budget);

    let outcome = pipeline.run(params).await?;

    tracing::info!(
        queries = outcome.query_count,
        hits = outcome.hit_count,
        jobs = outcome.job_count,
        "run finished"
    );
    println!(
        "Collected {} queries, {} results, {} jobs.",
        outcome.query_count, outcome.hit_count, outcome.job_count
    );
    println!("Artifacts:");
    for path in &outcome.artifacts {
        println!("  {}", path.display());
    }

    Ok(())
}
