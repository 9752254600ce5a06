//! Command-line entry point.
//!
//! Three modes share the same dataset input and wiring: `cascade` runs the
//! full generate/verify/revise pipeline, `topic` verifies and revises only
//! the process name, `cot` produces the unverified chain-of-thought
//! baseline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gene_agent::config::{Overrides, Settings};
use gene_agent::services::{
    load_gene_sets, ArtifactStore, CascadePipeline, ClaimVerifier, CostLedger, CotPipeline,
    TopicPipeline,
};
use gene_agent_llm::{build_http_client, LlmProvider, OpenAIProvider};
use gene_agent_tools::build_catalog;

#[derive(Parser)]
#[command(name = "gene-agent", version, about = "Gene set annotation with tool-augmented claim verification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full six-stage annotation cascade
    Cascade(RunArgs),
    /// Verify and revise only the process name
    Topic(RunArgs),
    /// Produce the unverified chain-of-thought baseline
    Cot(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// CSV dataset with ID and Genes columns
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for run artifacts and logs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Model name (defaults to GENE_AGENT_MODEL or gpt-4o)
    #[arg(long)]
    model: Option<String>,

    /// Chat-completions endpoint override
    #[arg(long)]
    base_url: Option<String>,

    /// Iteration bound of the verification agent loop
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Delay before each verifier model call, in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Proxy URL, e.g. socks5://127.0.0.1:1080
    #[arg(long)]
    proxy: Option<String>,
}

impl RunArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            output_dir: self.output_dir.clone(),
            max_iterations: self.max_iterations,
            pacing_ms: self.pacing_ms,
            proxy_url: self.proxy.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let (args, mode) = match &cli.command {
        Command::Cascade(args) => (args, "cascade"),
        Command::Topic(args) => (args, "topic"),
        Command::Cot(args) => (args, "cot"),
    };

    let settings = Settings::from_env(args.overrides())?;
    tracing::info!(mode, model = settings.model, "starting gene-agent");

    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAIProvider::new(settings.provider_config()));
    provider
        .health_check()
        .await
        .context("provider health check failed")?;

    let store = Arc::new(ArtifactStore::new(&settings.output_dir)?);
    let ledger = Arc::new(CostLedger::new(&settings.output_dir));
    let catalog = Arc::new(build_catalog(build_http_client(settings.proxy.as_ref())));

    let gene_sets = load_gene_sets(&args.input)?;

    let (completed, failed) = match cli.command {
        Command::Cascade(_) => {
            let verifier = ClaimVerifier::new(
                Arc::clone(&provider),
                catalog,
                Arc::clone(&ledger),
                settings.max_iterations,
                settings.pacing_ms,
            );
            let pipeline =
                CascadePipeline::new(provider, verifier, Arc::clone(&store), Arc::clone(&ledger));
            let outcome = pipeline.run_batch(gene_sets).await;
            (outcome.runs.len(), outcome.errors.len())
        }
        Command::Topic(_) => {
            let verifier = ClaimVerifier::new(
                Arc::clone(&provider),
                catalog,
                Arc::clone(&ledger),
                settings.max_iterations,
                settings.pacing_ms,
            );
            let pipeline =
                TopicPipeline::new(provider, verifier, Arc::clone(&store), Arc::clone(&ledger));
            let outcome = pipeline.run_batch(gene_sets).await;
            (outcome.runs.len(), outcome.errors.len())
        }
        Command::Cot(_) => {
            let pipeline = CotPipeline::new(provider, Arc::clone(&store), Arc::clone(&ledger));
            let outcome = pipeline.run_batch(gene_sets).await;
            (outcome.runs.len(), outcome.errors.len())
        }
    };

    tracing::info!(completed, failed, "batch finished");
    if failed > 0 {
        tracing::warn!(
            path = %store.errors_log_path().display(),
            "some gene sets failed; see the errors log"
        );
    }
    Ok(())
}
