mod cli;
mod repl;
mod terminal;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pdfqa_core::config::{load_dotenv, Config};
use pdfqa_index::VectorIndex;
use pdfqa_ingest::{create_embedder, load_pdf_dir, Embedder, ExtractionError};
use pdfqa_llm::{create_provider, AnswerSynthesizer, LlmProvider, QueryExpander};
use pdfqa_rag::{build_index, MultiQueryRetriever, RagError, RetrievalQa};

use crate::cli::CliArgs;
use crate::terminal::Terminal;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let mut config = match args.profile.as_deref() {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    if let Some(dir) = args.docs_dir {
        config.paths.docs_dir = dir;
    }
    if let Some(dir) = args.index_dir {
        config.paths.index_dir = dir;
    }
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let mut terminal = Terminal::stdout();
    let docs_dir = config.paths.docs_dir.clone();

    // ── Load documents ────────────────────────────────────────
    terminal.print_info(&format!("Loading documents from '{}'...", docs_dir.display()))?;
    let report = match load_pdf_dir(&docs_dir) {
        Ok(report) => report,
        Err(ExtractionError::MissingDirectory(path)) => {
            terminal.print_error(&format!("Error: directory '{}' not found.", path))?;
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to scan documents directory"),
    };
    for doc in &report.documents {
        terminal.print_info(&format!(
            "- loaded {} ({} pages, {} chars)",
            doc.filename,
            doc.pages.len(),
            doc.total_chars()
        ))?;
    }
    for failure in &report.failures {
        terminal.print_error(&format!(
            "  Error: failed to load {}: {}",
            failure.filename, failure.reason
        ))?;
    }

    // ── Build index ───────────────────────────────────────────
    let embedder: Arc<dyn Embedder> =
        Arc::from(create_embedder(&config).context("failed to create embedder")?);

    terminal.print_info(&format!(
        "\nBuilding the vector index at '{}' (this can take a while)...",
        config.paths.index_dir.display()
    ))?;
    let index = match build_index(&report.documents, embedder.as_ref(), &config.paths.index_dir).await
    {
        Ok(index) => index,
        Err(RagError::NoChunks) => {
            terminal.print_error(&format!(
                "No documents to process. Check the '{}' folder.",
                docs_dir.display()
            ))?;
            return Ok(());
        }
        Err(e) => return Err(e).context("failed to build the vector index"),
    };
    let chunk_count = index.len();
    terminal.print_info("Index build complete.")?;

    // ── QA chain ──────────────────────────────────────────────
    let provider: Arc<dyn LlmProvider> =
        Arc::from(create_provider(&config).context("failed to create LLM provider")?);
    let llm = &config.llm;
    let expander = QueryExpander::new(provider.clone(), llm.temperature, llm.max_tokens);
    let retriever = MultiQueryRetriever::new(expander, embedder, Box::new(index));
    let qa = RetrievalQa::new(
        retriever,
        AnswerSynthesizer::new(provider, llm.temperature, llm.max_tokens),
    );

    terminal.print_banner(chunk_count, llm.model_name(&config.ollama))?;
    info!("entering question loop");

    repl::run(io::stdin().lock(), &mut terminal, &qa).await
}
