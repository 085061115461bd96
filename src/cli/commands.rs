//! Command implementations for the hybridqa CLI.

use std::io;
use std::path::Path;
use std::sync::Arc;

use log::info;
use tokio::io::BufReader;

use crate::cli::args::*;
use crate::cli::output::{OutputOptions, write_report};
use crate::cli::shell::QueryShell;
use crate::config::AppConfig;
use crate::corpus::Corpus;
use crate::embedding::HashingEmbedder;
use crate::error::Result;
use crate::hybrid_search::{FusionEngine, Query, SemanticSource};
use crate::lexical::MemoryLexicalSource;
use crate::vector::flat::FlatVectorSource;

/// Execute a CLI command.
pub async fn execute_command(args: HybridQaArgs) -> Result<()> {
    let config = load_config(&args)?;
    let engine = build_engine(&args.command.engine_args().corpus, &config).await?;
    let options = OutputOptions {
        format: args.output_format,
        pretty: args.pretty,
        verbosity: args.verbosity(),
    };

    match &args.command {
        Command::Shell(_) => run_shell(engine, config, options).await,
        Command::Search(search_args) => run_search(search_args, &engine, &config, &options).await,
    }
}

/// Resolve the configuration file and command line overrides.
pub fn load_config(args: &HybridQaArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    args.command.engine_args().apply(&mut config);
    if let Command::Shell(shell_args) = &args.command {
        if let Some(prompt) = &shell_args.prompt {
            config.shell.prompt = prompt.clone();
        }
        if let Some(exit_token) = &shell_args.exit_token {
            config.shell.exit_token = exit_token.clone();
        }
    }

    config.validate()?;
    Ok(config)
}

/// Load a corpus and index it with the in-memory reference sources.
pub async fn build_engine(corpus_path: &Path, config: &AppConfig) -> Result<FusionEngine> {
    let corpus = Corpus::load(corpus_path)?;

    let lexical = MemoryLexicalSource::from_corpus(&corpus, config.lexical.clone());
    let embedder = Arc::new(HashingEmbedder::new(config.semantic.dimension)?);
    let index = FlatVectorSource::build(&corpus, embedder.as_ref(), config.semantic.metric).await?;

    info!(
        "indexed {} records (lexical: {}, semantic: {})",
        corpus.len(),
        lexical.len(),
        index.len()
    );

    Ok(FusionEngine::new(
        Arc::new(lexical),
        SemanticSource::new(embedder, Arc::new(index)),
    ))
}

/// Answer questions from standard input.
async fn run_shell(
    engine: FusionEngine,
    config: AppConfig,
    options: OutputOptions,
) -> Result<()> {
    let mut shell = QueryShell::new(engine, config.fusion, config.shell, options, io::stdout());
    let summary = shell.run(BufReader::new(tokio::io::stdin())).await?;

    info!(
        "session ended after {} answered and {} failed queries",
        summary.answered, summary.failed
    );
    Ok(())
}

/// Answer a single question.
async fn run_search(
    args: &SearchArgs,
    engine: &FusionEngine,
    config: &AppConfig,
    options: &OutputOptions,
) -> Result<()> {
    let query = Query::new(args.query.trim());
    let report = engine.fuse_with_report(&query, &config.fusion).await?;
    write_report(&mut io::stdout().lock(), &report, options)
}
