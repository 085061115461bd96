//! Command line argument parsing for the hybridqa CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::hybrid_search::{DuplicatePolicy, FailurePolicy, ScoreNormalization};
use crate::lexical::Fuzziness;
use crate::vector::DistanceMetric;

/// hybridqa - Question answering over a lexical and a semantic index
#[derive(Parser, Debug, Clone)]
#[command(name = "hybridqa")]
#[command(about = "Hybrid lexical and semantic question answering")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct HybridQaArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE", env = "HYBRIDQA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl HybridQaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Answer questions interactively until the exit token is entered
    Shell(ShellArgs),

    /// Answer a single question
    Search(SearchArgs),
}

impl Command {
    /// Engine arguments shared by every command.
    pub fn engine_args(&self) -> &EngineArgs {
        match self {
            Command::Shell(args) => &args.engine,
            Command::Search(args) => &args.engine,
        }
    }
}

/// Arguments for the interactive shell
#[derive(Parser, Debug, Clone)]
pub struct ShellArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Prompt printed before each question
    #[arg(long)]
    pub prompt: Option<String>,

    /// Input that ends the session
    #[arg(long, value_name = "TOKEN")]
    pub exit_token: Option<String>,
}

/// Arguments for a single search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Question text
    #[arg(value_name = "QUERY")]
    pub query: String,
}

/// Corpus and retrieval settings shared by all commands.
///
/// Every option overrides the corresponding configuration file value.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Corpus file (.csv or .jsonl)
    #[arg(short, long, value_name = "CORPUS", env = "HYBRIDQA_CORPUS")]
    pub corpus: PathBuf,

    /// Maximum number of results per source and overall
    #[arg(short = 'k', long, env = "HYBRIDQA_TOP_K")]
    pub top_k: Option<usize>,

    /// Weight applied to lexical scores
    #[arg(long, env = "HYBRIDQA_LEXICAL_WEIGHT")]
    pub lexical_weight: Option<f32>,

    /// Weight applied to negated semantic distances
    #[arg(long, env = "HYBRIDQA_SEMANTIC_WEIGHT")]
    pub semantic_weight: Option<f32>,

    /// Lexical sub-search timeout in milliseconds
    #[arg(long, env = "HYBRIDQA_LEXICAL_TIMEOUT_MS")]
    pub lexical_timeout_ms: Option<u64>,

    /// Semantic sub-search timeout in milliseconds
    #[arg(long, env = "HYBRIDQA_SEMANTIC_TIMEOUT_MS")]
    pub semantic_timeout_ms: Option<u64>,

    /// Behavior when one source fails
    #[arg(long, env = "HYBRIDQA_FAILURE_POLICY")]
    pub failure_policy: Option<FailurePolicy>,

    /// Per-source score normalization
    #[arg(long, env = "HYBRIDQA_NORMALIZATION")]
    pub normalization: Option<ScoreNormalization>,

    /// Handling of documents returned by both sources
    #[arg(long, env = "HYBRIDQA_DUPLICATES")]
    pub duplicates: Option<DuplicatePolicy>,

    /// Lexical fuzziness (auto, off or an edit count)
    #[arg(long, env = "HYBRIDQA_FUZZINESS")]
    pub fuzziness: Option<Fuzziness>,

    /// Embedding dimension
    #[arg(long, env = "HYBRIDQA_DIMENSION")]
    pub dimension: Option<usize>,

    /// Vector distance metric
    #[arg(long, env = "HYBRIDQA_METRIC")]
    pub metric: Option<DistanceMetric>,
}

impl EngineArgs {
    /// Apply the command line overrides to `config`.
    pub fn apply(&self, config: &mut AppConfig) {
        let fusion = &mut config.fusion;
        if let Some(top_k) = self.top_k {
            fusion.top_k = top_k;
        }
        if let Some(weight) = self.lexical_weight {
            fusion.lexical_weight = weight;
        }
        if let Some(weight) = self.semantic_weight {
            fusion.semantic_weight = weight;
        }
        if let Some(timeout) = self.lexical_timeout_ms {
            fusion.lexical_timeout_ms = timeout;
        }
        if let Some(timeout) = self.semantic_timeout_ms {
            fusion.semantic_timeout_ms = timeout;
        }
        if let Some(policy) = self.failure_policy {
            fusion.failure_policy = policy;
        }
        if let Some(normalization) = self.normalization {
            fusion.normalization = normalization;
        }
        if let Some(duplicates) = self.duplicates {
            fusion.duplicates = duplicates;
        }
        if let Some(fuzziness) = self.fuzziness {
            config.lexical.fuzziness = fuzziness;
        }
        if let Some(dimension) = self.dimension {
            config.semantic.dimension = dimension;
        }
        if let Some(metric) = self.metric {
            config.semantic.metric = metric;
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text blocks
    Human,
    /// JSON format
    Json,
}
