//! Hybrid search module combining lexical and semantic retrieval.
//!
//! A query is sent to a [`LexicalSource`] and, after embedding, to a
//! [`VectorSource`] at the same time. The two candidate lists are put on a
//! common "higher is better" scale, weighted per source, and merged into one
//! ranked list:
//! - lexical relevance scores are used as-is
//! - semantic distances are negated
//! - each side contributes at most `top_k` candidates

pub mod config;
pub mod engine;
pub mod merger;
pub mod scorer;
pub mod source;
pub mod types;

pub use config::{DuplicatePolicy, FailurePolicy, FusionConfig, ScoreNormalization};
pub use engine::FusionEngine;
pub use merger::{ResultMerger, fuse_candidates};
pub use scorer::{ScoreNormalizer, sign_adjust};
pub use source::{LexicalSource, SemanticSource, VectorSource};
pub use types::{Candidate, FusionReport, Query, RankedResult, SourceFailure, SourceKind};
