//! # hybridqa
//!
//! Question answering over a corpus of question/answer pairs by fusing a
//! lexical search with a semantic (embedding) search.
//!
//! ## Features
//!
//! - Concurrent lexical and semantic retrieval with per-source timeouts
//! - Weighted score fusion on a single "higher is better" scale
//! - Optional per-source normalization and duplicate collapsing
//! - Graceful degradation when one source is unavailable
//! - In-memory BM25 and flat vector reference sources
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hybridqa::corpus::{Corpus, QaRecord};
//! use hybridqa::embedding::HashingEmbedder;
//! use hybridqa::hybrid_search::{FusionConfig, FusionEngine, Query, SemanticSource};
//! use hybridqa::lexical::{LexicalSourceConfig, MemoryLexicalSource};
//! use hybridqa::vector::DistanceMetric;
//! use hybridqa::vector::flat::FlatVectorSource;
//!
//! # tokio_test::block_on(async {
//! let corpus = Corpus::new(vec![
//!     QaRecord::new("0", "What is the capital of France?", "Paris"),
//!     QaRecord::new("1", "Who wrote Hamlet?", "Shakespeare"),
//! ]);
//!
//! let embedder = Arc::new(HashingEmbedder::new(64)?);
//! let index = FlatVectorSource::build(&corpus, embedder.as_ref(), DistanceMetric::default()).await?;
//! let lexical = MemoryLexicalSource::from_corpus(&corpus, LexicalSourceConfig::default());
//!
//! let engine = FusionEngine::new(Arc::new(lexical), SemanticSource::new(embedder, Arc::new(index)));
//! let results = engine
//!     .fuse(&Query::new("Who wrote Hamlet?"), &FusionConfig::default())
//!     .await?;
//!
//! assert_eq!(results[0].answer(), "Shakespeare");
//! # Ok::<(), hybridqa::error::HybridQaError>(())
//! # }).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod hybrid_search;
pub mod lexical;
pub mod vector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
