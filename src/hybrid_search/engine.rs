//! Hybrid search engine implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio::task::{JoinError, JoinHandle};

use super::config::{FailurePolicy, FusionConfig};
use super::merger::ResultMerger;
use super::source::{LexicalSource, SemanticSource, attribute_error};
use super::types::{Candidate, FusionReport, Query, RankedResult, SourceFailure, SourceKind};
use crate::error::{HybridQaError, Result};

/// Hybrid search engine that fuses lexical and semantic retrieval.
///
/// The engine holds only its injected sources and is safe to share across
/// concurrent queries. Each sub-search runs on its own task, so an adapter
/// that blocks its thread neither delays the other source nor its own
/// timeout. Dropping a `fuse` future aborts both sub-search tasks.
#[derive(Clone)]
pub struct FusionEngine {
    lexical: Arc<dyn LexicalSource>,
    semantic: SemanticSource,
}

impl FusionEngine {
    /// Create a new fusion engine over the given sources.
    pub fn new(lexical: Arc<dyn LexicalSource>, semantic: SemanticSource) -> Self {
        Self { lexical, semantic }
    }

    /// Perform hybrid search and return the ranked results.
    pub async fn fuse(&self, query: &Query, config: &FusionConfig) -> Result<Vec<RankedResult>> {
        Ok(self.fuse_with_report(query, config).await?.results)
    }

    /// Perform hybrid search and return the results with diagnostics.
    pub async fn fuse_with_report(
        &self,
        query: &Query,
        config: &FusionConfig,
    ) -> Result<FusionReport> {
        config.validate()?;
        let start_time = Instant::now();

        let (lexical, semantic) = tokio::join!(
            self.lexical_search(query, config),
            self.semantic_search(query, config),
        );

        let mut degraded = Vec::new();
        let (lexical, semantic) =
            Self::settle(lexical, semantic, config.failure_policy, &mut degraded)?;

        let lexical_matches = lexical.len();
        let semantic_matches = semantic.len();
        let results = ResultMerger::new(config.clone()).merge(lexical, semantic);
        let query_time_ms = start_time.elapsed().as_millis() as u64;

        debug!(
            "fused '{}': {} lexical + {} semantic candidates -> {} results in {}ms",
            query.text(),
            lexical_matches,
            semantic_matches,
            results.len(),
            query_time_ms
        );

        Ok(FusionReport {
            query_text: query.text().to_string(),
            results,
            lexical_matches,
            semantic_matches,
            degraded,
            query_time_ms,
        })
    }

    async fn lexical_search(&self, query: &Query, config: &FusionConfig) -> Result<Vec<Candidate>> {
        let lexical = Arc::clone(&self.lexical);
        let query = query.clone();
        let top_k = config.top_k;
        let task = tokio::spawn(async move { lexical.search(&query, top_k).await });
        Self::with_timeout(SourceKind::Lexical, config.lexical_timeout(), task).await
    }

    async fn semantic_search(
        &self,
        query: &Query,
        config: &FusionConfig,
    ) -> Result<Vec<Candidate>> {
        let semantic = self.semantic.clone();
        let query = query.clone();
        let top_k = config.top_k;
        let task = tokio::spawn(async move { semantic.retrieve(&query, top_k).await });
        Self::with_timeout(SourceKind::Semantic, config.semantic_timeout(), task).await
    }

    async fn with_timeout(
        kind: SourceKind,
        timeout: Duration,
        task: JoinHandle<Result<Vec<Candidate>>>,
    ) -> Result<Vec<Candidate>> {
        match tokio::time::timeout(timeout, AbortOnDrop(task)).await {
            Ok(Ok(result)) => result.map_err(|e| attribute_error(kind, e)),
            Ok(Err(e)) => Err(HybridQaError::source_unavailable(
                kind,
                format!("search task failed: {e}"),
            )),
            Err(_) => Err(HybridQaError::timeout(kind, timeout)),
        }
    }

    /// Apply the failure policy to the two sub-search outcomes.
    ///
    /// Failures other than unavailability or timeout always fail the query.
    fn settle(
        lexical: Result<Vec<Candidate>>,
        semantic: Result<Vec<Candidate>>,
        policy: FailurePolicy,
        degraded: &mut Vec<SourceFailure>,
    ) -> Result<(Vec<Candidate>, Vec<Candidate>)> {
        let lexical = match lexical {
            Err(e) if !e.is_source_failure() => return Err(e),
            other => other,
        };
        let semantic = match semantic {
            Err(e) if !e.is_source_failure() => return Err(e),
            other => other,
        };

        match policy {
            FailurePolicy::FailFast => Ok((lexical?, semantic?)),
            FailurePolicy::Degrade => match (lexical, semantic) {
                (Err(lexical_error), Err(semantic_error)) => {
                    warn!("both sources failed; semantic: {semantic_error}");
                    Err(lexical_error)
                }
                (lexical, semantic) => Ok((
                    Self::absorb(SourceKind::Lexical, lexical, degraded),
                    Self::absorb(SourceKind::Semantic, semantic, degraded),
                )),
            },
        }
    }

    fn absorb(
        kind: SourceKind,
        outcome: Result<Vec<Candidate>>,
        degraded: &mut Vec<SourceFailure>,
    ) -> Vec<Candidate> {
        match outcome {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("continuing without {kind} results: {e}");
                degraded.push(SourceFailure {
                    source: kind,
                    message: e.to_string(),
                });
                Vec::new()
            }
        }
    }
}

/// Join handle that aborts its task when dropped unfinished.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl<T> Future for AbortOnDrop<T> {
    type Output = std::result::Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl std::fmt::Debug for FusionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FusionEngine")
            .field("lexical", &self.lexical.name())
            .field("semantic", &self.semantic)
            .finish()
    }
}
