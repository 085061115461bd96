//! Retrieval source contracts consumed by the fusion engine.
//!
//! Backends plug in by implementing [`LexicalSource`], [`VectorSource`] and
//! [`TextEmbedder`]; the engine never depends on a concrete backend.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{Candidate, Query, SourceKind};
use crate::embedding::TextEmbedder;
use crate::error::{HybridQaError, Result};
use crate::vector::{DistanceMetric, Vector};

/// A lexical search backend.
///
/// Returns up to `top_k` candidates whose score is a relevance where higher
/// is better. An empty result is a valid outcome; a backend that cannot serve
/// the request fails with [`HybridQaError::SourceUnavailable`].
#[async_trait]
pub trait LexicalSource: Send + Sync {
    /// Search for `query`, returning at most `top_k` candidates, best first.
    async fn search(&self, query: &Query, top_k: usize) -> Result<Vec<Candidate>>;

    /// Get the name/identifier of this source, for logging.
    fn name(&self) -> &str {
        "lexical"
    }
}

/// A nearest-neighbour vector index.
///
/// Returns up to `top_k` candidates whose score is a distance under
/// [`distance_metric`](VectorSource::distance_metric), nearest first.
#[async_trait]
pub trait VectorSource: Send + Sync {
    /// Search for the vectors nearest to `vector`.
    async fn search(&self, vector: &Vector, top_k: usize) -> Result<Vec<Candidate>>;

    /// Dimension of the stored vectors.
    fn dimension(&self) -> usize;

    /// Metric used to compute the returned distances.
    fn distance_metric(&self) -> DistanceMetric;

    /// Get the name/identifier of this source, for logging.
    fn name(&self) -> &str {
        "vector"
    }
}

/// The semantic side of a hybrid query: an embedder feeding a vector index.
#[derive(Clone)]
pub struct SemanticSource {
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn VectorSource>,
}

impl SemanticSource {
    /// Pair an embedder with a vector index.
    pub fn new(embedder: Arc<dyn TextEmbedder>, index: Arc<dyn VectorSource>) -> Self {
        Self { embedder, index }
    }

    /// The embedder.
    pub fn embedder(&self) -> &Arc<dyn TextEmbedder> {
        &self.embedder
    }

    /// The vector index.
    pub fn index(&self) -> &Arc<dyn VectorSource> {
        &self.index
    }

    /// Embed the query text.
    pub async fn embed(&self, query: &Query) -> Result<Vector> {
        self.embedder.embed(query.text()).await
    }

    /// Search the index, rejecting vectors of the wrong dimension.
    pub async fn search(&self, vector: &Vector, top_k: usize) -> Result<Vec<Candidate>> {
        vector.validate_dimension(self.index.dimension())?;
        self.index.search(vector, top_k).await
    }

    /// Embed the query, then search the index.
    pub async fn retrieve(&self, query: &Query, top_k: usize) -> Result<Vec<Candidate>> {
        let vector = self.embed(query).await?;
        self.search(&vector, top_k).await
    }
}

impl std::fmt::Debug for SemanticSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticSource")
            .field("embedder", &self.embedder.name())
            .field("index", &self.index.name())
            .field("dimension", &self.index.dimension())
            .finish()
    }
}

/// Attribute an adapter error to `kind`.
///
/// Errors that already carry a query failure kind pass through; anything else
/// an adapter raises means the source could not complete the request.
pub(crate) fn attribute_error(kind: SourceKind, error: HybridQaError) -> HybridQaError {
    match error {
        HybridQaError::InvalidConfig(_)
        | HybridQaError::SourceUnavailable { .. }
        | HybridQaError::SourceTimeout { .. }
        | HybridQaError::DimensionMismatch { .. } => error,
        other => HybridQaError::source_unavailable(kind, other.to_string()),
    }
}
