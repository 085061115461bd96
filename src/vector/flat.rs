//! Exhaustive (flat) vector index.

use std::cmp::Ordering;

use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, info};
use parking_lot::RwLock;

use super::{DistanceMetric, Vector};
use crate::corpus::{Corpus, QaRecord};
use crate::embedding::TextEmbedder;
use crate::error::{HybridQaError, Result};
use crate::hybrid_search::source::VectorSource;
use crate::hybrid_search::types::Candidate;

#[derive(Debug)]
struct FlatEntry {
    record: QaRecord,
    vector: Vector,
}

/// Vector source that compares the query against every stored vector.
#[derive(Debug)]
pub struct FlatVectorSource {
    dimension: usize,
    metric: DistanceMetric,
    entries: RwLock<Vec<FlatEntry>>,
}

impl FlatVectorSource {
    /// Create an empty index.
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            dimension,
            metric,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Build an index over the questions of `corpus`.
    pub async fn build(
        corpus: &Corpus,
        embedder: &dyn TextEmbedder,
        metric: DistanceMetric,
    ) -> Result<Self> {
        let index = Self::new(embedder.dimension(), metric);
        let vectors = try_join_all(
            corpus
                .records()
                .iter()
                .map(|record| embedder.embed(&record.question)),
        )
        .await?;

        for (record, vector) in corpus.records().iter().zip(vectors) {
            index.add(record.clone(), vector)?;
        }

        info!(
            "built flat {} index with {} vectors of dimension {}",
            metric.name(),
            index.len(),
            index.dimension
        );
        Ok(index)
    }

    /// Store a record's vector.
    pub fn add(&self, record: QaRecord, vector: Vector) -> Result<()> {
        vector.validate_dimension(self.dimension)?;
        if !vector.is_valid() {
            return Err(HybridQaError::other(format!(
                "vector for record {} contains non-finite values",
                record.id
            )));
        }

        self.entries.write().push(FlatEntry { record, vector });
        Ok(())
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorSource for FlatVectorSource {
    async fn search(&self, vector: &Vector, top_k: usize) -> Result<Vec<Candidate>> {
        vector.validate_dimension(self.dimension)?;

        let entries = self.entries.read();
        let mut scored: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            let distance = self.metric.distance(&vector.data, &entry.vector.data)?;
            scored.push((position, distance));
        }

        // Stable sort: equal distances keep insertion order.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        debug!(
            "flat search examined {} vectors, returning {}",
            entries.len(),
            scored.len()
        );

        Ok(scored
            .into_iter()
            .map(|(position, distance)| {
                let record = &entries[position].record;
                Candidate {
                    explanation: record.explanation.clone(),
                    ..Candidate::semantic(&record.id, &record.question, &record.answer, distance)
                }
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn distance_metric(&self) -> DistanceMetric {
        self.metric
    }

    fn name(&self) -> &str {
        "flat"
    }
}
