//! Feature-hashing text embedder.
//!
//! Hashes lowercase word tokens and their character trigrams into a fixed
//! number of buckets and L2-normalizes the result. It needs no model files,
//! is fully deterministic, and places texts that share words or word
//! fragments close together, which is enough for a self-contained corpus.

use async_trait::async_trait;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{HybridQaError, Result};
use crate::lexical::analyzer::tokenize;
use crate::vector::Vector;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic embedder based on the hashing trick.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of `dimension` entries.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(HybridQaError::invalid_config(
                "embedding dimension must be greater than 0",
            ));
        }
        Ok(Self { dimension })
    }

    fn add_feature(&self, data: &mut [f32], feature: &str, weight: f32) {
        let hash = crc32fast::hash(feature.as_bytes());
        let bucket = hash as usize % self.dimension;
        let sign = if (hash >> 16) & 1 == 0 { 1.0 } else { -1.0 };
        data[bucket] += sign * weight;
    }

    /// Embed synchronously; the hashing trick needs no I/O.
    pub fn embed_text(&self, text: &str) -> Vector {
        let mut data = vec![0.0; self.dimension];

        for token in tokenize(text) {
            self.add_feature(&mut data, &format!("w:{token}"), WORD_WEIGHT);

            let padded: Vec<char> = format!("^{token}$").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut data, &format!("t:{trigram}"), TRIGRAM_WEIGHT);
            }
        }

        let mut vector = Vector::new(data);
        vector.normalize();
        vector
    }
}

#[async_trait]
impl TextEmbedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(self.embed_text(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}
