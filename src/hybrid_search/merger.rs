//! Result merging functionality for hybrid search.
//!
//! Merging is a pure function of the two candidate lists and the
//! configuration: no source is queried here.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::warn;

use super::config::{DuplicatePolicy, FusionConfig};
use super::scorer::{ScoreNormalizer, saturate, sign_adjust};
use super::types::{Candidate, RankedResult, SourceKind};

use crate::error::Result;

/// Result merger for combining lexical and semantic candidates.
#[derive(Debug, Clone)]
pub struct ResultMerger {
    config: FusionConfig,
    normalizer: ScoreNormalizer,
}

impl ResultMerger {
    /// Create a new result merger.
    pub fn new(config: FusionConfig) -> Self {
        let normalizer = ScoreNormalizer::new(config.normalization);
        Self { config, normalizer }
    }

    /// Merge lexical and semantic candidates into a ranked list.
    ///
    /// Each input is capped at `top_k`. The output is sorted by descending
    /// combined score; equal scores keep merge order, which puts lexical
    /// candidates before semantic ones and otherwise preserves each source's
    /// own ranking.
    pub fn merge(&self, lexical: Vec<Candidate>, semantic: Vec<Candidate>) -> Vec<RankedResult> {
        let top_k = self.config.top_k;

        let candidates: Vec<Candidate> = lexical
            .into_iter()
            .take(top_k)
            .chain(semantic.into_iter().take(top_k))
            .filter(|candidate| {
                let finite = candidate.score.is_finite();
                if !finite {
                    warn!(
                        "discarding {} candidate {} with non-finite score {}",
                        candidate.source, candidate.doc_id, candidate.score
                    );
                }
                finite
            })
            .collect();

        let mut scores: Vec<f32> = candidates
            .iter()
            .map(|candidate| sign_adjust(candidate.source, candidate.score))
            .collect();
        self.normalize_per_source(&candidates, &mut scores);

        let weighted = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, score)| {
                let weight = self.weight_for(candidate.source);
                RankedResult::new(candidate, saturate(f64::from(score) * f64::from(weight)))
            })
            .collect();

        let mut results = self.combine_duplicates(weighted);

        // sort_by is stable, so ties keep merge order.
        results.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
        results.truncate(top_k);
        results
    }

    fn weight_for(&self, source: SourceKind) -> f32 {
        match source {
            SourceKind::Lexical => self.config.lexical_weight,
            SourceKind::Semantic => self.config.semantic_weight,
        }
    }

    /// Normalize each source's scores independently.
    fn normalize_per_source(&self, candidates: &[Candidate], scores: &mut [f32]) {
        for source in [SourceKind::Lexical, SourceKind::Semantic] {
            let positions: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(_, candidate)| candidate.source == source)
                .map(|(i, _)| i)
                .collect();

            let mut subset: Vec<f32> = positions.iter().map(|&i| scores[i]).collect();
            self.normalizer.normalize(&mut subset);

            for (&i, score) in positions.iter().zip(subset) {
                scores[i] = score;
            }
        }
    }

    /// Collapse entries sharing a document id, keeping the first occurrence.
    fn combine_duplicates(&self, results: Vec<RankedResult>) -> Vec<RankedResult> {
        let policy = self.config.duplicates;
        if policy == DuplicatePolicy::KeepAll {
            return results;
        }

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut combined: Vec<RankedResult> = Vec::with_capacity(results.len());

        for result in results {
            match positions.entry(result.candidate.doc_id.clone()) {
                Entry::Occupied(entry) => {
                    let existing = &mut combined[*entry.get()];
                    existing.combined_score = match policy {
                        DuplicatePolicy::Max => {
                            existing.combined_score.max(result.combined_score)
                        }
                        DuplicatePolicy::Sum => saturate(
                            f64::from(existing.combined_score) + f64::from(result.combined_score),
                        ),
                        DuplicatePolicy::KeepAll => existing.combined_score,
                    };
                }
                Entry::Vacant(entry) => {
                    entry.insert(combined.len());
                    combined.push(result);
                }
            }
        }

        combined
    }
}

/// Fuse two candidate lists under `config`.
///
/// Validates the configuration and then applies sign adjustment, optional
/// normalization, weighting, merging, sorting and truncation.
pub fn fuse_candidates(
    lexical: Vec<Candidate>,
    semantic: Vec<Candidate>,
    config: &FusionConfig,
) -> Result<Vec<RankedResult>> {
    config.validate()?;
    Ok(ResultMerger::new(config.clone()).merge(lexical, semantic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HybridQaError;
    use crate::hybrid_search::config::ScoreNormalization;

    fn lexical() -> Vec<Candidate> {
        vec![
            Candidate::lexical("1", "Q1", "A1", 10.0),
            Candidate::lexical("2", "Q2", "A2", 4.0),
        ]
    }

    fn semantic() -> Vec<Candidate> {
        vec![
            Candidate::semantic("3", "Q3", "A3", 1.0),
            Candidate::semantic("1", "Q1", "A1", 2.0),
        ]
    }

    fn summary(results: &[RankedResult]) -> Vec<(&str, SourceKind, f32)> {
        results
            .iter()
            .map(|r| (r.question(), r.source(), r.combined_score))
            .collect()
    }

    #[test]
    fn test_weighted_merge_keeps_duplicates() {
        let config = FusionConfig::new().with_top_k(4);
        let results = fuse_candidates(lexical(), semantic(), &config).unwrap();

        assert_eq!(
            summary(&results),
            vec![
                ("Q1", SourceKind::Lexical, 5.0),
                ("Q2", SourceKind::Lexical, 2.0),
                ("Q3", SourceKind::Semantic, -0.5),
                ("Q1", SourceKind::Semantic, -1.0),
            ]
        );
    }

    #[test]
    fn test_truncates_to_top_k() {
        let config = FusionConfig::new().with_top_k(2);
        let results = fuse_candidates(lexical(), semantic(), &config).unwrap();

        assert_eq!(
            summary(&results),
            vec![
                ("Q1", SourceKind::Lexical, 5.0),
                ("Q2", SourceKind::Lexical, 2.0),
            ]
        );
    }

    #[test]
    fn test_inputs_capped_at_top_k() {
        let config = FusionConfig::new().with_top_k(1).with_weights(0.0, 1.0);
        let semantic = vec![
            Candidate::semantic("a", "Qa", "Aa", 5.0),
            Candidate::semantic("b", "Qb", "Ab", 0.1),
        ];
        let results = fuse_candidates(Vec::new(), semantic, &config).unwrap();

        // "b" is closer but lies beyond the first top_k entries of its source.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id(), "a");
    }

    #[test]
    fn test_ties_prefer_lexical_then_source_order() {
        let config = FusionConfig::new().with_top_k(10).with_weights(1.0, 1.0);
        let lexical = vec![
            Candidate::lexical("l1", "L1", "A", 0.0),
            Candidate::lexical("l2", "L2", "A", 0.0),
        ];
        let semantic = vec![
            Candidate::semantic("s1", "S1", "A", 0.0),
            Candidate::semantic("s2", "S2", "A", 0.0),
        ];
        let results = fuse_candidates(lexical, semantic, &config).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.doc_id()).collect();
        assert_eq!(ids, vec!["l1", "l2", "s1", "s2"]);
    }

    #[test]
    fn test_non_finite_scores_are_discarded() {
        let config = FusionConfig::new();
        let lexical = vec![
            Candidate::lexical("nan", "Q", "A", f32::NAN),
            Candidate::lexical("ok", "Q", "A", 1.0),
        ];
        let semantic = vec![Candidate::semantic("inf", "Q", "A", f32::INFINITY)];
        let results = fuse_candidates(lexical, semantic, &config).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id(), "ok");
    }

    #[test]
    fn test_duplicate_policy_max() {
        let config = FusionConfig::new()
            .with_top_k(5)
            .with_duplicates(DuplicatePolicy::Max);
        let results = fuse_candidates(lexical(), semantic(), &config).unwrap();

        assert_eq!(
            summary(&results),
            vec![
                ("Q1", SourceKind::Lexical, 5.0),
                ("Q2", SourceKind::Lexical, 2.0),
                ("Q3", SourceKind::Semantic, -0.5),
            ]
        );
    }

    #[test]
    fn test_duplicate_policy_sum() {
        let config = FusionConfig::new()
            .with_top_k(5)
            .with_duplicates(DuplicatePolicy::Sum);
        let results = fuse_candidates(lexical(), semantic(), &config).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].doc_id(), "1");
        assert_eq!(results[0].combined_score, 4.0);
    }

    #[test]
    fn test_min_max_normalization_changes_scale() {
        let config = FusionConfig::new()
            .with_top_k(4)
            .with_weights(1.0, 1.0)
            .with_normalization(ScoreNormalization::MinMax);
        let results = fuse_candidates(lexical(), semantic(), &config).unwrap();

        // Both sources now span [0, 1]; the closest semantic hit ties the best lexical hit.
        assert_eq!(
            summary(&results),
            vec![
                ("Q1", SourceKind::Lexical, 1.0),
                ("Q3", SourceKind::Semantic, 1.0),
                ("Q2", SourceKind::Lexical, 0.0),
                ("Q1", SourceKind::Semantic, 0.0),
            ]
        );
    }

    #[test]
    fn test_extreme_scores_rank_finite() {
        let lexical = vec![
            Candidate::lexical("Q1", "q1", "a1", 3.0e38),
            Candidate::lexical("Q2", "q2", "a2", -3.0e38),
            Candidate::lexical("Q3", "q3", "a3", 1.0),
        ];
        let semantic = vec![
            Candidate::semantic("Q1", "q1", "a1", 3.0e38),
            Candidate::semantic("Q3", "q3", "a3", 0.5),
        ];

        for normalization in [ScoreNormalization::None, ScoreNormalization::MinMax] {
            for duplicates in [DuplicatePolicy::KeepAll, DuplicatePolicy::Sum] {
                let config = FusionConfig::new()
                    .with_top_k(5)
                    .with_weights(1.0, 1.0)
                    .with_normalization(normalization)
                    .with_duplicates(duplicates);
                let results =
                    fuse_candidates(lexical.clone(), semantic.clone(), &config).unwrap();

                assert!(!results.is_empty());
                assert!(results.iter().all(|r| r.combined_score.is_finite()));
                assert!(
                    results
                        .windows(2)
                        .all(|w| w[0].combined_score >= w[1].combined_score)
                );
            }
        }

        let config = FusionConfig::new()
            .with_top_k(3)
            .with_normalization(ScoreNormalization::MinMax);
        let results = fuse_candidates(lexical, Vec::new(), &config).unwrap();
        assert_eq!(results[0].doc_id(), "Q1");
        assert_eq!(results[2].doc_id(), "Q2");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FusionConfig::new().with_top_k(0);
        let err = fuse_candidates(lexical(), semantic(), &config).unwrap_err();
        assert!(matches!(err, HybridQaError::InvalidConfig(_)));
    }

    #[test]
    fn test_both_empty() {
        let results = fuse_candidates(Vec::new(), Vec::new(), &FusionConfig::new()).unwrap();
        assert!(results.is_empty());
    }
}
