//! Score adjustment for hybrid search.
//!
//! Lexical scores are already "higher is better". Semantic scores are
//! distances and are negated so that closer documents rank higher. An
//! optional per-source normalization can then be applied before weighting.

use super::config::ScoreNormalization;
use super::types::SourceKind;

/// Convert a raw source score into a "higher is better" score.
pub fn sign_adjust(source: SourceKind, raw: f32) -> f32 {
    match source {
        SourceKind::Lexical => raw,
        SourceKind::Semantic => -raw,
    }
}

/// Narrow an `f64` score to `f32`, saturating at the finite `f32` range.
pub(crate) fn saturate(score: f64) -> f32 {
    score.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
}

/// Per-source score normalizer.
///
/// Every strategy is monotonic non-decreasing: a better input never maps to
/// a lower output.
#[derive(Debug, Clone, Copy)]
pub struct ScoreNormalizer {
    strategy: ScoreNormalization,
}

impl ScoreNormalizer {
    /// Create a new score normalizer.
    pub fn new(strategy: ScoreNormalization) -> Self {
        Self { strategy }
    }

    /// The configured strategy.
    pub fn strategy(&self) -> ScoreNormalization {
        self.strategy
    }

    /// Normalize the sign-adjusted scores of a single source in place.
    pub fn normalize(&self, scores: &mut [f32]) {
        if scores.is_empty() {
            return;
        }

        match self.strategy {
            ScoreNormalization::None => {}
            ScoreNormalization::MinMax => Self::normalize_min_max(scores),
            ScoreNormalization::ZScore => Self::normalize_z_score(scores),
            ScoreNormalization::Rank => Self::normalize_rank(scores),
        }
    }

    /// Min-max normalization to [0, 1] range.
    ///
    /// A list whose scores are all equal maps to 1.0. The range is computed
    /// in `f64` so that scores near `f32::MAX` of opposite sign cannot
    /// overflow it.
    fn normalize_min_max(scores: &mut [f32]) {
        let min = scores.iter().map(|s| f64::from(*s)).fold(f64::INFINITY, f64::min);
        let max = scores.iter().map(|s| f64::from(*s)).fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        for score in scores.iter_mut() {
            *score = if range > 0.0 {
                ((f64::from(*score) - min) / range) as f32
            } else {
                1.0
            };
        }
    }

    /// Z-score normalization, accumulated in `f64`.
    ///
    /// A list with zero variance maps to 0.0.
    fn normalize_z_score(scores: &mut [f32]) {
        let n = scores.len() as f64;
        let mean = scores.iter().map(|s| f64::from(*s)).sum::<f64>() / n;
        let variance = scores
            .iter()
            .map(|s| (f64::from(*s) - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        for score in scores.iter_mut() {
            *score = if std_dev > 0.0 {
                ((f64::from(*score) - mean) / std_dev) as f32
            } else {
                0.0
            };
        }
    }

    /// Rank-based normalization: `1 - better / n`, where `better` counts the
    /// scores strictly greater than this one. Equal scores share a value.
    fn normalize_rank(scores: &mut [f32]) {
        let n = scores.len();
        let mut sorted: Vec<f32> = scores.to_vec();
        sorted.sort_by(|a, b| b.total_cmp(a));

        for score in scores.iter_mut() {
            let better = sorted.partition_point(|s| *s > *score);
            *score = 1.0 - better as f32 / n as f32;
        }
    }
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self::new(ScoreNormalization::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(strategy: ScoreNormalization, input: &[f32]) -> Vec<f32> {
        let mut scores = input.to_vec();
        ScoreNormalizer::new(strategy).normalize(&mut scores);
        scores
    }

    fn assert_monotonic(input: &[f32], output: &[f32]) {
        for i in 0..input.len() {
            for j in 0..input.len() {
                if input[i] > input[j] {
                    assert!(output[i] >= output[j], "{input:?} -> {output:?}");
                }
            }
        }
    }

    #[test]
    fn test_sign_adjust() {
        assert_eq!(sign_adjust(SourceKind::Lexical, 10.0), 10.0);
        assert_eq!(sign_adjust(SourceKind::Semantic, 1.0), -1.0);
        assert_eq!(sign_adjust(SourceKind::Semantic, 0.0), 0.0);
    }

    #[test]
    fn test_none_is_identity() {
        assert_eq!(
            normalized(ScoreNormalization::None, &[10.0, -2.0, 4.0]),
            vec![10.0, -2.0, 4.0]
        );
    }

    #[test]
    fn test_min_max() {
        assert_eq!(
            normalized(ScoreNormalization::MinMax, &[10.0, 0.0, 5.0]),
            vec![1.0, 0.0, 0.5]
        );
        assert_eq!(normalized(ScoreNormalization::MinMax, &[3.0, 3.0]), vec![1.0, 1.0]);
    }

    #[test]
    fn test_z_score() {
        let out = normalized(ScoreNormalization::ZScore, &[1.0, 3.0]);
        assert!((out[0] + 1.0).abs() < 1e-6);
        assert!((out[1] - 1.0).abs() < 1e-6);
        assert_eq!(normalized(ScoreNormalization::ZScore, &[2.0, 2.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_rank() {
        assert_eq!(
            normalized(ScoreNormalization::Rank, &[-1.0, -0.5, -2.0, -0.5]),
            vec![0.5, 1.0, 0.25, 1.0]
        );
    }

    #[test]
    fn test_all_strategies_are_monotonic() {
        let input = [4.0, -1.5, 10.0, 0.0, 4.0, -7.25];
        for strategy in [
            ScoreNormalization::None,
            ScoreNormalization::MinMax,
            ScoreNormalization::ZScore,
            ScoreNormalization::Rank,
        ] {
            let output = normalized(strategy, &input);
            assert_monotonic(&input, &output);
        }
    }

    #[test]
    fn test_extreme_scores_stay_finite() {
        let input = [3.0e38, -3.0e38, 1.0, f32::MAX, f32::MIN];
        for strategy in [
            ScoreNormalization::MinMax,
            ScoreNormalization::ZScore,
            ScoreNormalization::Rank,
        ] {
            let output = normalized(strategy, &input);
            assert!(output.iter().all(|s| s.is_finite()), "{strategy:?} -> {output:?}");
            assert_monotonic(&input, &output);
        }

        let min_max = normalized(ScoreNormalization::MinMax, &[3.0e38, -3.0e38]);
        assert_eq!(min_max, vec![1.0, 0.0]);
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(1.5), 1.5);
        assert_eq!(saturate(1.0e300), f32::MAX);
        assert_eq!(saturate(-1.0e300), f32::MIN);
    }

    #[test]
    fn test_empty_input() {
        let mut scores: Vec<f32> = Vec::new();
        ScoreNormalizer::new(ScoreNormalization::MinMax).normalize(&mut scores);
        assert!(scores.is_empty());
    }
}
