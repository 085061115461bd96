//! Types and data structures for hybrid search.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single search request. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Create a new query from text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    /// The query text.
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Whether the query has no searchable content.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which retrieval signal produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Token/fuzzy matching; score is a relevance where higher is better.
    Lexical,
    /// Nearest-neighbour lookup; score is a distance where lower is better.
    Semantic,
}

impl SourceKind {
    /// Get the name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Lexical => "lexical",
            SourceKind::Semantic => "semantic",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One retrieved item, before fusion scoring.
///
/// The meaning of `score` depends on `source`: a relevance for
/// [`SourceKind::Lexical`], a distance for [`SourceKind::Semantic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Opaque document identifier.
    pub doc_id: String,
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Optional explanation attached to the answer.
    pub explanation: Option<String>,
    /// Raw score as reported by the source.
    pub score: f32,
    /// Source that produced this candidate.
    pub source: SourceKind,
}

impl Candidate {
    /// Create a lexical candidate with a relevance score.
    pub fn lexical<I, Q, A>(doc_id: I, question: Q, answer: A, score: f32) -> Self
    where
        I: Into<String>,
        Q: Into<String>,
        A: Into<String>,
    {
        Self {
            doc_id: doc_id.into(),
            question: question.into(),
            answer: answer.into(),
            explanation: None,
            score,
            source: SourceKind::Lexical,
        }
    }

    /// Create a semantic candidate with a distance.
    pub fn semantic<I, Q, A>(doc_id: I, question: Q, answer: A, distance: f32) -> Self
    where
        I: Into<String>,
        Q: Into<String>,
        A: Into<String>,
    {
        Self {
            doc_id: doc_id.into(),
            question: question.into(),
            answer: answer.into(),
            explanation: None,
            score: distance,
            source: SourceKind::Semantic,
        }
    }

    /// Attach an explanation.
    pub fn with_explanation<S: Into<String>>(mut self, explanation: S) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// A candidate after fusion, carrying a combined score on one comparable scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// The underlying candidate, unchanged.
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Weighted score used for ranking.
    pub combined_score: f32,
}

impl RankedResult {
    pub(crate) fn new(candidate: Candidate, combined_score: f32) -> Self {
        Self {
            candidate,
            combined_score,
        }
    }

    /// Source that produced this result.
    pub fn source(&self) -> SourceKind {
        self.candidate.source
    }

    /// Document identifier.
    pub fn doc_id(&self) -> &str {
        &self.candidate.doc_id
    }

    /// Question text.
    pub fn question(&self) -> &str {
        &self.candidate.question
    }

    /// Answer text.
    pub fn answer(&self) -> &str {
        &self.candidate.answer
    }

    /// Explanation, if the corpus provided one.
    pub fn explanation(&self) -> Option<&str> {
        self.candidate.explanation.as_deref()
    }
}

/// A source failure absorbed by a degrading engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailure {
    /// Source that failed.
    pub source: SourceKind,
    /// Rendered error message.
    pub message: String,
}

/// Fused results plus diagnostics about how they were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionReport {
    /// Query text used for search.
    pub query_text: String,
    /// Ranked results, best first.
    pub results: Vec<RankedResult>,
    /// Number of candidates the lexical source returned.
    pub lexical_matches: usize,
    /// Number of candidates the semantic source returned.
    pub semantic_matches: usize,
    /// Source failures that were degraded rather than raised.
    pub degraded: Vec<SourceFailure>,
    /// Query processing time in milliseconds.
    pub query_time_ms: u64,
}

impl FusionReport {
    /// Get the number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if results are empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Get the best result.
    pub fn best_result(&self) -> Option<&RankedResult> {
        self.results.first()
    }

    /// Whether any source failure was absorbed.
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text() {
        let query = Query::new("what is rust?");
        assert_eq!(query.text(), "what is rust?");
        assert_eq!(query.to_string(), "what is rust?");
        assert!(!query.is_blank());
        assert!(Query::from("   ").is_blank());
    }

    #[test]
    fn test_candidate_constructors() {
        let lexical = Candidate::lexical("1", "Q1", "A1", 10.0).with_explanation("because");
        assert_eq!(lexical.source, SourceKind::Lexical);
        assert_eq!(lexical.score, 10.0);
        assert_eq!(lexical.explanation.as_deref(), Some("because"));

        let semantic = Candidate::semantic("1", "Q1", "A1", 2.0);
        assert_eq!(semantic.source, SourceKind::Semantic);
        assert!(semantic.explanation.is_none());
    }

    #[test]
    fn test_ranked_result_accessors() {
        let result = RankedResult::new(Candidate::semantic("7", "Q", "A", 1.0), -0.5);
        assert_eq!(result.source(), SourceKind::Semantic);
        assert_eq!(result.doc_id(), "7");
        assert_eq!(result.question(), "Q");
        assert_eq!(result.answer(), "A");
        assert_eq!(result.explanation(), None);
        assert_eq!(result.combined_score, -0.5);
    }

    #[test]
    fn test_ranked_result_serializes_flat() {
        let result = RankedResult::new(Candidate::lexical("1", "Q1", "A1", 10.0), 5.0);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["source"], "lexical");
        assert_eq!(value["question"], "Q1");
        assert_eq!(value["combined_score"], 5.0);
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::Lexical.to_string(), "lexical");
        assert_eq!(SourceKind::Semantic.to_string(), "semantic");
    }
}
