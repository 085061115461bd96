//! In-memory BM25 lexical source with fuzzy term expansion.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::analyzer::tokenize;
use super::fuzzy::{Fuzziness, levenshtein_distance_threshold};
use crate::corpus::{Corpus, QaRecord};
use crate::error::Result;
use crate::hybrid_search::source::LexicalSource;
use crate::hybrid_search::types::{Candidate, Query, SourceKind};

/// Which record text the lexical index matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// The question only.
    #[default]
    Question,
    /// The answer only.
    Answer,
    /// Question and answer concatenated.
    QuestionAndAnswer,
}

impl SearchField {
    fn text<'a>(&self, record: &'a QaRecord) -> std::borrow::Cow<'a, str> {
        match self {
            SearchField::Question => record.question.as_str().into(),
            SearchField::Answer => record.answer.as_str().into(),
            SearchField::QuestionAndAnswer => {
                format!("{} {}", record.question, record.answer).into()
            }
        }
    }
}

/// Configuration for [`MemoryLexicalSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalSourceConfig {
    /// Allowed edit distance between query and indexed terms.
    pub fuzziness: Fuzziness,
    /// BM25 k1 parameter.
    pub k1: f32,
    /// BM25 b parameter.
    pub b: f32,
    /// Field to match against.
    pub field: SearchField,
}

impl Default for LexicalSourceConfig {
    fn default() -> Self {
        Self {
            fuzziness: Fuzziness::Auto,
            k1: 1.2,
            b: 0.75,
            field: SearchField::Question,
        }
    }
}

#[derive(Debug)]
struct IndexedDoc {
    record: QaRecord,
    term_freqs: HashMap<String, u32>,
    length: usize,
}

#[derive(Debug, Default)]
struct InvertedIndex {
    docs: Vec<IndexedDoc>,
    doc_freqs: HashMap<String, usize>,
    total_length: usize,
}

impl InvertedIndex {
    fn add(&mut self, record: QaRecord, field: SearchField) {
        let tokens = tokenize(&field.text(&record));
        let mut term_freqs: HashMap<String, u32> = HashMap::new();
        for token in &tokens {
            *term_freqs.entry(token.clone()).or_insert(0) += 1;
        }
        for term in term_freqs.keys() {
            *self.doc_freqs.entry(term.clone()).or_insert(0) += 1;
        }

        self.total_length += tokens.len();
        self.docs.push(IndexedDoc {
            record,
            term_freqs,
            length: tokens.len(),
        });
    }

    fn avg_length(&self) -> f32 {
        if self.docs.is_empty() {
            0.0
        } else {
            self.total_length as f32 / self.docs.len() as f32
        }
    }

    /// Lucene-style BM25 IDF, always positive.
    fn idf(&self, term: &str) -> f32 {
        let n = self.docs.len() as f32;
        let df = self.doc_freqs.get(term).copied().unwrap_or(0) as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Indexed terms within the allowed edit distance of `term`, with a boost
    /// of `1 - edits / (len + 1)` so exact matches weigh the most.
    fn expand(&self, term: &str, fuzziness: Fuzziness) -> Vec<(String, f32)> {
        let term_len = term.chars().count();
        let max_edits = fuzziness.max_edits(term_len);

        if max_edits == 0 {
            return if self.doc_freqs.contains_key(term) {
                vec![(term.to_string(), 1.0)]
            } else {
                Vec::new()
            };
        }

        self.doc_freqs
            .keys()
            .filter_map(|indexed| {
                levenshtein_distance_threshold(term, indexed, max_edits).map(|edits| {
                    let boost = 1.0 - edits as f32 / (term_len as f32 + 1.0);
                    (indexed.clone(), boost)
                })
            })
            .collect()
    }
}

/// Lexical source over an in-memory BM25 index.
///
/// Each query term contributes the best-scoring of its fuzzy expansions to a
/// document, so a document containing both the exact term and a variant is
/// not counted twice.
#[derive(Debug)]
pub struct MemoryLexicalSource {
    config: LexicalSourceConfig,
    index: RwLock<InvertedIndex>,
}

impl MemoryLexicalSource {
    /// Create an empty source.
    pub fn new(config: LexicalSourceConfig) -> Self {
        Self {
            config,
            index: RwLock::new(InvertedIndex::default()),
        }
    }

    /// Create a source indexing every record of `corpus`.
    pub fn from_corpus(corpus: &Corpus, config: LexicalSourceConfig) -> Self {
        let source = Self::new(config);
        for record in corpus.records() {
            source.add(record.clone());
        }
        source
    }

    /// Index a record.
    pub fn add(&self, record: QaRecord) {
        self.index.write().add(record, self.config.field);
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.index.read().docs.len()
    }

    /// Check if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn score(&self, query: &Query, top_k: usize) -> Vec<Candidate> {
        let index = self.index.read();
        if index.docs.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut query_terms = tokenize(query.text());
        query_terms.sort();
        query_terms.dedup();

        let avg_length = index.avg_length();
        let k1 = self.config.k1;
        let b = self.config.b;
        let mut scores = vec![0.0f32; index.docs.len()];

        for term in &query_terms {
            let expansions = index.expand(term, self.config.fuzziness);
            if expansions.is_empty() {
                continue;
            }

            let weighted: Vec<(f32, &str, f32)> = expansions
                .iter()
                .map(|(indexed, boost)| (index.idf(indexed), indexed.as_str(), *boost))
                .collect();

            for (doc_index, doc) in index.docs.iter().enumerate() {
                let norm = 1.0 - b + b * doc.length as f32 / avg_length.max(f32::EPSILON);
                let best = weighted
                    .iter()
                    .filter_map(|(idf, indexed, boost)| {
                        doc.term_freqs.get(*indexed).map(|&tf| {
                            let tf = tf as f32;
                            boost * idf * (tf * (k1 + 1.0)) / (tf + k1 * norm)
                        })
                    })
                    .fold(0.0f32, f32::max);
                scores[doc_index] += best;
            }
        }

        let mut ranked: Vec<(usize, f32)> = scores
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > 0.0)
            .collect();
        // Stable sort: equal scores keep corpus order.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);

        debug!(
            "lexical search for '{}' matched {} documents",
            query.text(),
            ranked.len()
        );

        ranked
            .into_iter()
            .map(|(doc_index, score)| {
                let record = &index.docs[doc_index].record;
                Candidate {
                    explanation: record.explanation.clone(),
                    ..Candidate::lexical(&record.id, &record.question, &record.answer, score)
                }
            })
            .collect()
    }
}

#[async_trait]
impl LexicalSource for MemoryLexicalSource {
    async fn search(&self, query: &Query, top_k: usize) -> Result<Vec<Candidate>> {
        Ok(self.score(query, top_k))
    }

    fn name(&self) -> &str {
        "memory-bm25"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::new(vec![
            QaRecord::new("0", "What is the capital of France?", "Paris"),
            QaRecord::new("1", "What is the capital of Germany?", "Berlin"),
            QaRecord::new("2", "How do plants make food?", "Photosynthesis")
                .with_explanation("Light energy becomes chemical energy"),
            QaRecord::new("3", "Who wrote Hamlet?", "Shakespeare"),
        ])
    }

    fn source(fuzziness: Fuzziness) -> MemoryLexicalSource {
        let config = LexicalSourceConfig {
            fuzziness,
            ..Default::default()
        };
        MemoryLexicalSource::from_corpus(&corpus(), config)
    }

    #[tokio::test]
    async fn test_exact_match_ranks_first() {
        let results = source(Fuzziness::Off)
            .search(&Query::new("capital of France"), 5)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].doc_id, "0");
        assert_eq!(results[1].doc_id, "1");
        assert!(results[0].score > results[1].score);
        assert!(results.iter().all(|c| c.source == SourceKind::Lexical));
    }

    #[tokio::test]
    async fn test_fuzzy_match_tolerates_typos() {
        let exact_only = source(Fuzziness::Off)
            .search(&Query::new("Hamlte"), 5)
            .await
            .unwrap();
        assert!(exact_only.is_empty());

        let fuzzy = source(Fuzziness::Auto)
            .search(&Query::new("Hamlte"), 5)
            .await
            .unwrap();
        assert_eq!(fuzzy.len(), 1);
        assert_eq!(fuzzy[0].doc_id, "3");
    }

    #[tokio::test]
    async fn test_exact_beats_fuzzy() {
        let source = source(Fuzziness::Fixed(2));
        let exact = source.search(&Query::new("plants"), 5).await.unwrap();
        let fuzzy = source.search(&Query::new("plents"), 5).await.unwrap();
        assert_eq!(exact[0].doc_id, "2");
        assert_eq!(fuzzy[0].doc_id, "2");
        assert!(exact[0].score > fuzzy[0].score);
    }

    #[tokio::test]
    async fn test_top_k_and_explanation() {
        let source = source(Fuzziness::Off);
        let results = source.search(&Query::new("what is how"), 1).await.unwrap();
        assert_eq!(results.len(), 1);

        let plants = source.search(&Query::new("plants"), 3).await.unwrap();
        assert_eq!(
            plants[0].explanation.as_deref(),
            Some("Light energy becomes chemical energy")
        );
    }

    #[tokio::test]
    async fn test_no_match_is_empty_not_error() {
        let source = source(Fuzziness::Auto);
        assert!(source.search(&Query::new("zzzzzz"), 5).await.unwrap().is_empty());
        assert!(source.search(&Query::new("   "), 5).await.unwrap().is_empty());

        let empty = MemoryLexicalSource::new(LexicalSourceConfig::default());
        assert!(empty.is_empty());
        assert!(empty.search(&Query::new("capital"), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_answer_field() {
        let config = LexicalSourceConfig {
            field: SearchField::Answer,
            fuzziness: Fuzziness::Off,
            ..Default::default()
        };
        let source = MemoryLexicalSource::from_corpus(&corpus(), config);
        let results = source.search(&Query::new("berlin"), 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, "1");
    }
}
