//! Question/answer corpus loading.
//!
//! A corpus is a list of [`QaRecord`]s read from CSV (header row with
//! `question`, `answer` and optionally `id` and `explanation`) or from JSON
//! Lines with the same field names. JSON Lines ids may be strings or
//! numbers. Records without an `id` are numbered by their position in the
//! file.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HybridQaError, Result};

/// One question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    /// Document identifier.
    pub id: String,
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Optional explanation.
    pub explanation: Option<String>,
}

impl QaRecord {
    /// Create a record without explanation.
    pub fn new<I, Q, A>(id: I, question: Q, answer: A) -> Self
    where
        I: Into<String>,
        Q: Into<String>,
        A: Into<String>,
    {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            explanation: None,
        }
    }

    /// Attach an explanation.
    pub fn with_explanation<S: Into<String>>(mut self, explanation: S) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// Row shape shared by the CSV and JSON Lines readers.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    id: Option<String>,
    question: String,
    answer: String,
    #[serde(default)]
    explanation: Option<String>,
}

impl RawRecord {
    /// Convert to a record, or `None` when the question is blank.
    fn into_record(self, position: usize) -> Option<QaRecord> {
        if self.question.trim().is_empty() {
            warn!("skipping corpus row {position}: empty question");
            return None;
        }

        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| position.to_string());

        Some(QaRecord {
            id,
            question: self.question,
            answer: self.answer,
            explanation: self.explanation.filter(|e| !e.trim().is_empty()),
        })
    }
}

/// Supported corpus file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// One JSON object per line.
    JsonLines,
}

impl CorpusFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(CorpusFormat::Csv),
            Some("jsonl") | Some("ndjson") => Ok(CorpusFormat::JsonLines),
            _ => Err(HybridQaError::corpus(format!(
                "unsupported corpus format for {}, expected .csv or .jsonl",
                path.display()
            ))),
        }
    }
}

/// An in-memory question/answer corpus.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<QaRecord>,
}

impl Corpus {
    /// Create a corpus from records.
    pub fn new(records: Vec<QaRecord>) -> Self {
        Self { records }
    }

    /// Load a corpus file, choosing the format by extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = CorpusFormat::from_path(path)?;
        let file = File::open(path)?;

        let corpus = match format {
            CorpusFormat::Csv => Self::from_csv_reader(file)?,
            CorpusFormat::JsonLines => Self::from_jsonl_reader(BufReader::new(file))?,
        };

        info!("loaded {} records from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    /// Read CSV data whose first row names the columns.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(false)
            .from_reader(reader);

        let mut records = Vec::new();
        for (position, row) in csv_reader.deserialize::<RawRecord>().enumerate() {
            if let Some(record) = row?.into_record(position) {
                records.push(record);
            }
        }

        Ok(Self { records })
    }

    /// Read JSON Lines data. Blank lines are ignored.
    pub fn from_jsonl_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = Vec::new();
        let mut position = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let line_error = |e: serde_json::Error| {
                HybridQaError::corpus(format!("line {}: {e}", line_num + 1))
            };
            let mut value: Value = serde_json::from_str(&line).map_err(line_error)?;
            // Numeric ids are kept in their JSON spelling.
            if let Some(id) = value.get_mut("id")
                && id.is_number()
            {
                *id = Value::String(id.to_string());
            }
            let raw: RawRecord = serde_json::from_value(value).map_err(line_error)?;
            if let Some(record) = raw.into_record(position) {
                records.push(record);
            }
            position += 1;
        }

        Ok(Self { records })
    }

    /// All records, in file order.
    pub fn records(&self) -> &[QaRecord] {
        &self.records
    }

    /// Get the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
