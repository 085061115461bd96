//! In-memory lexical retrieval: tokenization, fuzzy term matching and BM25.

pub mod analyzer;
pub mod fuzzy;
pub mod memory;

pub use fuzzy::Fuzziness;
pub use memory::{LexicalSourceConfig, MemoryLexicalSource, SearchField};
