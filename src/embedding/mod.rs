//! Text embedders that turn queries and corpus questions into vectors.

pub mod hashing;
pub mod text_embedder;

pub use hashing::HashingEmbedder;
pub use text_embedder::TextEmbedder;
