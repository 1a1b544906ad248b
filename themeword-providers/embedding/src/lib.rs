//! Similarity provider backed by word2vec embeddings.

mod errors;
mod ingest;
mod provider;

pub use errors::EmbeddingProviderError;
pub use provider::{EmbeddingProvider, Word2VecFormat};

#[cfg(test)]
mod tests;
