//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use crate::source::SyntheticError;
use themeword_core::SelectionError;
use themeword_providers_embedding::EmbeddingProviderError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic vocabulary generation failed.
    #[error("synthetic corpus generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Selector configuration or request validation failed.
    #[error("selection setup failed: {0}")]
    Selection(#[from] SelectionError),
    /// The synthetic embedding model could not be loaded.
    #[error("embedding model failed to load: {0}")]
    Embedding(#[from] EmbeddingProviderError),
}
