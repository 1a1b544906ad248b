pub(crate) use super::{EmbeddingProvider, EmbeddingProviderError};

mod support;
