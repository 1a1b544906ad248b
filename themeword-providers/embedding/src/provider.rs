//! Embedding provider implementation.
use std::{
    cmp::Ordering,
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use rayon::prelude::*;
use themeword_core::{Neighbour, ProviderError, SimilarityProvider};
use tracing::{Span, field, info, instrument};

use crate::errors::EmbeddingProviderError;
use crate::ingest::{Vocabulary, read_binary, read_text};

/// On-disk layout of a word2vec model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Word2VecFormat {
    /// Whitespace-separated decimal components, one word per line.
    Text,
    /// Little-endian `f32` components after each word.
    Binary,
}

/// Word embeddings held as unit-length rows of a contiguous matrix.
///
/// Similarity is cosine similarity, which for unit vectors is the dot
/// product.
#[derive(Debug)]
pub struct EmbeddingProvider {
    name: String,
    dimension: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<f32>,
}

impl EmbeddingProvider {
    fn from_vocabulary(name: impl Into<String>, vocabulary: Vocabulary) -> Self {
        Self {
            name: name.into(),
            dimension: vocabulary.dimension,
            words: vocabulary.words,
            index: vocabulary.index,
            values: vocabulary.values,
        }
    }

    /// Loads a model in the word2vec text format.
    ///
    /// `limit` keeps only the first rows of the file.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use themeword_core::SimilarityProvider;
    /// use themeword_providers_embedding::EmbeddingProvider;
    ///
    /// let raw = "3 2\nsun 1.0 0.0\nstar 0.9 0.1\nsoup 0.0 1.0\n";
    /// let provider = EmbeddingProvider::try_from_word2vec_text("demo", Cursor::new(raw), None)?;
    /// let nearest = provider.neighbours("sun", 1)?;
    /// assert_eq!(nearest[0].term, "star");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`EmbeddingProviderError`] when the input is unreadable or
    /// malformed.
    pub fn try_from_word2vec_text<R: BufRead>(
        name: impl Into<String>,
        reader: R,
        limit: Option<usize>,
    ) -> Result<Self, EmbeddingProviderError> {
        Ok(Self::from_vocabulary(name, read_text(reader, limit)?))
    }

    /// Loads a model in the word2vec binary format.
    ///
    /// # Errors
    /// Returns [`EmbeddingProviderError`] when the input is unreadable,
    /// truncated or malformed.
    pub fn try_from_word2vec_binary<R: BufRead>(
        name: impl Into<String>,
        reader: R,
        limit: Option<usize>,
    ) -> Result<Self, EmbeddingProviderError> {
        Ok(Self::from_vocabulary(name, read_binary(reader, limit)?))
    }

    /// Loads a model file from `path`.
    ///
    /// # Errors
    /// Returns [`EmbeddingProviderError`] when the file cannot be opened or
    /// parsed.
    #[instrument(
        name = "providers.embedding.load",
        err,
        skip(name, path),
        fields(path = %path.as_ref().display(), rows = field::Empty, dimension = field::Empty),
    )]
    pub fn open(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        format: Word2VecFormat,
        limit: Option<usize>,
    ) -> Result<Self, EmbeddingProviderError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let provider = match format {
            Word2VecFormat::Text => Self::try_from_word2vec_text(name, reader, limit)?,
            Word2VecFormat::Binary => Self::try_from_word2vec_binary(name, reader, limit)?,
        };
        let span = Span::current();
        span.record("rows", provider.len());
        span.record("dimension", provider.dimension());
        info!(rows = provider.len(), "embedding model loaded");
        Ok(provider)
    }

    /// Number of distinct words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Words in load order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the unit-length vector of `word`.
    #[must_use]
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).and_then(|&row| self.row(row))
    }

    /// Cosine similarity of two known words.
    #[must_use]
    pub fn similarity(&self, left: &str, right: &str) -> Option<f32> {
        Some(dot(self.vector(left)?, self.vector(right)?))
    }

    fn row(&self, row: usize) -> Option<&[f32]> {
        let start = row.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.values.get(start..end)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Higher scores first, then vocabulary order.
fn rank(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

impl SimilarityProvider for EmbeddingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError> {
        let Some(&query_row) = self.index.get(term) else {
            return Ok(Vec::new());
        };
        if top_n == 0 {
            return Ok(Vec::new());
        }
        let corrupt = || ProviderError::CorruptEntry {
            term: term.to_owned(),
        };
        let query = self.row(query_row).ok_or_else(corrupt)?;
        let mut scored: Vec<(usize, f32)> = self
            .values
            .par_chunks_exact(self.dimension)
            .enumerate()
            .filter(|&(row, _)| row != query_row)
            .map(|(row, vector)| (row, dot(query, vector)))
            .collect();
        if scored.len() > top_n {
            scored.select_nth_unstable_by(top_n, rank);
            scored.truncate(top_n);
        }
        scored.sort_unstable_by(rank);
        scored
            .into_iter()
            .map(|(row, score)| {
                self.words
                    .get(row)
                    .map(|word| Neighbour::new(word.clone(), score))
                    .ok_or_else(corrupt)
            })
            .collect()
    }
}
