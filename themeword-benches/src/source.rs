//! Synthetic vocabularies for benchmarking.
//!
//! [`SyntheticCorpus`] draws a seeded set of distinct lowercase words and can
//! render it either as a related-word graph ([`ThesaurusProvider`]) or as a
//! random embedding model ([`EmbeddingProvider`]). The same seed always yields
//! the same corpus so runs stay comparable.

use std::collections::HashSet;
use std::io::Cursor;

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use themeword_providers_embedding::{EmbeddingProvider, EmbeddingProviderError};
use themeword_providers_text::ThesaurusProvider;

/// Errors that may occur during corpus generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// Fewer than two terms were requested, so no term has a neighbour.
    #[error("term count must be at least 2 (got {got})")]
    TooFewTerms {
        /// Requested term count.
        got: usize,
    },
    /// The requested fan-out was zero.
    #[error("fan-out must be greater than zero")]
    ZeroFanout,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
}

/// Configuration for synthetic corpus generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of distinct words.
    pub term_count: usize,
    /// Related words listed per thesaurus entry.
    pub fanout: usize,
    /// Dimensionality of generated embedding vectors.
    pub dimensions: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// A seeded vocabulary of distinct ASCII words.
///
/// # Examples
///
/// ```
/// use themeword_benches::source::{SyntheticConfig, SyntheticCorpus};
///
/// let config = SyntheticConfig { term_count: 10, fanout: 3, dimensions: 4, seed: 42 };
/// let corpus = SyntheticCorpus::generate(&config).expect("valid config");
/// assert_eq!(corpus.words().len(), 10);
/// assert_eq!(corpus.thesaurus().len(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticCorpus {
    words: Vec<String>,
    fanout: usize,
    dimensions: usize,
    seed: u64,
}

impl SyntheticCorpus {
    /// Draws `config.term_count` distinct words of five to nine letters.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError`] when any size in `config` is out of range.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        if config.term_count < 2 {
            return Err(SyntheticError::TooFewTerms {
                got: config.term_count,
            });
        }
        if config.fanout == 0 {
            return Err(SyntheticError::ZeroFanout);
        }
        if config.dimensions == 0 {
            return Err(SyntheticError::ZeroDimensions);
        }

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut seen = HashSet::with_capacity(config.term_count);
        let mut words = Vec::with_capacity(config.term_count);
        while words.len() < config.term_count {
            let length = rng.gen_range(5..=9);
            let word: String = (0..length)
                .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
                .collect();
            if seen.insert(word.clone()) {
                words.push(word);
            }
        }

        Ok(Self {
            words,
            fanout: config.fanout,
            dimensions: config.dimensions,
            seed: config.seed,
        })
    }

    /// Word used as the selection theme.
    #[must_use]
    pub fn theme(&self) -> &str {
        self.words.first().map_or("", String::as_str)
    }

    /// Every generated word, in generation order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Builds a thesaurus where each word lists `fanout` random others.
    #[must_use]
    pub fn thesaurus(&self) -> ThesaurusProvider {
        let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(1));
        let entries: Vec<(String, Vec<String>)> = self
            .words
            .iter()
            .map(|word| {
                let related = self
                    .words
                    .choose_multiple(&mut rng, self.fanout.saturating_add(1))
                    .filter(|candidate| *candidate != word)
                    .take(self.fanout)
                    .cloned()
                    .collect();
                (word.clone(), related)
            })
            .collect();
        ThesaurusProvider::new("synthetic", entries)
    }

    /// Renders random vectors in the word2vec text format and loads them.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingProviderError`] if the rendered model fails to
    /// parse.
    pub fn embeddings(&self) -> Result<EmbeddingProvider, EmbeddingProviderError> {
        let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(2));
        let mut raw = format!("{} {}\n", self.words.len(), self.dimensions);
        for word in &self.words {
            raw.push_str(word);
            for _ in 0..self.dimensions {
                let component: f32 = rng.gen_range(-1.0..1.0);
                raw.push(' ');
                raw.push_str(&component.to_string());
            }
            raw.push('\n');
        }
        EmbeddingProvider::try_from_word2vec_text("synthetic", Cursor::new(raw), None)
    }
}
