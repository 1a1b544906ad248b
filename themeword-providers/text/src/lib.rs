//! Thesaurus provider for tab-separated related-word lists.
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use thiserror::Error;
use themeword_core::{Neighbour, ProviderError, SimilarityProvider};
use tracing::{info, instrument};

/// Errors raised while loading a thesaurus.
#[derive(Debug, Error)]
pub enum ThesaurusError {
    /// No entries remained after skipping comments and blank lines.
    #[error("thesaurus contains no entries")]
    EmptyInput,
    /// A line had no tab separator or an empty term.
    #[error("line {line} must be `term<TAB>neighbour,neighbour,...`")]
    MalformedLine {
        /// One-based line number.
        line: usize,
    },
    /// Reading the file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Related-word lists keyed by term, in file order.
///
/// A term's neighbours are scored `1 - rank / len`, so the first listed
/// neighbour scores 1.
pub struct ThesaurusProvider {
    name: String,
    entries: HashMap<String, Vec<String>>,
}

impl ThesaurusProvider {
    /// Creates a provider from in-memory entries.
    ///
    /// Repeated terms extend the earlier list; repeated neighbours are
    /// dropped.
    ///
    /// # Examples
    /// ```
    /// use themeword_core::SimilarityProvider;
    /// use themeword_providers_text::ThesaurusProvider;
    ///
    /// let provider = ThesaurusProvider::new("demo", [("tea", vec!["coffee", "cocoa"])]);
    /// let neighbours = provider.neighbours("tea", 5)?;
    /// assert_eq!(neighbours[0].term, "coffee");
    /// assert_eq!(neighbours[1].score, 0.5);
    /// # Ok::<(), themeword_core::ProviderError>(())
    /// ```
    #[must_use]
    pub fn new<T, N>(name: impl Into<String>, entries: impl IntoIterator<Item = (T, Vec<N>)>) -> Self
    where
        T: Into<String>,
        N: Into<String>,
    {
        let mut provider = Self {
            name: name.into(),
            entries: HashMap::new(),
        };
        for (term, neighbours) in entries {
            provider.insert(term.into(), neighbours.into_iter().map(Into::into));
        }
        provider
    }

    /// Parses `term<TAB>n1,n2,...` lines. Blank lines and lines starting
    /// with `#` are skipped.
    ///
    /// # Errors
    /// Returns [`ThesaurusError::MalformedLine`] for a line without a tab or
    /// with an empty term, [`ThesaurusError::EmptyInput`] when no entries
    /// remain and [`ThesaurusError::Io`] on read failures.
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, ThesaurusError> {
        let mut provider = Self {
            name: name.into(),
            entries: HashMap::new(),
        };
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.trim().is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let (term, neighbours) = trimmed
                .split_once('\t')
                .filter(|(term, _)| !term.trim().is_empty())
                .ok_or(ThesaurusError::MalformedLine { line: index + 1 })?;
            provider.insert(
                term.trim().to_owned(),
                neighbours
                    .split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_owned),
            );
        }
        if provider.entries.is_empty() {
            return Err(ThesaurusError::EmptyInput);
        }
        Ok(provider)
    }

    /// Loads a thesaurus file from `path`.
    ///
    /// # Errors
    /// See [`Self::try_from_reader`].
    #[instrument(name = "providers.thesaurus.load", err, skip(name, path), fields(path = %path.as_ref().display()))]
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ThesaurusError> {
        let provider = Self::try_from_reader(name, BufReader::new(File::open(path.as_ref())?))?;
        info!(terms = provider.len(), "thesaurus loaded");
        Ok(provider)
    }

    /// Number of terms with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the thesaurus has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, term: String, neighbours: impl Iterator<Item = String>) {
        let list = self.entries.entry(term).or_default();
        for neighbour in neighbours {
            if !list.contains(&neighbour) {
                list.push(neighbour);
            }
        }
    }
}

impl SimilarityProvider for ThesaurusProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError> {
        let Some(list) = self.entries.get(term) else {
            return Ok(Vec::new());
        };
        let len = list.len() as f32;
        Ok(list
            .iter()
            .filter(|neighbour| neighbour.as_str() != term)
            .take(top_n)
            .enumerate()
            .map(|(rank, neighbour)| Neighbour::new(neighbour.clone(), 1.0 - rank as f32 / len))
            .collect())
    }
}
