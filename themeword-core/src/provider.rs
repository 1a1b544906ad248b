//! Similarity provider abstractions for the themeword core runtime.

use std::{rc::Rc, sync::Arc};

use crate::error::ProviderError;

/// A term returned by a [`SimilarityProvider`] together with its similarity
/// score relative to the query term.
///
/// Higher scores mean closer neighbours. Scores are only comparable within a
/// single lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour {
    /// Vocabulary term as stored by the provider (phrases use underscores).
    pub term: String,
    /// Similarity score relative to the query term.
    pub score: f32,
}

impl Neighbour {
    /// Creates a neighbour entry.
    ///
    /// # Examples
    /// ```
    /// use themeword_core::Neighbour;
    ///
    /// let neighbour = Neighbour::new("kitten", 0.8);
    /// assert_eq!(neighbour.term, "kitten");
    /// ```
    #[must_use]
    pub fn new(term: impl Into<String>, score: f32) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }
}

/// Read-only capability mapping a term to its nearest semantic neighbours.
///
/// Implementations are loaded once and shared across requests, so lookups
/// take `&self` and must not mutate the provider.
///
/// # Examples
/// ```
/// use themeword_core::{Neighbour, ProviderError, SimilarityProvider};
///
/// struct Pair;
///
/// impl SimilarityProvider for Pair {
///     fn name(&self) -> &str { "pair" }
///     fn contains(&self, term: &str) -> bool { term == "cat" || term == "dog" }
///     fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError> {
///         let other = match term {
///             "cat" => "dog",
///             "dog" => "cat",
///             _ => return Ok(Vec::new()),
///         };
///         Ok(vec![Neighbour::new(other, 0.9)].into_iter().take(top_n).collect())
///     }
/// }
///
/// let provider = Pair;
/// assert_eq!(provider.neighbours("cat", 5)?[0].term, "dog");
/// assert!(provider.neighbours("emu", 5)?.is_empty());
/// # Ok::<(), ProviderError>(())
/// ```
pub trait SimilarityProvider {
    /// Returns a human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Returns whether `term` is part of the provider's vocabulary.
    fn contains(&self, term: &str) -> bool;

    /// Returns up to `top_n` neighbours of `term`, best first.
    ///
    /// The query term itself is never part of the result.
    ///
    /// # Errors
    /// Returns [`ProviderError`] only for backend faults. A term missing from
    /// the vocabulary yields `Ok` with an empty vector.
    fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError>;
}

macro_rules! forward_provider {
    ($($wrapper:ty),+ $(,)?) => {
        $(
            impl<T: SimilarityProvider + ?Sized> SimilarityProvider for $wrapper {
                fn name(&self) -> &str {
                    (**self).name()
                }

                fn contains(&self, term: &str) -> bool {
                    (**self).contains(term)
                }

                fn neighbours(
                    &self,
                    term: &str,
                    top_n: usize,
                ) -> Result<Vec<Neighbour>, ProviderError> {
                    (**self).neighbours(term, top_n)
                }
            }
        )+
    };
}

forward_provider!(&T, Box<T>, Rc<T>, Arc<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StaticProvider;

    #[test]
    fn shared_handles_forward_lookups() {
        let provider = Arc::new(StaticProvider::new([("cat", &["dog", "kitten"][..])]));
        let shared: Arc<dyn SimilarityProvider + Send + Sync> = provider.clone();

        let neighbours = shared.neighbours("cat", 1).expect("lookup must succeed");

        assert_eq!(neighbours, vec![Neighbour::new("dog", 1.0)]);
        assert_eq!(shared.name(), "static");
        assert!(shared.contains("cat"));
        assert_eq!(provider.queries(), vec![("cat".to_owned(), 1)]);
    }

    #[test]
    fn unknown_terms_are_not_errors() {
        let provider = StaticProvider::new([("cat", &["dog"][..])]);
        let boxed: Box<dyn SimilarityProvider> = Box::new(provider);
        let neighbours = boxed.neighbours("emu", 10).expect("unknown term is not an error");
        assert!(neighbours.is_empty());
    }
}
