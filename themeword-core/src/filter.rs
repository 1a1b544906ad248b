//! Candidate predicates applied to provider results.
//!
//! Every predicate here is a pure function of its inputs. The model stores
//! phrases with underscores (`christmas_tree`); callers see them with spaces,
//! and [`to_model_form`] / [`to_display_form`] convert at that boundary.

use crate::provider::Neighbour;

/// Default ceiling on the letter count of a selected word.
pub const DEFAULT_MAX_LENGTH: usize = 20;

/// Replaces spaces with underscores, the form the embedding vocabulary uses.
///
/// # Examples
/// ```
/// use themeword_core::to_model_form;
///
/// assert_eq!(to_model_form("new york"), "new_york");
/// ```
#[must_use]
pub fn to_model_form(term: &str) -> String {
    term.replace(' ', "_")
}

/// Replaces underscores with spaces for presentation.
///
/// # Examples
/// ```
/// use themeword_core::to_display_form;
///
/// assert_eq!(to_display_form("christmas_tree"), "christmas tree");
/// ```
#[must_use]
pub fn to_display_form(term: &str) -> String {
    term.replace('_', " ")
}

/// Returns whether `word` consists only of ASCII letters and underscores.
///
/// Applied to raw vocabulary terms, before underscores become spaces.
///
/// # Examples
/// ```
/// use themeword_core::is_charset_valid;
///
/// assert!(is_charset_valid("ice_cream"));
/// assert!(!is_charset_valid("ice-cream"));
/// assert!(!is_charset_valid("R2D2"));
/// ```
#[must_use]
pub fn is_charset_valid(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Minimum edit distance, exclusive, a candidate must keep from `seed`.
///
/// A third of the seed's characters, rounded down.
#[must_use]
pub fn distance_threshold(seed: &str) -> usize {
    seed.chars().count() / 3
}

/// Returns whether `word` differs enough from `seed` to count as a related
/// word rather than a variant of the seed (plural, typo, casing).
///
/// Compares lower-cased Levenshtein distance against
/// [`distance_threshold`].
///
/// # Examples
/// ```
/// use themeword_core::passes_distance;
///
/// assert!(!passes_distance("cats", "cat"));
/// assert!(passes_distance("dog", "cat"));
/// ```
#[must_use]
pub fn passes_distance(word: &str, seed: &str) -> bool {
    let distance = strsim::levenshtein(&word.to_lowercase(), &seed.to_lowercase());
    distance > distance_threshold(seed)
}

/// Counts the letters of `term` once underscores become spaces, ignoring the
/// spaces themselves.
///
/// # Examples
/// ```
/// use themeword_core::letter_count;
///
/// assert_eq!(letter_count("christmas_tree"), 13);
/// assert_eq!(letter_count("hong kong"), 8);
/// ```
#[must_use]
pub fn letter_count(term: &str) -> usize {
    term.chars().filter(|&c| c != ' ' && c != '_').count()
}

/// Returns whether `term` fits within `max_length` letters.
#[must_use]
pub fn passes_length(term: &str, max_length: usize) -> bool {
    letter_count(term) <= max_length
}

/// Returns whether `term` is a single, non-empty run of ASCII letters.
///
/// # Examples
/// ```
/// use themeword_core::is_single_token;
///
/// assert!(is_single_token("reindeer"));
/// assert!(!is_single_token("christmas tree"));
/// assert!(!is_single_token(""));
/// ```
#[must_use]
pub fn is_single_token(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| c.is_ascii_alphabetic())
}

/// Outcome of filtering one provider lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredCandidates {
    /// Terms passing the character-set and distance filters.
    pub initial: Vec<String>,
    /// The subset of `initial` that also passes the length filter.
    pub accepted: Vec<String>,
}

/// Applies the candidate predicates relative to a seed term.
///
/// # Examples
/// ```
/// use themeword_core::{CandidateFilter, Neighbour};
///
/// let filter = CandidateFilter::new(6);
/// let neighbours = vec![
///     Neighbour::new("cats", 0.9),
///     Neighbour::new("dog", 0.8),
///     Neighbour::new("house_cat", 0.7),
///     Neighbour::new("feline_companion", 0.6),
/// ];
/// let filtered = filter.partition("cat", &neighbours);
/// assert_eq!(filtered.initial, ["dog", "house_cat", "feline_companion"]);
/// assert_eq!(filtered.accepted, ["dog"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateFilter {
    max_length: usize,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl CandidateFilter {
    /// Creates a filter enforcing `max_length` letters per term.
    #[must_use]
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Returns the configured letter ceiling.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns whether `word` survives the character-set and distance filters
    /// relative to `seed`.
    #[must_use]
    pub fn is_related(&self, word: &str, seed: &str) -> bool {
        is_charset_valid(word) && passes_distance(word, seed)
    }

    /// Splits provider output into `initial` and `accepted` candidates,
    /// preserving provider order.
    #[must_use]
    pub fn partition(&self, seed: &str, neighbours: &[Neighbour]) -> FilteredCandidates {
        let initial: Vec<String> = neighbours
            .iter()
            .filter(|n| self.is_related(&n.term, seed))
            .map(|n| n.term.clone())
            .collect();
        let accepted = initial
            .iter()
            .filter(|term| passes_length(term, self.max_length))
            .cloned()
            .collect();
        FilteredCandidates { initial, accepted }
    }
}
