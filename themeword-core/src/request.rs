//! Strongly typed word requests.
//!
//! Transports map their loosely typed parameters onto [`WordRequest`] through
//! [`WordRequestBuilder`], which rejects invalid input before any provider
//! lookup happens.

use std::collections::HashSet;

use crate::{Result, error::SelectionError, filter::DEFAULT_MAX_LENGTH};

/// Terms a caller has already used and never wants back.
///
/// Membership is exact string equality.
///
/// # Examples
/// ```
/// use themeword_core::ExclusionSet;
///
/// let used = ExclusionSet::from_comma_separated("santa,elf");
/// assert!(used.contains("elf"));
/// assert!(!used.contains("Elf"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    terms: HashSet<String>,
}

impl ExclusionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `raw` on commas without trimming.
    ///
    /// An empty string yields a single empty entry, which can never match a
    /// selected word.
    #[must_use]
    pub fn from_comma_separated(raw: &str) -> Self {
        raw.split(',').collect()
    }

    /// Returns whether `term` is excluded.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Number of distinct excluded terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns whether nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A validated request for themed words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRequest {
    theme: String,
    count: usize,
    allow_multiword: bool,
    already_used: ExclusionSet,
    max_length: usize,
}

impl WordRequest {
    /// Starts building a request for `theme`.
    ///
    /// # Examples
    /// ```
    /// use themeword_core::{ExclusionSet, WordRequest};
    ///
    /// let request = WordRequest::builder("winter")
    ///     .with_count(8)
    ///     .with_allow_multiword(false)
    ///     .with_already_used(ExclusionSet::from_comma_separated("snow"))
    ///     .build()?;
    /// assert_eq!(request.count(), 8);
    /// assert_eq!(request.max_length(), 20);
    /// # Ok::<(), themeword_core::SelectionError>(())
    /// ```
    #[must_use]
    pub fn builder(theme: impl Into<String>) -> WordRequestBuilder {
        WordRequestBuilder::new(theme)
    }

    /// The theme as supplied.
    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Number of words wanted.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Whether multi-word phrases may be returned.
    #[must_use]
    pub const fn allow_multiword(&self) -> bool {
        self.allow_multiword
    }

    /// Terms that must not be returned.
    #[must_use]
    pub const fn already_used(&self) -> &ExclusionSet {
        &self.already_used
    }

    /// Letter ceiling per word, spaces excluded.
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }
}

/// Builder validating [`WordRequest`] fields.
#[derive(Debug, Clone)]
pub struct WordRequestBuilder {
    theme: String,
    count: usize,
    allow_multiword: bool,
    already_used: ExclusionSet,
    max_length: usize,
}

impl WordRequestBuilder {
    fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            count: 0,
            allow_multiword: true,
            already_used: ExclusionSet::new(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Sets the number of words wanted.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the number of words wanted from a signed value; negative counts
    /// request nothing.
    ///
    /// # Examples
    /// ```
    /// use themeword_core::WordRequest;
    ///
    /// let request = WordRequest::builder("sea").with_signed_count(-3).build()?;
    /// assert_eq!(request.count(), 0);
    /// # Ok::<(), themeword_core::SelectionError>(())
    /// ```
    #[must_use]
    pub fn with_signed_count(self, count: i64) -> Self {
        self.with_count(usize::try_from(count).unwrap_or(0))
    }

    /// Allows or forbids multi-word phrases.
    #[must_use]
    pub const fn with_allow_multiword(mut self, allow: bool) -> Self {
        self.allow_multiword = allow;
        self
    }

    /// Sets the terms that must not be returned.
    #[must_use]
    pub fn with_already_used(mut self, already_used: ExclusionSet) -> Self {
        self.already_used = already_used;
        self
    }

    /// Sets the letter ceiling per word.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Validates the fields and constructs the request.
    ///
    /// # Errors
    /// Returns [`SelectionError::EmptyTheme`] for a blank theme and
    /// [`SelectionError::InvalidMaxLength`] for a zero letter ceiling.
    pub fn build(self) -> Result<WordRequest> {
        if self.theme.trim().is_empty() {
            return Err(SelectionError::EmptyTheme);
        }
        if self.max_length == 0 {
            return Err(SelectionError::InvalidMaxLength {
                got: self.max_length,
            });
        }
        Ok(WordRequest {
            theme: self.theme,
            count: self.count,
            allow_multiword: self.allow_multiword,
            already_used: self.already_used,
            max_length: self.max_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("", 1)]
    #[case("a,b,c", 3)]
    #[case("a,,a", 2)]
    #[case(" a,a", 2)]
    fn exclusions_split_on_commas(#[case] raw: &str, #[case] expected: usize) {
        assert_eq!(ExclusionSet::from_comma_separated(raw).len(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_themes_are_rejected(#[case] theme: &str) {
        let err = WordRequest::builder(theme)
            .with_count(3)
            .build()
            .expect_err("blank theme must fail");
        assert_eq!(err, SelectionError::EmptyTheme);
    }

    #[test]
    fn zero_max_length_is_rejected() {
        let err = WordRequest::builder("sea")
            .with_max_length(0)
            .build()
            .expect_err("zero max length must fail");
        assert_eq!(err, SelectionError::InvalidMaxLength { got: 0 });
    }

    #[rstest]
    #[case(i64::MIN, 0)]
    #[case(-1, 0)]
    #[case(0, 0)]
    #[case(12, 12)]
    fn signed_counts_clamp_at_zero(#[case] raw: i64, #[case] expected: usize) {
        let request = WordRequest::builder("sea")
            .with_signed_count(raw)
            .build()
            .expect("request must build");
        assert_eq!(request.count(), expected);
    }

    #[test]
    fn defaults_allow_multiword_with_twenty_letters() {
        let request = WordRequest::builder("sea").build().expect("request must build");
        assert!(request.allow_multiword());
        assert_eq!(request.max_length(), DEFAULT_MAX_LENGTH);
        assert!(request.already_used().is_empty());
    }
}
