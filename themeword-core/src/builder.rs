//! Builder utilities for configuring word selection.
//!
//! Exposes the expansion tuning surface and the validation applied before a
//! [`WordSelector`] is constructed around a provider.

use std::time::Duration;

use crate::{
    Result,
    error::SelectionError,
    expansion::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_QUERIES, DeficitPolicy, ExpansionLimits},
    selector::WordSelector,
};

/// Configures and constructs [`WordSelector`] instances.
///
/// # Examples
/// ```
/// use themeword_core::{DeficitPolicy, Neighbour, ProviderError, SelectorBuilder, SimilarityProvider};
///
/// struct Empty;
///
/// impl SimilarityProvider for Empty {
///     fn name(&self) -> &str { "empty" }
///     fn contains(&self, _: &str) -> bool { false }
///     fn neighbours(&self, _: &str, _: usize) -> Result<Vec<Neighbour>, ProviderError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let selector = SelectorBuilder::new()
///     .with_max_queries(64)
///     .with_deficit_policy(DeficitPolicy::PostLengthFilter)
///     .build(Empty)
///     .expect("builder configuration is valid");
/// assert_eq!(selector.limits().max_queries(), 64);
/// assert_eq!(selector.deficit_policy(), DeficitPolicy::PostLengthFilter);
/// ```
#[derive(Debug, Clone)]
pub struct SelectorBuilder {
    max_queries: usize,
    max_depth: usize,
    deadline: Option<Duration>,
    deficit_policy: DeficitPolicy,
    curated_themes: bool,
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self {
            max_queries: DEFAULT_MAX_QUERIES,
            max_depth: DEFAULT_MAX_DEPTH,
            deadline: None,
            deficit_policy: DeficitPolicy::default(),
            curated_themes: true,
        }
    }
}

impl SelectorBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use themeword_core::{DeficitPolicy, SelectorBuilder};
    ///
    /// let builder = SelectorBuilder::new();
    /// assert_eq!(builder.max_queries(), 256);
    /// assert_eq!(builder.max_depth(), 4);
    /// assert_eq!(builder.deficit_policy(), DeficitPolicy::PreLengthFilter);
    /// assert!(builder.curated_themes());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of provider lookups one expansion may issue.
    #[must_use]
    pub const fn with_max_queries(mut self, max_queries: usize) -> Self {
        self.max_queries = max_queries;
        self
    }

    /// Returns the configured query budget.
    #[must_use]
    pub const fn max_queries(&self) -> usize {
        self.max_queries
    }

    /// Overrides how far from the seed the expansion may walk.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the configured depth limit.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets a wall-clock budget for each expansion.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns the configured wall-clock budget.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Chooses how expansion shortfalls are measured.
    #[must_use]
    pub const fn with_deficit_policy(mut self, policy: DeficitPolicy) -> Self {
        self.deficit_policy = policy;
        self
    }

    /// Returns the configured deficit policy.
    #[must_use]
    pub const fn deficit_policy(&self) -> DeficitPolicy {
        self.deficit_policy
    }

    /// Enables or disables the built-in curated theme lists.
    #[must_use]
    pub const fn with_curated_themes(mut self, enabled: bool) -> Self {
        self.curated_themes = enabled;
        self
    }

    /// Returns whether curated theme lists are consulted.
    #[must_use]
    pub const fn curated_themes(&self) -> bool {
        self.curated_themes
    }

    /// Validates the configuration and wraps `provider` in a
    /// [`WordSelector`].
    ///
    /// # Errors
    /// Returns [`SelectionError::InvalidQueryBudget`] for a zero query budget
    /// and [`SelectionError::InvalidDepthLimit`] for a zero depth.
    pub fn build<P>(self, provider: P) -> Result<WordSelector<P>> {
        if self.max_queries == 0 {
            return Err(SelectionError::InvalidQueryBudget {
                got: self.max_queries,
            });
        }
        if self.max_depth == 0 {
            return Err(SelectionError::InvalidDepthLimit {
                got: self.max_depth,
            });
        }
        let mut limits = ExpansionLimits::new(self.max_queries, self.max_depth);
        if let Some(deadline) = self.deadline {
            limits = limits.with_deadline(deadline);
        }
        Ok(WordSelector::new(
            provider,
            limits,
            self.deficit_policy,
            self.curated_themes,
        ))
    }
}
