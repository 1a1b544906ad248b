//! Word selection orchestration.
//!
//! Provides the [`WordSelector`] entry point: it picks a word bank (curated
//! list or model expansion), applies the caller's constraints and draws the
//! final random sample.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use tracing::{Span, field, info, instrument};

use crate::{
    Result,
    curated::curated_words,
    expansion::{DeficitPolicy, ExpansionEngine, ExpansionLimits, ExpansionStats},
    filter::{is_single_token, passes_length, to_display_form},
    format::{FormatResolver, ThemeFormat},
    provider::SimilarityProvider,
    request::WordRequest,
};

/// Multiplier applied to the requested count when asking the model for raw
/// candidates, leaving room for filtering and sampling.
pub const OVERSAMPLING_FACTOR: usize = 5;

/// Where the word bank of a [`Selection`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    /// The request asked for no words; nothing was looked up.
    NothingRequested,
    /// A built-in curated list.
    Curated,
    /// The similarity provider, queried with `form`.
    Model {
        /// Format that resolved the theme.
        format: ThemeFormat,
        /// The theme spelling that produced candidates.
        form: String,
    },
    /// No theme format produced candidates.
    Unresolved,
}

impl SelectionSource {
    /// Returns a short label for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NothingRequested => "nothing_requested",
            Self::Curated => "curated",
            Self::Model { .. } => "model",
            Self::Unresolved => "unresolved",
        }
    }
}

/// Outcome of a [`WordSelector::select`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    words: Vec<String>,
    source: SelectionSource,
    pool_size: usize,
    expansion: Option<ExpansionStats>,
}

impl Selection {
    /// The selected words, in display form and random order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Consumes the selection, returning the words.
    #[must_use]
    pub fn into_words(self) -> Vec<String> {
        self.words
    }

    /// Where the word bank came from.
    #[must_use]
    pub const fn source(&self) -> &SelectionSource {
        &self.source
    }

    /// Size of the fully filtered pool the words were sampled from.
    #[must_use]
    pub const fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Expansion counters when the model was consulted.
    #[must_use]
    pub const fn expansion(&self) -> Option<&ExpansionStats> {
        self.expansion.as_ref()
    }
}

/// Entry point for selecting themed words from a shared provider.
///
/// # Examples
/// ```
/// use themeword_core::{
///     Neighbour, ProviderError, SelectorBuilder, SimilarityProvider, WordRequest,
/// };
///
/// struct Seaside;
///
/// impl SimilarityProvider for Seaside {
///     fn name(&self) -> &str { "seaside" }
///     fn contains(&self, term: &str) -> bool { term == "beach" }
///     fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError> {
///         if term != "beach" {
///             return Ok(Vec::new());
///         }
///         Ok(["sand", "shells", "sun_lounger", "beachs"]
///             .into_iter()
///             .take(top_n)
///             .map(|t| Neighbour::new(t, 1.0))
///             .collect())
///     }
/// }
///
/// let selector = SelectorBuilder::new().build(Seaside)?;
/// let request = WordRequest::builder("beach").with_count(10).build()?;
/// let mut words = selector.pick_words(&request)?;
/// words.sort();
/// assert_eq!(words, ["sand", "shells", "sun lounger"]);
/// # Ok::<(), themeword_core::SelectionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WordSelector<P> {
    provider: P,
    limits: ExpansionLimits,
    policy: DeficitPolicy,
    curated_themes: bool,
}

impl<P> WordSelector<P> {
    pub(crate) const fn new(
        provider: P,
        limits: ExpansionLimits,
        policy: DeficitPolicy,
        curated_themes: bool,
    ) -> Self {
        Self {
            provider,
            limits,
            policy,
            curated_themes,
        }
    }

    /// Returns the wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the expansion limits applied to every request.
    #[must_use]
    pub const fn limits(&self) -> ExpansionLimits {
        self.limits
    }

    /// Returns the deficit policy used during expansion.
    #[must_use]
    pub const fn deficit_policy(&self) -> DeficitPolicy {
        self.policy
    }

    /// Returns whether curated theme lists are consulted.
    #[must_use]
    pub const fn curated_themes(&self) -> bool {
        self.curated_themes
    }
}

impl<P: SimilarityProvider> WordSelector<P> {
    /// Selects words for `request` using the thread-local random generator.
    ///
    /// # Errors
    /// Returns [`crate::SelectionError::Provider`] when a provider lookup
    /// fails.
    pub fn select(&self, request: &WordRequest) -> Result<Selection> {
        self.select_with_rng(request, &mut rand::thread_rng())
    }

    /// Selects words for `request`, drawing randomness from `rng`.
    ///
    /// The result holds `min(count, pool_size)` distinct words. A short
    /// result is not an error.
    ///
    /// # Errors
    /// Returns [`crate::SelectionError::Provider`] when a provider lookup
    /// fails.
    #[instrument(
        name = "core.select",
        err,
        skip(self, request, rng),
        fields(
            provider = %self.provider.name(),
            theme = %request.theme(),
            count = request.count(),
            source = field::Empty,
            pool = field::Empty,
        ),
    )]
    pub fn select_with_rng<R: Rng + ?Sized>(
        &self,
        request: &WordRequest,
        rng: &mut R,
    ) -> Result<Selection> {
        if request.count() == 0 {
            return Ok(Selection {
                words: Vec::new(),
                source: SelectionSource::NothingRequested,
                pool_size: 0,
                expansion: None,
            });
        }

        let (bank, source, expansion) = match self.curated_bank(request.theme()) {
            Some(words) => (
                words.iter().map(|&w| w.to_owned()).collect(),
                SelectionSource::Curated,
                None,
            ),
            None => self.model_bank(request, rng)?,
        };

        let pool = build_pool(bank, request);
        let words: Vec<String> = pool
            .choose_multiple(rng, request.count())
            .cloned()
            .collect();

        let span = Span::current();
        span.record("source", source.as_str());
        span.record("pool", pool.len());
        info!(
            selected = words.len(),
            pool = pool.len(),
            source = source.as_str(),
            "selection completed"
        );
        Ok(Selection {
            words,
            source,
            pool_size: pool.len(),
            expansion,
        })
    }

    /// Returns only the words of [`Self::select`].
    ///
    /// # Errors
    /// See [`Self::select`].
    pub fn pick_words(&self, request: &WordRequest) -> Result<Vec<String>> {
        self.select(request).map(Selection::into_words)
    }

    /// Returns only the words of [`Self::select_with_rng`].
    ///
    /// # Errors
    /// See [`Self::select_with_rng`].
    pub fn pick_words_with_rng<R: Rng + ?Sized>(
        &self,
        request: &WordRequest,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        self.select_with_rng(request, rng)
            .map(Selection::into_words)
    }

    fn curated_bank(&self, theme: &str) -> Option<&'static [&'static str]> {
        if self.curated_themes {
            curated_words(theme)
        } else {
            None
        }
    }

    fn model_bank<R: Rng + ?Sized>(
        &self,
        request: &WordRequest,
        rng: &mut R,
    ) -> Result<(Vec<String>, SelectionSource, Option<ExpansionStats>)> {
        let engine = ExpansionEngine::new(&self.provider, self.limits, self.policy);
        let raw_count = request.count().saturating_mul(OVERSAMPLING_FACTOR);
        let resolved = FormatResolver::new(&engine).resolve(
            request.theme(),
            raw_count,
            request.max_length(),
            rng,
        )?;
        Ok(match resolved {
            Some(resolved) => (
                resolved.expansion.terms,
                SelectionSource::Model {
                    format: resolved.format,
                    form: resolved.form,
                },
                Some(resolved.expansion.stats),
            ),
            None => (Vec::new(), SelectionSource::Unresolved, None),
        })
    }
}

/// Applies the request constraints to a raw word bank.
///
/// Underscores become spaces, then multiword, length and exclusion filters
/// run, and duplicates are dropped keeping the first occurrence.
fn build_pool(bank: Vec<String>, request: &WordRequest) -> Vec<String> {
    let mut seen = HashSet::new();
    bank.into_iter()
        .map(|term| to_display_form(&term))
        .filter(|term| request.allow_multiword() || is_single_token(term))
        .filter(|term| passes_length(term, request.max_length()))
        .filter(|term| !request.already_used().contains(term))
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::{fixture, rstest};

    use crate::{
        builder::SelectorBuilder, error::SelectionError, request::ExclusionSet,
        test_utils::StaticProvider,
    };

    #[fixture]
    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    fn winter() -> StaticProvider {
        StaticProvider::new([(
            "winter",
            &[
                "winters",
                "snow",
                "ice_skating",
                "frost",
                "sleet",
                "hot-chocolate",
                "blizzard",
                "cold_snap",
                "extremely_long_snowstorm",
            ][..],
        )])
    }

    fn request(theme: &str, count: usize) -> WordRequest {
        WordRequest::builder(theme)
            .with_count(count)
            .build()
            .expect("request must build")
    }

    fn sorted(mut words: Vec<String>) -> Vec<String> {
        words.sort();
        words
    }

    #[rstest]
    fn oversamples_model_queries(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter())
            .expect("selector must build");
        let _ = selector
            .select_with_rng(&request("winter", 5), &mut rng)
            .expect("selection must succeed");

        assert_eq!(selector.provider().queries()[0], ("winter".to_owned(), 25));
    }

    #[rstest]
    fn returns_whole_pool_when_short(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter())
            .expect("selector must build");
        let selection = selector
            .select_with_rng(&request("winter", 50), &mut rng)
            .expect("selection must succeed");

        assert_eq!(
            sorted(selection.words().to_vec()),
            ["blizzard", "cold snap", "frost", "ice skating", "sleet", "snow"]
        );
        assert_eq!(selection.pool_size(), 6);
        assert!(matches!(
            selection.source(),
            SelectionSource::Model {
                format: ThemeFormat::Identity,
                ..
            }
        ));
    }

    #[rstest]
    fn single_word_requests_drop_phrases(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter())
            .expect("selector must build");
        let request = WordRequest::builder("winter")
            .with_count(50)
            .with_allow_multiword(false)
            .build()
            .expect("request must build");
        let words = selector
            .pick_words_with_rng(&request, &mut rng)
            .expect("selection must succeed");

        assert_eq!(sorted(words), ["blizzard", "frost", "sleet", "snow"]);
    }

    #[rstest]
    fn exclusions_and_length_apply(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter())
            .expect("selector must build");
        let request = WordRequest::builder("winter")
            .with_count(50)
            .with_already_used(ExclusionSet::from_comma_separated("snow,frost"))
            .with_max_length(6)
            .build()
            .expect("request must build");
        let words = selector
            .pick_words_with_rng(&request, &mut rng)
            .expect("selection must succeed");

        assert_eq!(sorted(words), ["sleet"]);
    }

    #[rstest]
    fn samples_exactly_count(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter())
            .expect("selector must build");
        let words = selector
            .pick_words_with_rng(&request("winter", 3), &mut rng)
            .expect("selection must succeed");

        assert_eq!(words.len(), 3);
        let unique: HashSet<_> = words.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[rstest]
    fn zero_count_performs_no_lookup(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter())
            .expect("selector must build");
        let selection = selector
            .select_with_rng(&request("winter", 0), &mut rng)
            .expect("selection must succeed");

        assert!(selection.words().is_empty());
        assert_eq!(selection.source(), &SelectionSource::NothingRequested);
        assert!(selector.provider().queries().is_empty());
    }

    #[rstest]
    fn curated_themes_bypass_the_provider(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter())
            .expect("selector must build");
        let request = WordRequest::builder("cities")
            .with_count(30)
            .with_allow_multiword(false)
            .build()
            .expect("request must build");
        let selection = selector
            .select_with_rng(&request, &mut rng)
            .expect("selection must succeed");

        assert_eq!(selection.source(), &SelectionSource::Curated);
        assert_eq!(selection.words().len(), 16);
        assert!(selection.words().iter().all(|w| is_single_token(w)));
        assert!(selector.provider().queries().is_empty());
    }

    #[rstest]
    fn curated_themes_can_be_disabled(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .with_curated_themes(false)
            .build(winter())
            .expect("selector must build");
        let selection = selector
            .select_with_rng(&request("animals", 3), &mut rng)
            .expect("selection must succeed");

        assert_eq!(selection.source(), &SelectionSource::Unresolved);
        assert!(selection.words().is_empty());
    }

    #[rstest]
    fn provider_failures_surface(mut rng: SmallRng) {
        let selector = SelectorBuilder::new()
            .build(winter().failing_on("winter"))
            .expect("selector must build");
        let err = selector
            .select_with_rng(&request("winter", 3), &mut rng)
            .expect_err("provider failure must surface");
        assert!(matches!(err, SelectionError::Provider { .. }));
    }

    #[test]
    fn pool_drops_duplicates_after_display_conversion() {
        let request = request("x", 5);
        let pool = build_pool(
            vec!["ice_cream".into(), "ice cream".into(), "sorbet".into()],
            &request,
        );
        assert_eq!(pool, ["ice cream", "sorbet"]);
    }
}
