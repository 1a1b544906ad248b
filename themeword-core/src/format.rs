//! Theme normalisation against case- and phrase-sensitive vocabularies.
//!
//! Embedding vocabularies store `new_york`, `New_York` and `NEW_YORK` as
//! unrelated entries. The resolver tries a theme in a few likely spellings
//! and keeps the first that produces candidates.

use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    Result,
    expansion::{Expansion, ExpansionEngine},
    filter::to_model_form,
    provider::SimilarityProvider,
};

/// Spelling variants tried by [`FormatResolver`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeFormat {
    /// The theme as given.
    Identity,
    /// All characters lower-cased.
    Lowercase,
    /// Each letter following a non-letter upper-cased, the rest lower-cased.
    TitleCase,
}

impl ThemeFormat {
    /// Every format in resolution order.
    pub const ALL: [Self; 3] = [Self::Identity, Self::Lowercase, Self::TitleCase];

    /// Applies the format to `theme`.
    ///
    /// # Examples
    /// ```
    /// use themeword_core::ThemeFormat;
    ///
    /// assert_eq!(ThemeFormat::Lowercase.apply("New_York"), "new_york");
    /// assert_eq!(ThemeFormat::TitleCase.apply("new_york"), "New_York");
    /// ```
    #[must_use]
    pub fn apply(self, theme: &str) -> String {
        match self {
            Self::Identity => theme.to_owned(),
            Self::Lowercase => theme.to_lowercase(),
            Self::TitleCase => title_case(theme),
        }
    }

    /// Returns a short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Lowercase => "lowercase",
            Self::TitleCase => "titlecase",
        }
    }
}

fn title_case(theme: &str) -> String {
    let mut out = String::with_capacity(theme.len());
    let mut after_letter = false;
    for c in theme.chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}

/// A theme spelling that produced candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    /// Format that matched.
    pub format: ThemeFormat,
    /// The theme in that format, as queried (underscores for spaces).
    pub form: String,
    /// The expansion obtained for `form`.
    pub expansion: Expansion,
}

/// Tries a theme under each [`ThemeFormat`] until one expands to a non-empty
/// set of candidates.
pub struct FormatResolver<'e, 'p, P: ?Sized> {
    engine: &'e ExpansionEngine<'p, P>,
}

impl<'e, 'p, P: SimilarityProvider + ?Sized> FormatResolver<'e, 'p, P> {
    /// Creates a resolver driving `engine`.
    #[must_use]
    pub const fn new(engine: &'e ExpansionEngine<'p, P>) -> Self {
        Self { engine }
    }

    /// Resolves `theme`, requesting `count` candidates per attempt.
    ///
    /// Spaces are converted to underscores first. A format producing the same
    /// spelling as an earlier one is skipped, as is any spelling missing from
    /// the provider's vocabulary. Returns `None` when no format yields
    /// candidates.
    ///
    /// # Errors
    /// Propagates provider failures from the expansion engine.
    #[instrument(name = "core.resolve", err, skip(self, rng))]
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        theme: &str,
        count: usize,
        max_length: usize,
        rng: &mut R,
    ) -> Result<Option<ResolvedTheme>> {
        let base = to_model_form(theme);
        let mut tried: Vec<String> = Vec::with_capacity(ThemeFormat::ALL.len());
        for format in ThemeFormat::ALL {
            let form = format.apply(&base);
            if tried.contains(&form) {
                continue;
            }
            if !self.engine.provider().contains(&form) {
                tried.push(form);
                continue;
            }
            let expansion = self.engine.expand(&form, count, max_length, rng)?;
            if !expansion.terms.is_empty() {
                debug!(format = format.as_str(), form = form.as_str(), "theme resolved");
                return Ok(Some(ResolvedTheme {
                    format,
                    form,
                    expansion,
                }));
            }
            tried.push(form);
        }
        debug!(attempts = tried.len(), "no theme format produced candidates");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::{
        expansion::{DeficitPolicy, ExpansionLimits},
        test_utils::StaticProvider,
    };

    #[rstest]
    #[case("new_york", "New_York")]
    #[case("NEW YORK", "New York")]
    #[case("o'brien", "O'Brien")]
    #[case("rock_n_roll2go", "Rock_N_Roll2Go")]
    #[case("", "")]
    fn title_case_capitalises_after_non_letters(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(ThemeFormat::TitleCase.apply(raw), expected);
    }

    fn resolve(provider: &StaticProvider, theme: &str) -> Option<ResolvedTheme> {
        let engine =
            ExpansionEngine::new(provider, ExpansionLimits::default(), DeficitPolicy::default());
        let mut rng = SmallRng::seed_from_u64(3);
        FormatResolver::new(&engine)
            .resolve(theme, 2, 20, &mut rng)
            .expect("resolution must succeed")
    }

    #[test]
    fn falls_back_to_title_case() {
        let provider = StaticProvider::new([("Paris", &["London", "Berlin"][..])]);
        let resolved = resolve(&provider, "paris").expect("title case must resolve");

        assert_eq!(resolved.format, ThemeFormat::TitleCase);
        assert_eq!(resolved.form, "Paris");
        assert_eq!(resolved.expansion.terms, ["London", "Berlin"]);
        assert_eq!(provider.queried_terms(), ["Paris"]);
    }

    #[test]
    fn tries_formats_in_order() {
        let provider = StaticProvider::new([("Hong_Kong", &["Macau", "Shenzhen"][..])]);
        let resolved = resolve(&provider, "HONG KONG").expect("title case must resolve");

        assert_eq!(resolved.form, "Hong_Kong");
        assert_eq!(resolved.format, ThemeFormat::TitleCase);
    }

    #[test]
    fn skips_spellings_outside_the_vocabulary() {
        let provider = StaticProvider::new([("Hong_Kong", &["Macau", "Shenzhen"][..])]);
        resolve(&provider, "HONG KONG").expect("title case must resolve");

        assert_eq!(provider.queried_terms(), ["Hong_Kong"]);
    }

    #[test]
    fn identity_wins_when_known() {
        let provider = StaticProvider::new([
            ("apple", &["pear", "plum"][..]),
            ("Apple", &["Microsoft", "Google"][..]),
        ]);
        let resolved = resolve(&provider, "apple").expect("identity must resolve");

        assert_eq!(resolved.format, ThemeFormat::Identity);
        assert_eq!(resolved.expansion.terms, ["pear", "plum"]);
        assert_eq!(provider.queried_terms(), ["apple"]);
    }

    #[test]
    fn unknown_theme_resolves_to_none() {
        let provider = StaticProvider::new([("apple", &["pear"][..])]);
        assert!(resolve(&provider, "Zzyzx").is_none());
        assert!(provider.queries().is_empty());
    }
}
