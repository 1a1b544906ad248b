//! Neighbourhood expansion around a seed term.
//!
//! A single lookup rarely yields enough usable words once near-duplicates and
//! overlong phrases are filtered out. When the seed comes up short, the
//! engine walks outwards breadth-first: each related term becomes a secondary
//! seed, and any novel accepted terms it yields join a secondary pool from
//! which the shortfall is sampled.
//!
//! The walk is bounded by [`ExpansionLimits`]. Each term is queried at most
//! once per run.

use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
    time::{Duration, Instant},
};

use rand::{Rng, seq::SliceRandom};
use tracing::{Span, debug, field, instrument};

use crate::{
    Result,
    error::SelectionError,
    filter::{CandidateFilter, FilteredCandidates},
    provider::SimilarityProvider,
};

/// Default number of provider lookups one expansion may issue.
pub const DEFAULT_MAX_QUERIES: usize = 256;

/// Default depth of the breadth-first walk, counted from the seed.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Decides how many additional terms a short lookup asks for.
///
/// # Examples
/// ```
/// use themeword_core::{DeficitPolicy, FilteredCandidates};
///
/// let filtered = FilteredCandidates {
///     initial: vec!["a".into(), "b".into(), "c".into()],
///     accepted: vec!["a".into()],
/// };
/// assert_eq!(DeficitPolicy::PreLengthFilter.deficit(5, &filtered), 2);
/// assert_eq!(DeficitPolicy::PostLengthFilter.deficit(5, &filtered), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeficitPolicy {
    /// Measure the shortfall against candidates that passed the character-set
    /// and distance filters, before the length filter.
    ///
    /// Terms removed only for their length do not trigger further expansion.
    #[default]
    PreLengthFilter,
    /// Measure the shortfall against fully accepted candidates.
    PostLengthFilter,
}

impl DeficitPolicy {
    /// Returns how many terms are still missing out of `count`.
    #[must_use]
    pub fn deficit(self, count: usize, filtered: &FilteredCandidates) -> usize {
        let found = match self {
            Self::PreLengthFilter => filtered.initial.len(),
            Self::PostLengthFilter => filtered.accepted.len(),
        };
        count.saturating_sub(found)
    }
}

/// Bounds on a single expansion run.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use themeword_core::ExpansionLimits;
///
/// let limits = ExpansionLimits::default().with_deadline(Duration::from_millis(250));
/// assert_eq!(limits.max_queries(), 256);
/// assert_eq!(limits.deadline(), Some(Duration::from_millis(250)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionLimits {
    max_queries: usize,
    max_depth: usize,
    deadline: Option<Duration>,
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        Self {
            max_queries: DEFAULT_MAX_QUERIES,
            max_depth: DEFAULT_MAX_DEPTH,
            deadline: None,
        }
    }
}

impl ExpansionLimits {
    /// Creates limits with the given query budget and depth.
    ///
    /// Values are validated by [`crate::SelectorBuilder::build`]; the engine
    /// itself treats a zero budget as "seed lookup only".
    #[must_use]
    pub const fn new(max_queries: usize, max_depth: usize) -> Self {
        Self {
            max_queries,
            max_depth,
            deadline: None,
        }
    }

    /// Stops the walk once `deadline` has elapsed since the run started.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Maximum provider lookups per run, including the seed lookup.
    #[must_use]
    pub const fn max_queries(&self) -> usize {
        self.max_queries
    }

    /// Maximum depth of secondary seeds.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Optional wall-clock budget.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

/// Why an expansion run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The seed lookup alone covered the request.
    Satisfied,
    /// Every reachable secondary seed was queried.
    Exhausted,
    /// The query budget ran out.
    QueryBudget,
    /// The deadline elapsed.
    DeadlineElapsed,
}

impl StopReason {
    /// Returns a short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Satisfied => "satisfied",
            Self::Exhausted => "exhausted",
            Self::QueryBudget => "query_budget",
            Self::DeadlineElapsed => "deadline",
        }
    }
}

/// Counters describing one expansion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionStats {
    /// Provider lookups issued, including the seed lookup.
    pub queries: usize,
    /// Distinct novel terms gathered from secondary seeds.
    pub pooled: usize,
    /// Why the run stopped.
    pub stop: StopReason,
}

/// Terms produced by an expansion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Accepted seed neighbours followed by terms sampled from the secondary
    /// pool. Distinct, in model form (underscores).
    pub terms: Vec<String>,
    /// Run counters.
    pub stats: ExpansionStats,
}

impl Expansion {
    fn satisfied(terms: Vec<String>, queries: usize) -> Self {
        Self {
            terms,
            stats: ExpansionStats {
                queries,
                pooled: 0,
                stop: StopReason::Satisfied,
            },
        }
    }
}

struct FrontierNode {
    term: String,
    want: usize,
    depth: usize,
}

/// Expands a seed term into a pool of related words using a
/// [`SimilarityProvider`].
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use themeword_core::{
///     DeficitPolicy, ExpansionEngine, ExpansionLimits, Neighbour, ProviderError,
///     SimilarityProvider,
/// };
///
/// struct Chain;
///
/// impl SimilarityProvider for Chain {
///     fn name(&self) -> &str { "chain" }
///     fn contains(&self, term: &str) -> bool { matches!(term, "sun" | "moon" | "star") }
///     fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError> {
///         let next = match term {
///             "sun" => vec!["moon"],
///             "moon" => vec!["star", "sun"],
///             _ => vec![],
///         };
///         Ok(next.into_iter().take(top_n).map(|t| Neighbour::new(t, 1.0)).collect())
///     }
/// }
///
/// let engine = ExpansionEngine::new(&Chain, ExpansionLimits::default(), DeficitPolicy::default());
/// let mut rng = SmallRng::seed_from_u64(7);
/// let expansion = engine.expand("sun", 2, 20, &mut rng)?;
/// assert_eq!(expansion.terms, ["moon", "star"]);
/// # Ok::<(), themeword_core::SelectionError>(())
/// ```
pub struct ExpansionEngine<'a, P: ?Sized> {
    provider: &'a P,
    limits: ExpansionLimits,
    policy: DeficitPolicy,
}

impl<'a, P: SimilarityProvider + ?Sized> ExpansionEngine<'a, P> {
    /// Creates an engine over `provider`.
    #[must_use]
    pub const fn new(provider: &'a P, limits: ExpansionLimits, policy: DeficitPolicy) -> Self {
        Self {
            provider,
            limits,
            policy,
        }
    }

    /// Provider the engine queries.
    #[must_use]
    pub const fn provider(&self) -> &'a P {
        self.provider
    }

    /// Gathers at least `count` related terms for `seed` when the provider
    /// can supply them.
    ///
    /// The result may hold more than `count` terms when the seed lookup alone
    /// accepts more, and fewer when the neighbourhood runs dry or a limit is
    /// reached. An unknown seed yields an empty expansion.
    ///
    /// # Errors
    /// Returns [`SelectionError::Provider`] when a provider lookup fails.
    #[instrument(
        name = "core.expand",
        err,
        skip(self, rng),
        fields(
            provider = %self.provider.name(),
            queries = field::Empty,
            pooled = field::Empty,
            stop = field::Empty,
        ),
    )]
    pub fn expand<R: Rng + ?Sized>(
        &self,
        seed: &str,
        count: usize,
        max_length: usize,
        rng: &mut R,
    ) -> Result<Expansion> {
        let expansion = self.run(seed, count, max_length, rng)?;
        let span = Span::current();
        span.record("queries", expansion.stats.queries);
        span.record("pooled", expansion.stats.pooled);
        span.record("stop", expansion.stats.stop.as_str());
        Ok(expansion)
    }

    fn run<R: Rng + ?Sized>(
        &self,
        seed: &str,
        count: usize,
        max_length: usize,
        rng: &mut R,
    ) -> Result<Expansion> {
        if count == 0 {
            return Ok(Expansion::satisfied(Vec::new(), 0));
        }
        let filter = CandidateFilter::new(max_length);
        let root = self.lookup(&filter, seed, count)?;
        let mut queries = 1;

        let deficit = self.policy.deficit(count, &root);
        if root.accepted.len() >= count || deficit == 0 {
            return Ok(Expansion::satisfied(root.accepted, queries));
        }

        let mut known: HashSet<&str> = root.initial.iter().map(String::as_str).collect();
        known.insert(seed);
        let mut visited: HashSet<String> = HashSet::from([seed.to_owned()]);
        let mut pooled: HashSet<String> = HashSet::new();
        let mut pool: Vec<String> = Vec::new();
        let mut frontier: VecDeque<FrontierNode> = root
            .initial
            .iter()
            .map(|term| FrontierNode {
                term: term.clone(),
                want: deficit,
                depth: 1,
            })
            .collect();
        let started = Instant::now();

        let stop = loop {
            let Some(node) = frontier.pop_front() else {
                break StopReason::Exhausted;
            };
            if visited.contains(&node.term) {
                continue;
            }
            if queries >= self.limits.max_queries {
                break StopReason::QueryBudget;
            }
            if self
                .limits
                .deadline
                .is_some_and(|deadline| started.elapsed() >= deadline)
            {
                break StopReason::DeadlineElapsed;
            }

            let found = self.lookup(&filter, &node.term, node.want)?;
            queries += 1;
            for term in &found.accepted {
                if !known.contains(term.as_str()) && pooled.insert(term.clone()) {
                    pool.push(term.clone());
                }
            }

            let child_want = self.policy.deficit(node.want, &found);
            let short = found.accepted.len() < node.want && child_want > 0;
            if short && node.depth < self.limits.max_depth {
                frontier.extend(
                    found
                        .initial
                        .into_iter()
                        .filter(|term| !visited.contains(term))
                        .map(|term| FrontierNode {
                            term,
                            want: child_want,
                            depth: node.depth + 1,
                        }),
                );
            }
            visited.insert(node.term);
        };

        debug!(
            seed,
            deficit,
            pool = pool.len(),
            stop = stop.as_str(),
            "secondary seeds explored"
        );

        let pooled_count = pool.len();
        let mut terms = root.accepted;
        terms.extend(pool.choose_multiple(rng, deficit).cloned());
        Ok(Expansion {
            terms,
            stats: ExpansionStats {
                queries,
                pooled: pooled_count,
                stop,
            },
        })
    }

    fn lookup(
        &self,
        filter: &CandidateFilter,
        term: &str,
        top_n: usize,
    ) -> Result<FilteredCandidates> {
        let neighbours =
            self.provider
                .neighbours(term, top_n)
                .map_err(|error| SelectionError::Provider {
                    provider: Arc::from(self.provider.name()),
                    error,
                })?;
        Ok(filter.partition(term, &neighbours))
    }
}
