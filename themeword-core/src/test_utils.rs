//! Shared test utilities for `themeword-core`.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use proptest::test_runner::Config as ProptestConfig;
use themeword_test_support::proptest_profile::ProptestRunProfile;

use crate::{
    error::ProviderError,
    provider::{Neighbour, SimilarityProvider},
};

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}

/// In-memory [`SimilarityProvider`] backed by a fixed neighbour table that
/// records every lookup for later assertions.
///
/// Neighbours keep table order and score `1 / (rank + 1)`.
pub(crate) struct StaticProvider {
    table: HashMap<String, Vec<String>>,
    queries: Mutex<Vec<(String, usize)>>,
    failing: Option<String>,
}

impl StaticProvider {
    pub(crate) fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [&'a str])>) -> Self {
        let table = entries
            .into_iter()
            .map(|(term, neighbours)| {
                (
                    term.to_owned(),
                    neighbours.iter().map(|&n| n.to_owned()).collect(),
                )
            })
            .collect();
        Self {
            table,
            queries: Mutex::new(Vec::new()),
            failing: None,
        }
    }

    /// Makes lookups of `term` fail with a backend error.
    pub(crate) fn failing_on(mut self, term: &str) -> Self {
        self.failing = Some(term.to_owned());
        self
    }

    /// Returns every `(term, top_n)` lookup in call order.
    pub(crate) fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().expect("lock poisoned").clone()
    }

    /// Returns the queried terms in call order.
    pub(crate) fn queried_terms(&self) -> Vec<String> {
        self.queries().into_iter().map(|(term, _)| term).collect()
    }
}

impl SimilarityProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn contains(&self, term: &str) -> bool {
        self.table.contains_key(term)
    }

    fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError> {
        self.queries
            .lock()
            .expect("lock poisoned")
            .push((term.to_owned(), top_n));
        if self.failing.as_deref() == Some(term) {
            return Err(ProviderError::Backend {
                reason: Arc::from("fixture failure"),
            });
        }
        Ok(self
            .table
            .get(term)
            .map(|neighbours| {
                neighbours
                    .iter()
                    .take(top_n)
                    .enumerate()
                    .map(|(rank, n)| Neighbour::new(n.clone(), 1.0 / (rank as f32 + 1.0)))
                    .collect()
            })
            .unwrap_or_default())
    }
}
