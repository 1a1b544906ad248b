use std::collections::HashMap;

use themeword_core::{Neighbour, ProviderError, SimilarityProvider};

/// Fixed neighbour table keyed by term.
#[derive(Clone, Debug, Default)]
pub struct Table {
    entries: HashMap<String, Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [&'a str])>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(term, neighbours)| {
                    (
                        term.to_owned(),
                        neighbours.iter().map(|&n| n.to_owned()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Builds a table from owned rows, as produced by property strategies.
    #[must_use]
    pub fn from_rows(rows: Vec<(String, Vec<String>)>) -> Self {
        Self {
            entries: rows.into_iter().collect(),
        }
    }
}

impl SimilarityProvider for Table {
    fn name(&self) -> &str {
        "table"
    }

    fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    fn neighbours(&self, term: &str, top_n: usize) -> Result<Vec<Neighbour>, ProviderError> {
        Ok(self
            .entries
            .get(term)
            .map(|row| {
                row.iter()
                    .take(top_n)
                    .map(|n| Neighbour::new(n.clone(), 0.5))
                    .collect()
            })
            .unwrap_or_default())
    }
}
