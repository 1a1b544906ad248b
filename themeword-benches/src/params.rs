//! Benchmark parameter types.

use std::fmt;

/// Parameters for a selection benchmark run.
#[derive(Clone, Debug)]
pub struct SelectionBenchParams {
    /// Vocabulary size of the synthetic thesaurus.
    pub term_count: usize,
    /// Number of words requested.
    pub count: usize,
}

impl fmt::Display for SelectionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},count={}", self.term_count, self.count)
    }
}

/// Parameters for an embedding neighbour scan.
#[derive(Clone, Debug)]
pub struct NeighbourBenchParams {
    /// Vocabulary size of the synthetic model.
    pub term_count: usize,
    /// Vector dimensionality.
    pub dimensions: usize,
}

impl fmt::Display for NeighbourBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},d={}", self.term_count, self.dimensions)
    }
}
