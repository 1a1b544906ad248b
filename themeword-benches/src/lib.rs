//! Benchmark support crate for themeword.
//!
//! Provides seeded synthetic vocabularies and parameter types used by the
//! Criterion benchmarks for word selection and embedding neighbour scans.

pub mod error;
pub mod params;
pub mod source;
