//! Errors raised while loading word2vec models.

use thiserror::Error;

/// Errors produced by [`crate::EmbeddingProvider`] constructors.
#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    /// The first line was not `<rows> <dimension>`.
    #[error("header `{line}` must be `<rows> <dimension>`")]
    MalformedHeader {
        /// Header line as read.
        line: String,
    },
    /// The header declared zero-length vectors.
    #[error("vector dimension must be at least 1")]
    ZeroDimension,
    /// No rows were loaded.
    #[error("vocabulary is empty")]
    EmptyVocabulary,
    /// A text row carried the wrong number of components.
    #[error("row {row} has {actual} components but expected {expected}")]
    InvalidRowLength {
        /// Zero-based row index.
        row: usize,
        /// Dimension declared by the header.
        expected: usize,
        /// Components found on the row.
        actual: usize,
    },
    /// A text component was not a finite `f32`.
    #[error("row {row} component {index} (`{raw}`) is not a finite number")]
    InvalidComponent {
        /// Zero-based row index.
        row: usize,
        /// Zero-based component index.
        index: usize,
        /// Token as read.
        raw: String,
    },
    /// A record ended before its word and vector were complete.
    #[error("row {row} is truncated")]
    TruncatedRecord {
        /// Zero-based row index.
        row: usize,
    },
    /// A binary record's word was not valid UTF-8.
    #[error("row {row} word is not valid UTF-8")]
    InvalidWord {
        /// Zero-based row index.
        row: usize,
    },
    /// A vector had zero magnitude and cannot be normalised.
    #[error("row {row} (`{word}`) has zero magnitude")]
    ZeroVector {
        /// Zero-based row index.
        row: usize,
        /// Word owning the vector.
        word: String,
    },
    /// `rows * dimension` does not fit in memory bounds.
    #[error("matrix with {rows} rows and dimension {dimension} exceeds capacity limits")]
    CapacityOverflow {
        /// Rows to be stored.
        rows: usize,
        /// Vector dimension.
        dimension: usize,
    },
    /// Reading the model failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
