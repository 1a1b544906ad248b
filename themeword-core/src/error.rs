//! Error types for the themeword core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::SimilarityProvider`] lookups.
///
/// A term missing from the vocabulary is not an error; providers answer it
/// with an empty neighbour list.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ProviderError {
    /// A stored entry could not be read back while scoring neighbours.
    #[error("vocabulary entry `{term}` is corrupt")]
    CorruptEntry {
        /// Term whose stored representation was unusable.
        term: String,
    },
    /// The backing store failed for a reason outside the provider's control.
    #[error("similarity backend failed: {reason}")]
    Backend {
        /// Human-readable description supplied by the backend.
        reason: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`ProviderError`] variants.
    enum ProviderErrorCode for ProviderError {
        /// A stored entry could not be read back while scoring neighbours.
        CorruptEntry => CorruptEntry { .. } => "PROVIDER_CORRUPT_ENTRY",
        /// The backing store failed.
        BackendFailure => Backend { .. } => "PROVIDER_BACKEND_FAILURE",
    }
}

/// Error type produced when configuring or running a [`crate::WordSelector`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SelectionError {
    /// The theme was empty or contained only whitespace.
    #[error("theme must contain at least one non-whitespace character")]
    EmptyTheme,
    /// Maximum word length must be greater than zero.
    #[error("max_length must be at least 1 (got {got})")]
    InvalidMaxLength {
        /// The invalid maximum length supplied by the caller.
        got: usize,
    },
    /// The expansion query budget must allow at least one query.
    #[error("max_queries must be at least 1 (got {got})")]
    InvalidQueryBudget {
        /// The invalid budget supplied by the caller.
        got: usize,
    },
    /// The expansion depth limit must allow at least one level.
    #[error("max_depth must be at least 1 (got {got})")]
    InvalidDepthLimit {
        /// The invalid depth supplied by the caller.
        got: usize,
    },
    /// A [`crate::SimilarityProvider`] lookup failed during selection.
    #[error("similarity provider `{provider}` failed: {error}")]
    Provider {
        /// Identifier for the provider that produced the error.
        provider: Arc<str>,
        #[source]
        /// Underlying provider error.
        error: ProviderError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SelectionError`] variants.
    enum SelectionErrorCode for SelectionError {
        /// The theme was empty.
        EmptyTheme => EmptyTheme => "THEMEWORD_EMPTY_THEME",
        /// Maximum word length must be greater than zero.
        InvalidMaxLength => InvalidMaxLength { .. } => "THEMEWORD_INVALID_MAX_LENGTH",
        /// The expansion query budget must allow at least one query.
        InvalidQueryBudget => InvalidQueryBudget { .. } => "THEMEWORD_INVALID_QUERY_BUDGET",
        /// The expansion depth limit must allow at least one level.
        InvalidDepthLimit => InvalidDepthLimit { .. } => "THEMEWORD_INVALID_DEPTH_LIMIT",
        /// A [`crate::SimilarityProvider`] lookup failed.
        ProviderFailure => Provider { .. } => "THEMEWORD_PROVIDER_FAILURE",
    }
}

impl SelectionError {
    /// Retrieve the inner [`ProviderErrorCode`] when the error originated in a
    /// [`crate::SimilarityProvider`].
    #[must_use]
    pub const fn provider_code(&self) -> Option<ProviderErrorCode> {
        match self {
            Self::Provider { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    /// Returns whether the error was caused by caller input rather than the
    /// provider backend.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Provider { .. })
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SelectionError>;
