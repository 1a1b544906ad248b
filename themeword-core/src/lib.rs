//! Themeword core library.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod curated;
mod error;
mod expansion;
mod filter;
mod format;
mod provider;
mod request;
mod selector;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::SelectorBuilder,
    curated::{CURATED_THEMES, curated_words},
    error::{ProviderError, ProviderErrorCode, Result, SelectionError, SelectionErrorCode},
    expansion::{
        DEFAULT_MAX_DEPTH, DEFAULT_MAX_QUERIES, DeficitPolicy, Expansion, ExpansionEngine,
        ExpansionLimits, ExpansionStats, StopReason,
    },
    filter::{
        CandidateFilter, DEFAULT_MAX_LENGTH, FilteredCandidates, distance_threshold,
        is_charset_valid, is_single_token, letter_count, passes_distance, passes_length,
        to_display_form, to_model_form,
    },
    format::{FormatResolver, ResolvedTheme, ThemeFormat},
    provider::{Neighbour, SimilarityProvider},
    request::{ExclusionSet, WordRequest, WordRequestBuilder},
    selector::{OVERSAMPLING_FACTOR, Selection, SelectionSource, WordSelector},
};
