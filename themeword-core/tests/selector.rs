//! Tests for the `WordSelector` orchestration API.

mod common;

use std::{collections::HashSet, sync::Arc};

use common::Table;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};
use themeword_core::{
    ExclusionSet, SelectionError, SelectionSource, SelectorBuilder, SimilarityProvider,
    StopReason, ThemeFormat, WordRequest,
};
use themeword_test_support::tracing::RecordingLayer;
use tracing_subscriber::layer::SubscriberExt;

#[fixture]
fn christmas_model() -> Table {
    Table::new([
        (
            "festive",
            &["christmas", "holiday", "festivities", "yuletide", "festival"][..],
        ),
        ("holiday", &["vacation", "holidays", "bank_holiday"][..]),
        ("yuletide", &["carols", "mistletoe"][..]),
        ("christmas", &["santa_claus", "nativity", "tinsel"][..]),
        ("New_York", &["Manhattan", "Brooklyn", "NYC"][..]),
    ])
}

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(2024)
}

fn sorted(mut words: Vec<String>) -> Vec<String> {
    words.sort();
    words
}

#[rstest]
fn builder_defaults_are_valid(christmas_model: Table) {
    let builder = SelectorBuilder::new();
    assert_eq!(builder.max_queries(), 256);
    assert_eq!(builder.max_depth(), 4);
    assert!(builder.deadline().is_none());

    let selector = builder.build(christmas_model).expect("defaults valid");
    assert_eq!(selector.limits().max_queries(), 256);
    assert!(selector.curated_themes());
}

#[rstest]
fn expansion_fills_short_neighbourhoods(christmas_model: Table) {
    let selector = SelectorBuilder::new()
        .build(christmas_model)
        .expect("configuration must be valid");
    let request = WordRequest::builder("festive")
        .with_count(30)
        .build()
        .expect("request must build");
    let selection = selector
        .select_with_rng(&request, &mut rng())
        .expect("selection must succeed");

    assert_eq!(
        sorted(selection.words().to_vec()),
        [
            "bank holiday",
            "carols",
            "christmas",
            "festivities",
            "holiday",
            "mistletoe",
            "nativity",
            "santa claus",
            "tinsel",
            "vacation",
            "yuletide",
        ]
    );
    let stats = selection.expansion().expect("model selections carry stats");
    assert_eq!(stats.stop, StopReason::Exhausted);
    assert!(stats.queries > 1);
}

#[rstest]
fn multiword_themes_are_resolved_with_underscores(christmas_model: Table) {
    let selector = SelectorBuilder::new()
        .build(christmas_model)
        .expect("configuration must be valid");
    let request = WordRequest::builder("new york")
        .with_count(2)
        .build()
        .expect("request must build");
    let selection = selector
        .select_with_rng(&request, &mut rng())
        .expect("selection must succeed");

    assert_eq!(
        selection.source(),
        &SelectionSource::Model {
            format: ThemeFormat::TitleCase,
            form: "New_York".to_owned(),
        }
    );
    assert_eq!(selection.words().len(), 2);
}

#[rstest]
fn unknown_themes_yield_an_empty_selection(christmas_model: Table) {
    let selector = SelectorBuilder::new()
        .build(christmas_model)
        .expect("configuration must be valid");
    let request = WordRequest::builder("qwxyz")
        .with_count(4)
        .build()
        .expect("request must build");
    let selection = selector
        .select_with_rng(&request, &mut rng())
        .expect("unknown themes are not errors");

    assert!(selection.words().is_empty());
    assert_eq!(selection.source(), &SelectionSource::Unresolved);
}

#[rstest]
#[case::christmas("christmas", "sleigh")]
#[case::plants("plants", "photosynthesis")]
fn curated_lists_win_over_the_model(
    christmas_model: Table,
    #[case] theme: &str,
    #[case] expected_word: &str,
) {
    let selector = SelectorBuilder::new()
        .build(christmas_model)
        .expect("configuration must be valid");
    let request = WordRequest::builder(theme)
        .with_count(100)
        .build()
        .expect("request must build");
    let words = selector
        .pick_words_with_rng(&request, &mut rng())
        .expect("selection must succeed");

    assert!(words.iter().any(|w| w == expected_word));
}

#[rstest]
fn curated_lists_honour_exclusions(christmas_model: Table) {
    let selector = SelectorBuilder::new()
        .build(christmas_model)
        .expect("configuration must be valid");
    let request = WordRequest::builder("christmas")
        .with_count(100)
        .with_allow_multiword(false)
        .with_already_used(ExclusionSet::from_comma_separated("santa,elf,sleigh"))
        .build()
        .expect("request must build");
    let words = selector
        .pick_words_with_rng(&request, &mut rng())
        .expect("selection must succeed");

    assert_eq!(words.len(), 9);
    for excluded in ["santa", "elf", "sleigh", "christmas tree"] {
        assert!(!words.iter().any(|w| w == excluded), "{excluded} returned");
    }
}

#[rstest]
fn selection_records_span_fields(christmas_model: Table) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let selector = SelectorBuilder::new()
        .build(christmas_model)
        .expect("configuration must be valid");
    let request = WordRequest::builder("festive")
        .with_count(3)
        .build()
        .expect("request must build");

    tracing::subscriber::with_default(subscriber, || {
        selector.select_with_rng(&request, &mut rng())
    })
    .expect("selection must succeed");

    let select = layer
        .span_named("core.select")
        .expect("core.select span must exist");
    assert_eq!(select.field("provider"), Some("table"));
    assert_eq!(select.field("theme"), Some("festive"));
    assert_eq!(select.field("source"), Some("model"));

    let expand = layer
        .span_named("core.expand")
        .expect("core.expand span must exist");
    assert_eq!(expand.field("stop"), Some("exhausted"));
    assert!(layer.has_event_message("selection completed"));
}

struct Broken;

impl SimilarityProvider for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn contains(&self, _: &str) -> bool {
        true
    }

    fn neighbours(
        &self,
        _: &str,
        _: usize,
    ) -> Result<Vec<themeword_core::Neighbour>, themeword_core::ProviderError> {
        Err(themeword_core::ProviderError::Backend {
            reason: Arc::from("disk on fire"),
        })
    }
}

#[test]
fn provider_failures_carry_codes() {
    let selector = SelectorBuilder::new()
        .build(Broken)
        .expect("configuration must be valid");
    let request = WordRequest::builder("anything")
        .with_count(1)
        .build()
        .expect("request must build");
    let err = selector
        .pick_words_with_rng(&request, &mut rng())
        .expect_err("backend failure must surface");

    assert!(matches!(err, SelectionError::Provider { ref provider, .. } if &**provider == "broken"));
    assert_eq!(err.code().as_str(), "THEMEWORD_PROVIDER_FAILURE");
    assert_eq!(
        err.provider_code().map(|code| code.as_str()),
        Some("PROVIDER_BACKEND_FAILURE")
    );
    assert!(!err.is_client_error());
}

#[test]
fn selectors_share_providers_through_arc() {
    let shared = Arc::new(Table::new([("tea", &["coffee", "biscuit"][..])]));
    let selector = SelectorBuilder::new()
        .build(Arc::clone(&shared))
        .expect("configuration must be valid");
    let request = WordRequest::builder("tea")
        .with_count(2)
        .build()
        .expect("request must build");
    let words: HashSet<String> = selector
        .pick_words_with_rng(&request, &mut rng())
        .expect("selection must succeed")
        .into_iter()
        .collect();

    assert_eq!(words, HashSet::from(["coffee".to_owned(), "biscuit".to_owned()]));
    assert_eq!(Arc::strong_count(&shared), 2);
}
