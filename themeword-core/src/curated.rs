//! Hand-picked word lists for popular themes.
//!
//! A curated theme bypasses the similarity provider entirely. Lookups are
//! exact: `Animals` is not the curated `animals` list.

const CHRISTMAS: &[&str] = &[
    "santa",
    "christmas tree",
    "reindeer",
    "present",
    "elf",
    "snowman",
    "bauble",
    "stocking",
    "christmas pudding",
    "turkey",
    "angel",
    "jesus",
    "evergreen",
    "sleigh",
];

const ANIMALS: &[&str] = &[
    "cow",
    "donkey",
    "horse",
    "rabbit",
    "tortoise",
    "sheep",
    "hippopotamus",
    "tiger",
    "dog",
    "snake",
    "aardvark",
    "cheetah",
    "meerkat",
    "monkey",
    "zebra",
    "cat",
    "lion",
    "chicken",
    "lizard",
];

const PLANTS: &[&str] = &[
    "roses",
    "trees",
    "flowers",
    "blossom",
    "acorn",
    "agriculture",
    "leaf",
    "juniper",
    "moss",
    "forest",
    "wood",
    "pollen",
    "photosynthesis",
    "petal",
    "jungle",
    "fern",
    "flora",
];

const CITIES: &[&str] = &[
    "London",
    "New York",
    "Chicago",
    "Los Angeles",
    "Edinburgh",
    "Hong Kong",
    "Tokyo",
    "Singapore",
    "Amsterdam",
    "Berlin",
    "Sydney",
    "Melbourne",
    "Bangkok",
    "Dubai",
    "Milan",
    "Toronto",
    "Budapest",
    "Shanghai",
    "Bucharest",
];

/// Returns the curated word list for `theme`, if one exists.
///
/// # Examples
/// ```
/// use themeword_core::curated_words;
///
/// assert!(curated_words("animals").is_some_and(|words| words.contains(&"aardvark")));
/// assert!(curated_words("volcanoes").is_none());
/// ```
#[must_use]
pub fn curated_words(theme: &str) -> Option<&'static [&'static str]> {
    match theme {
        "christmas" => Some(CHRISTMAS),
        "animals" => Some(ANIMALS),
        "plants" => Some(PLANTS),
        "cities" => Some(CITIES),
        _ => None,
    }
}

/// Names of every curated theme.
pub const CURATED_THEMES: [&str; 4] = ["christmas", "animals", "plants", "cities"];
