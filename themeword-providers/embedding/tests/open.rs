//! Integration tests loading embedding models from disk.
use std::io::Write;

use rstest::rstest;
use tempfile::NamedTempFile;
use themeword_core::SimilarityProvider;
use themeword_providers_embedding::{EmbeddingProvider, EmbeddingProviderError, Word2VecFormat};

const ROWS: [(&str, [f32; 3]); 4] = [
    ("winter", [0.9, 0.1, 0.0]),
    ("snow", [0.8, 0.2, 0.1]),
    ("summer", [0.0, 0.1, 0.9]),
    ("frost", [0.85, 0.0, 0.05]),
];

fn write_model(format: Word2VecFormat) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file must be created");
    writeln!(file, "{} 3", ROWS.len()).expect("header must be written");
    for (word, vector) in ROWS {
        match format {
            Word2VecFormat::Text => {
                writeln!(file, "{word} {} {} {}", vector[0], vector[1], vector[2])
                    .expect("row must be written");
            }
            Word2VecFormat::Binary => {
                write!(file, "{word} ").expect("word must be written");
                for value in vector {
                    file.write_all(&value.to_le_bytes())
                        .expect("vector must be written");
                }
            }
        }
    }
    file.flush().expect("model must flush");
    file
}

#[rstest]
#[case::text(Word2VecFormat::Text)]
#[case::binary(Word2VecFormat::Binary)]
fn open_loads_either_format(#[case] format: Word2VecFormat) {
    let file = write_model(format);
    let provider =
        EmbeddingProvider::open("weather", file.path(), format, None).expect("model must load");

    assert_eq!(provider.name(), "weather");
    assert_eq!(provider.len(), 4);
    let nearest: Vec<String> = provider
        .neighbours("winter", 2)
        .expect("lookup must succeed")
        .into_iter()
        .map(|n| n.term)
        .collect();
    assert_eq!(nearest, ["frost", "snow"]);
}

#[rstest]
fn open_honours_the_row_limit() {
    let file = write_model(Word2VecFormat::Text);
    let provider = EmbeddingProvider::open("weather", file.path(), Word2VecFormat::Text, Some(2))
        .expect("model must load");
    assert_eq!(provider.words(), ["winter", "snow"]);
    assert!(!provider.contains("frost"));
}

#[rstest]
fn open_reports_missing_files() {
    let dir = tempfile::tempdir().expect("temp dir must be created");
    let err = EmbeddingProvider::open(
        "missing",
        dir.path().join("absent.bin"),
        Word2VecFormat::Binary,
        None,
    )
    .expect_err("missing file must fail");
    assert!(matches!(err, EmbeddingProviderError::Io(_)));
}
