use std::io::Cursor;

use super::EmbeddingProvider;

/// Renders rows in the word2vec text format.
pub(crate) fn text_model(rows: &[(&str, &[f32])]) -> String {
    let dimension = rows.first().map_or(0, |(_, v)| v.len());
    let mut out = format!("{} {dimension}\n", rows.len());
    for (word, vector) in rows {
        let components: Vec<String> = vector.iter().map(f32::to_string).collect();
        out.push_str(&format!("{word} {}\n", components.join(" ")));
    }
    out
}

/// Encodes rows in the word2vec binary format, with a newline after each
/// record when `trailing_newline` is set.
pub(crate) fn binary_model(rows: &[(&str, &[f32])], trailing_newline: bool) -> Vec<u8> {
    let dimension = rows.first().map_or(0, |(_, v)| v.len());
    let mut out = format!("{} {dimension}\n", rows.len()).into_bytes();
    for (word, vector) in rows {
        out.extend_from_slice(word.as_bytes());
        out.push(b' ');
        for value in *vector {
            out.extend_from_slice(&value.to_le_bytes());
        }
        if trailing_newline {
            out.push(b'\n');
        }
    }
    out
}

pub(crate) fn compass() -> Vec<(&'static str, &'static [f32])> {
    vec![
        ("north", &[1.0, 0.0]),
        ("northeast", &[0.7, 0.7]),
        ("east", &[0.0, 1.0]),
        ("south", &[-1.0, 0.0]),
        ("northish", &[1.0, 0.1]),
    ]
}

pub(crate) fn compass_provider() -> EmbeddingProvider {
    EmbeddingProvider::try_from_word2vec_text("compass", Cursor::new(text_model(&compass())), None)
        .expect("fixture model must load")
}
