//! Readers for the word2vec text and binary interchange formats.
use std::collections::{HashMap, hash_map::Entry};
use std::io::{BufRead, ErrorKind};

use tracing::warn;

use crate::errors::EmbeddingProviderError;

/// Parsed `<rows> <dimension>` header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) rows: usize,
    pub(crate) dimension: usize,
}

/// Unit-length vectors in row-major order plus their words.
#[derive(Debug, Default)]
pub(crate) struct Vocabulary {
    pub(crate) dimension: usize,
    pub(crate) words: Vec<String>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) values: Vec<f32>,
}

impl Vocabulary {
    fn with_capacity(rows: usize, dimension: usize) -> Result<Self, EmbeddingProviderError> {
        let capacity = rows
            .checked_mul(dimension)
            .ok_or(EmbeddingProviderError::CapacityOverflow { rows, dimension })?;
        Ok(Self {
            dimension,
            words: Vec::with_capacity(rows),
            index: HashMap::with_capacity(rows),
            values: Vec::with_capacity(capacity),
        })
    }

    /// Normalises `vector` and appends it. Later duplicates of a word are
    /// skipped.
    fn push(
        &mut self,
        row: usize,
        word: String,
        mut vector: Vec<f32>,
    ) -> Result<(), EmbeddingProviderError> {
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(EmbeddingProviderError::ZeroVector { row, word });
        }
        match self.index.entry(word) {
            Entry::Occupied(entry) => {
                warn!(row, word = entry.key().as_str(), "duplicate word skipped");
            }
            Entry::Vacant(entry) => {
                self.words.push(entry.key().clone());
                entry.insert(self.words.len() - 1);
                vector.iter_mut().for_each(|v| *v /= norm);
                self.values.extend_from_slice(&vector);
            }
        }
        Ok(())
    }
}

pub(crate) fn parse_header(line: &str) -> Result<Header, EmbeddingProviderError> {
    let malformed = || EmbeddingProviderError::MalformedHeader {
        line: line.trim_end().to_owned(),
    };
    let mut parts = line.split_whitespace();
    let (Some(rows), Some(dimension), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let rows = rows.parse::<usize>().map_err(|_| malformed())?;
    let dimension = dimension.parse::<usize>().map_err(|_| malformed())?;
    if dimension == 0 {
        return Err(EmbeddingProviderError::ZeroDimension);
    }
    Ok(Header { rows, dimension })
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<Header, EmbeddingProviderError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    parse_header(&line)
}

fn rows_to_read(header: Header, limit: Option<usize>) -> Result<usize, EmbeddingProviderError> {
    let rows = limit.map_or(header.rows, |limit| header.rows.min(limit));
    if rows == 0 {
        return Err(EmbeddingProviderError::EmptyVocabulary);
    }
    Ok(rows)
}

fn parse_component(row: usize, index: usize, raw: &str) -> Result<f32, EmbeddingProviderError> {
    raw.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| EmbeddingProviderError::InvalidComponent {
            row,
            index,
            raw: raw.to_owned(),
        })
}

/// Reads the text format: a header, then one `<word> <f32>...` line per row.
pub(crate) fn read_text<R: BufRead>(
    mut reader: R,
    limit: Option<usize>,
) -> Result<Vocabulary, EmbeddingProviderError> {
    let header = read_header(&mut reader)?;
    let rows = rows_to_read(header, limit)?;
    let mut vocabulary = Vocabulary::with_capacity(rows, header.dimension)?;
    let mut line = String::new();
    for row in 0..rows {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(EmbeddingProviderError::TruncatedRecord { row });
        }
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else {
            return Err(EmbeddingProviderError::TruncatedRecord { row });
        };
        let vector = tokens
            .enumerate()
            .map(|(index, raw)| parse_component(row, index, raw))
            .collect::<Result<Vec<f32>, _>>()?;
        if vector.len() != header.dimension {
            return Err(EmbeddingProviderError::InvalidRowLength {
                row,
                expected: header.dimension,
                actual: vector.len(),
            });
        }
        vocabulary.push(row, word.to_owned(), vector)?;
    }
    Ok(vocabulary)
}

/// Reads the binary format: a text header, then `<word><space>` followed by
/// `dimension` little-endian `f32` values per row.
pub(crate) fn read_binary<R: BufRead>(
    mut reader: R,
    limit: Option<usize>,
) -> Result<Vocabulary, EmbeddingProviderError> {
    let header = read_header(&mut reader)?;
    let rows = rows_to_read(header, limit)?;
    let mut vocabulary = Vocabulary::with_capacity(rows, header.dimension)?;
    let record_len = header
        .dimension
        .checked_mul(size_of::<f32>())
        .ok_or(EmbeddingProviderError::CapacityOverflow {
            rows,
            dimension: header.dimension,
        })?;
    let mut word = Vec::new();
    let mut record = vec![0_u8; record_len];
    for row in 0..rows {
        word.clear();
        reader.read_until(b' ', &mut word)?;
        if word.pop() != Some(b' ') {
            return Err(EmbeddingProviderError::TruncatedRecord { row });
        }
        // Records written with a trailing newline leave it in front of the
        // next word.
        let start = word.iter().take_while(|&&b| b == b'\n').count();
        let text = std::str::from_utf8(&word[start..])
            .map_err(|_| EmbeddingProviderError::InvalidWord { row })?
            .to_owned();
        reader.read_exact(&mut record).map_err(|error| {
            if error.kind() == ErrorKind::UnexpectedEof {
                EmbeddingProviderError::TruncatedRecord { row }
            } else {
                EmbeddingProviderError::Io(error)
            }
        })?;
        let vector = decode_le_f32(&record);
        if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingProviderError::InvalidComponent {
                row,
                index,
                raw: vector[index].to_string(),
            });
        }
        vocabulary.push(row, text, vector)?;
    }
    Ok(vocabulary)
}

fn decode_le_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(size_of::<f32>())
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
