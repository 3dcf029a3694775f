//! word2vec vector file formats
//!
//! Supported layouts:
//! - text with a `<words> <dimension>` header line
//! - headerless text (GloVe style), dimension taken from the first row
//! - binary: text header line, then per word the word bytes, a single space
//!   and `dimension` little-endian `f32` values, optionally followed by `\n`

use crate::error::{EmbeddingError, Result};
use std::io::{BufRead, ErrorKind};
use std::path::Path;

/// On-disk layout of a vector file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFormat {
    Text,
    Binary,
}

impl VectorFormat {
    /// `.bin` files are binary, everything else is read as text.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Self::Binary,
            _ => Self::Text,
        }
    }
}

/// Vectors as read from disk, before normalisation
#[derive(Debug)]
pub(crate) struct RawVectors {
    pub words: Vec<String>,
    /// Row-major, `words.len() * dimension` components
    pub vectors: Vec<f32>,
    pub dimension: usize,
}

pub(crate) fn read_vectors<R: BufRead>(reader: R, format: VectorFormat) -> Result<RawVectors> {
    match format {
        VectorFormat::Text => read_text(reader),
        VectorFormat::Binary => read_binary(reader),
    }
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let words = parts.next()?.parse().ok()?;
    let dimension = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((words, dimension))
}

fn read_text<R: BufRead>(reader: R) -> Result<RawVectors> {
    let mut words = Vec::new();
    let mut vectors = Vec::new();
    let mut dimension = None;
    let mut declared = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let record = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if idx == 0 {
            if let Some((count, dim)) = parse_header(line) {
                if dim == 0 {
                    return Err(EmbeddingError::format(record, "dimension must be positive"));
                }
                declared = Some(count);
                dimension = Some(dim);
                continue;
            }
        }

        let mut parts = line.split_whitespace();
        let word = match parts.next() {
            Some(word) => word,
            None => continue,
        };

        let start = vectors.len();
        for part in parts {
            let value: f32 = part.parse().map_err(|_| {
                EmbeddingError::format(record, format!("invalid component '{}'", part))
            })?;
            vectors.push(value);
        }
        let found = vectors.len() - start;

        match dimension {
            Some(expected) if expected != found => {
                return Err(EmbeddingError::format(
                    record,
                    format!(
                        "expected {} components for '{}', found {}",
                        expected, word, found
                    ),
                ));
            }
            None if found == 0 => {
                return Err(EmbeddingError::format(
                    record,
                    format!("no components for '{}'", word),
                ));
            }
            None => dimension = Some(found),
            _ => {}
        }

        words.push(word.to_string());
    }

    finish(words, vectors, dimension, declared)
}

fn read_binary<R: BufRead>(mut reader: R) -> Result<RawVectors> {
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let (count, dimension) = parse_header(header.trim())
        .ok_or_else(|| EmbeddingError::format(1, "expected '<words> <dimension>' header"))?;
    if dimension == 0 {
        return Err(EmbeddingError::format(1, "dimension must be positive"));
    }

    // Sized by the data read, never by the header
    let mut words = Vec::new();
    let mut vectors = Vec::new();

    for record in 1..=count {
        let word = read_word(&mut reader, record)?;
        let mut component = [0u8; 4];
        for _ in 0..dimension {
            reader.read_exact(&mut component).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => {
                    EmbeddingError::format(record, format!("truncated vector for '{}'", word))
                }
                _ => e.into(),
            })?;
            vectors.push(f32::from_le_bytes(component));
        }
        words.push(word);
    }

    finish(words, vectors, Some(dimension), Some(count))
}

fn read_word<R: BufRead>(reader: &mut R, record: usize) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_until(b' ', &mut bytes)?;
    if bytes.pop() != Some(b' ') {
        return Err(EmbeddingError::format(record, "unexpected end of file"));
    }

    // The separator after the previous vector is optional
    let start = bytes
        .iter()
        .position(|b| *b != b'\n' && *b != b'\r')
        .unwrap_or(bytes.len());
    let word = String::from_utf8(bytes[start..].to_vec())
        .map_err(|_| EmbeddingError::format(record, "word is not valid UTF-8"))?;
    if word.is_empty() {
        return Err(EmbeddingError::format(record, "empty word"));
    }
    Ok(word)
}

fn finish(
    words: Vec<String>,
    vectors: Vec<f32>,
    dimension: Option<usize>,
    declared: Option<usize>,
) -> Result<RawVectors> {
    let dimension = match dimension {
        Some(dimension) if !words.is_empty() => dimension,
        _ => return Err(EmbeddingError::Empty),
    };
    if let Some(declared) = declared {
        if declared != words.len() {
            return Err(EmbeddingError::format(
                1,
                format!(
                    "header declares {} words, file contains {}",
                    declared,
                    words.len()
                ),
            ));
        }
    }
    Ok(RawVectors {
        words,
        vectors,
        dimension,
    })
}
