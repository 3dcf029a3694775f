//! In-memory word2vec vector space
//!
//! Vectors are unit-normalised at load time, so cosine similarity is a dot product.

use super::format::{read_vectors, RawVectors, VectorFormat};
use crate::error::{EmbeddingError, Result};
use crate::model::EmbeddingModel;
use lru::LruCache;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;

/// Neighbour rankings kept per model unless configured otherwise
pub const DEFAULT_NEIGHBOUR_CACHE_CAPACITY: usize = 4096;

/// Loaded word2vec model
///
/// Immutable once built. Nearest-neighbour rankings are cached per `(term, k)`
/// in a bounded LRU cache, which lives and dies with the model.
pub struct Word2VecModel {
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<f32>,
    dimension: usize,
    neighbours: Mutex<LruCache<(String, usize), Vec<String>>>,
}

impl Word2VecModel {
    /// Load a model from a word2vec vector file
    ///
    /// Files with a `.bin` extension are read as binary, anything else as text.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EmbeddingError::NotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let raw = read_vectors(reader, VectorFormat::for_path(path))?;
        Ok(Self::from_raw(raw))
    }

    /// Build a model from in-memory vectors
    pub fn from_vectors<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut words = Vec::new();
        let mut vectors = Vec::new();
        let mut dimension = None;

        for (record, (word, vector)) in entries.into_iter().enumerate() {
            let word = word.into();
            match dimension {
                None if vector.is_empty() => {
                    return Err(EmbeddingError::format(record + 1, "empty vector"));
                }
                None => dimension = Some(vector.len()),
                Some(expected) if expected != vector.len() => {
                    return Err(EmbeddingError::format(
                        record + 1,
                        format!(
                            "expected {} components for '{}', found {}",
                            expected,
                            word,
                            vector.len()
                        ),
                    ));
                }
                Some(_) => {}
            }
            words.push(word);
            vectors.extend(vector);
        }

        let dimension = dimension.ok_or(EmbeddingError::Empty)?;
        Ok(Self::from_raw(RawVectors {
            words,
            vectors,
            dimension,
        }))
    }

    fn from_raw(raw: RawVectors) -> Self {
        let RawVectors {
            words,
            mut vectors,
            dimension,
        } = raw;

        for row in vectors.chunks_exact_mut(dimension) {
            normalize(row);
        }

        // First occurrence wins for duplicated words
        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            index.entry(word.clone()).or_insert(i);
        }

        Self {
            words,
            index,
            vectors,
            dimension,
            neighbours: Mutex::new(LruCache::new(cache_capacity(
                DEFAULT_NEIGHBOUR_CACHE_CAPACITY,
            ))),
        }
    }

    /// Bound the neighbour cache to `capacity` rankings (at least one).
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Self {
            neighbours: Mutex::new(LruCache::new(cache_capacity(capacity))),
            ..self
        }
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of distinct words
    pub fn vocabulary_size(&self) -> usize {
        self.index.len()
    }

    /// Number of cached neighbour rankings
    pub fn cache_size(&self) -> usize {
        self.neighbours.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    fn row(&self, i: usize) -> &[f32] {
        &self.vectors[i * self.dimension..(i + 1) * self.dimension]
    }

    fn rank(&self, target: usize, k: usize) -> Vec<String> {
        let query = self.row(target);
        let mut scored: Vec<(f32, usize)> = (0..self.words.len())
            .filter(|&i| i != target && self.index.get(&self.words[i]) == Some(&i))
            .map(|i| (dot(query, self.row(i)), i))
            .collect();

        // Most similar first, ties broken by vocabulary order
        let by_score = |a: &(f32, usize), b: &(f32, usize)| -> Ordering {
            b.0.total_cmp(&a.0).then(a.1.cmp(&b.1))
        };
        if k < scored.len() {
            scored.select_nth_unstable_by(k, by_score);
            scored.truncate(k);
        }
        scored.sort_unstable_by(by_score);

        scored
            .into_iter()
            .map(|(_, i)| self.words[i].clone())
            .collect()
    }
}

impl EmbeddingModel for Word2VecModel {
    fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    fn nearest(&self, term: &str, k: usize) -> Vec<String> {
        if k == 0 {
            return Vec::new();
        }
        let target = match self.index.get(term) {
            Some(&target) => target,
            None => return Vec::new(),
        };

        let key = (term.to_string(), k);
        if let Some(cached) = self
            .neighbours
            .lock()
            .ok()
            .and_then(|mut cache| cache.get(&key).cloned())
        {
            return cached;
        }

        let ranked = self.rank(target, k);
        if let Ok(mut cache) = self.neighbours.lock() {
            cache.put(key, ranked.clone());
        }
        ranked
    }

    /// Cosine similarity; `NaN` if either word is unknown.
    fn similarity(&self, a: &str, b: &str) -> f64 {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&i), Some(&j)) => f64::from(dot(self.row(i), self.row(j)).clamp(-1.0, 1.0)),
            _ => f64::NAN,
        }
    }
}

fn cache_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn normalize(row: &mut [f32]) {
    let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|x| *x /= norm);
    }
}
