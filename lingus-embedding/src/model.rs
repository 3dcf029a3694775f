//! Embedding model capability
//!
//! The serving layer only ever talks to these two traits.

use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// A loaded, immutable word-embedding model.
///
/// Implementations must be safe to query from many threads at once.
pub trait EmbeddingModel: Send + Sync {
    /// Whether `term` is part of the model's vocabulary (exact, case-sensitive).
    fn contains(&self, term: &str) -> bool;

    /// Up to `k` vocabulary words closest to `term`, most similar first.
    ///
    /// Returns an empty list for unknown terms. The result may contain `term`
    /// itself for some implementations; callers filter it.
    fn nearest(&self, term: &str, k: usize) -> Vec<String>;

    /// Similarity score between two terms, as defined by the model.
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Loads an [`EmbeddingModel`] from a file on disk.
pub trait ModelLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn EmbeddingModel>>;
}
