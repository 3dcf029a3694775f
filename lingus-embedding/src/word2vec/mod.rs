//! word2vec models
//!
//! Reads vector files produced by word2vec tooling into an in-memory space.

mod format;
mod space;

pub use format::VectorFormat;
pub use space::{Word2VecModel, DEFAULT_NEIGHBOUR_CACHE_CAPACITY};

use crate::error::Result;
use crate::model::{EmbeddingModel, ModelLoader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// [`ModelLoader`] for word2vec vector files
#[derive(Debug, Clone, Copy, Default)]
pub struct Word2VecLoader;

impl ModelLoader for Word2VecLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn EmbeddingModel>> {
        log::info!("Loading word2vec model from: {}", path.display());
        let started = Instant::now();

        let model = Word2VecModel::from_path(path)?;

        log::info!(
            "Loaded word2vec model ({} words, {}d) in {:.1?}",
            model.vocabulary_size(),
            model.dimension(),
            started.elapsed()
        );
        Ok(Arc::new(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use tempfile::TempDir;

    #[test]
    fn test_loader_reads_binary_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.bin");

        let mut bytes = b"2 2\n".to_vec();
        for (word, vector) in [("up", [0.0_f32, 1.0]), ("down", [0.0, -1.0])] {
            bytes.extend_from_slice(word.as_bytes());
            bytes.push(b' ');
            for value in vector {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            bytes.push(b'\n');
        }
        std::fs::write(&path, bytes).unwrap();

        let model = Word2VecLoader.load(&path).unwrap();
        assert!(model.contains("up"));
        assert!(model.contains("down"));
        assert!((model.similarity("up", "down") + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_loader_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.txt");
        std::fs::write(&path, "2 3\ncat 1 0 0\ndog not a vector\n").unwrap();

        let result = Word2VecLoader.load(&path);
        assert!(matches!(result, Err(EmbeddingError::Format { .. })));
    }
}
