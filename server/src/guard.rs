//! The single active-model slot.
//!
//! Activation replaces the `(model, descriptor)` pair as one value. The
//! replacement model is loaded on a blocking thread *before* the write lock is
//! taken, and queries hold the read lock only long enough to clone the model
//! handle; the query itself runs on a blocking thread against that snapshot.
//! Either side waits on the other only for a pointer copy. `tokio::sync::RwLock`
//! is fair, so a pending activation is never starved by a stream of readers.

use crate::catalog::ModelDescriptor;
use crate::error::{LingusError, LingusResult};
use lingus_embedding::{EmbeddingError, EmbeddingModel, ModelLoader};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinError;

struct ActiveModel {
    descriptor: ModelDescriptor,
    model: Arc<dyn EmbeddingModel>,
}

/// Holder of the currently active embedding model.
pub struct ActiveModelGuard {
    loader: Arc<dyn ModelLoader>,
    slot: RwLock<Option<ActiveModel>>,
}

impl ActiveModelGuard {
    /// Create an empty guard; nothing can be queried until the first activation.
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            slot: RwLock::new(None),
        }
    }

    /// Run `f` on a blocking thread against the model active at call time.
    ///
    /// An activation committed while `f` runs does not affect it; `f` finishes
    /// on the model it started with.
    ///
    /// # Errors
    /// Returns [`LingusError::NoModelLoaded`] if no model has been activated yet.
    pub async fn query<T, F>(&self, f: F) -> LingusResult<T>
    where
        F: FnOnce(&dyn EmbeddingModel) -> T + Send + 'static,
        T: Send + 'static,
    {
        let model = self.snapshot().await?;
        tokio::task::spawn_blocking(move || f(model.as_ref()))
            .await
            .map_err(|e| LingusError::Internal(format!("Model query task failed: {}", e)))
    }

    async fn snapshot(&self) -> LingusResult<Arc<dyn EmbeddingModel>> {
        self.slot
            .read()
            .await
            .as_ref()
            .map(|active| Arc::clone(&active.model))
            .ok_or(LingusError::NoModelLoaded)
    }

    /// Load the model behind `descriptor` and make it the active one.
    ///
    /// Returns the descriptor that was active before, if any. On failure the
    /// previously active model stays in place and keeps serving queries.
    pub async fn activate(
        &self,
        descriptor: ModelDescriptor,
    ) -> LingusResult<Option<ModelDescriptor>> {
        let location = descriptor.location.clone();
        tracing::info!(
            "Received a request to load the model from file '{}'.",
            location.display()
        );

        let loader = Arc::clone(&self.loader);
        let path = location.clone();
        let loaded = tokio::task::spawn_blocking(move || loader.load(&path))
            .await
            .unwrap_or_else(|e| Err(loader_failure(e)));

        let model = loaded.map_err(|source| {
            tracing::error!(
                "Unable to load model from file '{}': {}",
                location.display(),
                source
            );
            LingusError::UnableToActivateModel {
                location: location.clone(),
                source,
            }
        })?;

        let descriptor = ModelDescriptor {
            active: true,
            ..descriptor
        };
        let previous = self
            .slot
            .write()
            .await
            .replace(ActiveModel { descriptor, model });

        tracing::info!(
            "Successfully loaded Word2Vec model from file '{}'.",
            location.display()
        );
        Ok(previous.map(|p| p.descriptor))
    }

    /// Descriptor of the active model, if any.
    pub async fn current_descriptor(&self) -> Option<ModelDescriptor> {
        self.slot
            .read()
            .await
            .as_ref()
            .map(|active| active.descriptor.clone())
    }
}

fn loader_failure(error: JoinError) -> EmbeddingError {
    let message = match error.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string()),
        Err(error) => error.to_string(),
    };
    EmbeddingError::Panicked(message)
}
