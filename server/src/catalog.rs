//! Inventory of the model files available on disk.
//!
//! The set of descriptors is fixed at startup; only the `active` flags change,
//! and only from the activation workflow.

use crate::error::{LingusError, LingusResult};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};

/// A model file found in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    /// File name, unique within the catalog
    pub filename: String,
    pub location: PathBuf,
    pub active: bool,
}

impl ModelDescriptor {
    pub fn new(filename: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            location: location.into(),
            active: false,
        }
    }
}

/// Model files discovered at startup.
#[derive(Debug)]
pub struct ModelCatalog {
    directory: PathBuf,
    models: RwLock<Vec<ModelDescriptor>>,
}

impl ModelCatalog {
    /// List every regular file in `directory`, all initially inactive.
    ///
    /// # Errors
    /// Returns [`LingusError::ModelDirectory`] if the directory does not exist
    /// or cannot be listed. The server cannot start without it.
    pub fn scan(directory: &Path) -> LingusResult<Self> {
        let unreadable = |source: std::io::Error| LingusError::ModelDirectory {
            path: directory.to_path_buf(),
            source,
        };

        let mut models = Vec::new();
        for entry in fs::read_dir(directory).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            tracing::info!("Found model at '{}'.", path.display());
            models.push(ModelDescriptor::new(filename, path));
        }
        models.sort_by(|a, b| a.filename.cmp(&b.filename));

        if models.is_empty() {
            tracing::warn!("No model files found in '{}'.", directory.display());
        }

        Ok(Self {
            directory: directory.to_path_buf(),
            models: RwLock::new(models),
        })
    }

    /// Directory the catalog was scanned from
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Look up a descriptor by exact, case-sensitive file name.
    pub fn find(&self, filename: &str) -> Option<ModelDescriptor> {
        self.models
            .read()
            .iter()
            .find(|m| m.filename == filename)
            .cloned()
    }

    /// Snapshot of all descriptors, ordered by file name.
    pub fn descriptors(&self) -> Vec<ModelDescriptor> {
        self.models.read().clone()
    }

    /// The descriptor currently flagged active, if any.
    pub fn active(&self) -> Option<ModelDescriptor> {
        self.models.read().iter().find(|m| m.active).cloned()
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    /// Flag `filename` active. Callers must have cleared the previous one first.
    pub(crate) fn mark_active(&self, filename: &str) -> bool {
        let mut models = self.models.write();
        debug_assert!(
            models.iter().all(|m| !m.active || m.filename == filename),
            "another model is still flagged active"
        );
        Self::set_flag(&mut models, filename, true)
    }

    pub(crate) fn mark_inactive(&self, filename: &str) -> bool {
        Self::set_flag(&mut self.models.write(), filename, false)
    }

    fn set_flag(models: &mut [ModelDescriptor], filename: &str, active: bool) -> bool {
        match models.iter_mut().find(|m| m.filename == filename) {
            Some(model) => {
                model.active = active;
                true
            }
            None => false,
        }
    }
}
