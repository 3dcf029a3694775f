//! Lingus Server Library
//!
//! This crate serves word-similarity queries from a pre-trained word-embedding
//! model that can be discovered, activated and swapped at runtime without
//! restarting the process.

pub mod api;
pub mod catalog;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{ModelCatalog, ModelDescriptor};
pub use error::{map_error, LingusError, LingusResult};
pub use guard::ActiveModelGuard;
pub use handlers::router;
pub use service::SimilarityService;
