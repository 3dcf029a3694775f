//! Lingus Embedding Models
//!
//! Word-embedding capability consumed by the Lingus server: vocabulary
//! membership, nearest-neighbour lookup and pairwise similarity over a
//! pre-trained vector space.
//!
//! ## Features
//!
//! - **Model abstraction** - [`EmbeddingModel`] and [`ModelLoader`] traits so the
//!   serving layer never depends on a concrete vector format
//! - **word2vec vectors** - text (with or without header) and binary files as
//!   written by the usual word2vec tooling
//! - **Cached neighbours** - nearest-neighbour rankings are cached per loaded model
//!
//! ## Example
//!
//! ```ignore
//! use lingus_embedding::{EmbeddingModel, ModelLoader, Word2VecLoader};
//!
//! let model = Word2VecLoader.load(Path::new("/data/models/news.bin"))?;
//! if model.contains("cat") {
//!     for word in model.nearest("cat", 5) {
//!         println!("{} {:.3}", word, model.similarity("cat", &word));
//!     }
//! }
//! ```

pub mod error;
pub mod model;
pub mod word2vec;

// Re-exports for convenience
pub use error::EmbeddingError;
pub use model::{EmbeddingModel, ModelLoader};
pub use word2vec::{Word2VecLoader, Word2VecModel};
