//! HTTP handlers for the word-embedding API.

pub mod admin;
pub mod query;

use crate::service::SimilarityService;
use axum::routing::{get, put};
use axum::Router;
use std::sync::Arc;

/// Build the `/wordembedding` router around a shared service.
pub fn router(service: Arc<SimilarityService>) -> Router {
    Router::new()
        .route("/wordembedding/query", get(query::find_similar))
        .route("/wordembedding/similarity", get(query::measure_similarity))
        .route("/wordembedding/admin/models", get(admin::available_models))
        .route(
            "/wordembedding/admin/models/:filename",
            put(admin::activate_model),
        )
        .with_state(service)
}
