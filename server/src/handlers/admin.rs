//! Model administration.

use crate::api::{ActivateModelResult, AvailableModelsResult};
use crate::error::LingusResult;
use crate::service::SimilarityService;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

/// `GET /wordembedding/admin/models`
pub async fn available_models(
    State(service): State<Arc<SimilarityService>>,
) -> Json<AvailableModelsResult> {
    Json(service.available_models())
}

/// `PUT /wordembedding/admin/models/{filename}`
pub async fn activate_model(
    State(service): State<Arc<SimilarityService>>,
    Path(filename): Path<String>,
) -> LingusResult<Json<ActivateModelResult>> {
    let result = service.activate_model(&filename).await?;
    tracing::info!(
        "Activated model '{}' (deactivated: {})",
        result.activated,
        result.deactivated.as_deref().unwrap_or("none")
    );
    Ok(Json(result))
}
