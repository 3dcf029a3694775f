//! Similarity queries.

use crate::api::{
    FindSimilarRequest, FindSimilarResult, MeasureSimilarityRequest, MeasureSimilarityResult,
};
use crate::error::{LingusError, LingusResult};
use crate::service::SimilarityService;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// `GET /wordembedding/query?term=<t>&term=<t>&maxSuggestions=<n>`
///
/// `term` may be repeated. A missing, non-numeric or out-of-range
/// `maxSuggestions` falls back to the default.
pub async fn find_similar(
    State(service): State<Arc<SimilarityService>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> LingusResult<Json<FindSimilarResult>> {
    let Query(params) = params.map_err(|e| LingusError::InvalidRequest(e.body_text()))?;

    let mut builder = FindSimilarRequest::builder();
    for (key, value) in params {
        match key.as_str() {
            "term" => builder = builder.for_term(value),
            "maxSuggestions" => {
                if let Ok(limit) = value.trim().parse::<usize>() {
                    builder = builder.limit(limit);
                }
            }
            _ => {}
        }
    }

    let result = service.find_similar(&builder.build()).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct SimilarityParams {
    term1: Option<String>,
    term2: Option<String>,
}

/// `GET /wordembedding/similarity?term1=<a>&term2=<b>`
pub async fn measure_similarity(
    State(service): State<Arc<SimilarityService>>,
    params: Result<Query<SimilarityParams>, QueryRejection>,
) -> LingusResult<Json<MeasureSimilarityResult>> {
    let Query(params) = params.map_err(|e| LingusError::InvalidRequest(e.body_text()))?;

    let (word1, word2) = match (params.term1, params.term2) {
        (Some(word1), Some(word2)) => (word1, word2),
        _ => {
            return Err(LingusError::InvalidRequest(
                "query parameters 'term1' and 'term2' are required".to_string(),
            ))
        }
    };

    let result = service
        .measure_similarity(&MeasureSimilarityRequest::new(word1, word2))
        .await?;
    Ok(Json(result))
}
