use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    models::answer::SubmitResponseRequest,
    services::{form_service::FormService, AppState},
};

use super::map_service_error;

pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(req): Json<SubmitResponseRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!(
        "Scoring response for form {} ({} answers)",
        form_id,
        req.answers.len()
    );

    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.submit_response(&form_id, &req).await {
        Ok(report) => Ok((StatusCode::OK, Json(report))),
        Err(e) => {
            tracing::error!("Failed to score response for form {}: {}", form_id, e);
            Err(map_service_error(e))
        }
    }
}
