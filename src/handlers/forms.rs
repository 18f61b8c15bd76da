use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    models::{
        form::{CreateFormRequest, UpdateFormRequest},
        question::{Question, QuestionEdit},
    },
    services::{form_service::FormService, AppState},
};

use super::map_service_error;

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFormRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Creating form titled \"{}\"", req.form_title);

    if let Err(e) = req.validate() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }

    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.create_form(&req).await {
        Ok(form) => Ok((StatusCode::CREATED, Json(form))),
        Err(e) => {
            tracing::error!("Failed to create form: {}", e);
            Err(map_service_error(e))
        }
    }
}

pub async fn list_forms(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.list_forms().await {
        Ok(forms) => Ok((StatusCode::OK, Json(forms))),
        Err(e) => {
            tracing::error!("Failed to list forms: {}", e);
            Err(map_service_error(e))
        }
    }
}

pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Getting form: {}", form_id);

    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.get_form(&form_id).await {
        Ok(form) => Ok((StatusCode::OK, Json(form))),
        Err(e) => Err(map_service_error(e)),
    }
}

pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(req): Json<UpdateFormRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!(
        "Saving form {} with {} questions",
        form_id,
        req.questions.len()
    );

    if let Err(e) = req.validate() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }

    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.update_form(&form_id, &req).await {
        Ok(form) => Ok((StatusCode::OK, Json(form))),
        Err(e) => {
            tracing::error!("Failed to save form {}: {}", form_id, e);
            Err(map_service_error(e))
        }
    }
}

pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Deleting form: {}", form_id);

    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.delete_form(&form_id).await {
        Ok(_) => Ok((StatusCode::NO_CONTENT, ())),
        Err(e) => {
            tracing::error!("Failed to delete form {}: {}", form_id, e);
            Err(map_service_error(e))
        }
    }
}

pub async fn save_question(
    State(state): State<Arc<AppState>>,
    Path((form_id, question_id)): Path<(String, String)>,
    Json(question): Json<Question>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Saving question {} in form {}", question_id, form_id);

    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.save_question(&form_id, &question_id, question).await {
        Ok(form) => Ok((StatusCode::OK, Json(form))),
        Err(e) => {
            tracing::error!("Failed to save question {}: {}", question_id, e);
            Err(map_service_error(e))
        }
    }
}

pub async fn edit_question(
    State(state): State<Arc<AppState>>,
    Path((form_id, question_id)): Path<(String, String)>,
    Json(edit): Json<QuestionEdit>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Applying edit to question {} in form {}", question_id, form_id);

    let service = FormService::new(state.mongo.clone(), state.redis.clone());

    match service.edit_question(&form_id, &question_id, edit).await {
        Ok(question) => Ok((StatusCode::OK, Json(question))),
        Err(e) => {
            tracing::error!("Failed to edit question {}: {}", question_id, e);
            Err(map_service_error(e))
        }
    }
}
