//! Question CRUD endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateQuestionApiRequest, DeletedResponse, Json, QuestionResponse,
};
use crate::domain::QuestionPatch;

/// GET /banks/{bank_key}/questions
pub async fn list_questions(
    State(state): State<AppState>,
    Path(bank_key): Path<String>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let questions = state.bank_service.list_questions(&bank_key).await?;

    Ok(Json(questions.iter().map(QuestionResponse::from).collect()))
}

/// POST /banks/{bank_key}/questions
pub async fn create_question(
    State(state): State<AppState>,
    Path(bank_key): Path<String>,
    Json(request): Json<CreateQuestionApiRequest>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    debug!(bank_key = %bank_key, external_id = %request.external_id, "Creating question");

    let question = state
        .bank_service
        .create_question(&bank_key, request.into())
        .await?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(&question))))
}

/// PUT /banks/{bank_key}/questions/{external_id}
pub async fn update_question(
    State(state): State<AppState>,
    Path((bank_key, external_id)): Path<(String, String)>,
    Json(patch): Json<QuestionPatch>,
) -> Result<Json<QuestionResponse>, ApiError> {
    debug!(bank_key = %bank_key, external_id = %external_id, "Updating question");

    let question = state
        .bank_service
        .update_question(&bank_key, &external_id, patch)
        .await?;

    Ok(Json(QuestionResponse::from(&question)))
}

/// DELETE /banks/{bank_key}/questions/{external_id}
pub async fn delete_question(
    State(state): State<AppState>,
    Path((bank_key, external_id)): Path<(String, String)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    debug!(bank_key = %bank_key, external_id = %external_id, "Deleting question");

    state
        .bank_service
        .delete_question(&bank_key, &external_id)
        .await?;

    Ok(Json(DeletedResponse { deleted: true }))
}
