//! Exam generation endpoints

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, BankFileQuery, ExamRequest, Json, PreviewResponse, Query};
use crate::domain::ExamSpec;

/// POST /generate-preview?bank_file=
pub async fn generate_preview(
    State(state): State<AppState>,
    Query(query): Query<BankFileQuery>,
    Json(request): Json<ExamRequest>,
) -> Result<Json<PreviewResponse>, ApiError> {
    debug!(bank_file = %query.bank_file, total = request.total_questions, "Generating preview");

    let spec = ExamSpec::from(request);
    let preview = state.exam_service.preview(&query.bank_file, &spec).await?;

    Ok(Json(PreviewResponse::from(preview)))
}

/// POST /generate-exam?bank_file=
///
/// Returns the rendered LaTeX document as `text/plain`.
pub async fn generate_exam(
    State(state): State<AppState>,
    Query(query): Query<BankFileQuery>,
    Json(request): Json<ExamRequest>,
) -> Result<String, ApiError> {
    debug!(bank_file = %query.bank_file, total = request.total_questions, "Generating exam");

    let spec = ExamSpec::from(request);

    Ok(state.exam_service.generate(&query.bank_file, &spec).await?)
}
