//! Bank catalog endpoints

use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, BankResponse, CreateBankApiRequest, ImportBankResponse, Json,
};
use crate::domain::bank::CourseBank;
use crate::infrastructure::bank::FlatFileBankStore;

/// GET /banks
pub async fn list_banks(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let keys = state.exam_service.list_banks().await?;

    Ok(Json(keys.into_iter().map(String::from).collect()))
}

/// POST /banks
pub async fn create_bank(
    State(state): State<AppState>,
    Json(request): Json<CreateBankApiRequest>,
) -> Result<(StatusCode, Json<BankResponse>), ApiError> {
    debug!(bank_key = %request.bank_key, "Creating bank");

    let record = state.bank_service.create_bank(request.into()).await?;

    Ok((StatusCode::CREATED, Json(BankResponse::from(&record))))
}

/// GET /banks/{bank_key}
pub async fn get_bank(
    State(state): State<AppState>,
    Path(bank_key): Path<String>,
) -> Result<Json<BankResponse>, ApiError> {
    let record = state.bank_service.get_bank(&bank_key).await?;

    Ok(Json(BankResponse::from(&record)))
}

/// POST /banks/import
///
/// Multipart form with a `file` part holding the bank JSON and an optional
/// `bank_key` text part. Without `bank_key` the file name stem is used.
pub async fn import_bank(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportBankResponse>), ApiError> {
    let mut bank_key: Option<String> = None;
    let mut upload: Option<(Option<String>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        let content = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read field '{}': {}", name, e)))?;

        match name.as_str() {
            "bank_key" if !content.trim().is_empty() => bank_key = Some(content.trim().to_string()),
            "file" => upload = Some((file_name, content)),
            _ => {}
        }
    }

    let (file_name, content) = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    let bank_key = bank_key
        .or_else(|| file_name.as_deref().and_then(file_stem))
        .ok_or_else(|| ApiError::bad_request("bank_key is required when the file has no name"))?;

    debug!(bank_key = %bank_key, bytes = content.len(), "Importing bank upload");

    let file = FlatFileBankStore::parse(&content)?;
    let key = state.bank_service.import_bank(file, &bank_key).await?;

    Ok((
        StatusCode::CREATED,
        Json(ImportBankResponse {
            bank_key: key.to_string(),
        }),
    ))
}

/// GET /banks/{bank_key}/topics
pub async fn list_topics(
    State(state): State<AppState>,
    Path(bank_key): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.exam_service.list_topics(&bank_key).await?))
}

/// GET /courses
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.bank_service.list_courses().await?))
}

/// GET /courses/{course}/banks
pub async fn list_course_banks(
    State(state): State<AppState>,
    Path(course): Path<String>,
) -> Result<Json<Vec<CourseBank>>, ApiError> {
    Ok(Json(state.bank_service.list_course_banks(&course).await?))
}

fn file_stem(file_name: &str) -> Option<String> {
    FsPath::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
