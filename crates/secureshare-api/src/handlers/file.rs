//! File upload, download token, listing and delete handlers.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::debug;
use validator::Validate;

use secureshare_core::error::AppError;
use secureshare_core::types::FileId;
use secureshare_entity::FileRecord;
use secureshare_service::ListedFile;

use crate::dto::request::{DeleteRequest, DownloadQuery, PresignRequest, validation_error};
use crate::dto::response::{
    ApiResponse, BatchDeleteResponse, BatchError, BatchPresignResponse, DeleteOutcome,
    DownloadResponse, MessageResponse, PresignedUrlResponse, UploadResponse,
};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /file/upload (multipart, blob in field `file`)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponse>>), AppError> {
    let mut upload: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid_input(format!("Read error: {e}")))?;
        upload = Some((filename, content_type, data));
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| AppError::invalid_input("No file uploaded"))?;

    let file = state
        .coordinator
        .upload(&auth.user_id, data, &filename, content_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file,
        })),
    ))
}

/// POST /file/presigned/{id} with an optional JSON body
pub async fn presign_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<PresignedUrlResponse>>, AppError> {
    let req = parse_presign_body(&body)?;
    let file_id = FileId::parse(&id)?;
    issue_single(&state, &auth, file_id, &req).await
}

/// POST /file/presigned with `file_id` or `file_ids`
pub async fn presign_files(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let req = parse_presign_body(&body)?;

    if !req.file_ids.is_empty() {
        let token_type = req.token_type()?;
        let batch = state
            .access
            .issue_tokens(req.file_ids.clone(), &auth.user_id, token_type, req.duration())
            .await;
        let response = BatchPresignResponse {
            presigned_urls: batch.urls,
            errors: batch
                .errors
                .into_iter()
                .map(|(file_id, err)| BatchError::new(file_id, &err))
                .collect(),
        };
        return Ok(Json(serde_json::to_value(ApiResponse::ok(response))?));
    }

    let raw = req
        .file_id
        .as_deref()
        .ok_or_else(|| AppError::invalid_input("file_id or file_ids is required"))?;
    let file_id = FileId::parse(raw)?;
    let Json(single) = issue_single(&state, &auth, file_id, &req).await?;
    Ok(Json(serde_json::to_value(single)?))
}

/// GET /file/download/{id}?token=
///
/// Unauthenticated: the download token is the credential.
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Json<ApiResponse<DownloadResponse>>, AppError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::invalid_input("token query parameter is required"))?;
    let file_id = FileId::parse(&id)?;

    let download_url = state.access.validate_and_consume(file_id, &token).await?;

    Ok(Json(ApiResponse::ok(DownloadResponse {
        download_url,
        expires_in_minutes: state.config.transfer.download_url_minutes,
    })))
}

/// GET /file/list
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ListedFile>>>, AppError> {
    let files = state.listing.list_files(&auth.user_id).await?;
    debug!(owner = %auth.user_id, count = files.len(), "Listed files");
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /file/metadata/{id}
pub async fn get_metadata(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileRecord>>, AppError> {
    let file_id = FileId::parse(&id)?;
    let file = state.coordinator.get_file(file_id, &auth.user_id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /file/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let file_id = FileId::parse(&id)?;
    state.coordinator.delete(file_id, &auth.user_id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "File deleted successfully".to_string(),
    })))
}

/// POST /file/delete with `file_id` or `file_ids`
pub async fn delete_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    req.validate().map_err(validation_error)?;

    if !req.file_ids.is_empty() {
        let results = state
            .coordinator
            .delete_batch(req.file_ids, &auth.user_id)
            .await
            .iter()
            .map(|(id, result)| (id.clone(), DeleteOutcome::from(result)))
            .collect();
        let response = BatchDeleteResponse { results };
        return Ok(Json(serde_json::to_value(ApiResponse::ok(response))?));
    }

    let raw = req
        .file_id
        .as_deref()
        .ok_or_else(|| AppError::invalid_input("file_id or file_ids is required"))?;
    let file_id = FileId::parse(raw)?;
    state.coordinator.delete(file_id, &auth.user_id).await?;

    let response = ApiResponse::ok(MessageResponse {
        message: "File deleted successfully".to_string(),
    });
    Ok(Json(serde_json::to_value(response)?))
}

/// An empty body selects every default.
fn parse_presign_body(body: &[u8]) -> Result<PresignRequest, AppError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        PresignRequest::default()
    } else {
        serde_json::from_slice::<PresignRequest>(body)
            .map_err(|e| AppError::invalid_input(format!("Invalid request body: {e}")))?
    };
    req.validate().map_err(validation_error)?;
    Ok(req)
}

async fn issue_single(
    state: &AppState,
    auth: &AuthUser,
    file_id: FileId,
    req: &PresignRequest,
) -> Result<Json<ApiResponse<PresignedUrlResponse>>, AppError> {
    let token_type = req.token_type()?;
    let presigned_url = state
        .access
        .issue_token(file_id, &auth.user_id, token_type, req.duration())
        .await?;

    Ok(Json(ApiResponse::ok(PresignedUrlResponse {
        presigned_url,
        token_type: token_type.to_string(),
    })))
}
