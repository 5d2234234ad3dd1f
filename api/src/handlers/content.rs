//! Content handlers
//!
//! CRUD endpoints for content records under `/content`.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Content, ContentId};
use crate::error::AppError;
use crate::AppState;

/// Header carrying the total record count on list responses
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Request body for create and update
#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    /// Body text; missing or null is treated as blank
    #[serde(default)]
    pub content: Option<String>,
}

impl ContentRequest {
    fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Response body for a single record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Content> for ContentResponse {
    fn from(content: Content) -> Self {
        Self {
            id: content.id.0,
            content: content.text,
            created_at: content.created_at,
            updated_at: content.updated_at,
        }
    }
}

fn json_body(
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<ContentRequest, AppError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn content_id(path: Result<Path<i64>, PathRejection>) -> Result<ContentId, AppError> {
    path.map(|Path(id)| ContentId::from(id))
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// POST /content
pub async fn create_content(
    State(state): State<AppState>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ContentResponse>), AppError> {
    let request = json_body(payload)?;
    let content = state.content_service.create(request.text()).await?;

    Ok((StatusCode::CREATED, Json(content.into())))
}

/// GET /content
///
/// Newest first. The total count is returned in the `X-Total-Count` header.
pub async fn list_content(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let contents = state.content_service.find_all().await?;
    let total = state.content_service.count().await?;

    tracing::debug!(returned = contents.len(), total, "Listing content");

    let body: Vec<ContentResponse> = contents.into_iter().map(Into::into).collect();
    Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(body)))
}

/// GET /content/:id
pub async fn get_content(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ContentResponse>, AppError> {
    let id = content_id(path)?;

    let content = state
        .content_service
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content not found with ID: {}", id)))?;

    Ok(Json(content.into()))
}

/// HEAD /content/:id
///
/// 200 if the record exists, 404 otherwise. Invalid ids are reported as missing.
pub async fn content_exists(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = content_id(path)?;

    if state.content_service.exists_by_id(&id).await? {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// PUT /content/:id
pub async fn update_content(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<ContentResponse>, AppError> {
    let id = content_id(path)?;
    let request = json_body(payload)?;

    let content = state.content_service.update(&id, request.text()).await?;

    Ok(Json(content.into()))
}

/// DELETE /content/:id
pub async fn delete_content(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = content_id(path)?;

    state.content_service.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
