use crate::dtos::{SnippetListParams, SnippetResponse};
use crate::models::SnippetPayload;
use crate::startup::AppState;
use crate::utils::{JsonBody, QueryParams};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

const NOT_FOUND: &str = "Not found";
const SNIPPET_NOT_FOUND: &str = "Snippet not found";

pub async fn list_snippets(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SnippetListParams>,
) -> Result<Json<Vec<SnippetResponse>>, AppError> {
    let snippets = state
        .snippets
        .list_snippets(params.filter(), params.limit())
        .await
        .map_err(|e| e.into_app_error(NOT_FOUND, AppError::DatabaseError))?;

    Ok(Json(
        snippets.into_iter().map(SnippetResponse::from).collect(),
    ))
}

pub async fn create_snippet(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SnippetPayload>,
) -> Result<impl IntoResponse, AppError> {
    let snippet = state
        .snippets
        .create_snippet(payload)
        .await
        .map_err(|e| e.into_app_error(NOT_FOUND, AppError::BadRequest))?;

    Ok((StatusCode::CREATED, Json(SnippetResponse::from(snippet))))
}

pub async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SnippetResponse>, AppError> {
    let snippet = state
        .snippets
        .get_snippet_by_id(&id)
        .await
        .map_err(|e| e.into_app_error(NOT_FOUND, AppError::DatabaseError))?;

    Ok(Json(SnippetResponse::from(snippet)))
}

pub async fn update_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<SnippetPayload>,
) -> Result<Json<SnippetResponse>, AppError> {
    let snippet = state
        .snippets
        .update_snippet_by_id(&id, payload)
        .await
        .map_err(|e| e.into_app_error(SNIPPET_NOT_FOUND, AppError::BadRequest))?;

    Ok(Json(SnippetResponse::from(snippet)))
}

pub async fn delete_snippet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .snippets
        .delete_snippet_by_id(&id)
        .await
        .map_err(|e| e.into_app_error(SNIPPET_NOT_FOUND, AppError::DatabaseError))?;

    Ok(StatusCode::NO_CONTENT)
}
