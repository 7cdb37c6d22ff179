//! Local administration of the allow-list table.
//!
//! The gateway endpoints never read these rows; they ask the hosted
//! backend instead.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use clubhouse_types::api::AllowedEmailPayload;
use clubhouse_types::models::{AllowedEmail, AllowedEmailFields};
use clubhouse_types::validation::{self, WriteMode};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, blocking};

const ENTITY: &str = "allowed email";

pub async fn list_allowed_emails(State(state): State<AppState>) -> Result<Json<Vec<AllowedEmail>>, ApiError> {
    Ok(Json(blocking(&state, |db| db.list_allowed_emails()).await?))
}

pub async fn create_allowed_email(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AllowedEmailPayload>,
) -> Result<(StatusCode, Json<AllowedEmail>), ApiError> {
    let fields = validation::allowed_email(payload, AllowedEmailFields::default(), WriteMode::Full)?;
    let entry = blocking(&state, move |db| db.create_allowed_email(&fields))
        .await
        .map_err(|e| ApiError::unique_email(e, ENTITY))?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_allowed_email(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<AllowedEmail>, ApiError> {
    blocking(&state, move |db| db.get_allowed_email(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn replace_allowed_email(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AllowedEmailPayload>,
) -> Result<Json<AllowedEmail>, ApiError> {
    update(&state, id, payload, WriteMode::Full).await.map(Json)
}

pub async fn patch_allowed_email(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<AllowedEmailPayload>,
) -> Result<Json<AllowedEmail>, ApiError> {
    update(&state, id, payload, WriteMode::Partial).await.map(Json)
}

async fn update(
    state: &AppState,
    id: i64,
    payload: AllowedEmailPayload,
    mode: WriteMode,
) -> Result<AllowedEmail, ApiError> {
    let existing = blocking(state, move |db| db.get_allowed_email(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    let fields = validation::allowed_email(payload, existing.fields(), mode)?;
    blocking(state, move |db| db.update_allowed_email(id, &fields))
        .await
        .map_err(|e| ApiError::unique_email(e, ENTITY))?
        .ok_or(ApiError::NotFound)
}

pub async fn delete_allowed_email(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    if blocking(&state, move |db| db.delete_allowed_email(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
