use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use clubhouse_types::api::MemberPayload;
use clubhouse_types::models::{Member, MemberFields};
use clubhouse_types::validation::{self, WriteMode};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, blocking};

pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, ApiError> {
    Ok(Json(blocking(&state, |db| db.list_members()).await?))
}

/// GET /members/board/
pub async fn list_board_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, ApiError> {
    Ok(Json(blocking(&state, |db| db.list_members_by_board(true)).await?))
}

/// GET /members/non-board/
pub async fn list_non_board_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, ApiError> {
    Ok(Json(blocking(&state, |db| db.list_members_by_board(false)).await?))
}

pub async fn create_member(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<MemberPayload>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let fields = validation::member(payload, MemberFields::default(), WriteMode::Full)?;
    let member = blocking(&state, move |db| db.create_member(&fields))
        .await
        .map_err(|e| ApiError::unique_email(e, "member"))?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<Json<Member>, ApiError> {
    blocking(&state, move |db| db.get_member(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// PUT /members/{id}/
pub async fn replace_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<MemberPayload>,
) -> Result<Json<Member>, ApiError> {
    update(&state, id, payload, WriteMode::Full).await.map(Json)
}

/// PATCH /members/{id}/
pub async fn patch_member(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<MemberPayload>,
) -> Result<Json<Member>, ApiError> {
    update(&state, id, payload, WriteMode::Partial).await.map(Json)
}

async fn update(state: &AppState, id: i64, payload: MemberPayload, mode: WriteMode) -> Result<Member, ApiError> {
    let existing = blocking(state, move |db| db.get_member(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    let fields = validation::member(payload, existing.fields(), mode)?;
    blocking(state, move |db| db.update_member(id, &fields))
        .await
        .map_err(|e| ApiError::unique_email(e, "member"))?
        .ok_or(ApiError::NotFound)
}

pub async fn delete_member(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode, ApiError> {
    if blocking(&state, move |db| db.delete_member(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
