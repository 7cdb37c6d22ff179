use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use clubhouse_types::api::EventPayload;
use clubhouse_types::models::{Event, EventFields, EventType};
use clubhouse_types::validation::{self, WriteMode};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, blocking};

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(blocking(&state, |db| db.list_events()).await?))
}

async fn list_of_type(state: AppState, event_type: EventType) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(blocking(&state, move |db| db.list_events_by_type(event_type)).await?))
}

/// GET /events/club/
pub async fn list_club_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    list_of_type(state, EventType::Club).await
}

/// GET /events/featured/
pub async fn list_featured_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    list_of_type(state, EventType::Featured).await
}

/// GET /events/recruiting/
pub async fn list_recruiting_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    list_of_type(state, EventType::Recruiting).await
}

pub async fn create_event(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<EventPayload>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let fields = validation::event(payload, EventFields::default(), WriteMode::Full)?;
    let event = blocking(&state, move |db| db.create_event(&fields)).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<Json<Event>, ApiError> {
    blocking(&state, move |db| db.get_event(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn replace_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<EventPayload>,
) -> Result<Json<Event>, ApiError> {
    update(&state, id, payload, WriteMode::Full).await.map(Json)
}

pub async fn patch_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<EventPayload>,
) -> Result<Json<Event>, ApiError> {
    update(&state, id, payload, WriteMode::Partial).await.map(Json)
}

async fn update(state: &AppState, id: i64, payload: EventPayload, mode: WriteMode) -> Result<Event, ApiError> {
    let existing = blocking(state, move |db| db.get_event(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    let fields = validation::event(payload, existing.fields(), mode)?;
    blocking(state, move |db| db.update_event(id, &fields))
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn delete_event(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> Result<StatusCode, ApiError> {
    if blocking(&state, move |db| db.delete_event(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
