use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::{page_params, validate_id, PaginatedResponse};
use crate::error::{validate_request, ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::event::{Event, EventFilter, EventFormat, EventStatus, NewEvent};
use crate::models::privilege::Privilege;
use crate::security::access;
use crate::services;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", post(add_event).get(get_events))
        .route("/events/activity", post(add_activity))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{id}/organizers", get(get_event_organizers))
        .route("/events/{id}/copy", post(copy_event))
}

/* ---------- СОЗДАНИЕ ---------- */

// POST /api/events
// Минимальное создание: назначенный пользователь сразу становится организатором
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(range(min = 1, message = "Поле userId не может быть меньше 1!"))]
    pub user_id: i32,
    #[validate(length(min = 1, message = "Поле title не может быть пустой!"))]
    pub title: String,
}

async fn add_event(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_request(&req)?;
    let id = services::events::create_by_organizer(req.user_id, &req.title, &state.db).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

// POST /api/events/activity
// Полная форма, используется и для активностей, и для редактирования через PUT
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[validate(length(min = 1, message = "Поле title не может быть пустой!"))]
    pub title: String,
    #[validate(range(min = 1, message = "Поле placeId не может быть меньше 1!"))]
    pub place_id: i32,
    #[serde(default)]
    pub start: Option<NaiveDateTime>,
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub full_description: Option<String>,
    #[serde(default)]
    pub format: Option<EventFormat>,
    pub status: EventStatus,
    #[serde(default)]
    pub registration_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub registration_end: Option<NaiveDateTime>,
    #[serde(default)]
    pub parent: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Поле participantLimit не может быть отрицательным!"))]
    pub participant_limit: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Поле participantAgeLowest не может быть отрицательным!"))]
    pub participant_age_lowest: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Поле participantAgeHighest не может быть отрицательным!"))]
    pub participant_age_highest: i32,
    #[serde(default)]
    pub preparing_start: Option<NaiveDateTime>,
    #[serde(default)]
    pub preparing_end: Option<NaiveDateTime>,
}

impl EventRequest {
    fn into_new_event(self) -> NewEvent {
        NewEvent {
            title: self.title,
            place_id: Some(self.place_id),
            start_date: self.start,
            end_date: self.end,
            short_description: self.short_description,
            full_description: self.full_description,
            format: self.format,
            status: self.status,
            registration_start: self.registration_start,
            registration_end: self.registration_end,
            parent_id: self.parent,
            participant_limit: Some(self.participant_limit),
            participant_age_lowest: Some(self.participant_age_lowest),
            participant_age_highest: Some(self.participant_age_highest),
            preparing_start: self.preparing_start,
            preparing_end: self.preparing_end,
        }
    }
}

async fn add_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<EventRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_request(&req)?;
    if let Some(parent_id) = req.parent {
        access::require_event_privilege(
            &user,
            parent_id,
            Privilege::CreateEventActivities,
            &state.db,
        )
        .await?;
    }
    let id = services::events::create_activity(&req.into_new_event(), &state.db).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

/* ---------- ЧТЕНИЕ ---------- */

// GET /api/events
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub parent_id: Option<i32>,
    pub title: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub status: Option<EventStatus>,
    pub format: Option<EventFormat>,
}

async fn get_events(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Query<EventsQuery>,
) -> ApiResult<Json<PaginatedResponse<Event>>> {
    let (page, size) = page_params(params.page, params.size)?;
    let filter = EventFilter {
        parent_id: params.parent_id,
        title: params.title,
        start_date: params.start_date,
        end_date: params.end_date,
        status: params.status,
        format: params.format,
    };
    let (total, items) = Event::page(&filter, page, size, &state.db).await?;
    Ok(Json(PaginatedResponse { total, items }))
}

// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Event>> {
    validate_id(id)?;
    let event = Event::find_by_id(id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Мероприятие не найдено".to_string()))?;
    Ok(Json(event))
}

// GET /api/events/{id}/organizers
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUserRoleResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub role_name: String,
}

async fn get_event_organizers(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<EventUserRoleResponse>>> {
    validate_id(id)?;
    access::require_event_privilege(&user, id, Privilege::ViewOrganizerUsers, &state.db).await?;
    let users = services::events::organizers(id, &state.db).await?;
    let response = users
        .into_iter()
        .map(|row| EventUserRoleResponse {
            id: row.user_id,
            name: row.name,
            surname: row.surname,
            role_name: row.role_name,
        })
        .collect();
    Ok(Json(response))
}

/* ---------- ИЗМЕНЕНИЕ ---------- */

// PUT /api/events/{id}
async fn update_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(req): Json<EventRequest>,
) -> ApiResult<Json<Event>> {
    validate_id(id)?;
    validate_request(&req)?;
    access::require_event_privilege(&user, id, Privilege::EditEventInfo, &state.db).await?;
    let event = services::events::update(id, &req.into_new_event(), &state.db).await?;
    Ok(Json(event))
}

// DELETE /api/events/{id}
async fn delete_event(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    validate_id(id)?;
    access::require_event_privilege(&user, id, Privilege::DeleteEventActivities, &state.db).await?;
    services::events::delete(id, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/events/{id}/copy?deep=true
#[derive(Debug, Deserialize)]
pub struct CopyQuery {
    pub deep: Option<bool>,
}

async fn copy_event(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Query(params): Query<CopyQuery>,
) -> ApiResult<impl IntoResponse> {
    validate_id(id)?;
    let new_id = services::events::copy(id, params.deep.unwrap_or(false), &state.db).await?;
    Ok((StatusCode::CREATED, Json(new_id)))
}
