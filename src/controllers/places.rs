use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::validate_id;
use crate::error::{validate_request, ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::place::Place;
use crate::security::access;
use crate::AppState;

const PLACE_NOT_FOUND: &str = "Площадка не найдена";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/places", get(get_places).post(add_place))
        .route(
            "/places/{id}",
            get(get_place).put(update_place).delete(delete_place),
        )
}

/* ---------- DTO ---------- */

#[derive(Debug, Deserialize, Validate)]
pub struct PlaceRequest {
    #[validate(length(min = 1, message = "Поле title не может быть пустой!"))]
    pub title: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/* ---------- ЧТЕНИЕ ---------- */

// GET /api/places
async fn get_places(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<Place>>> {
    Ok(Json(Place::all(&state.db).await?))
}

// GET /api/places/{id}
async fn get_place(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Place>> {
    validate_id(id)?;
    let place = Place::find_by_id(id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(PLACE_NOT_FOUND.to_string()))?;
    Ok(Json(place))
}

/* ---------- ИЗМЕНЕНИЕ ---------- */

// POST /api/places - отвечает id созданной площадки
async fn add_place(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<PlaceRequest>,
) -> ApiResult<impl IntoResponse> {
    access::require_admin(&user)?;
    validate_request(&req)?;
    let place = Place::create(
        &req.title,
        req.address.as_deref(),
        req.room.as_deref(),
        req.description.as_deref(),
        &state.db,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(place.id)))
}

// PUT /api/places/{id}
async fn update_place(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(req): Json<PlaceRequest>,
) -> ApiResult<Json<Place>> {
    access::require_admin(&user)?;
    validate_id(id)?;
    validate_request(&req)?;
    let place = Place::update(
        id,
        &req.title,
        req.address.as_deref(),
        req.room.as_deref(),
        req.description.as_deref(),
        &state.db,
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(PLACE_NOT_FOUND.to_string()))?;
    Ok(Json(place))
}

// DELETE /api/places/{id}
// Площадку, на которую ссылаются мероприятия или задачи, удалить нельзя
async fn delete_place(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    access::require_admin(&user)?;
    validate_id(id)?;
    if Place::find_by_id(id, &state.db).await?.is_none() {
        return Err(ApiError::NotFound(PLACE_NOT_FOUND.to_string()));
    }
    if Place::in_use(id, &state.db).await? {
        return Err(ApiError::Conflict(
            "Площадка используется в мероприятиях или задачах".to_string(),
        ));
    }
    Place::delete(id, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
