use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::{page_params, validate_id};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::notification::Notification;
use crate::AppState;

// Одно сообщение и для отсутствующего, и для чужого уведомления,
// чтобы по ответу нельзя было проверить существование id
const NOTIFICATION_NOT_FOUND: &str = "Уведомление не найдено";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/notifications",
            get(get_notifications).put(mark_all_seen),
        )
        .route("/notifications/{id}", put(mark_seen))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

// GET /api/notifications?page=0&size=15
// Непрочитанные и прочитанные вместе, свежие сверху
async fn get_notifications(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let (page, size) = page_params(params.page, params.size)?;
    let items = Notification::page_for_user(user.id, page, size, &state.db).await?;
    Ok(Json(items))
}

// PUT /api/notifications/{id} - отметить прочитанным
async fn mark_seen(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<Notification>> {
    validate_id(id)?;
    let notification = Notification::find_by_id(id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOTIFICATION_NOT_FOUND.to_string()))?;
    if notification.user_id != user.id {
        return Err(ApiError::Forbidden(NOTIFICATION_NOT_FOUND.to_string()));
    }
    let updated = Notification::mark_seen(id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOTIFICATION_NOT_FOUND.to_string()))?;
    Ok(Json(updated))
}

// PUT /api/notifications?page=0&size=15
// Отмечает все уведомления пользователя и отдаёт обновлённую страницу
async fn mark_all_seen(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let (page, size) = page_params(params.page, params.size)?;
    Notification::mark_all_seen(user.id, &state.db).await?;
    let items = Notification::page_for_user(user.id, page, size, &state.db).await?;
    Ok(Json(items))
}
