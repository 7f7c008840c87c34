use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::validate_id;
use crate::error::{validate_request, ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::privilege::{self, Privilege};
use crate::models::user::User;
use crate::security::{access, password};
use crate::AppState;

const USER_NOT_FOUND: &str = "Пользователь не найден";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile/base-info", get(base_info))
        .route("/profile/change-name", put(change_name))
        .route("/profile/change-password", put(change_password))
        .route("/profile/change-email", put(change_email))
        .route(
            "/profile/event-privileges/{eventId}",
            get(event_privileges),
        )
}

/* ---------- ПРОФИЛЬ ---------- */

// GET /api/profile/base-info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseInfoResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role_name: String,
}

async fn base_info(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<BaseInfoResponse>> {
    let profile = User::find_with_role_by_id(user.id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;
    Ok(Json(BaseInfoResponse {
        id: profile.id,
        name: profile.name,
        surname: profile.surname,
        email: profile.email,
        role_name: profile.role_name,
    }))
}

// PUT /api/profile/change-name
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeNameRequest {
    #[validate(length(min = 1, message = "Поле name не может быть пустым!"))]
    pub name: String,
    #[validate(length(min = 1, message = "Поле surname не может быть пустым!"))]
    pub surname: String,
}

async fn change_name(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ChangeNameRequest>,
) -> ApiResult<StatusCode> {
    validate_request(&req)?;
    let updated = User::update_name(user.id, &req.name, &req.surname, &state.db).await?;
    if !updated {
        return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
    }
    Ok(StatusCode::OK)
}

// PUT /api/profile/change-password
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Поле oldPassword не может быть пустым!"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Пароль должен содержать не менее 8 символов!"))]
    pub new_password: String,
    pub confirm_new_password: String,
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    validate_request(&req)?;
    if req.new_password != req.confirm_new_password {
        return Err(ApiError::BadRequest("Пароли не совпадают".to_string()));
    }

    let account = User::find_by_id(user.id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;
    let old_valid =
        password::verify_password(&req.old_password, &account.password_hash).unwrap_or(false);
    if !old_valid {
        return Err(ApiError::BadRequest("Неверный старый пароль".to_string()));
    }

    let new_hash = password::hash_password(&req.new_password)
        .map_err(|e| ApiError::Internal(format!("не удалось захэшировать пароль: {e}")))?;
    User::update_password(user.id, &new_hash, &state.db).await?;
    Ok(StatusCode::OK)
}

// PUT /api/profile/change-email
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeEmailRequest {
    #[validate(
        length(min = 1, message = "Поле email не может быть пустым!"),
        email(message = "Некорректный email!")
    )]
    pub email: String,
}

async fn change_email(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<ChangeEmailRequest>,
) -> ApiResult<StatusCode> {
    validate_request(&req)?;
    if User::email_taken(&req.email, &state.db).await? {
        return Err(ApiError::Conflict(
            "Пользователь с таким email уже существует".to_string(),
        ));
    }
    let updated = User::update_email(user.id, &req.email, &state.db).await?;
    if !updated {
        return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
    }
    Ok(StatusCode::OK)
}

/* ---------- ПРИВИЛЕГИИ ---------- */

// GET /api/profile/event-privileges/{eventId}
// Список привилегий роли пользователя в мероприятии, 404 если роли нет
async fn event_privileges(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<i32>,
) -> ApiResult<Json<Vec<Privilege>>> {
    validate_id(event_id)?;
    let role_name = access::effective_role_name(user.id, event_id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Роль в мероприятии не найдена".to_string()))?;
    let privileges = privilege::for_role(&role_name).unwrap_or_default();
    Ok(Json(privileges.to_vec()))
}
