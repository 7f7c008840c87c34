use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::validate_id;
use crate::error::{validate_request, ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::registration_request::RegistrationRequest;
use crate::security::access;
use crate::services;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/listRegisterRequests", get(list_register_requests))
        .route("/approveRegister/{requestId}", post(approve_register))
        .route("/declineRegister/{requestId}", post(decline_register))
        .route("/recoveryPassword", post(recovery_password))
        .route("/validateRecoveryToken", post(validate_recovery_token))
        .route("/newPassword", post(new_password))
}

/* ---------- ВХОД ---------- */

// POST /login
// Поле login - это email пользователя
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        length(min = 1, message = "Поле login не может быть пустым!"),
        email(message = "Некорректный email!")
    )]
    pub login: String,
    #[validate(length(min = 1, message = "Поле password не может быть пустым!"))]
    pub password: String,
}

// Ответ - токен строкой, без обёртки
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<String> {
    validate_request(&req)?;
    services::auth::login(&req.login, &req.password, &state.config.jwt, &state.db).await
}

/* ---------- РЕГИСТРАЦИЯ ---------- */

// POST /register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Поле name не может быть пустым!"))]
    pub name: String,
    #[validate(length(min = 1, message = "Поле surname не может быть пустым!"))]
    pub surname: String,
    #[validate(
        length(min = 1, message = "Поле email не может быть пустым!"),
        email(message = "Некорректный email!")
    )]
    pub email: String,
    #[validate(length(min = 8, message = "Пароль должен содержать не менее 8 символов!"))]
    pub password: String,
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<StatusCode> {
    validate_request(&req)?;
    services::auth::register(&req.name, &req.surname, &req.email, &req.password, &state.db)
        .await?;
    Ok(StatusCode::CREATED)
}

// GET /listRegisterRequests
async fn list_register_requests(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<RegistrationRequest>>> {
    access::require_admin(&user)?;
    Ok(Json(RegistrationRequest::all_pending(&state.db).await?))
}

// POST /approveRegister/{requestId}
async fn approve_register(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<i32>,
) -> ApiResult<StatusCode> {
    validate_id(request_id)?;
    access::require_admin(&user)?;
    services::auth::approve_registration(request_id, &state.db).await?;
    Ok(StatusCode::OK)
}

// POST /declineRegister/{requestId}
async fn decline_register(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<i32>,
) -> ApiResult<StatusCode> {
    validate_id(request_id)?;
    access::require_admin(&user)?;
    services::auth::decline_registration(request_id, &state.db).await?;
    Ok(StatusCode::OK)
}

/* ---------- ВОССТАНОВЛЕНИЕ ПАРОЛЯ ---------- */

// POST /recoveryPassword
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPasswordRequest {
    #[validate(
        length(min = 1, message = "Поле email не может быть пустым!"),
        email(message = "Некорректный email!")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Поле returnUrl не может быть пустым!"))]
    pub return_url: String,
}

// Всегда 204: по ответу нельзя понять, есть ли такой пользователь
async fn recovery_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecoveryPasswordRequest>,
) -> ApiResult<StatusCode> {
    validate_request(&req)?;
    services::auth::recover_password(&req.email, &req.return_url, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /validateRecoveryToken?token=...
#[derive(Debug, Deserialize)]
pub struct RecoveryTokenQuery {
    pub token: Option<String>,
}

async fn validate_recovery_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecoveryTokenQuery>,
) -> ApiResult<StatusCode> {
    let token = query.token.unwrap_or_default();
    if token.trim().is_empty() {
        return Err(ApiError::BadRequest("Токен отсутствует".to_string()));
    }
    services::auth::validate_recovery_token(&token, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /newPassword
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    #[validate(length(min = 1, message = "Поле token не может быть пустым!"))]
    pub token: String,
    #[validate(length(min = 8, message = "Пароль должен содержать не менее 8 символов!"))]
    pub new_password: String,
    pub confirm_new_password: String,
}

async fn new_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewPasswordRequest>,
) -> ApiResult<StatusCode> {
    validate_request(&req)?;
    services::auth::set_new_password(
        &req.token,
        &req.new_password,
        &req.confirm_new_password,
        &state.db,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
