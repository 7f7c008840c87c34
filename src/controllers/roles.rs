use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::validate_id;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::role::{Role, RoleType};
use crate::security::access;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/roles", get(get_roles))
        .route("/roles/organizational", get(get_organizational_roles))
        .route("/roles/search", get(search_roles))
        .route("/roles/{id}", delete(delete_role))
}

/* ---------- DTO ---------- */

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub role_type: RoleType,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        RoleResponse {
            id: role.id,
            name: role.name,
            description: role.description,
            role_type: role.role_type,
        }
    }
}

fn to_responses(roles: Vec<Role>) -> Vec<RoleResponse> {
    roles.into_iter().map(RoleResponse::from).collect()
}

/* ---------- ЧТЕНИЕ ---------- */

// GET /api/roles
async fn get_roles(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    Ok(Json(to_responses(Role::all(&state.db).await?)))
}

// GET /api/roles/organizational - роли, назначаемые в мероприятиях
async fn get_organizational_roles(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = Role::all_by_type(RoleType::Event, &state.db).await?;
    Ok(Json(to_responses(roles)))
}

// GET /api/roles/search?name=
#[derive(Debug, Deserialize)]
pub struct RoleSearchQuery {
    pub name: String,
}

async fn search_roles(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Query<RoleSearchQuery>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = Role::search_by_name(&params.name, &state.db).await?;
    Ok(Json(to_responses(roles)))
}

/* ---------- УДАЛЕНИЕ ---------- */

// DELETE /api/roles/{id}
// Базовые роли защищены, назначенные в мероприятиях роли не удаляются
async fn delete_role(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    access::require_admin(&user)?;
    validate_id(id)?;

    let role = Role::find_by_id(id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Роль не найдена".to_string()))?;
    if role.is_base() {
        return Err(ApiError::BadRequest(
            "Нельзя удалить базовую роль".to_string(),
        ));
    }
    if Role::assignments_count(id, &state.db).await? > 0 {
        return Err(ApiError::Conflict(
            "Роль назначена пользователям в мероприятиях".to_string(),
        ));
    }

    Role::delete(id, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}
