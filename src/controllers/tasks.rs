use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::validate_id;
use crate::error::{validate_request, ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::privilege::Privilege;
use crate::models::task::{TaskDetails, TaskStatus};
use crate::security::access;
use crate::services;
use crate::services::tasks::{TaskFilter, TaskInput, CLEAR_ASSIGNEE_ID};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", post(add_task))
        .route("/tasks/where-assignee", get(get_tasks_where_assignee))
        .route(
            "/tasks/event/{eventId}",
            get(get_event_tasks).put(move_tasks).post(copy_tasks),
        )
        .route(
            "/tasks/event/{eventId}/where-assignee",
            get(get_event_tasks_where_assignee),
        )
        .route(
            "/tasks/{id}",
            get(get_task).put(edit_task).delete(delete_task),
        )
        .route(
            "/tasks/{id}/assignee",
            put(take_on_task).delete(delete_task_assignee),
        )
        .route("/tasks/{id}/assignee/{userId}", put(set_task_assignee))
        .route("/tasks/{id}/status", put(set_task_status))
}

/* ---------- DTO ---------- */

// Исполнитель и площадка приходят вложенными объектами с одним полем id
#[derive(Debug, Deserialize)]
pub struct EntityRef {
    pub id: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[validate(range(min = 1, message = "Поле eventId не может быть меньше 1!"))]
    pub event_id: i32,
    #[validate(length(min = 1, message = "Поле title не может быть пустой!"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub task_status: Option<TaskStatus>,
    #[serde(default)]
    pub assignee: Option<EntityRef>,
    #[serde(default)]
    pub place: Option<EntityRef>,
    pub deadline: NaiveDateTime,
    #[serde(default)]
    pub notification_deadline: Option<NaiveDateTime>,
}

impl TaskRequest {
    fn into_input(self) -> TaskInput {
        TaskInput {
            event_id: self.event_id,
            title: self.title,
            description: self.description,
            status: self.task_status,
            assignee_id: self.assignee.map(|r| r.id),
            place_id: self.place.map(|r| r.id),
            deadline: self.deadline,
            notification_deadline: self.notification_deadline,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventShortResponse {
    pub id: i32,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserShortResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceShortResponse {
    pub id: i32,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i32,
    pub event: EventShortResponse,
    pub title: String,
    pub description: Option<String>,
    pub task_status: TaskStatus,
    pub assignee: Option<UserShortResponse>,
    pub place: Option<PlaceShortResponse>,
    pub creation_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub notification_deadline: Option<NaiveDateTime>,
}

impl From<TaskDetails> for TaskResponse {
    fn from(details: TaskDetails) -> Self {
        let assignee = match (details.assignee_id, details.assignee_name, details.assignee_surname)
        {
            (Some(id), Some(name), Some(surname)) => {
                Some(UserShortResponse { id, name, surname })
            }
            _ => None,
        };
        let place = match (details.place_id, details.place_title) {
            (Some(id), Some(title)) => Some(PlaceShortResponse { id, title }),
            _ => None,
        };
        TaskResponse {
            id: details.id,
            event: EventShortResponse {
                id: details.event_id,
                title: details.event_title,
            },
            title: details.title,
            description: details.description,
            task_status: details.status,
            assignee,
            place,
            creation_time: details.creation_time,
            deadline: details.deadline,
            notification_deadline: details.notification_deadline,
        }
    }
}

fn to_responses(tasks: Vec<TaskDetails>) -> Vec<TaskResponse> {
    tasks.into_iter().map(TaskResponse::from).collect()
}

// Общие параметры фильтрации списков задач
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilterQuery {
    pub assignee_id: Option<i32>,
    pub assigner_id: Option<i32>,
    pub task_status: Option<TaskStatus>,
    pub deadline_lower_limit: Option<NaiveDateTime>,
    pub deadline_upper_limit: Option<NaiveDateTime>,
    pub sub_event_tasks_get: Option<bool>,
    pub event_id: Option<i32>,
}

impl TaskFilterQuery {
    fn to_filter(&self) -> TaskFilter {
        TaskFilter {
            assignee_id: self.assignee_id,
            assigner_id: self.assigner_id,
            status: self.task_status,
            deadline_from: self.deadline_lower_limit,
            deadline_to: self.deadline_upper_limit,
        }
    }

    // Для where-assignee исполнитель задаётся текущим пользователем,
    // одноимённый параметр из запроса игнорируется
    fn to_filter_without_assignee(&self) -> TaskFilter {
        TaskFilter {
            assignee_id: None,
            ..self.to_filter()
        }
    }
}

/* ---------- CRUD ---------- */

// POST /api/tasks - отвечает id созданной задачи
async fn add_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<TaskRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_request(&req)?;
    access::require_event_privilege(&user, req.event_id, Privilege::CreateTask, &state.db).await?;
    let task = services::tasks::save(user.id, &req.into_input(), &state.db).await?;
    Ok((StatusCode::CREATED, Json(task.id)))
}

// GET /api/tasks/{id}
async fn get_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<TaskResponse>> {
    validate_id(id)?;
    let task = services::tasks::get(id, &state.db).await?;
    Ok(Json(TaskResponse::from(task)))
}

// PUT /api/tasks/{id}
async fn edit_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    validate_id(id)?;
    validate_request(&req)?;
    let task = services::tasks::edit(id, &req.into_input(), &state.db).await?;
    Ok(Json(TaskResponse::from(task)))
}

// DELETE /api/tasks/{id}
async fn delete_task(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    validate_id(id)?;
    services::tasks::delete(id, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ---------- ИСПОЛНИТЕЛЬ И СТАТУС ---------- */

// PUT /api/tasks/{id}/assignee/{userId}
// userId = -1 снимает исполнителя
async fn set_task_assignee(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path((id, user_id)): Path<(i32, i32)>,
) -> ApiResult<Json<TaskResponse>> {
    validate_id(id)?;
    if user_id != CLEAR_ASSIGNEE_ID {
        validate_id(user_id)?;
    }
    let task = services::tasks::set_assignee(id, user_id, &state.db).await?;
    Ok(Json(TaskResponse::from(task)))
}

// PUT /api/tasks/{id}/assignee
// Текущий пользователь берёт задачу на себя
async fn take_on_task(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<TaskResponse>> {
    validate_id(id)?;
    let task = services::tasks::take_on(id, user.id, &state.db).await?;
    Ok(Json(TaskResponse::from(task)))
}

// DELETE /api/tasks/{id}/assignee
async fn delete_task_assignee(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> ApiResult<Json<TaskResponse>> {
    validate_id(id)?;
    let task = services::tasks::clear_assignee(id, &state.db).await?;
    Ok(Json(TaskResponse::from(task)))
}

// PUT /api/tasks/{id}/status
// Тело запроса - строка статуса, например "IN_PROGRESS"
async fn set_task_status(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i32>,
    Json(status): Json<TaskStatus>,
) -> ApiResult<Json<TaskResponse>> {
    validate_id(id)?;
    let task = services::tasks::set_status(id, status, &state.db).await?;
    Ok(Json(TaskResponse::from(task)))
}

/* ---------- СПИСКИ ---------- */

fn ensure_ids_not_empty(ids: &[i32]) -> ApiResult<()> {
    if ids.is_empty() {
        return Err(ApiError::BadRequest(
            "Список task id не может быть пустым!".to_string(),
        ));
    }
    Ok(())
}

// PUT /api/tasks/event/{eventId} - перенос задач, тело - список id
async fn move_tasks(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(event_id): Path<i32>,
    Json(ids): Json<Vec<i32>>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    validate_id(event_id)?;
    ensure_ids_not_empty(&ids)?;
    let tasks = services::tasks::move_list(event_id, &ids, &state.db).await?;
    Ok(Json(to_responses(tasks)))
}

// POST /api/tasks/event/{eventId} - копирование задач, тело - список id
async fn copy_tasks(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(event_id): Path<i32>,
    Json(ids): Json<Vec<i32>>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    validate_id(event_id)?;
    ensure_ids_not_empty(&ids)?;
    let tasks = services::tasks::copy_list(event_id, &ids, &state.db).await?;
    Ok(Json(to_responses(tasks)))
}

// GET /api/tasks/event/{eventId}
// При subEventTasksGet=true включаются задачи активностей мероприятия
async fn get_event_tasks(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(event_id): Path<i32>,
    Query(params): Query<TaskFilterQuery>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    validate_id(event_id)?;
    let include_subevents = params.sub_event_tasks_get.unwrap_or(false);
    let tasks = services::tasks::event_tasks(
        event_id,
        &params.to_filter(),
        include_subevents,
        &state.db,
    )
    .await?;
    Ok(Json(to_responses(tasks)))
}

// GET /api/tasks/event/{eventId}/where-assignee
// Тот же список задач мероприятия, но исполнитель - текущий пользователь
async fn get_event_tasks_where_assignee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<i32>,
    Query(params): Query<TaskFilterQuery>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    validate_id(event_id)?;
    let filter = TaskFilter {
        assignee_id: Some(user.id),
        ..params.to_filter_without_assignee()
    };
    let include_subevents = params.sub_event_tasks_get.unwrap_or(false);
    let tasks =
        services::tasks::event_tasks(event_id, &filter, include_subevents, &state.db).await?;
    Ok(Json(to_responses(tasks)))
}

// GET /api/tasks/where-assignee - задачи текущего пользователя по всем мероприятиям
async fn get_tasks_where_assignee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<TaskFilterQuery>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    if let Some(event_id) = params.event_id {
        validate_id(event_id)?;
    }
    let tasks = services::tasks::assignee_tasks(
        user.id,
        params.event_id,
        &params.to_filter_without_assignee(),
        &state.db,
    )
    .await?;
    Ok(Json(to_responses(tasks)))
}
