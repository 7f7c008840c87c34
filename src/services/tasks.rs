use chrono::{NaiveDateTime, Utc};
use tracing::info;

use crate::database::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::event::Event;
use crate::models::notification::Notification;
use crate::models::place::Place;
use crate::models::task::{NewTask, Task, TaskDetails, TaskStatus, TASK_DETAILS_SELECT};
use crate::models::user::User;

// Исполнитель снимается передачей этого значения вместо id пользователя
pub const CLEAR_ASSIGNEE_ID: i32 = -1;

#[derive(Debug, Clone)]
pub struct TaskInput {
    pub event_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<i32>,
    pub place_id: Option<i32>,
    pub deadline: NaiveDateTime,
    pub notification_deadline: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub assignee_id: Option<i32>,
    pub assigner_id: Option<i32>,
    pub status: Option<TaskStatus>,
    pub deadline_from: Option<NaiveDateTime>,
    pub deadline_to: Option<NaiveDateTime>,
}

async fn ensure_references_exist(input: &TaskInput, db: &Database) -> ApiResult<()> {
    if !Event::exists(input.event_id, db).await? {
        return Err(ApiError::NotFound("Мероприятие не найдено".to_string()));
    }
    if let Some(assignee_id) = input.assignee_id {
        if User::find_by_id(assignee_id, db).await?.is_none() {
            return Err(ApiError::NotFound("Пользователь не найден".to_string()));
        }
    }
    if let Some(place_id) = input.place_id {
        if !Place::exists(place_id, db).await? {
            return Err(ApiError::NotFound("Площадка не найдена".to_string()));
        }
    }
    Ok(())
}

async fn notify_assignee(assignee_id: i32, task_title: &str, db: &Database) -> ApiResult<()> {
    Notification::create(
        assignee_id,
        "Новая задача",
        &format!("Вам назначена задача \"{task_title}\""),
        db,
    )
    .await?;
    Ok(())
}

async fn details_or_not_found(id: i32, db: &Database) -> ApiResult<TaskDetails> {
    Task::details_by_id(id, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Задача не найдена".to_string()))
}

// Статус из запроса игнорируется: новая задача всегда NEW,
// а при прошедшем дедлайне сразу EXPIRED.
pub async fn save(assigner_id: i32, input: &TaskInput, db: &Database) -> ApiResult<TaskDetails> {
    ensure_references_exist(input, db).await?;

    let status = TaskStatus::from_deadline(input.deadline, Utc::now().naive_utc());
    let new_task = NewTask {
        event_id: input.event_id,
        title: input.title.clone(),
        description: input.description.clone(),
        assignee_id: input.assignee_id,
        assigner_id,
        place_id: input.place_id,
        deadline: input.deadline,
        notification_deadline: input.notification_deadline,
        status,
    };
    let id = Task::insert(&new_task, db).await?;

    if let Some(assignee_id) = input.assignee_id {
        notify_assignee(assignee_id, &input.title, db).await?;
    }
    info!("📝 Task {} created in event {}", id, input.event_id);
    details_or_not_found(id, db).await
}

pub async fn get(id: i32, db: &Database) -> ApiResult<TaskDetails> {
    details_or_not_found(id, db).await
}

// Полное обновление. Время создания и постановщик остаются прежними,
// статус берётся из запроса, но просроченный дедлайн побеждает.
pub async fn edit(id: i32, input: &TaskInput, db: &Database) -> ApiResult<TaskDetails> {
    let existing = Task::find_by_id(id, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Задача не найдена".to_string()))?;
    ensure_references_exist(input, db).await?;

    let now = Utc::now().naive_utc();
    let status = if now > input.deadline {
        TaskStatus::Expired
    } else {
        input.status.unwrap_or(existing.status)
    };
    let new_task = NewTask {
        event_id: input.event_id,
        title: input.title.clone(),
        description: input.description.clone(),
        assignee_id: input.assignee_id,
        assigner_id: existing.assigner_id,
        place_id: input.place_id,
        deadline: input.deadline,
        notification_deadline: input.notification_deadline,
        status,
    };
    Task::update_content(id, &new_task, db).await?;

    if let Some(assignee_id) = input.assignee_id {
        if existing.assignee_id != Some(assignee_id) {
            notify_assignee(assignee_id, &input.title, db).await?;
        }
    }
    details_or_not_found(id, db).await
}

// Удаление отсутствующей задачи не считается ошибкой
pub async fn delete(id: i32, db: &Database) -> ApiResult<()> {
    let deleted = Task::delete(id, db).await?;
    if deleted {
        info!("🗑️ Task {} deleted", id);
    }
    Ok(())
}

pub async fn set_assignee(id: i32, user_param: i32, db: &Database) -> ApiResult<TaskDetails> {
    let task = Task::find_by_id(id, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Задача не найдена".to_string()))?;

    let assignee_id = if user_param == CLEAR_ASSIGNEE_ID {
        None
    } else {
        if User::find_by_id(user_param, db).await?.is_none() {
            return Err(ApiError::NotFound("Пользователь не найден".to_string()));
        }
        Some(user_param)
    };
    Task::set_assignee(id, assignee_id, db).await?;

    if let Some(new_assignee) = assignee_id {
        if task.assignee_id != Some(new_assignee) {
            notify_assignee(new_assignee, &task.title, db).await?;
        }
    }
    details_or_not_found(id, db).await
}

// Пользователь берёт задачу на себя, уведомление ему не нужно
pub async fn take_on(id: i32, user_id: i32, db: &Database) -> ApiResult<TaskDetails> {
    if Task::find_by_id(id, db).await?.is_none() {
        return Err(ApiError::NotFound("Задача не найдена".to_string()));
    }
    Task::set_assignee(id, Some(user_id), db).await?;
    details_or_not_found(id, db).await
}

pub async fn clear_assignee(id: i32, db: &Database) -> ApiResult<TaskDetails> {
    if Task::find_by_id(id, db).await?.is_none() {
        return Err(ApiError::NotFound("Задача не найдена".to_string()));
    }
    Task::set_assignee(id, None, db).await?;
    details_or_not_found(id, db).await
}

pub async fn set_status(id: i32, status: TaskStatus, db: &Database) -> ApiResult<TaskDetails> {
    let updated = Task::set_status(id, status, db).await?;
    if !updated {
        return Err(ApiError::NotFound("Задача не найдена".to_string()));
    }
    details_or_not_found(id, db).await
}

// Перенос списка задач в другое мероприятие. Неизвестные id пропускаются.
pub async fn move_list(
    dst_event_id: i32,
    ids: &[i32],
    db: &Database,
) -> ApiResult<Vec<TaskDetails>> {
    if !Event::exists(dst_event_id, db).await? {
        return Err(ApiError::NotFound("Мероприятие не найдено".to_string()));
    }
    let moved = Task::move_to_event(ids, dst_event_id, db).await?;
    info!("Moved {} tasks to event {}", moved.len(), dst_event_id);
    Ok(Task::details_by_ids(&moved, db).await?)
}

// Копии появляются без исполнителя, со свежим временем создания
// и статусом, вычисленным заново по дедлайну.
pub async fn copy_list(
    dst_event_id: i32,
    ids: &[i32],
    db: &Database,
) -> ApiResult<Vec<TaskDetails>> {
    if !Event::exists(dst_event_id, db).await? {
        return Err(ApiError::NotFound("Мероприятие не найдено".to_string()));
    }

    let new_ids = sqlx::query_scalar::<_, i32>(
        "INSERT INTO tasks (event_id, title, description, assignee_id, assigner_id, place_id, \
             deadline, notification_deadline, reminder_sent, creation_time, status) \
         SELECT $1, title, description, NULL, assigner_id, place_id, \
             deadline, notification_deadline, FALSE, NOW(), \
             CASE WHEN deadline < NOW() THEN 'EXPIRED'::task_status ELSE 'NEW'::task_status END \
         FROM tasks WHERE id = ANY($2) \
         RETURNING id",
    )
    .bind(dst_event_id)
    .bind(ids)
    .fetch_all(&db.pool)
    .await?;

    let copies = Task::details_by_ids(&new_ids, db).await?;
    info!("Copied {} tasks to event {}", copies.len(), dst_event_id);
    Ok(copies)
}

// Фильтры добавляются к запросу в фиксированном порядке,
// нумерация параметров продолжается с first_param
fn filter_clauses(filter: &TaskFilter, first_param: usize) -> String {
    let mut sql = String::new();
    let mut param = first_param;
    if filter.assignee_id.is_some() {
        sql.push_str(&format!(" AND t.assignee_id = ${param}"));
        param += 1;
    }
    if filter.assigner_id.is_some() {
        sql.push_str(&format!(" AND t.assigner_id = ${param}"));
        param += 1;
    }
    if filter.status.is_some() {
        sql.push_str(&format!(" AND t.status = ${param}"));
        param += 1;
    }
    if filter.deadline_from.is_some() {
        sql.push_str(&format!(" AND t.deadline >= ${param}"));
        param += 1;
    }
    if filter.deadline_to.is_some() {
        sql.push_str(&format!(" AND t.deadline <= ${param}"));
    }
    sql
}

fn bind_filter<'q>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Postgres, TaskDetails, sqlx::postgres::PgArguments>,
    filter: &TaskFilter,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, TaskDetails, sqlx::postgres::PgArguments> {
    if let Some(assignee_id) = filter.assignee_id {
        query = query.bind(assignee_id);
    }
    if let Some(assigner_id) = filter.assigner_id {
        query = query.bind(assigner_id);
    }
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(deadline_from) = filter.deadline_from {
        query = query.bind(deadline_from);
    }
    if let Some(deadline_to) = filter.deadline_to {
        query = query.bind(deadline_to);
    }
    query
}

// Задачи мероприятия, при include_subevents вместе с задачами активностей
pub async fn event_tasks(
    event_id: i32,
    filter: &TaskFilter,
    include_subevents: bool,
    db: &Database,
) -> ApiResult<Vec<TaskDetails>> {
    if !Event::exists(event_id, db).await? {
        return Err(ApiError::NotFound("Мероприятие не найдено".to_string()));
    }

    let mut sql = String::from(TASK_DETAILS_SELECT);
    if include_subevents {
        sql.push_str(
            " WHERE (t.event_id = $1 \
              OR t.event_id IN (SELECT id FROM events WHERE parent_id = $1))",
        );
    } else {
        sql.push_str(" WHERE t.event_id = $1");
    }
    sql.push_str(&filter_clauses(filter, 2));
    sql.push_str(" ORDER BY t.deadline, t.id");

    let query = sqlx::query_as::<_, TaskDetails>(&sql).bind(event_id);
    Ok(bind_filter(query, filter).fetch_all(&db.pool).await?)
}

// Задачи, где пользователь исполнитель, с необязательной привязкой к мероприятию
pub async fn assignee_tasks(
    assignee_id: i32,
    event_id: Option<i32>,
    filter: &TaskFilter,
    db: &Database,
) -> ApiResult<Vec<TaskDetails>> {
    let mut sql = format!("{TASK_DETAILS_SELECT} WHERE t.assignee_id = $1");
    let mut first_param = 2;
    if event_id.is_some() {
        sql.push_str(" AND t.event_id = $2");
        first_param = 3;
    }
    sql.push_str(&filter_clauses(filter, first_param));
    sql.push_str(" ORDER BY t.deadline, t.id");

    let mut query = sqlx::query_as::<_, TaskDetails>(&sql).bind(assignee_id);
    if let Some(event_id) = event_id {
        query = query.bind(event_id);
    }
    Ok(bind_filter(query, filter).fetch_all(&db.pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_filter_adds_no_clauses() {
        assert_eq!(filter_clauses(&TaskFilter::default(), 2), "");
    }

    #[test]
    fn single_filter_uses_first_param() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            ..TaskFilter::default()
        };
        assert_eq!(filter_clauses(&filter, 2), " AND t.status = $2");
    }

    #[test]
    fn params_are_numbered_sequentially() {
        let filter = TaskFilter {
            assignee_id: Some(5),
            assigner_id: Some(9),
            status: Some(TaskStatus::New),
            deadline_from: Some(datetime(1, 10)),
            deadline_to: Some(datetime(30, 18)),
        };
        assert_eq!(
            filter_clauses(&filter, 2),
            " AND t.assignee_id = $2 AND t.assigner_id = $3 AND t.status = $4 \
             AND t.deadline >= $5 AND t.deadline <= $6"
        );
    }

    #[test]
    fn skipped_filters_do_not_leave_gaps_in_numbering() {
        let filter = TaskFilter {
            assigner_id: Some(9),
            deadline_to: Some(datetime(30, 18)),
            ..TaskFilter::default()
        };
        assert_eq!(
            filter_clauses(&filter, 3),
            " AND t.assigner_id = $3 AND t.deadline <= $4"
        );
    }
}
