use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    New,
    InProgress,
    Done,
    Expired,
}

impl TaskStatus {
    // Статус новой задачи определяется дедлайном, а не запросом
    pub fn from_deadline(deadline: NaiveDateTime, now: NaiveDateTime) -> TaskStatus {
        if now > deadline {
            TaskStatus::Expired
        } else {
            TaskStatus::New
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: i32,
    pub event_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i32>,
    pub assigner_id: i32,
    pub place_id: Option<i32>,
    pub deadline: NaiveDateTime,
    pub notification_deadline: Option<NaiveDateTime>,
    pub reminder_sent: bool,
    pub creation_time: NaiveDateTime,
    pub status: TaskStatus,
}

// Задача вместе с краткими данными мероприятия, исполнителя и площадки
#[derive(Debug, Clone, FromRow)]
pub struct TaskDetails {
    pub id: i32,
    pub event_id: i32,
    pub event_title: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assignee_id: Option<i32>,
    pub assignee_name: Option<String>,
    pub assignee_surname: Option<String>,
    pub place_id: Option<i32>,
    pub place_title: Option<String>,
    pub creation_time: NaiveDateTime,
    pub deadline: NaiveDateTime,
    pub notification_deadline: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub event_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i32>,
    pub assigner_id: i32,
    pub place_id: Option<i32>,
    pub deadline: NaiveDateTime,
    pub notification_deadline: Option<NaiveDateTime>,
    pub status: TaskStatus,
}

// Общая часть запросов, возвращающих TaskDetails
pub const TASK_DETAILS_SELECT: &str =
    "SELECT t.id, t.event_id, e.title AS event_title, t.title, t.description, t.status, \
            t.assignee_id, u.name AS assignee_name, u.surname AS assignee_surname, \
            t.place_id, p.title AS place_title, \
            t.creation_time, t.deadline, t.notification_deadline \
     FROM tasks t \
     JOIN events e ON e.id = t.event_id \
     LEFT JOIN users u ON u.id = t.assignee_id \
     LEFT JOIN places p ON p.id = t.place_id";

impl Task {
    pub async fn find_by_id(id: i32, db: &Database) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, event_id, title, description, assignee_id, assigner_id, place_id, \
                    deadline, notification_deadline, reminder_sent, creation_time, status \
             FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn details_by_id(id: i32, db: &Database) -> Result<Option<TaskDetails>, sqlx::Error> {
        sqlx::query_as::<_, TaskDetails>(&format!("{TASK_DETAILS_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&db.pool)
            .await
    }

    pub async fn details_by_ids(
        ids: &[i32],
        db: &Database,
    ) -> Result<Vec<TaskDetails>, sqlx::Error> {
        sqlx::query_as::<_, TaskDetails>(&format!(
            "{TASK_DETAILS_SELECT} WHERE t.id = ANY($1) ORDER BY t.id"
        ))
        .bind(ids)
        .fetch_all(&db.pool)
        .await
    }

    pub async fn insert(new: &NewTask, db: &Database) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO tasks (event_id, title, description, assignee_id, assigner_id, \
                 place_id, deadline, notification_deadline, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING id",
        )
        .bind(new.event_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.assignee_id)
        .bind(new.assigner_id)
        .bind(new.place_id)
        .bind(new.deadline)
        .bind(new.notification_deadline)
        .bind(new.status)
        .fetch_one(&db.pool)
        .await
    }

    // Полное обновление. Время создания и постановщик сохраняются,
    // напоминание взводится заново.
    pub async fn update_content(
        id: i32,
        new: &NewTask,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET event_id = $1, title = $2, description = $3, assignee_id = $4, \
                 place_id = $5, deadline = $6, notification_deadline = $7, status = $8, \
                 reminder_sent = FALSE \
             WHERE id = $9",
        )
        .bind(new.event_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.assignee_id)
        .bind(new.place_id)
        .bind(new.deadline)
        .bind(new.notification_deadline)
        .bind(new.status)
        .bind(id)
        .execute(&db.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_assignee(
        id: i32,
        assignee_id: Option<i32>,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET assignee_id = $1 WHERE id = $2")
            .bind(assignee_id)
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_status(
        id: i32,
        status: TaskStatus,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn move_to_event(
        ids: &[i32],
        event_id: i32,
        db: &Database,
    ) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE tasks SET event_id = $1 WHERE id = ANY($2) RETURNING id",
        )
        .bind(event_id)
        .bind(ids)
        .fetch_all(&db.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn now() -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    #[test]
    fn deadline_in_future_gives_new() {
        let now = now();
        assert_eq!(
            TaskStatus::from_deadline(now + Duration::hours(1), now),
            TaskStatus::New
        );
    }

    #[test]
    fn deadline_in_past_gives_expired() {
        let now = now();
        assert_eq!(
            TaskStatus::from_deadline(now - Duration::seconds(1), now),
            TaskStatus::Expired
        );
    }

    #[test]
    fn deadline_exactly_now_gives_new() {
        let now = now();
        assert_eq!(TaskStatus::from_deadline(now, now), TaskStatus::New);
    }

    proptest! {
        #[test]
        fn status_follows_deadline_sign(offset_secs in -86_400i64..86_400i64) {
            let now = now();
            let status = TaskStatus::from_deadline(now + Duration::seconds(offset_secs), now);
            if offset_secs < 0 {
                prop_assert_eq!(status, TaskStatus::Expired);
            } else {
                prop_assert_eq!(status, TaskStatus::New);
            }
        }
    }
}
