use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i32,
    #[serde(skip_serializing)]
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub seen: bool,
    pub sent_time: NaiveDateTime,
}

impl Notification {
    pub async fn create(
        user_id: i32,
        title: &str,
        description: &str,
        db: &Database,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, title, description) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_id, title, description, seen, sent_time",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn find_by_id(id: i32, db: &Database) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, title, description, seen, sent_time \
             FROM notifications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    // Свежие уведомления раньше
    pub async fn page_for_user(
        user_id: i32,
        page: i64,
        size: i64,
        db: &Database,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, title, description, seen, sent_time \
             FROM notifications WHERE user_id = $1 \
             ORDER BY sent_time DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(size)
        .bind(page * size)
        .fetch_all(&db.pool)
        .await
    }

    // Прочтение поднимает уведомление наверх списка, поэтому sent_time тоже обновляется
    pub async fn mark_seen(id: i32, db: &Database) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET seen = TRUE, sent_time = NOW() WHERE id = $1 \
             RETURNING id, user_id, title, description, seen, sent_time",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn mark_all_seen(user_id: i32, db: &Database) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET seen = TRUE WHERE user_id = $1 AND seen = FALSE")
                .bind(user_id)
                .execute(&db.pool)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_sent_before(
        cutoff: NaiveDateTime,
        db: &Database,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE sent_time < $1")
            .bind(cutoff)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
