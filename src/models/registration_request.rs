use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    New,
    Approved,
    Declined,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: RegistrationStatus,
    pub sent_time: NaiveDateTime,
}

impl RegistrationRequest {
    pub async fn create(
        name: &str,
        surname: &str,
        email: &str,
        password_hash: &str,
        db: &Database,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO registration_requests (name, surname, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(surname)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn find_by_id(
        id: i32,
        db: &Database,
    ) -> Result<Option<RegistrationRequest>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationRequest>(
            "SELECT id, name, surname, email, password_hash, status, sent_time \
             FROM registration_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    // Необработанная заявка с таким email уже ждёт решения
    pub async fn pending_email_exists(email: &str, db: &Database) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM registration_requests WHERE email = $1 AND status = 'NEW')",
        )
        .bind(email)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn all_pending(db: &Database) -> Result<Vec<RegistrationRequest>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationRequest>(
            "SELECT id, name, surname, email, password_hash, status, sent_time \
             FROM registration_requests WHERE status = 'NEW' ORDER BY sent_time",
        )
        .fetch_all(&db.pool)
        .await
    }

    pub async fn set_status(
        id: i32,
        status: RegistrationStatus,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE registration_requests SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
