use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: i32,
    pub registered_at: NaiveDateTime,
}

// Пользователь вместе с названием его системной роли
#[derive(Debug, Clone, FromRow)]
pub struct UserWithRole {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub role_name: String,
    pub registered_at: NaiveDateTime,
}

impl User {
    pub async fn find_by_id(id: i32, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, surname, email, password_hash, role_id, registered_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn find_by_email(email: &str, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, surname, email, password_hash, role_id, registered_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn find_with_role_by_email(
        email: &str,
        db: &Database,
    ) -> Result<Option<UserWithRole>, sqlx::Error> {
        sqlx::query_as::<_, UserWithRole>(
            "SELECT u.id, u.name, u.surname, u.email, u.password_hash, \
                    r.name AS role_name, u.registered_at \
             FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE u.email = $1",
        )
        .bind(email)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn find_with_role_by_id(
        id: i32,
        db: &Database,
    ) -> Result<Option<UserWithRole>, sqlx::Error> {
        sqlx::query_as::<_, UserWithRole>(
            "SELECT u.id, u.name, u.surname, u.email, u.password_hash, \
                    r.name AS role_name, u.registered_at \
             FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn email_taken(email: &str, db: &Database) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&db.pool)
            .await
    }

    pub async fn update_name(
        id: i32,
        name: &str,
        surname: &str,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET name = $1, surname = $2 WHERE id = $3")
            .bind(name)
            .bind(surname)
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_password(
        id: i32,
        password_hash: &str,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_email(id: i32, email: &str, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET email = $1 WHERE id = $2")
            .bind(email)
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
