use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

// Базовые роли, создаваемые миграцией. Их нельзя удалять.
pub const ADMIN_ROLE: &str = "Администратор";
pub const READER_ROLE: &str = "Читатель";
pub const ORGANIZER_ROLE: &str = "Организатор";
pub const ASSISTANT_ROLE: &str = "Помощник";

pub const BASE_ROLES: [&str; 4] = [ADMIN_ROLE, READER_ROLE, ORGANIZER_ROLE, ASSISTANT_ROLE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    System,
    Event,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub role_type: RoleType,
}

impl Role {
    pub async fn find_by_id(id: i32, db: &Database) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, role_type FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn find_by_name(name: &str, db: &Database) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, role_type FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn all(db: &Database) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, role_type FROM roles ORDER BY id",
        )
        .fetch_all(&db.pool)
        .await
    }

    pub async fn all_by_type(role_type: RoleType, db: &Database) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, role_type FROM roles WHERE role_type = $1 ORDER BY id",
        )
        .bind(role_type)
        .fetch_all(&db.pool)
        .await
    }

    // Поиск по имени без учёта регистра
    pub async fn search_by_name(name: &str, db: &Database) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, role_type FROM roles \
             WHERE name ILIKE '%' || $1 || '%' ORDER BY id",
        )
        .bind(name)
        .fetch_all(&db.pool)
        .await
    }

    // Число назначений роли в мероприятиях
    pub async fn assignments_count(role_id: i32, db: &Database) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM event_roles WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(&db.pool)
            .await
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub fn is_base(&self) -> bool {
        BASE_ROLES.contains(&self.name.as_str())
    }
}
