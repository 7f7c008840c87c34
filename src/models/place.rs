use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: i32,
    pub title: String,
    pub address: Option<String>,
    pub room: Option<String>,
    pub description: Option<String>,
}

impl Place {
    pub async fn find_by_id(id: i32, db: &Database) -> Result<Option<Place>, sqlx::Error> {
        sqlx::query_as::<_, Place>(
            "SELECT id, title, address, room, description FROM places WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn all(db: &Database) -> Result<Vec<Place>, sqlx::Error> {
        sqlx::query_as::<_, Place>(
            "SELECT id, title, address, room, description FROM places ORDER BY id",
        )
        .fetch_all(&db.pool)
        .await
    }

    pub async fn exists(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM places WHERE id = $1)")
            .bind(id)
            .fetch_one(&db.pool)
            .await
    }

    pub async fn create(
        title: &str,
        address: Option<&str>,
        room: Option<&str>,
        description: Option<&str>,
        db: &Database,
    ) -> Result<Place, sqlx::Error> {
        sqlx::query_as::<_, Place>(
            "INSERT INTO places (title, address, room, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, address, room, description",
        )
        .bind(title)
        .bind(address)
        .bind(room)
        .bind(description)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn update(
        id: i32,
        title: &str,
        address: Option<&str>,
        room: Option<&str>,
        description: Option<&str>,
        db: &Database,
    ) -> Result<Option<Place>, sqlx::Error> {
        sqlx::query_as::<_, Place>(
            "UPDATE places SET title = $1, address = $2, room = $3, description = $4 \
             WHERE id = $5 \
             RETURNING id, title, address, room, description",
        )
        .bind(title)
        .bind(address)
        .bind(room)
        .bind(description)
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Площадка используется мероприятиями или задачами
    pub async fn in_use(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE place_id = $1) \
             OR EXISTS(SELECT 1 FROM tasks WHERE place_id = $1)",
        )
        .bind(id)
        .fetch_one(&db.pool)
        .await
    }
}
