use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Draft,
    Published,
    Completed,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_format", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventFormat {
    Online,
    Offline,
    Hybrid,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub place_id: Option<i32>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub format: Option<EventFormat>,
    pub status: EventStatus,
    pub registration_start: Option<NaiveDateTime>,
    pub registration_end: Option<NaiveDateTime>,
    #[serde(rename = "parent")]
    pub parent_id: Option<i32>,
    pub participant_limit: Option<i32>,
    pub participant_age_lowest: Option<i32>,
    pub participant_age_highest: Option<i32>,
    pub preparing_start: Option<NaiveDateTime>,
    pub preparing_end: Option<NaiveDateTime>,
}

// Полный набор полей для вставки или обновления мероприятия
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub place_id: Option<i32>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub format: Option<EventFormat>,
    pub status: EventStatus,
    pub registration_start: Option<NaiveDateTime>,
    pub registration_end: Option<NaiveDateTime>,
    pub parent_id: Option<i32>,
    pub participant_limit: Option<i32>,
    pub participant_age_lowest: Option<i32>,
    pub participant_age_highest: Option<i32>,
    pub preparing_start: Option<NaiveDateTime>,
    pub preparing_end: Option<NaiveDateTime>,
}

// Параметры фильтрации списка мероприятий
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub parent_id: Option<i32>,
    pub title: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub status: Option<EventStatus>,
    pub format: Option<EventFormat>,
}

const EVENT_COLUMNS: &str = "id, title, place_id, start_date, end_date, short_description, \
     full_description, format, status, registration_start, registration_end, parent_id, \
     participant_limit, participant_age_lowest, participant_age_highest, \
     preparing_start, preparing_end";

impl Event {
    pub async fn find_by_id(id: i32, db: &Database) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn exists(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&db.pool)
            .await
    }

    pub async fn insert(new: &NewEvent, db: &Database) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO events (title, place_id, start_date, end_date, short_description, \
                 full_description, format, status, registration_start, registration_end, \
                 parent_id, participant_limit, participant_age_lowest, participant_age_highest, \
                 preparing_start, preparing_end) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING id",
        )
        .bind(&new.title)
        .bind(new.place_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.short_description)
        .bind(&new.full_description)
        .bind(new.format)
        .bind(new.status)
        .bind(new.registration_start)
        .bind(new.registration_end)
        .bind(new.parent_id)
        .bind(new.participant_limit)
        .bind(new.participant_age_lowest)
        .bind(new.participant_age_highest)
        .bind(new.preparing_start)
        .bind(new.preparing_end)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn update(id: i32, new: &NewEvent, db: &Database) -> Result<Option<Event>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET title = $1, place_id = $2, start_date = $3, end_date = $4, \
                 short_description = $5, full_description = $6, format = $7, status = $8, \
                 registration_start = $9, registration_end = $10, parent_id = $11, \
                 participant_limit = $12, participant_age_lowest = $13, \
                 participant_age_highest = $14, preparing_start = $15, preparing_end = $16 \
             WHERE id = $17 \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&new.title)
        .bind(new.place_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.short_description)
        .bind(&new.full_description)
        .bind(new.format)
        .bind(new.status)
        .bind(new.registration_start)
        .bind(new.registration_end)
        .bind(new.parent_id)
        .bind(new.participant_limit)
        .bind(new.participant_age_lowest)
        .bind(new.participant_age_highest)
        .bind(new.preparing_start)
        .bind(new.preparing_end)
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    // Страница мероприятий с фильтрами. Возвращает общее число строк и саму страницу.
    pub async fn page(
        filter: &EventFilter,
        page: i64,
        size: i64,
        db: &Database,
    ) -> Result<(i64, Vec<Event>), sqlx::Error> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut param = 1;
        if filter.parent_id.is_some() {
            where_sql.push_str(&format!(" AND parent_id = ${param}"));
            param += 1;
        }
        if filter.title.is_some() {
            where_sql.push_str(&format!(" AND title ILIKE '%' || ${param} || '%'"));
            param += 1;
        }
        if filter.start_date.is_some() {
            where_sql.push_str(&format!(" AND start_date >= ${param}"));
            param += 1;
        }
        if filter.end_date.is_some() {
            where_sql.push_str(&format!(" AND end_date <= ${param}"));
            param += 1;
        }
        if filter.status.is_some() {
            where_sql.push_str(&format!(" AND status = ${param}"));
            param += 1;
        }
        if filter.format.is_some() {
            where_sql.push_str(&format!(" AND format = ${param}"));
            param += 1;
        }

        let count_sql = format!("SELECT COUNT(*) FROM events{where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(parent_id) = filter.parent_id {
            count_query = count_query.bind(parent_id);
        }
        if let Some(title) = &filter.title {
            count_query = count_query.bind(title.clone());
        }
        if let Some(start_date) = filter.start_date {
            count_query = count_query.bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            count_query = count_query.bind(end_date);
        }
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
        }
        if let Some(format) = filter.format {
            count_query = count_query.bind(format);
        }
        let total = count_query.fetch_one(&db.pool).await?;

        let rows_sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events{where_sql} \
             ORDER BY id LIMIT ${param} OFFSET ${}",
            param + 1
        );
        let mut rows_query = sqlx::query_as::<_, Event>(&rows_sql);
        if let Some(parent_id) = filter.parent_id {
            rows_query = rows_query.bind(parent_id);
        }
        if let Some(title) = &filter.title {
            rows_query = rows_query.bind(title.clone());
        }
        if let Some(start_date) = filter.start_date {
            rows_query = rows_query.bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            rows_query = rows_query.bind(end_date);
        }
        if let Some(status) = filter.status {
            rows_query = rows_query.bind(status);
        }
        if let Some(format) = filter.format {
            rows_query = rows_query.bind(format);
        }
        let items = rows_query
            .bind(size)
            .bind(page * size)
            .fetch_all(&db.pool)
            .await?;

        Ok((total, items))
    }
}
