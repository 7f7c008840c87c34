use tracing::info;

use crate::database::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::event::{Event, NewEvent};
use crate::models::event_role::EventUserRole;
use crate::models::place::Place;
use crate::models::role::{self, Role};
use crate::models::user::User;

// Колонки, переносимые при копировании мероприятия
const COPY_COLUMNS: &str = "title, place_id, start_date, end_date, short_description, \
     full_description, format, status, registration_start, registration_end, \
     participant_limit, participant_age_lowest, participant_age_highest, \
     preparing_start, preparing_end";

// Создание мероприятия: только название, создатель сразу получает
// роль организатора. Остальные поля заполняются позже через PUT.
pub async fn create_by_organizer(user_id: i32, title: &str, db: &Database) -> ApiResult<i32> {
    let organizer = User::find_by_id(user_id, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Пользователь не найден".to_string()))?;
    let organizer_role = Role::find_by_name(role::ORGANIZER_ROLE, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Роль Организатор не найдена".to_string()))?;

    let mut tx = db.pool.begin().await?;
    let event_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO events (title, status) VALUES ($1, 'DRAFT') RETURNING id",
    )
    .bind(title)
    .fetch_one(&mut *tx)
    .await?;
    sqlx::query("INSERT INTO event_roles (user_id, event_id, role_id) VALUES ($1, $2, $3)")
        .bind(organizer.id)
        .bind(event_id)
        .bind(organizer_role.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("🎉 Event {} created by user {}", event_id, user_id);
    Ok(event_id)
}

async fn ensure_references_exist(new: &NewEvent, db: &Database) -> ApiResult<()> {
    if let Some(place_id) = new.place_id {
        if !Place::exists(place_id, db).await? {
            return Err(ApiError::NotFound("Площадка не найдена".to_string()));
        }
    }
    if let Some(parent_id) = new.parent_id {
        if !Event::exists(parent_id, db).await? {
            return Err(ApiError::NotFound(
                "Родительское мероприятие не найдено".to_string(),
            ));
        }
    }
    Ok(())
}

// Активность создаётся сразу с полным набором полей
pub async fn create_activity(new: &NewEvent, db: &Database) -> ApiResult<i32> {
    ensure_references_exist(new, db).await?;
    let id = Event::insert(new, db).await?;
    info!("Activity {} created (parent: {:?})", id, new.parent_id);
    Ok(id)
}

pub async fn update(id: i32, new: &NewEvent, db: &Database) -> ApiResult<Event> {
    ensure_references_exist(new, db).await?;
    Event::update(id, new, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Мероприятие не найдено".to_string()))
}

// Удаление забирает с собой активности, задачи и назначенные роли
pub async fn delete(id: i32, db: &Database) -> ApiResult<()> {
    if !Event::exists(id, db).await? {
        return Err(ApiError::NotFound("Мероприятие не найдено".to_string()));
    }

    let mut tx = db.pool.begin().await?;
    sqlx::query(
        "DELETE FROM tasks WHERE event_id = $1 \
         OR event_id IN (SELECT id FROM events WHERE parent_id = $1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    sqlx::query(
        "DELETE FROM event_roles WHERE event_id = $1 \
         OR event_id IN (SELECT id FROM events WHERE parent_id = $1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM events WHERE parent_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("🗑️ Event {} deleted with activities and tasks", id);
    Ok(())
}

pub async fn organizers(event_id: i32, db: &Database) -> ApiResult<Vec<EventUserRole>> {
    if !Event::exists(event_id, db).await? {
        return Err(ApiError::NotFound("Мероприятие не найдено".to_string()));
    }
    Ok(EventUserRole::for_event(event_id, db).await?)
}

// Копия мероприятия, при deep вместе с активностями.
// Задачи и роли на копию не переносятся.
pub async fn copy(id: i32, deep: bool, db: &Database) -> ApiResult<i32> {
    if !Event::exists(id, db).await? {
        return Err(ApiError::NotFound("Мероприятие не найдено".to_string()));
    }

    let mut tx = db.pool.begin().await?;
    let new_id = sqlx::query_scalar::<_, i32>(&format!(
        "INSERT INTO events ({COPY_COLUMNS}, parent_id) \
         SELECT {COPY_COLUMNS}, parent_id FROM events WHERE id = $1 \
         RETURNING id"
    ))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if deep {
        sqlx::query(&format!(
            "INSERT INTO events ({COPY_COLUMNS}, parent_id) \
             SELECT {COPY_COLUMNS}, $2 FROM events WHERE parent_id = $1"
        ))
        .bind(id)
        .bind(new_id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!("Event {} copied to {} (deep: {})", id, new_id, deep);
    Ok(new_id)
}
