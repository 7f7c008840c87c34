use sqlx::FromRow;

use crate::database::Database;

// Строка оргсписка мероприятия: пользователь и его роль
#[derive(Debug, Clone, FromRow)]
pub struct EventUserRole {
    pub user_id: i32,
    pub name: String,
    pub surname: String,
    pub role_name: String,
}

impl EventUserRole {
    pub async fn for_event(
        event_id: i32,
        db: &Database,
    ) -> Result<Vec<EventUserRole>, sqlx::Error> {
        sqlx::query_as::<_, EventUserRole>(
            "SELECT er.user_id, u.name, u.surname, r.name AS role_name \
             FROM event_roles er \
             JOIN users u ON u.id = er.user_id \
             JOIN roles r ON r.id = er.role_id \
             WHERE er.event_id = $1 \
             ORDER BY u.surname, u.name, er.user_id",
        )
        .bind(event_id)
        .fetch_all(&db.pool)
        .await
    }
}
