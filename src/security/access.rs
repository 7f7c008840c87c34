use crate::database::Database;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::privilege::{self, Privilege};
use crate::models::role;

const FORBIDDEN_MESSAGE: &str = "Недостаточно прав для выполнения операции";

pub fn is_admin(user: &AuthUser) -> bool {
    user.role == role::ADMIN_ROLE
}

pub fn require_admin(user: &AuthUser) -> ApiResult<()> {
    if is_admin(user) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(FORBIDDEN_MESSAGE.to_string()))
    }
}

// Роль пользователя в мероприятии. Если прямой роли нет, учитывается
// роль в родительском мероприятии: организатор видит свои активности.
pub async fn effective_role_name(
    user_id: i32,
    event_id: i32,
    db: &Database,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT r.name FROM event_roles er \
         JOIN roles r ON r.id = er.role_id \
         WHERE er.user_id = $1 \
           AND (er.event_id = $2 \
                OR er.event_id = (SELECT parent_id FROM events WHERE id = $2)) \
         ORDER BY (er.event_id = $2) DESC \
         LIMIT 1",
    )
    .bind(user_id)
    .bind(event_id)
    .fetch_optional(&db.pool)
    .await
}

// Администратор проходит всегда, остальным нужна привилегия роли
// в самом мероприятии или в его родителе.
pub async fn require_event_privilege(
    user: &AuthUser,
    event_id: i32,
    privilege: Privilege,
    db: &Database,
) -> ApiResult<()> {
    if is_admin(user) {
        return Ok(());
    }
    match effective_role_name(user.id, event_id, db).await? {
        Some(name) if privilege::role_has(&name, privilege) => Ok(()),
        _ => Err(ApiError::Forbidden(FORBIDDEN_MESSAGE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: &str) -> AuthUser {
        AuthUser {
            id: 7,
            email: "volkov@example.com".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn admin_passes_admin_check() {
        assert!(require_admin(&user_with_role(role::ADMIN_ROLE)).is_ok());
    }

    #[test]
    fn reader_fails_admin_check() {
        let err = require_admin(&user_with_role(role::READER_ROLE)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
