use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::database::Database;

// В базе хранится только хэш токена восстановления
#[derive(Debug, Clone, FromRow)]
pub struct RecoveryToken {
    pub id: i32,
    pub user_id: i32,
    pub token_hash: String,
    pub expires_at: NaiveDateTime,
    pub used: bool,
}

impl RecoveryToken {
    // Новый запрос отменяет все предыдущие токены пользователя
    pub async fn replace_for_user(
        user_id: i32,
        token_hash: &str,
        expires_at: NaiveDateTime,
        db: &Database,
    ) -> Result<(), sqlx::Error> {
        let mut tx = db.pool.begin().await?;
        sqlx::query("DELETE FROM recovery_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO recovery_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }

    pub async fn find_valid(
        token_hash: &str,
        db: &Database,
    ) -> Result<Option<RecoveryToken>, sqlx::Error> {
        sqlx::query_as::<_, RecoveryToken>(
            "SELECT id, user_id, token_hash, expires_at, used \
             FROM recovery_tokens \
             WHERE token_hash = $1 AND used = FALSE AND expires_at > NOW()",
        )
        .bind(token_hash)
        .fetch_optional(&db.pool)
        .await
    }
}
