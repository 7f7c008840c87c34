use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::database::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::notification::Notification;
use crate::models::recovery_token::RecoveryToken;
use crate::models::registration_request::{RegistrationRequest, RegistrationStatus};
use crate::models::role::{self, Role};
use crate::models::user::User;
use crate::security::{jwt, password};

const RECOVERY_TOKEN_TTL_HOURS: i64 = 24;

// Единое сообщение, чтобы не раскрывать, что именно не подошло
const BAD_CREDENTIALS: &str = "Неверный email или пароль";

pub async fn login(
    email: &str,
    raw_password: &str,
    jwt_config: &JwtConfig,
    db: &Database,
) -> ApiResult<String> {
    let user = User::find_with_role_by_email(email, db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    let valid = password::verify_password(raw_password, &user.password_hash).unwrap_or(false);
    if !valid {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    jwt::generate_token(user.id, &user.email, &user.role_name, jwt_config)
        .map_err(|e| ApiError::Internal(format!("не удалось выпустить токен: {e}")))
}

// Регистрация создаёт заявку, пользователь появится после одобрения
pub async fn register(
    name: &str,
    surname: &str,
    email: &str,
    raw_password: &str,
    db: &Database,
) -> ApiResult<i32> {
    if User::email_taken(email, db).await?
        || RegistrationRequest::pending_email_exists(email, db).await?
    {
        return Err(ApiError::Conflict(
            "Пользователь с таким email уже существует".to_string(),
        ));
    }

    let password_hash = password::hash_password(raw_password)
        .map_err(|e| ApiError::Internal(format!("не удалось захэшировать пароль: {e}")))?;
    let id = RegistrationRequest::create(name, surname, email, &password_hash, db).await?;
    info!("📋 Registration request {} created for {}", id, email);
    Ok(id)
}

pub async fn approve_registration(request_id: i32, db: &Database) -> ApiResult<()> {
    let request = RegistrationRequest::find_by_id(request_id, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Заявка на регистрацию не найдена".to_string()))?;
    if request.status != RegistrationStatus::New {
        return Err(ApiError::Conflict("Заявка уже обработана".to_string()));
    }

    let reader = Role::find_by_name(role::READER_ROLE, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Роль Читатель не найдена".to_string()))?;

    let mut tx = db.pool.begin().await?;
    let user_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (name, surname, email, password_hash, role_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&request.name)
    .bind(&request.surname)
    .bind(&request.email)
    .bind(&request.password_hash)
    .bind(reader.id)
    .fetch_one(&mut *tx)
    .await?;
    sqlx::query("UPDATE registration_requests SET status = 'APPROVED' WHERE id = $1")
        .bind(request_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Notification::create(
        user_id,
        "Добро пожаловать",
        "Ваша заявка на регистрацию одобрена",
        db,
    )
    .await?;

    info!("✅ Registration request {} approved, user {} created", request_id, user_id);
    Ok(())
}

pub async fn decline_registration(request_id: i32, db: &Database) -> ApiResult<()> {
    let request = RegistrationRequest::find_by_id(request_id, db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Заявка на регистрацию не найдена".to_string()))?;
    if request.status != RegistrationStatus::New {
        return Err(ApiError::Conflict("Заявка уже обработана".to_string()));
    }

    RegistrationRequest::set_status(request_id, RegistrationStatus::Declined, db).await?;
    info!("Registration request {} declined", request_id);
    Ok(())
}

// Ответ всегда одинаковый, существование email не раскрывается.
// Ссылка уходит в журнал, почтовой рассылки у сервиса нет.
pub async fn recover_password(email: &str, return_url: &str, db: &Database) -> ApiResult<()> {
    let Some(user) = User::find_by_email(email, db).await? else {
        debug!("Password recovery requested for unknown email");
        return Ok(());
    };

    let token = Uuid::new_v4().to_string();
    let token_hash = jwt::hash_recovery_token(&token);
    let expires_at = Utc::now().naive_utc() + Duration::hours(RECOVERY_TOKEN_TTL_HOURS);
    RecoveryToken::replace_for_user(user.id, &token_hash, expires_at, db).await?;

    info!(
        "🔑 Password recovery link for user {}: {}?token={}",
        user.id, return_url, token
    );
    Ok(())
}

pub async fn validate_recovery_token(token: &str, db: &Database) -> ApiResult<()> {
    RecoveryToken::find_valid(&jwt::hash_recovery_token(token), db)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Недействительный токен восстановления".to_string()))
}

pub async fn set_new_password(
    token: &str,
    new_password: &str,
    confirm_password: &str,
    db: &Database,
) -> ApiResult<()> {
    if new_password != confirm_password {
        return Err(ApiError::BadRequest("Пароли не совпадают".to_string()));
    }

    let recovery = RecoveryToken::find_valid(&jwt::hash_recovery_token(token), db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Недействительный токен восстановления".to_string()))?;

    let password_hash = password::hash_password(new_password)
        .map_err(|e| ApiError::Internal(format!("не удалось захэшировать пароль: {e}")))?;

    let mut tx = db.pool.begin().await?;
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(&password_hash)
        .bind(recovery.user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE recovery_tokens SET used = TRUE WHERE id = $1")
        .bind(recovery.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("🔑 Password updated via recovery token for user {}", recovery.user_id);
    Ok(())
}
