use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Ошибка уровня HTTP-обработчиков.
///
/// Вариант задаёт HTTP-статус, сообщение уходит клиенту
/// в JSON-теле `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Внутренняя ошибка сервера".to_string(),
                )
            }
            ApiError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Преобразует ошибку sqlx в HTTP-статус и сообщение.
///
/// - `RowNotFound` -> 404
/// - нарушение уникальности (код 23505) -> 409
/// - всё остальное -> 500 с обезличенным сообщением (детали в логе)
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Запись не найдена".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => (
            StatusCode::CONFLICT,
            "Запись с такими данными уже существует".to_string(),
        ),
        other => {
            tracing::error!("database error: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Внутренняя ошибка сервера".to_string(),
            )
        }
    }
}

/// Прогоняет derive-валидацию DTO и сворачивает сообщения в 400.
pub fn validate_request<T: validator::Validate>(request: &T) -> ApiResult<()> {
    request.validate().map_err(|errors| {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Поле {field} заполнено неверно"),
                })
            })
            .collect();
        messages.sort();
        ApiError::BadRequest(messages.join("; "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Поле title не может быть пустой!"))]
        title: String,
        #[validate(range(min = 1, message = "Поле eventId не может быть меньше 1!"))]
        event_id: i32,
    }

    #[test]
    fn test_validation_messages_joined() {
        let probe = Probe {
            title: String::new(),
            event_id: 0,
        };
        let err = validate_request(&probe).unwrap_err();
        match err {
            ApiError::BadRequest(msg) => {
                assert!(msg.contains("Поле title не может быть пустой!"));
                assert!(msg.contains("Поле eventId не может быть меньше 1!"));
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let probe = Probe {
            title: "Настройка сцены".to_string(),
            event_id: 3,
        };
        assert!(validate_request(&probe).is_ok());
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = ApiError::Database(sqlx::Error::RowNotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("Задача не найдена".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let response = ApiError::Forbidden("Нет прав".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
