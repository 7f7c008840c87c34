use std::sync::Arc;

use axum::Router;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub mod auth;
pub mod events;
pub mod notifications;
pub mod places;
pub mod profile;
pub mod roles;
pub mod tasks;

// Всё, что живёт под /api. Маршруты аутентификации монтируются в корне.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(tasks::routes())
        .merge(places::routes())
        .merge(notifications::routes())
        .merge(profile::routes())
        .merge(roles::routes())
}

// Конверт постраничных ответов
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub total: i64,
    pub items: Vec<T>,
}

pub(crate) const DEFAULT_PAGE_SIZE: i64 = 15;
pub(crate) const MAX_PAGE_SIZE: i64 = 50;

// Нумерация страниц с нуля, размер ограничен сверху
pub(crate) fn page_params(page: Option<i64>, size: Option<i64>) -> ApiResult<(i64, i64)> {
    let page = page.unwrap_or(0);
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page < 0 {
        return Err(ApiError::BadRequest(
            "Параметр page не может быть меньше 0!".to_string(),
        ));
    }
    if !(0..=MAX_PAGE_SIZE).contains(&size) {
        return Err(ApiError::BadRequest(format!(
            "Параметр size должен быть в пределах от 0 до {MAX_PAGE_SIZE}!"
        )));
    }
    Ok((page, size))
}

pub(crate) fn validate_id(id: i32) -> ApiResult<()> {
    if id < 1 {
        return Err(ApiError::BadRequest(
            "Параметр id не может быть меньше 1!".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_when_params_missing() {
        assert_eq!(page_params(None, None).unwrap(), (0, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn negative_page_rejected() {
        assert!(page_params(Some(-1), None).is_err());
    }

    #[test]
    fn oversized_page_rejected() {
        assert!(page_params(None, Some(MAX_PAGE_SIZE + 1)).is_err());
        assert_eq!(
            page_params(None, Some(MAX_PAGE_SIZE)).unwrap(),
            (0, MAX_PAGE_SIZE)
        );
    }

    #[test]
    fn zero_id_rejected() {
        assert!(validate_id(0).is_err());
        assert!(validate_id(1).is_ok());
    }

    proptest::proptest! {
        // Любая комбинация параметров либо отклоняется, либо даёт
        // страницу >= 0 и размер в допустимых пределах
        #[test]
        fn page_params_bounded(
            page in proptest::option::of(-100i64..100),
            size in proptest::option::of(-100i64..100),
        ) {
            if let Ok((p, s)) = page_params(page, size) {
                proptest::prop_assert!(p >= 0);
                proptest::prop_assert!((0..=MAX_PAGE_SIZE).contains(&s));
            }
        }
    }
}
