use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use contracts::shared::api::{STORE_OVERVIEW_PATH, UPDATE_OVERVIEW_STATUS_PATH};

use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // STORE OVERVIEW (a001)
        // ========================================
        .route(
            STORE_OVERVIEW_PATH,
            get(handlers::a001_store_order::list_overview),
        )
        .route(
            UPDATE_OVERVIEW_STATUS_PATH,
            patch(handlers::a001_store_order::update_overview_status),
        )
        .route(
            "/store/testdata",
            post(handlers::a001_store_order::insert_test_data),
        )
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
}
