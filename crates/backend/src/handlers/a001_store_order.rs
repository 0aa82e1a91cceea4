use axum::{extract::Query, http::StatusCode, Json};
use contracts::shared::api::{
    StoreOverviewResponse, UpdateOverviewStatusRequest, UpdateOverviewStatusResponse,
};
use serde::Deserialize;

use crate::domain::a001_store_order::service;

#[derive(Debug, Deserialize)]
pub struct ListOverviewQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

/// GET /store/store-overview
pub async fn list_overview(
    Query(query): Query<ListOverviewQuery>,
) -> (StatusCode, Json<StoreOverviewResponse>) {
    let query = service::normalize_query(query.page, query.limit, query.search.as_deref());

    match service::list_overview(&query).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            tracing::error!("Failed to list store overview: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StoreOverviewResponse {
                    success: false,
                    data: Vec::new(),
                    pagination: None,
                    message: Some("Bestellungen konnten nicht geladen werden".to_string()),
                }),
            )
        }
    }
}

/// PATCH /store/update-overview-statu
pub async fn update_overview_status(
    Json(request): Json<UpdateOverviewStatusRequest>,
) -> (StatusCode, Json<UpdateOverviewStatusResponse>) {
    match service::update_status(&request.ids, &request.status).await {
        Ok(_) => (StatusCode::OK, Json(UpdateOverviewStatusResponse::ok())),
        Err(e) if e.is_client_error() => {
            tracing::warn!("Rejected status update {:?}: {}", request, e);
            (
                StatusCode::BAD_REQUEST,
                Json(UpdateOverviewStatusResponse::failed(e.to_string())),
            )
        }
        Err(e) => {
            tracing::error!("Failed to update order status: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UpdateOverviewStatusResponse::failed(
                    "Status konnte nicht gespeichert werden",
                )),
            )
        }
    }
}

/// POST /store/testdata
pub async fn insert_test_data() -> StatusCode {
    match service::insert_test_data().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to insert demo orders: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
