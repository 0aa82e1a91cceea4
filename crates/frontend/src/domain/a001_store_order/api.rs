use async_trait::async_trait;
use contracts::shared::api::{
    StoreOverviewQuery, StoreOverviewResponse, UpdateOverviewStatusRequest,
    UpdateOverviewStatusResponse, STORE_OVERVIEW_PATH, UPDATE_OVERVIEW_STATUS_PATH,
};
use gloo_net::http::{Request, Response};

use crate::shared::api_utils::api_url;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Network(String),
    #[error("Server error: {status}")]
    Status { status: u16, message: Option<String> },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Сообщение, которое прислал сервер в теле ответа (если есть)
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => Some(m.as_str()),
            _ => None,
        }
    }
}

/// REST API обзора заказов. Отдельный трейт, чтобы workflow можно было
/// гонять в тестах без браузера.
#[async_trait(?Send)]
pub trait OrderApi {
    async fn fetch_overview(
        &self,
        query: &StoreOverviewQuery,
    ) -> Result<StoreOverviewResponse, ApiError>;

    async fn update_status(
        &self,
        request: &UpdateOverviewStatusRequest,
    ) -> Result<UpdateOverviewStatusResponse, ApiError>;
}

/// Реализация поверх gloo-net (fetch API браузера)
#[derive(Debug, Clone, Default)]
pub struct HttpOrderApi;

impl HttpOrderApi {
    pub fn new() -> Self {
        Self
    }
}

/// Достаёт поле `message` из тела ответа с ошибкой
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("message")?.as_str().map(String::from));
    ApiError::Status { status, message }
}

#[async_trait(?Send)]
impl OrderApi for HttpOrderApi {
    async fn fetch_overview(
        &self,
        query: &StoreOverviewQuery,
    ) -> Result<StoreOverviewResponse, ApiError> {
        let qs = serde_qs::to_string(query).map_err(|e| ApiError::Encode(e.to_string()))?;
        let url = format!("{}?{}", api_url(STORE_OVERVIEW_PATH), qs);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<StoreOverviewResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn update_status(
        &self,
        request: &UpdateOverviewStatusRequest,
    ) -> Result<UpdateOverviewStatusResponse, ApiError> {
        let response = Request::patch(&api_url(UPDATE_OVERVIEW_STATUS_PATH))
            .json(request)
            .map_err(|e| ApiError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<UpdateOverviewStatusResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Unbekannter Status: X".into()),
        };
        assert_eq!(err.server_message(), Some("Unbekannter Status: X"));
        assert_eq!(ApiError::Network("offline".into()).server_message(), None);
        assert_eq!(
            ApiError::Status {
                status: 502,
                message: None
            }
            .server_message(),
            None
        );
    }

    #[test]
    fn test_query_string() {
        let qs = serde_qs::to_string(&StoreOverviewQuery::new(2, 10, "Berg")).unwrap();
        assert_eq!(qs, "page=2&limit=10&search=Berg");
        let qs = serde_qs::to_string(&StoreOverviewQuery::new(1, 10, "")).unwrap();
        assert_eq!(qs, "page=1&limit=10");
    }
}
