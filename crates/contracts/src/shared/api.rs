//! Wire-контракты REST API обзора заказов (`/store/*`)

use serde::{Deserialize, Serialize};

use crate::domain::a001_store_order::StoreOrder;

/// Размер страницы по умолчанию для обзора заказов
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Верхняя граница `limit`, которую принимает backend
pub const MAX_PAGE_SIZE: u32 = 100;

pub const STORE_OVERVIEW_PATH: &str = "/store/store-overview";
pub const UPDATE_OVERVIEW_STATUS_PATH: &str = "/store/update-overview-statu";

/// Параметры запроса `GET /store/store-overview`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOverviewQuery {
    /// Номер страницы, начиная с 1
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl StoreOverviewQuery {
    /// Пустой или пробельный поиск не передаётся вовсе
    pub fn new(page: u32, limit: u32, search: &str) -> Self {
        let search = search.trim();
        Self {
            page,
            limit,
            search: if search.is_empty() {
                None
            } else {
                Some(search.to_string())
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    /// Старые версии API отдают это поле как `total`
    #[serde(alias = "total")]
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    pub fn new(current_page: u32, items_per_page: u32, total_items: u64) -> Self {
        Self {
            current_page,
            total_pages: total_pages(total_items, items_per_page),
            total_items,
            items_per_page,
        }
    }
}

/// Количество страниц; для пустого результата 0
pub fn total_pages(total_items: u64, items_per_page: u32) -> u32 {
    if items_per_page == 0 {
        return 0;
    }
    let per_page = items_per_page as u64;
    ((total_items + per_page - 1) / per_page) as u32
}

/// Ответ `GET /store/store-overview`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOverviewResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<StoreOrder>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Тело `PATCH /store/update-overview-statu`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOverviewStatusRequest {
    pub ids: Vec<String>,
    pub status: String,
}

/// Ответ `PATCH /store/update-overview-statu`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOverviewStatusResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateOverviewStatusResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_pagination_accepts_total_alias() {
        let json = r#"{"currentPage":2,"totalPages":3,"total":25,"itemsPerPage":10}"#;
        let p: Pagination = serde_json::from_str(json).unwrap();
        assert_eq!(p.total_items, 25);

        let json = r#"{"currentPage":1,"totalPages":1,"totalItems":4,"itemsPerPage":10}"#;
        let p: Pagination = serde_json::from_str(json).unwrap();
        assert_eq!(p.total_items, 4);
    }

    #[test]
    fn test_query_drops_blank_search() {
        assert_eq!(StoreOverviewQuery::new(1, 10, "   ").search, None);
        assert_eq!(
            StoreOverviewQuery::new(1, 10, " abc ").search.as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_update_response_without_message() {
        let r: UpdateOverviewStatusResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(r, UpdateOverviewStatusResponse::ok());
        assert_eq!(
            serde_json::to_string(&UpdateOverviewStatusResponse::ok()).unwrap(),
            r#"{"success":true}"#
        );
    }
}
