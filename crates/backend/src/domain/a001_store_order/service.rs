use super::repository;
use chrono::{Duration, Utc};
use contracts::domain::a001_store_order::{
    is_legal, source_codes, OrderStatus, PartnerRef, StoreOrder,
};
use contracts::shared::api::{
    Pagination, StoreOverviewQuery, StoreOverviewResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use uuid::Uuid;

use crate::shared::data::db::get_connection;

/// Ошибки смены статуса. Все, кроме `Storage`, вызваны запросом клиента.
#[derive(Debug, thiserror::Error)]
pub enum StatusUpdateError {
    #[error("Keine Bestellungen ausgewählt")]
    EmptyIds,
    #[error("Unbekannter Status: {0}")]
    UnknownStatus(String),
    #[error("Bestellung nicht gefunden: {0}")]
    NotFound(String),
    #[error("Statuswechsel von {from} nach {to} ist für Bestellung {id} nicht erlaubt")]
    IllegalTransition { id: String, from: String, to: String },
    #[error("Bestellungen wurden zwischenzeitlich geändert, bitte neu laden")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl StatusUpdateError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StatusUpdateError::Storage(_))
    }
}

/// Приводит параметры списка к допустимым значениям:
/// page >= 1, limit в 1..=MAX_PAGE_SIZE, пустой поиск отбрасывается
pub fn normalize_query(
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<&str>,
) -> StoreOverviewQuery {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    StoreOverviewQuery::new(page, limit, search.unwrap_or(""))
}

/// Страница обзора заказов магазинов
pub async fn list_overview(query: &StoreOverviewQuery) -> anyhow::Result<StoreOverviewResponse> {
    let db = get_connection()?;
    let page = repository::list_page(db, query.search.as_deref(), query.page, query.limit).await?;

    tracing::debug!(
        "store overview: page={} limit={} search={:?} -> {} of {}",
        query.page,
        query.limit,
        query.search,
        page.items.len(),
        page.total
    );

    Ok(StoreOverviewResponse {
        success: true,
        data: page.items,
        pagination: Some(Pagination::new(query.page, query.limit, page.total)),
        message: None,
    })
}

/// Уникальные id в исходном порядке
fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Проверка пакета: каждый id найден и может перейти в `target`
pub fn check_transitions(
    ids: &[String],
    found: &[StoreOrder],
    target: OrderStatus,
) -> Result<(), StatusUpdateError> {
    for id in ids {
        let order = found
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| StatusUpdateError::NotFound(id.clone()))?;

        if !is_legal(&order.status, target) {
            return Err(StatusUpdateError::IllegalTransition {
                id: id.clone(),
                from: order.status.clone(),
                to: target.code().to_string(),
            });
        }
    }
    Ok(())
}

/// Смена статуса для набора заказов. Всё или ничего: при любой ошибке
/// проверки ни один заказ не меняется.
pub async fn update_status(ids: &[String], status: &str) -> Result<u64, StatusUpdateError> {
    let ids = dedup_ids(ids);
    if ids.is_empty() {
        return Err(StatusUpdateError::EmptyIds);
    }
    let target = OrderStatus::from_code(status)
        .ok_or_else(|| StatusUpdateError::UnknownStatus(status.to_string()))?;

    update_status_on(get_connection()?, &ids, target).await
}

async fn update_status_on(
    db: &DatabaseConnection,
    ids: &[String],
    target: OrderStatus,
) -> Result<u64, StatusUpdateError> {
    let found = repository::get_by_ids(db, ids).await?;
    check_transitions(ids, &found, target)?;

    // проверка выше даёт понятную ошибку; атомарность обеспечивает условный UPDATE
    let applied =
        repository::update_status_from(db, ids, &source_codes(target), target.code()).await?;
    if !applied {
        tracing::warn!("Concurrent status change detected for {:?}", ids);
        return Err(StatusUpdateError::Conflict);
    }

    tracing::info!("Status of {} order(s) set to {}", ids.len(), target.code());
    Ok(ids.len() as u64)
}

/// Вставка тестовых данных
pub async fn insert_test_data() -> anyhow::Result<usize> {
    let partners = [
        ("p-berg", "Orthopädie Schuhhaus Berg", Some("info@schuhhaus-berg.de")),
        ("p-lauf", "LaufWerk Sanitätshaus", Some("bestellung@laufwerk.de")),
        ("p-fuss", "Fußpunkt Filiale Mitte", None),
        ("p-stein", "Steinmann Orthopädietechnik", Some("service@steinmann-ot.de")),
    ];
    let statuses = OrderStatus::all();
    let sizes = ["38", "39", "40", "41", "42", "43", "44", "45"];

    let db = get_connection()?;
    let now = Utc::now();
    let count = 24;
    for i in 0..count {
        let (partner_id, partner_name, partner_email) = partners[i % partners.len()];
        let order = StoreOrder {
            id: Uuid::new_v4().to_string(),
            status: statuses[i % statuses.len()].code().to_string(),
            created_at: now - Duration::hours(i as i64 * 7),
            partner: Some(PartnerRef {
                id: partner_id.to_string(),
                name: partner_name.to_string(),
                email: partner_email.map(String::from),
            }),
            size: Some(sizes[i % sizes.len()].to_string()),
            length: Some(format!("{} mm", 240 + (i % 8) * 5)),
            quantity: (i % 3) as i32 + 1,
        };
        repository::insert(db, &order).await?;
    }

    tracing::info!(
        "Inserted {} demo orders, total now {}",
        count,
        repository::count_all(db).await?
    );
    Ok(count)
}
