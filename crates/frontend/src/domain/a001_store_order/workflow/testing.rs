//! Тестовые заглушки для workflow: API в памяти, запись уведомлений, tokio-таймер.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use contracts::domain::a001_store_order::{PartnerRef, StoreOrder};
use contracts::shared::api::{
    Pagination, StoreOverviewQuery, StoreOverviewResponse, UpdateOverviewStatusRequest,
    UpdateOverviewStatusResponse,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use super::notify::{Notification, Notifier};
use super::timer::Sleeper;
use crate::domain::a001_store_order::api::{ApiError, OrderApi};

pub fn order(id: &str, status: &str) -> StoreOrder {
    StoreOrder {
        id: id.to_string(),
        status: status.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        partner: Some(PartnerRef {
            id: format!("p-{id}"),
            name: "Schuhhaus Berger".to_string(),
            email: None,
        }),
        size: Some("42".to_string()),
        length: None,
        quantity: 1,
    }
}

pub fn orders(count: usize) -> Vec<StoreOrder> {
    (1..=count)
        .map(|n| order(&format!("o{n}"), "In_bearbeitung"))
        .collect()
}

#[derive(Debug, Clone)]
pub enum UpdateBehavior {
    Respond {
        success: bool,
        message: Option<String>,
    },
    Fail(ApiError),
}

impl UpdateBehavior {
    pub fn succeed() -> Self {
        UpdateBehavior::Respond {
            success: true,
            message: None,
        }
    }
}

/// API в памяти: пагинирует `dataset`, ищет по подстроке в id
pub struct MockOrderApi {
    dataset: RefCell<Vec<StoreOrder>>,
    fetch_failure: RefCell<Option<ApiError>>,
    fetch_response: RefCell<Option<StoreOverviewResponse>>,
    fetch_delays: RefCell<HashMap<u32, Duration>>,
    fetch_calls: RefCell<Vec<StoreOverviewQuery>>,
    update_behavior: RefCell<UpdateBehavior>,
    update_delay: Cell<Option<Duration>>,
    update_calls: RefCell<Vec<UpdateOverviewStatusRequest>>,
}

impl MockOrderApi {
    pub fn new() -> Self {
        Self {
            dataset: RefCell::new(Vec::new()),
            fetch_failure: RefCell::new(None),
            fetch_response: RefCell::new(None),
            fetch_delays: RefCell::new(HashMap::new()),
            fetch_calls: RefCell::new(Vec::new()),
            update_behavior: RefCell::new(UpdateBehavior::succeed()),
            update_delay: Cell::new(None),
            update_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_orders(orders: Vec<StoreOrder>) -> Self {
        let api = Self::new();
        api.set_orders(orders);
        api
    }

    pub fn set_orders(&self, orders: Vec<StoreOrder>) {
        *self.dataset.borrow_mut() = orders;
    }

    pub fn set_fetch_failure(&self, error: Option<ApiError>) {
        *self.fetch_failure.borrow_mut() = error;
    }

    /// Отдавать этот ответ как есть вместо страницы из `dataset`
    pub fn set_fetch_response(&self, response: Option<StoreOverviewResponse>) {
        *self.fetch_response.borrow_mut() = response;
    }

    pub fn set_fetch_delay(&self, page: u32, delay: Duration) {
        self.fetch_delays.borrow_mut().insert(page, delay);
    }

    pub fn set_update_behavior(&self, behavior: UpdateBehavior) {
        *self.update_behavior.borrow_mut() = behavior;
    }

    pub fn set_update_delay(&self, delay: Duration) {
        self.update_delay.set(Some(delay));
    }

    pub fn fetch_calls(&self) -> Vec<StoreOverviewQuery> {
        self.fetch_calls.borrow().clone()
    }

    pub fn update_calls(&self) -> Vec<UpdateOverviewStatusRequest> {
        self.update_calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl OrderApi for MockOrderApi {
    async fn fetch_overview(
        &self,
        query: &StoreOverviewQuery,
    ) -> Result<StoreOverviewResponse, ApiError> {
        self.fetch_calls.borrow_mut().push(query.clone());
        let delay = self.fetch_delays.borrow().get(&query.page).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.fetch_failure.borrow().clone() {
            return Err(error);
        }
        if let Some(response) = self.fetch_response.borrow().clone() {
            return Ok(response);
        }

        let matching: Vec<StoreOrder> = self
            .dataset
            .borrow()
            .iter()
            .filter(|o| match &query.search {
                Some(s) => o.id.to_lowercase().contains(&s.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let offset = (query.page.saturating_sub(1) * query.limit) as usize;
        let data = matching
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();

        Ok(StoreOverviewResponse {
            success: true,
            data,
            pagination: Some(Pagination::new(query.page, query.limit, total)),
            message: None,
        })
    }

    async fn update_status(
        &self,
        request: &UpdateOverviewStatusRequest,
    ) -> Result<UpdateOverviewStatusResponse, ApiError> {
        self.update_calls.borrow_mut().push(request.clone());
        if let Some(delay) = self.update_delay.get() {
            tokio::time::sleep(delay).await;
        }
        match self.update_behavior.borrow().clone() {
            UpdateBehavior::Respond { success, message } => {
                Ok(UpdateOverviewStatusResponse { success, message })
            }
            UpdateBehavior::Fail(error) => Err(error),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.borrow_mut())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}

pub struct TokioSleeper;

#[async_trait(?Send)]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
