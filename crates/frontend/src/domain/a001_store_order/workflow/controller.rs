use contracts::shared::api::{Pagination, StoreOverviewQuery};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::coordinator::OptimisticUpdateCoordinator;
use super::error::{WorkflowError, FETCH_FAILED_FALLBACK};
use super::notify::Notifier;
use super::session::SessionToken;
use super::store::OrderStore;
use super::timer::Sleeper;
use crate::domain::a001_store_order::api::OrderApi;

/// Задержка перед применением поиска
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Состояние списка: пагинация, поиск, загрузка
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Текущая страница, с 1
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub search: String,
    pub fetch: FetchState,
}

impl ListState {
    fn new(items_per_page: u32) -> Self {
        Self {
            page: 1,
            total_pages: 0,
            total_items: 0,
            items_per_page,
            search: String::new(),
            fetch: FetchState::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.fetch == FetchState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.fetch {
            FetchState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Контроллер страницы обзора заказов.
///
/// Владеет хранилищем страницы и координатором смены статуса, они делят
/// одну сессию: после `close()` ответы сервера больше не применяются.
pub struct OrderListController {
    api: Rc<dyn OrderApi>,
    sleeper: Rc<dyn Sleeper>,
    store: Rc<OrderStore>,
    coordinator: Rc<OptimisticUpdateCoordinator>,
    session: SessionToken,
    state: RefCell<ListState>,
    fetch_seq: Cell<u64>,
    search_seq: Cell<u64>,
}

impl OrderListController {
    pub fn new(
        api: Rc<dyn OrderApi>,
        notifier: Rc<dyn Notifier>,
        sleeper: Rc<dyn Sleeper>,
        page_size: u32,
    ) -> Self {
        let store = Rc::new(OrderStore::new());
        let session = SessionToken::new();
        let coordinator = Rc::new(OptimisticUpdateCoordinator::new(
            store.clone(),
            api.clone(),
            notifier,
            session.clone(),
        ));
        Self {
            api,
            sleeper,
            store,
            coordinator,
            session,
            state: RefCell::new(ListState::new(page_size.max(1))),
            fetch_seq: Cell::new(0),
            search_seq: Cell::new(0),
        }
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn store(&self) -> Rc<OrderStore> {
        self.store.clone()
    }

    pub fn coordinator(&self) -> Rc<OptimisticUpdateCoordinator> {
        self.coordinator.clone()
    }

    /// Первая загрузка при монтировании страницы
    pub async fn load(&self) {
        self.fetch().await;
    }

    pub async fn refresh(&self) {
        self.fetch().await;
    }

    /// Закрыть сессию (unmount). Незавершённые запросы дорабатывают,
    /// но их результат отбрасывается.
    pub fn close(&self) {
        self.session.close();
    }

    /// Поиск с debounce: из серии быстрых вызовов срабатывает только последний.
    /// Новый текст сбрасывает на первую страницу.
    pub async fn set_search(&self, text: &str) {
        let seq = self.search_seq.get() + 1;
        self.search_seq.set(seq);

        self.sleeper.sleep(SEARCH_DEBOUNCE).await;

        if !self.session.is_live() || seq != self.search_seq.get() {
            return;
        }

        let text = text.trim();
        {
            let mut state = self.state.borrow_mut();
            if state.search == text {
                return;
            }
            state.search = text.to_string();
            state.page = 1;
        }
        log::debug!("Search committed: {:?}", text);
        self.fetch().await;
    }

    pub async fn go_to_page(&self, page: u32) {
        {
            let mut state = self.state.borrow_mut();
            if page == 0 || page == state.page {
                return;
            }
            state.page = page;
        }
        self.fetch().await;
    }

    async fn fetch(&self) {
        let seq = self.fetch_seq.get() + 1;
        self.fetch_seq.set(seq);

        let query = {
            let mut state = self.state.borrow_mut();
            state.fetch = FetchState::Loading;
            StoreOverviewQuery::new(state.page, state.items_per_page, &state.search)
        };
        self.store.mark_changed();

        let result = self.api.fetch_overview(&query).await;

        if !self.session.is_live() {
            return;
        }
        if seq != self.fetch_seq.get() {
            log::debug!("Discarding stale response for page {}", query.page);
            return;
        }

        let failure = match result {
            Ok(response) if response.success => {
                let pagination = response.pagination.unwrap_or_else(|| {
                    Pagination::new(query.page, query.limit, response.data.len() as u64)
                });
                {
                    let mut state = self.state.borrow_mut();
                    state.total_pages = pagination.total_pages;
                    state.total_items = pagination.total_items;
                    state.fetch = FetchState::Loaded;
                }
                self.store.replace_all(response.data);
                return;
            }
            Ok(response) => response.message,
            Err(e) => {
                log::warn!("Failed to fetch store overview: {}", e);
                e.server_message().map(String::from)
            }
        };

        let error = WorkflowError::RemoteFetch(
            failure
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FETCH_FAILED_FALLBACK.to_string()),
        );
        {
            let mut state = self.state.borrow_mut();
            state.total_pages = 0;
            state.total_items = 0;
            state.fetch = FetchState::Failed(error.to_string());
        }
        self.store.replace_all(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_store_order::api::ApiError;
    use crate::domain::a001_store_order::workflow::coordinator::TransitionOutcome;
    use crate::domain::a001_store_order::workflow::notify::NoticeKind;
    use crate::domain::a001_store_order::workflow::testing::{
        order, orders, MockOrderApi, RecordingNotifier, TokioSleeper, UpdateBehavior,
    };
    use contracts::domain::a001_store_order::OrderStatus;
    use contracts::shared::api::{StoreOverviewResponse, DEFAULT_PAGE_SIZE};

    fn controller(api: Rc<MockOrderApi>) -> (OrderListController, Rc<RecordingNotifier>) {
        let notifier = Rc::new(RecordingNotifier::default());
        let controller = OrderListController::new(
            api,
            notifier.clone(),
            Rc::new(TokioSleeper),
            DEFAULT_PAGE_SIZE,
        );
        (controller, notifier)
    }

    #[tokio::test]
    async fn test_load_fills_store_and_pagination() {
        let api = Rc::new(MockOrderApi::with_orders(orders(25)));
        let (c, _) = controller(api.clone());
        assert_eq!(c.state().fetch, FetchState::Idle);

        c.load().await;

        let state = c.state();
        assert_eq!(state.fetch, FetchState::Loaded);
        assert_eq!(state.page, 1);
        assert_eq!(state.total_pages, 3);
        assert_eq!(state.total_items, 25);
        assert_eq!(c.store().len(), 10);
        assert_eq!(api.fetch_calls()[0], StoreOverviewQuery::new(1, 10, ""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_burst_fetches_once_with_last_text() {
        let api = Rc::new(MockOrderApi::with_orders(orders(25)));
        let (c, _) = controller(api.clone());
        c.load().await;
        c.go_to_page(2).await;
        assert_eq!(api.fetch_calls().len(), 2);

        let typed = |delay_ms: u64, text: &'static str| {
            let c = &c;
            async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                c.set_search(text).await;
            }
        };
        tokio::join!(
            typed(0, "a"),
            typed(100, "ab"),
            typed(200, "abc"),
            typed(300, "abcd"),
        );

        let calls = api.fetch_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], StoreOverviewQuery::new(1, 10, "abcd"));
        assert_eq!(c.state().page, 1);
        assert_eq!(c.state().search, "abcd");
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_search_does_not_fetch() {
        let api = Rc::new(MockOrderApi::with_orders(orders(5)));
        let (c, _) = controller(api.clone());
        c.load().await;

        c.set_search("   ").await;

        assert_eq!(api.fetch_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_same_page_does_not_fetch() {
        let api = Rc::new(MockOrderApi::with_orders(orders(25)));
        let (c, _) = controller(api.clone());
        c.load().await;

        c.go_to_page(1).await;
        c.go_to_page(0).await;
        assert_eq!(api.fetch_calls().len(), 1);

        c.go_to_page(3).await;
        assert_eq!(api.fetch_calls().len(), 2);
        assert_eq!(c.store().len(), 5);
        assert_eq!(c.store().snapshot()[0].id, "o21");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let api = Rc::new(MockOrderApi::with_orders(orders(25)));
        api.set_fetch_delay(1, Duration::from_millis(300));
        let (c, _) = controller(api.clone());

        tokio::join!(c.load(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            c.go_to_page(2).await;
        });

        assert_eq!(api.fetch_calls().len(), 2);
        assert_eq!(c.state().page, 2);
        assert_eq!(c.state().fetch, FetchState::Loaded);
        assert_eq!(c.store().snapshot()[0].id, "o11");
    }

    #[tokio::test]
    async fn test_failure_clears_list_and_sets_error() {
        let api = Rc::new(MockOrderApi::with_orders(orders(12)));
        let (c, notifier) = controller(api.clone());
        c.load().await;
        assert_eq!(c.store().len(), 10);

        api.set_fetch_failure(Some(ApiError::Status {
            status: 500,
            message: Some("Datenbank nicht erreichbar".into()),
        }));
        c.refresh().await;

        let state = c.state();
        assert_eq!(state.error(), Some("Datenbank nicht erreichbar"));
        assert_eq!(state.total_items, 0);
        assert!(c.store().is_empty());
        // ошибка загрузки показывается баннером, не уведомлением
        assert!(notifier.take().is_empty());

        api.set_fetch_failure(Some(ApiError::Network("offline".into())));
        c.refresh().await;
        assert_eq!(c.state().error(), Some(FETCH_FAILED_FALLBACK));

        api.set_fetch_failure(None);
        c.refresh().await;
        assert_eq!(c.state().error(), None);
        assert_eq!(c.store().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_session_ignores_late_response() {
        let api = Rc::new(MockOrderApi::with_orders(orders(5)));
        api.set_fetch_delay(1, Duration::from_millis(300));
        let (c, _) = controller(api.clone());

        tokio::join!(c.load(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            c.close();
        });

        assert!(c.store().is_empty());
        assert_ne!(c.state().fetch, FetchState::Loaded);

        c.set_search("o1").await;
        assert_eq!(api.fetch_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_transition_through_shared_store() {
        let api = Rc::new(MockOrderApi::with_orders(orders(3)));
        let (c, notifier) = controller(api.clone());
        c.load().await;

        let outcome = c
            .coordinator()
            .request_transition("o2", OrderStatus::Storniert)
            .await;

        assert_eq!(outcome, TransitionOutcome::Applied);
        assert_eq!(c.store().get("o2").unwrap().status, "Storniert");
        assert_eq!(notifier.take().len(), 1);
    }

    #[tokio::test]
    async fn test_unsuccessful_response_is_a_failure() {
        let api = Rc::new(MockOrderApi::with_orders(orders(3)));
        let (c, _) = controller(api.clone());
        c.load().await;
        assert_eq!(c.store().len(), 3);

        api.set_fetch_response(Some(StoreOverviewResponse {
            success: false,
            data: Vec::new(),
            pagination: None,
            message: Some("Zugriff verweigert".into()),
        }));
        c.refresh().await;

        let state = c.state();
        assert_eq!(state.fetch, FetchState::Failed("Zugriff verweigert".into()));
        assert_eq!((state.total_items, state.total_pages), (0, 0));
        assert!(c.store().is_empty());

        api.set_fetch_response(Some(StoreOverviewResponse {
            success: false,
            data: orders(2),
            pagination: None,
            message: None,
        }));
        c.refresh().await;

        assert_eq!(c.state().error(), Some(FETCH_FAILED_FALLBACK));
        assert!(c.store().is_empty());
    }

    #[tokio::test]
    async fn test_missing_pagination_is_derived_from_rows() {
        let api = Rc::new(MockOrderApi::new());
        api.set_fetch_response(Some(StoreOverviewResponse {
            success: true,
            data: orders(3),
            pagination: None,
            message: None,
        }));
        let (c, _) = controller(api.clone());

        c.load().await;

        let state = c.state();
        assert_eq!(state.fetch, FetchState::Loaded);
        assert_eq!(state.page, 1);
        assert_eq!(state.total_items, 3);
        assert_eq!(state.total_pages, 1);
        assert_eq!(c.store().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_transition_keeps_status_from_newer_refresh() {
        let api = Rc::new(MockOrderApi::with_orders(orders(3)));
        let (c, notifier) = controller(api.clone());
        c.load().await;

        api.set_update_behavior(UpdateBehavior::Fail(ApiError::Network("offline".into())));
        api.set_update_delay(Duration::from_millis(300));

        let coordinator = c.coordinator();
        let (outcome, _) = tokio::join!(
            coordinator.request_transition("o1", OrderStatus::Versendet),
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                // на сервере заказ уже доставлен другим пользователем
                api.set_orders(vec![
                    order("o1", "Geliefert"),
                    order("o2", "In_bearbeitung"),
                    order("o3", "In_bearbeitung"),
                ]);
                c.refresh().await;
                assert_eq!(c.store().get("o1").unwrap().status, "Geliefert");
            }
        );

        assert!(matches!(outcome, TransitionOutcome::Failed(_)));
        assert_eq!(c.store().get("o1").unwrap().status, "Geliefert");
        let notes = notifier.take();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NoticeKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_transition_without_refresh_rolls_back() {
        let api = Rc::new(MockOrderApi::with_orders(orders(3)));
        let (c, _) = controller(api.clone());
        c.load().await;
        api.set_update_behavior(UpdateBehavior::Respond {
            success: false,
            message: None,
        });
        api.set_update_delay(Duration::from_millis(300));

        let outcome = c
            .coordinator()
            .request_transition("o1", OrderStatus::Versendet)
            .await;

        assert!(matches!(outcome, TransitionOutcome::Failed(_)));
        assert_eq!(c.store().get("o1").unwrap().status, "In_bearbeitung");
    }
}
