use contracts::domain::a001_store_order::{is_legal, OrderStatus};
use contracts::shared::api::UpdateOverviewStatusRequest;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use super::error::{WorkflowError, UPDATE_FAILED_FALLBACK};
use super::notify::{Notification, Notifier};
use super::session::SessionToken;
use super::store::OrderStore;
use crate::domain::a001_store_order::api::OrderApi;

/// Переход, который сейчас сохраняется на сервере
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InFlightTransition {
    pub order_id: String,
    pub target: OrderStatus,
}

/// Результат `request_transition`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Сервер подтвердил, новый статус остаётся
    Applied,
    /// Такой же переход уже в работе, ничего не сделано
    Skipped,
    /// Ошибка; если запрос уходил на сервер, статус откатан
    Failed(WorkflowError),
    /// Страница закрыта до ответа сервера, состояние не трогали
    Abandoned,
}

/// Снимает отметку in-flight при любом выходе, в том числе при drop future
struct InFlightGuard<'a> {
    set: &'a RefCell<HashSet<InFlightTransition>>,
    key: InFlightTransition,
    store: &'a OrderStore,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.key);
        self.store.mark_changed();
    }
}

/// Оптимистичная смена статуса заказа с откатом при ошибке
pub struct OptimisticUpdateCoordinator {
    store: Rc<OrderStore>,
    api: Rc<dyn OrderApi>,
    notifier: Rc<dyn Notifier>,
    session: SessionToken,
    in_flight: RefCell<HashSet<InFlightTransition>>,
}

impl OptimisticUpdateCoordinator {
    pub fn new(
        store: Rc<OrderStore>,
        api: Rc<dyn OrderApi>,
        notifier: Rc<dyn Notifier>,
        session: SessionToken,
    ) -> Self {
        Self {
            store,
            api,
            notifier,
            session,
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    /// Идёт ли сохранение перехода `order_id -> target` (блокирует кнопку)
    pub fn is_in_flight(&self, order_id: &str, target: OrderStatus) -> bool {
        self.in_flight.borrow().contains(&InFlightTransition {
            order_id: order_id.to_string(),
            target,
        })
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.borrow().len()
    }

    fn fail(&self, error: WorkflowError) -> TransitionOutcome {
        self.notifier.notify(Notification::error(error.to_string()));
        TransitionOutcome::Failed(error)
    }

    /// Перевести заказ в статус `target`.
    ///
    /// Статус меняется в хранилище сразу, до ответа сервера. При ошибке
    /// сервера возвращается прежний статус, если страницу за это время
    /// не перезагрузили. Ровно один сетевой запрос и одно
    /// уведомление на вызов (кроме `Skipped` и `Abandoned`).
    pub async fn request_transition(&self, order_id: &str, target: OrderStatus) -> TransitionOutcome {
        let key = InFlightTransition {
            order_id: order_id.to_string(),
            target,
        };
        if self.in_flight.borrow().contains(&key) {
            log::debug!("Transition {} -> {} already in flight", order_id, target);
            return TransitionOutcome::Skipped;
        }

        let previous = match self.store.get(order_id) {
            Some(order) => order.status,
            None => return self.fail(WorkflowError::OrderNotFound(order_id.to_string())),
        };

        if !is_legal(&previous, target) {
            return self.fail(WorkflowError::IllegalTransition {
                order_id: order_id.to_string(),
                from: previous,
                to: target.code().to_string(),
            });
        }

        self.in_flight.borrow_mut().insert(key.clone());
        let _guard = InFlightGuard {
            set: &self.in_flight,
            key,
            store: &self.store,
        };

        self.store.set_status(order_id, target.code());
        let generation = self.store.generation();

        let request = UpdateOverviewStatusRequest {
            ids: vec![order_id.to_string()],
            status: target.code().to_string(),
        };
        let result = self.api.update_status(&request).await;

        if !self.session.is_live() {
            log::debug!("Session closed, dropping status response for {}", order_id);
            return TransitionOutcome::Abandoned;
        }

        let failure = match result {
            Ok(response) if response.success => None,
            Ok(response) => Some(response.message),
            Err(e) => {
                log::warn!("Status update for {} failed: {}", order_id, e);
                Some(e.server_message().map(String::from))
            }
        };

        match failure {
            None => {
                self.notifier.notify(Notification::success(format!(
                    "Status auf \"{}\" geändert",
                    target.label()
                )));
                TransitionOutcome::Applied
            }
            Some(message) => {
                let reloaded = self.store.generation() != generation;
                if reloaded || !self.store.restore_status(order_id, target.code(), &previous) {
                    log::debug!("Order {} reloaded while saving, keeping server status", order_id);
                }
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UPDATE_FAILED_FALLBACK.to_string());
                self.fail(WorkflowError::RemoteUpdate(message))
            }
        }
    }
}
