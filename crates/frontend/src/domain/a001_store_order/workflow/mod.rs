//! Workflow статусов заказов: хранилище страницы, оптимистичная смена статуса
//! и контроллер списка (пагинация, поиск с debounce).
//!
//! Всё работает в одном потоке (браузерный event loop), общие данные живут
//! в `Rc` + `RefCell`/`Cell`. Заимствования не удерживаются через `.await`.

pub mod controller;
pub mod coordinator;
pub mod error;
pub mod notify;
pub mod session;
pub mod store;
pub mod timer;

#[cfg(test)]
mod testing;

pub use controller::{FetchState, ListState, OrderListController, SEARCH_DEBOUNCE};
pub use coordinator::{InFlightTransition, OptimisticUpdateCoordinator, TransitionOutcome};
pub use error::WorkflowError;
pub use notify::{NoticeKind, Notification, Notifier};
pub use session::SessionToken;
pub use store::OrderStore;
pub use timer::{GlooSleeper, Sleeper};
