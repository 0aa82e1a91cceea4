//! Заказы магазинов (store overview): DTO, карта статусов и политика переходов

pub mod aggregate;
pub mod status;
pub mod transition;

pub use aggregate::{PartnerRef, StoreOrder};
pub use status::{codes_of, display_of, OrderStatus, StatusCategory, StatusDisplay};
pub use transition::{is_legal, legal_actions, source_codes, StatusAction};
