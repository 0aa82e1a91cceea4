use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{display_of, StatusDisplay};

/// Партнёр (магазин), оформивший заказ. Только для отображения.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Заказ магазина в обзоре (store overview)
///
/// Меняется на клиенте только `status`, остальные поля лишь отображаются.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOrder {
    pub id: String,
    /// Код статуса. Строка, а не `OrderStatus`: backend может прислать
    /// неизвестный код, он должен отобразиться, а не сломать разбор ответа.
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub partner: Option<PartnerRef>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub quantity: i32,
}

impl StoreOrder {
    pub fn status_display(&self) -> StatusDisplay {
        display_of(&self.status)
    }

    pub fn partner_name(&self) -> &str {
        self.partner.as_ref().map(|p| p.name.as_str()).unwrap_or("-")
    }
}
