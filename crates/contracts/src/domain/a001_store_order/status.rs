use serde::{Deserialize, Serialize};

/// Статус заказа в том виде, в котором он передаётся между frontend и backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "In_bearbeitung")]
    InBearbeitung,
    #[serde(rename = "Versendet")]
    Versendet,
    #[serde(rename = "Geliefert")]
    Geliefert,
    #[serde(rename = "Storniert")]
    Storniert,
}

impl OrderStatus {
    /// Код статуса на проводе (строго совпадает с backend)
    pub fn code(&self) -> &'static str {
        match self {
            OrderStatus::InBearbeitung => "In_bearbeitung",
            OrderStatus::Versendet => "Versendet",
            OrderStatus::Geliefert => "Geliefert",
            OrderStatus::Storniert => "Storniert",
        }
    }

    /// Подпись для UI
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::InBearbeitung => "In Bearbeitung",
            OrderStatus::Versendet => "Versendet",
            OrderStatus::Geliefert => "Geliefert",
            OrderStatus::Storniert => "Storniert",
        }
    }

    pub fn category(&self) -> StatusCategory {
        match self {
            OrderStatus::InBearbeitung => StatusCategory::InProgress,
            OrderStatus::Versendet => StatusCategory::Sent,
            OrderStatus::Geliefert => StatusCategory::Delivered,
            OrderStatus::Storniert => StatusCategory::Canceled,
        }
    }

    pub fn all() -> Vec<OrderStatus> {
        vec![
            OrderStatus::InBearbeitung,
            OrderStatus::Versendet,
            OrderStatus::Geliefert,
            OrderStatus::Storniert,
        ]
    }

    /// Парсинг из кода; неизвестный код -> None
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "In_bearbeitung" => Some(OrderStatus::InBearbeitung),
            "Versendet" => Some(OrderStatus::Versendet),
            "Geliefert" => Some(OrderStatus::Geliefert),
            "Storniert" => Some(OrderStatus::Storniert),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Категория статуса для UI. Не хранится, всегда выводится из кода.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    InProgress,
    Sent,
    Delivered,
    Canceled,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::InProgress => "in_progress",
            StatusCategory::Sent => "sent",
            StatusCategory::Delivered => "delivered",
            StatusCategory::Canceled => "canceled",
        }
    }

    pub fn all() -> Vec<StatusCategory> {
        vec![
            StatusCategory::InProgress,
            StatusCategory::Sent,
            StatusCategory::Delivered,
            StatusCategory::Canceled,
        ]
    }
}

/// Отображение статуса: подпись + категория
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: String,
    pub category: StatusCategory,
}

/// Перевести код статуса в подпись и категорию.
///
/// Функция тотальная: неизвестный код отображается как есть с категорией
/// `InProgress`. Такой случай пишется в лог как предупреждение, т.к. чаще всего
/// это опечатка на стороне backend.
pub fn display_of(code: &str) -> StatusDisplay {
    match OrderStatus::from_code(code) {
        Some(status) => StatusDisplay {
            label: status.label().to_string(),
            category: status.category(),
        },
        None => {
            log::warn!("Unknown order status code '{}', displayed as in_progress", code);
            StatusDisplay {
                label: code.to_string(),
                category: StatusCategory::InProgress,
            }
        }
    }
}

/// Все коды, относящиеся к категории (для валидации и тестов)
pub fn codes_of(category: StatusCategory) -> Vec<&'static str> {
    OrderStatus::all()
        .into_iter()
        .filter(|s| s.category() == category)
        .map(|s| s.code())
        .collect()
}
