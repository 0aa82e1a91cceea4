use super::status::{display_of, OrderStatus, StatusCategory};

/// Действие над заказом, доступное из текущей категории статуса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    pub target: OrderStatus,
    pub label: &'static str,
    /// Необратимое для пользователя действие (кнопка в опасном стиле)
    pub destructive: bool,
}

const IN_PROGRESS_ACTIONS: [StatusAction; 2] = [
    StatusAction {
        target: OrderStatus::Versendet,
        label: "Bestätigen",
        destructive: false,
    },
    StatusAction {
        target: OrderStatus::Storniert,
        label: "Stornieren",
        destructive: true,
    },
];

const SENT_ACTIONS: [StatusAction; 2] = [
    StatusAction {
        target: OrderStatus::Geliefert,
        label: "Als geliefert markieren",
        destructive: false,
    },
    StatusAction {
        target: OrderStatus::InBearbeitung,
        label: "Zurück",
        destructive: false,
    },
];

const CANCELED_ACTIONS: [StatusAction; 1] = [StatusAction {
    target: OrderStatus::InBearbeitung,
    label: "Zurück",
    destructive: false,
}];

/// Допустимые действия для категории, в порядке отображения.
/// `Delivered` терминальная категория: список пуст.
pub fn legal_actions(category: StatusCategory) -> &'static [StatusAction] {
    match category {
        StatusCategory::InProgress => &IN_PROGRESS_ACTIONS,
        StatusCategory::Sent => &SENT_ACTIONS,
        StatusCategory::Canceled => &CANCELED_ACTIONS,
        StatusCategory::Delivered => &[],
    }
}

/// Можно ли перевести заказ с кодом `current_code` в `target`
pub fn is_legal(current_code: &str, target: OrderStatus) -> bool {
    legal_actions(display_of(current_code).category)
        .iter()
        .any(|action| action.target == target)
}

/// Известные коды статусов, из которых разрешён переход в `target`
pub fn source_codes(target: OrderStatus) -> Vec<&'static str> {
    OrderStatus::all()
        .into_iter()
        .map(|s| s.code())
        .filter(|code| is_legal(code, target))
        .collect()
}
