/// Ошибки workflow статусов. Наружу не пробрасываются: превращаются
/// в откат состояния и одно уведомление для пользователя.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Bestellung {0} wurde nicht gefunden")]
    OrderNotFound(String),
    #[error("Statuswechsel von {from} nach {to} ist nicht erlaubt")]
    IllegalTransition {
        order_id: String,
        from: String,
        to: String,
    },
    #[error("{0}")]
    RemoteUpdate(String),
    #[error("{0}")]
    RemoteFetch(String),
}

/// Общий текст, если сервер не прислал сообщение
pub const UPDATE_FAILED_FALLBACK: &str = "Status konnte nicht aktualisiert werden";
pub const FETCH_FAILED_FALLBACK: &str = "Bestellungen konnten nicht geladen werden";
