use std::cell::Cell;
use std::rc::Rc;

/// Признак "страница ещё смонтирована". Закрывается при unmount,
/// после этого ответы сервера не применяются к состоянию.
#[derive(Debug, Clone)]
pub struct SessionToken(Rc<Cell<bool>>);

impl SessionToken {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.get()
    }

    pub fn close(&self) {
        self.0.set(false);
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_is_shared_between_clones() {
        let token = SessionToken::new();
        let clone = token.clone();
        assert!(clone.is_live());
        token.close();
        assert!(!clone.is_live());
    }
}
