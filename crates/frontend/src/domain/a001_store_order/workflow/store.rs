use contracts::domain::a001_store_order::StoreOrder;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type ChangeListener = Rc<dyn Fn(u64)>;

/// Заказы текущей страницы.
///
/// Контейнер наружу не отдаётся: точечные изменения только через
/// `set_status`, массовые только через `replace_all`. После каждого
/// изменения увеличивается `revision` и вызывается подписчик (UI).
#[derive(Default)]
pub struct OrderStore {
    orders: RefCell<Vec<StoreOrder>>,
    revision: Cell<u64>,
    generation: Cell<u64>,
    listener: RefCell<Option<ChangeListener>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<StoreOrder> {
        self.orders.borrow().iter().find(|o| o.id == id).cloned()
    }

    pub fn replace_all(&self, orders: Vec<StoreOrder>) {
        *self.orders.borrow_mut() = orders;
        self.generation.set(self.generation.get() + 1);
        self.mark_changed();
    }

    /// Меняет статус заказа. Возвращает прежний статус или `None`,
    /// если заказа на странице нет.
    pub fn set_status(&self, id: &str, status: &str) -> Option<String> {
        let previous = {
            let mut orders = self.orders.borrow_mut();
            let order = orders.iter_mut().find(|o| o.id == id)?;
            std::mem::replace(&mut order.status, status.to_string())
        };
        self.mark_changed();
        Some(previous)
    }

    /// Откат: возвращает `previous`, только если статус всё ещё `expected`.
    /// Если страницу успели перезагрузить с сервера, его данные не трогаем.
    pub fn restore_status(&self, id: &str, expected: &str, previous: &str) -> bool {
        let restored = {
            let mut orders = self.orders.borrow_mut();
            match orders.iter_mut().find(|o| o.id == id) {
                Some(order) if order.status == expected => {
                    order.status = previous.to_string();
                    true
                }
                _ => false,
            }
        };
        if restored {
            self.mark_changed();
        }
        restored
    }

    pub fn snapshot(&self) -> Vec<StoreOrder> {
        self.orders.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.orders.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.borrow().is_empty()
    }

    /// Число полных замен (`replace_all`): меняется только при загрузке с сервера
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Подписка на изменения (одна на хранилище, новая заменяет старую)
    pub fn subscribe(&self, listener: impl Fn(u64) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Увеличивает ревизию и будит подписчика. Вызывается и при изменениях
    /// вокруг хранилища (in-flight, состояние загрузки), чтобы UI перерисовался.
    pub(crate) fn mark_changed(&self) {
        let revision = self.revision.get() + 1;
        self.revision.set(revision);
        // клон, чтобы подписчик мог читать хранилище без конфликта заимствований
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(revision);
        }
    }
}
