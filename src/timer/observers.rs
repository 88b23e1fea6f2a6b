//! Ordered observer lists for timer events.

use std::cell::{Cell, RefCell};

pub(crate) type Observer = Box<dyn FnMut()>;

/// Append-only list of callbacks, delivered in subscription order.
///
/// Delivery takes the callbacks out of the list for the duration of the
/// fan-out, so an observer may subscribe more observers or trigger other
/// events on the same timer without a borrow conflict. A nested `notify` on a
/// list that is already delivering is a no-op: it reaches neither the
/// observers being delivered nor those subscribed during the fan-out, which
/// first hear the next event.
#[derive(Default)]
pub(crate) struct ObserverList {
    observers: RefCell<Vec<Observer>>,
    delivering: Cell<bool>,
}

impl ObserverList {
    pub(crate) fn subscribe(&self, observer: Observer) {
        self.observers.borrow_mut().push(observer);
    }

    pub(crate) fn notify(&self) {
        if self.delivering.replace(true) {
            tracing::trace!("nested timer event dropped");
            return;
        }

        let mut batch = std::mem::take(&mut *self.observers.borrow_mut());
        for observer in batch.iter_mut() {
            observer();
        }

        let mut slot = self.observers.borrow_mut();
        let subscribed_meanwhile = std::mem::replace(&mut *slot, batch);
        slot.extend(subscribed_meanwhile);
        self.delivering.set(false);
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.borrow().len()
    }
}
