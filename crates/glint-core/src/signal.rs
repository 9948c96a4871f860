//! A small single-threaded observable cell.
//!
//! `Signal` is the observability primitive behind surface focus stores,
//! the per-surface highlight feature flag, and element activation. It
//! notifies only on actual value changes and tolerates subscribers that
//! unsubscribe themselves (or others) while a notification is in flight,
//! which is what one-shot "lock cleared" listeners rely on.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Token returned by [`Signal::subscribe`]; pass it back to
/// [`Signal::unsubscribe`]. Unsubscribing twice is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback<T> = Rc<dyn Fn(&T, &T)>;

/// Observable value with change-only notification.
///
/// Subscribers receive `(&old, &new)`. Notification iterates a snapshot of
/// the subscriber list, so a callback removed mid-notify still sees the
/// change in flight but never a later one.
pub struct Signal<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(Subscription, Callback<T>)>>,
    next_id: Cell<u64>,
}

impl<T: Clone + PartialEq> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Sets the value, notifying subscribers only if it actually changed.
    pub fn set(&self, value: T) {
        {
            let current = self.value.borrow();
            if *current == value {
                return;
            }
        }
        let old = self.value.replace(value.clone());

        // Snapshot so callbacks may subscribe/unsubscribe reentrantly.
        let snapshot: Vec<Callback<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(&old, &value);
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T, &T) + 'static) -> Subscription {
        let id = Subscription(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.subscribers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription);
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T: Clone + PartialEq + Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_notifies_with_old_and_new() {
        let signal = Signal::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        signal.subscribe(move |old, new| {
            seen_clone.borrow_mut().push((*old, *new));
        });

        signal.set(2);
        signal.set(3);

        assert_eq!(*seen.borrow(), vec![(1, 2), (2, 3)]);
        assert_eq!(signal.get(), 3);
    }

    #[test]
    fn set_same_value_does_not_notify() {
        let signal = Signal::new(5);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        signal.subscribe(move |_, _| {
            count_clone.set(count_clone.get() + 1);
        });

        signal.set(5);
        assert_eq!(count.get(), 0);

        signal.set(6);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let signal = Signal::new(0);
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let subscription = signal.subscribe(move |_, _| {
            count_clone.set(count_clone.get() + 1);
        });

        signal.set(1);
        signal.unsubscribe(subscription);
        signal.set(2);

        assert_eq!(count.get(), 1);
        // Double unsubscribe is a no-op.
        signal.unsubscribe(subscription);
    }

    #[test]
    fn one_shot_subscriber_can_remove_itself_mid_notify() {
        let signal = Rc::new(Signal::new(0));
        let fired = Rc::new(Cell::new(0));

        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let signal_clone = signal.clone();
        let fired_clone = fired.clone();
        let slot_clone = slot.clone();
        let subscription = signal.subscribe(move |_, _| {
            fired_clone.set(fired_clone.get() + 1);
            if let Some(subscription) = slot_clone.borrow_mut().take() {
                signal_clone.unsubscribe(subscription);
            }
        });
        *slot.borrow_mut() = Some(subscription);

        signal.set(1);
        signal.set(2);

        assert_eq!(fired.get(), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_removing_another_does_not_skip_in_flight() {
        let signal = Rc::new(Signal::new(0));
        let log = Rc::new(RefCell::new(Vec::new()));

        let second_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let signal_clone = signal.clone();
        let log_clone = log.clone();
        let second_clone = second_slot.clone();
        signal.subscribe(move |_, _| {
            log_clone.borrow_mut().push("first");
            if let Some(subscription) = second_clone.borrow_mut().take() {
                signal_clone.unsubscribe(subscription);
            }
        });
        let log_clone = log.clone();
        let second = signal.subscribe(move |_, _| {
            log_clone.borrow_mut().push("second");
        });
        *second_slot.borrow_mut() = Some(second);

        // The second subscriber is removed by the first during this notify,
        // but it was present at call time so it still fires once.
        signal.set(1);
        signal.set(2);

        assert_eq!(*log.borrow(), vec!["first", "second", "first"]);
    }
}
