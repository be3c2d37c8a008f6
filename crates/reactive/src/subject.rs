//! Hot multicast sources.
//!
//! A `Subject` is both an input and a stream: callers push values with
//! `next` and every current subscriber receives them. A replaying subject
//! also hands its latest value to each new subscriber.

use crate::observable::Observable;
use crate::subscription::{Callback, Subscription, SubscriptionManager};
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

struct SubjectState<T> {
    subscribers: RefCell<SubscriptionManager<T>>,
    latest: RefCell<Option<T>>,
    replay: bool,
}

/// A hot source that multicasts every value to its current subscribers.
pub struct Subject<T> {
    state: Rc<SubjectState<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    fn with_replay(replay: bool, latest: Option<T>) -> Self {
        Self {
            state: Rc::new(SubjectState {
                subscribers: RefCell::new(SubscriptionManager::new()),
                latest: RefCell::new(latest),
                replay,
            }),
        }
    }

    /// Creates a subject that only delivers values pushed after subscribing.
    pub fn new() -> Self {
        Self::with_replay(false, None)
    }

    /// Creates a subject that replays its latest value to new subscribers.
    pub fn replaying() -> Self {
        Self::with_replay(true, None)
    }

    /// Creates a replaying subject that starts out holding `value`.
    pub fn with_value(value: T) -> Self {
        Self::with_replay(true, Some(value))
    }

    /// Pushes `value` to every current subscriber.
    ///
    /// Subscribers are called in subscription order. A subscriber removed
    /// while the value is being delivered does not receive it.
    pub fn next(&self, value: T) {
        if self.state.replay {
            *self.state.latest.borrow_mut() = Some(value.clone());
        }
        let observers = self.state.subscribers.borrow().snapshot();
        for (id, observer) in observers {
            if self.state.subscribers.borrow().contains(id) {
                observer(value.clone());
            }
        }
    }

    /// Returns the value a new subscriber would be replayed.
    pub fn latest(&self) -> Option<T> {
        self.state.latest.borrow().clone()
    }

    /// Returns the number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.state.subscribers.borrow().len()
    }

    /// Subscribes `observer` to this subject.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(T) + 'static,
    {
        self.subscribe_callback(Rc::new(observer))
    }

    /// Subscribes an already shared callback.
    pub fn subscribe_callback(&self, observer: Callback<T>) -> Subscription {
        let id = self
            .state
            .subscribers
            .borrow_mut()
            .subscribe(Rc::clone(&observer));

        let replayed = self.state.latest.borrow().clone();
        if let Some(value) = replayed {
            observer(value);
        }

        let state: Weak<SubjectState<T>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.subscribers.borrow_mut().unsubscribe(id);
            }
        })
    }

    /// Returns this subject as a stream.
    pub fn as_observable(&self) -> Observable<T> {
        let subject = self.clone();
        Observable::new(move |observer| subject.subscribe_callback(observer))
    }
}
