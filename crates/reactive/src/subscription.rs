//! Subscription management for push streams.
//!
//! This module provides the registry a hot source keeps of its observers,
//! and the `Subscription` guard handed back to whoever subscribed.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback invoked for every value pushed to an observer.
pub type Callback<T> = Rc<dyn Fn(T)>;

/// Keeps the observers of one source.
pub struct SubscriptionManager<T> {
    /// Registered observers
    subscriptions: HashMap<SubscriptionId, Callback<T>>,
    /// Next subscription ID to assign
    next_id: SubscriptionId,
}

impl<T> Default for SubscriptionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubscriptionManager<T> {
    /// Creates a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers `callback` and returns its subscription ID.
    pub fn subscribe(&mut self, callback: Callback<T>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.insert(id, callback);
        id
    }

    /// Unsubscribes by ID.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Returns true if `id` is still subscribed.
    #[inline]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscriptions.contains_key(&id)
    }

    /// Returns the current observers in subscription order.
    ///
    /// Delivery iterates over this copy so observers may subscribe or
    /// unsubscribe while a value is being delivered.
    pub fn snapshot(&self) -> Vec<(SubscriptionId, Callback<T>)> {
        let mut observers: Vec<_> = self
            .subscriptions
            .iter()
            .map(|(id, callback)| (*id, Rc::clone(callback)))
            .collect();
        observers.sort_unstable_by_key(|(id, _)| *id);
        observers
    }

    /// Returns the number of active subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if there are no subscriptions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Clears all subscriptions.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

/// Handle to an active subscription.
///
/// Dropping the handle unsubscribes synchronously: once `drop` returns, the
/// observer will not be called again.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a subscription that runs `teardown` when it ends.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Creates a subscription with nothing to tear down.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Combines two subscriptions into one that ends both.
    pub fn and(self, other: Subscription) -> Subscription {
        Subscription::new(move || {
            drop(self);
            drop(other);
        })
    }

    /// Ends the subscription now.
    pub fn unsubscribe(mut self) {
        self.end();
    }

    /// Returns true if there is nothing left to tear down.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.teardown.is_none()
    }

    fn end(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.end();
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}
