//! Cold push streams.
//!
//! An `Observable` describes how to produce values for one observer. Nothing
//! runs until `subscribe` is called, and every subscription runs the producer
//! again with its own stage state. Operators such as `map` and `scan` build
//! new observables on top of an existing one.
//!
//! Stage state lives in a `RefCell` owned by the subscription. Stages release
//! their borrow before pushing a value downstream, so an observer may push
//! into the same chain again while it is handling a value.

use crate::subject::Subject;
use crate::subscription::{Callback, Subscription};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

type Producer<T> = dyn Fn(Callback<T>) -> Subscription;

/// A cold, push-based stream of `T`.
pub struct Observable<T> {
    producer: Rc<Producer<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T: 'static> Observable<T> {
    /// Creates an observable from a producer.
    ///
    /// The producer receives the observer callback and returns the
    /// subscription that stops it.
    pub fn new<P>(producer: P) -> Self
    where
        P: Fn(Callback<T>) -> Subscription + 'static,
    {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// An observable that never emits.
    pub fn empty() -> Self {
        Self::new(|_| Subscription::empty())
    }

    /// An observable that emits `values` synchronously on subscribe.
    pub fn of(values: Vec<T>) -> Self
    where
        T: Clone,
    {
        let values = Rc::new(values);
        Self::new(move |observer| {
            for value in values.iter() {
                observer(value.clone());
            }
            Subscription::empty()
        })
    }

    /// Subscribes `observer` to this stream.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(T) + 'static,
    {
        self.subscribe_callback(Rc::new(observer))
    }

    /// Subscribes an already shared callback.
    pub fn subscribe_callback(&self, observer: Callback<T>) -> Subscription {
        (self.producer)(observer)
    }

    /// Transforms every value with `f`.
    pub fn map<U, F>(&self, f: F) -> Observable<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Observable::new(move |observer: Callback<U>| {
            let f = Rc::clone(&f);
            source.subscribe(move |value| observer(f(value)))
        })
    }

    /// Keeps only the values for which `predicate` returns true.
    pub fn filter<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Observable::new(move |observer: Callback<T>| {
            let predicate = Rc::clone(&predicate);
            source.subscribe(move |value| {
                if predicate(&value) {
                    observer(value);
                }
            })
        })
    }

    /// Calls `f` with every value before passing it on.
    pub fn tap<F>(&self, f: F) -> Observable<T>
    where
        F: Fn(&T) + 'static,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Observable::new(move |observer: Callback<T>| {
            let f = Rc::clone(&f);
            source.subscribe(move |value| {
                f(&value);
                observer(value);
            })
        })
    }

    /// Accumulates values into a state and emits the state after each one.
    ///
    /// Every subscription starts from its own copy of `seed`.
    pub fn scan<S, F>(&self, seed: S, f: F) -> Observable<S>
    where
        S: Clone + 'static,
        F: Fn(S, T) -> S + 'static,
    {
        let source = self.clone();
        let f = Rc::new(f);
        Observable::new(move |observer: Callback<S>| {
            let state = Rc::new(RefCell::new(Some(seed.clone())));
            let f = Rc::clone(&f);
            source.subscribe(move |value| {
                let next = {
                    let mut state = state.borrow_mut();
                    let Some(acc) = state.take() else {
                        return;
                    };
                    let next = f(acc, value);
                    *state = Some(next.clone());
                    next
                };
                observer(next);
            })
        })
    }

    /// Emits `value` to every new subscriber before the source's values.
    pub fn start_with(&self, value: T) -> Observable<T>
    where
        T: Clone,
    {
        let source = self.clone();
        Observable::new(move |observer: Callback<T>| {
            observer(value.clone());
            source.subscribe_callback(observer)
        })
    }

    /// Shares one subscription to the source among all subscribers and
    /// replays the latest value to late subscribers.
    ///
    /// The source is subscribed when the first subscriber arrives and stays
    /// connected until every clone of the returned observable is dropped.
    pub fn share_replay(&self) -> Observable<T>
    where
        T: Clone,
    {
        let source = self.clone();
        let subject = Subject::replaying();
        let connection: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let connecting = Rc::new(Cell::new(false));
        Observable::new(move |observer: Callback<T>| {
            let subscription = subject.subscribe_callback(observer);
            if !connecting.replace(true) {
                log::debug!("connecting shared stream");
                let sink = subject.clone();
                let upstream = source.subscribe(move |value| sink.next(value));
                *connection.borrow_mut() = Some(upstream);
            }
            subscription
        })
    }
}

/// Combines the latest values of two streams.
///
/// Emits once both streams have produced a value, then again whenever
/// either of them does.
pub fn combine_latest<A, B>(a: &Observable<A>, b: &Observable<B>) -> Observable<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let (a, b) = (a.clone(), b.clone());
    Observable::new(move |observer: Callback<(A, B)>| {
        let latest: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));

        let (state, out) = (Rc::clone(&latest), Rc::clone(&observer));
        let left = a.subscribe(move |value: A| {
            let pair = {
                let mut state = state.borrow_mut();
                state.0 = Some(value.clone());
                state.1.clone().map(|other| (value, other))
            };
            if let Some(pair) = pair {
                out(pair);
            }
        });

        let (state, out) = (Rc::clone(&latest), observer);
        let right = b.subscribe(move |value: B| {
            let pair = {
                let mut state = state.borrow_mut();
                state.1 = Some(value.clone());
                state.0.clone().map(|other| (other, value))
            };
            if let Some(pair) = pair {
                out(pair);
            }
        });

        left.and(right)
    })
}
