//! Stream operators over dataset diffs.
//!
//! Each operator wraps one of the state machines from
//! `mailgraph_incremental` and gives every subscription its own instance.

use crate::observable::Observable;
use crate::subscription::{Callback, Subscription};
use alloc::rc::Rc;
use core::cell::RefCell;
use core::hash::Hash;
use mailgraph_incremental::{
    ConstArray, Dataset, DatasetDiff, Diff, DiffFold, DiffStream, DiffSwitch, DynamicSlice,
    GroupDiffBy, Window,
};

/// Emits the diff of a moving window over `source`.
///
/// The first window is diffed against the empty view, so the first
/// emission inserts everything in it.
pub fn dynamic_slice<A, K, V, W>(source: A, windows: &Observable<W>) -> Observable<DatasetDiff<K, V>>
where
    A: ConstArray<Item = (K, V)> + Clone + 'static,
    K: 'static,
    V: 'static,
    W: Into<Window> + 'static,
{
    let windows = windows.clone();
    Observable::new(move |observer: Callback<DatasetDiff<K, V>>| {
        let slice = RefCell::new(DynamicSlice::new(source.clone()));
        windows.subscribe(move |window: W| {
            let diff = slice.borrow_mut().update(window);
            observer(diff);
        })
    })
}

struct SwitchState<S, F> {
    switch: DiffSwitch<S, F>,
    inner: Option<Subscription>,
    primed: bool,
}

/// Merges a stream of inner streams into one diff stream.
///
/// Only the latest inner stream contributes. Each inner value `X` carries a
/// full snapshot (`snapshot`) and the inner stream's own diff
/// (`inner_diff`). The emitted diff is `differ(baseline, snapshot)`, where
/// `baseline` starts as `initial()` and becomes every snapshot after it is
/// emitted. On a switch the first snapshot of the new inner stream is thus
/// diffed against whatever the previous inner stream left behind.
///
/// Once an inner stream has emitted, later values whose own diff is empty
/// are passed on with an empty merged diff without running `differ`.
///
/// The previous inner stream is unsubscribed before the next one is
/// subscribed, and values it still emits are ignored.
pub fn diff_switch_all<X, S, D, I, F, FS, FD, DI>(
    outer: &Observable<Observable<X>>,
    initial: I,
    differ: F,
    snapshot: FS,
    inner_diff: FD,
) -> Observable<(X, D)>
where
    X: 'static,
    S: Clone + 'static,
    D: Default + 'static,
    DI: Diff,
    I: Fn() -> S + 'static,
    F: Fn(&S, &S) -> D + Clone + 'static,
    FS: Fn(&X) -> &S + 'static,
    FD: Fn(&X) -> &DI + 'static,
{
    let outer = outer.clone();
    let snapshot = Rc::new(snapshot);
    let inner_diff = Rc::new(inner_diff);
    Observable::new(move |observer: Callback<(X, D)>| {
        let state = Rc::new(RefCell::new(SwitchState {
            switch: DiffSwitch::new(initial(), differ.clone()),
            inner: None,
            primed: false,
        }));

        let (outer_state, snapshot, inner_diff) =
            (Rc::clone(&state), Rc::clone(&snapshot), Rc::clone(&inner_diff));
        let outer_subscription = outer.subscribe(move |inner: Observable<X>| {
            let (generation, retired) = {
                let mut st = outer_state.borrow_mut();
                st.primed = false;
                (st.switch.switch(), st.inner.take())
            };
            drop(retired);

            let (inner_state, observer) = (Rc::clone(&outer_state), Rc::clone(&observer));
            let (snapshot, inner_diff) = (Rc::clone(&snapshot), Rc::clone(&inner_diff));
            let subscription = inner.subscribe(move |value: X| {
                let merged = {
                    let mut st = inner_state.borrow_mut();
                    if st.switch.generation() != generation {
                        log::trace!("ignoring value from retired inner stream {}", generation);
                        return;
                    }
                    if st.primed && inner_diff(&value).is_empty() {
                        D::default()
                    } else {
                        let Some(merged) = st.switch.on_inner(generation, snapshot(&value)) else {
                            return;
                        };
                        st.primed = true;
                        merged
                    }
                };
                observer((value, merged));
            });

            let mut st = outer_state.borrow_mut();
            if st.switch.generation() == generation {
                st.inner = Some(subscription);
            } else {
                // A newer inner stream took over while this one was subscribing.
                drop(st);
                drop(subscription);
            }
        });

        Subscription::new(move || {
            drop(outer_subscription);
            let retired = state.borrow_mut().inner.take();
            drop(retired);
        })
    })
}

/// Re-keys the item diff carried by each value into a group diff.
///
/// `item_diff` extracts the item diff from a value, `selector` names each
/// item's group and `finalize` combines the value with the group diff.
pub fn group_diff_by<A, B, K, V, G, FD, FG, FF>(
    source: &Observable<A>,
    item_diff: FD,
    selector: FG,
    finalize: FF,
) -> Observable<B>
where
    A: 'static,
    B: 'static,
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    G: Eq + Hash + Clone + 'static,
    FD: Fn(&A) -> &DatasetDiff<K, V> + 'static,
    FG: Fn(&V) -> G + 'static,
    FF: Fn(A, DatasetDiff<G, DatasetDiff<K, V>>) -> B + 'static,
{
    let source = source.clone();
    let item_diff = Rc::new(item_diff);
    let selector = Rc::new(selector);
    let finalize = Rc::new(finalize);
    Observable::new(move |observer: Callback<B>| {
        let select = Rc::clone(&selector);
        let grouping = RefCell::new(GroupDiffBy::new::<V>(move |item: &V| select(item)));
        let (item_diff, finalize) = (Rc::clone(&item_diff), Rc::clone(&finalize));
        source.subscribe(move |value: A| {
            let grouped = grouping.borrow_mut().apply(item_diff(&value));
            observer(finalize(value, grouped));
        })
    })
}

/// Folds each diff into a running snapshot, passing the second element
/// through.
pub fn fold_diff_first<K, V, X>(
    source: &Observable<(DatasetDiff<K, V>, X)>,
) -> Observable<(Dataset<K, V>, X)>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    X: 'static,
{
    let source = source.clone();
    Observable::new(move |observer: Callback<(Dataset<K, V>, X)>| {
        let fold = RefCell::new(DiffFold::new());
        source.subscribe(move |(diff, rest): (DatasetDiff<K, V>, X)| {
            let snapshot = fold.borrow_mut().fold(&diff).clone();
            observer((snapshot, rest));
        })
    })
}

/// Folds each diff into a running snapshot and emits the snapshot together
/// with the diff that produced it.
pub fn fold_diff<K, V>(
    source: &Observable<DatasetDiff<K, V>>,
) -> Observable<(Dataset<K, V>, DatasetDiff<K, V>)>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    fold_diff_first(&source.map(|diff: DatasetDiff<K, V>| (diff.clone(), diff)))
}

/// Emits `differ(previous, current)` for every value, starting from `seed`.
pub fn diff_stream<S, D, F>(source: &Observable<S>, seed: S, differ: F) -> Observable<D>
where
    S: Clone + 'static,
    D: 'static,
    F: Fn(&S, &S) -> D + Clone + 'static,
{
    let source = source.clone();
    Observable::new(move |observer: Callback<D>| {
        let stream = RefCell::new(DiffStream::new(seed.clone(), differ.clone()));
        source.subscribe(move |value: S| {
            let diff = stream.borrow_mut().next(value);
            observer(diff);
        })
    })
}

/// Replaces the first element of each pair with its diff against the
/// previous first element, starting from `seed`.
pub fn diff_map_first<A, X, D, F>(
    source: &Observable<(A, X)>,
    seed: A,
    differ: F,
) -> Observable<(D, X)>
where
    A: Clone + 'static,
    X: 'static,
    D: 'static,
    F: Fn(&A, &A) -> D + Clone + 'static,
{
    let source = source.clone();
    Observable::new(move |observer: Callback<(D, X)>| {
        let stream = RefCell::new(DiffStream::new(seed.clone(), differ.clone()));
        source.subscribe(move |(first, rest): (A, X)| {
            let diff = stream.borrow_mut().next(first);
            observer((diff, rest));
        })
    })
}
