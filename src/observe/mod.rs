//! Edge Observers - turn raw intersection entries into stuck/unstuck events.
//!
//! Each boundary runs one observer per edge:
//! - **Top** - threshold 0, see [`classify_top`]
//! - **Bottom** - threshold 1, see [`classify_bottom`]
//!
//! # Lifecycle
//!
//! An observer is a reactive effect over the registry's root signal and the
//! boundary's callback generation:
//!
//! ```text
//! root = None          → Unobserved (no subscription)
//! root = Some(r)       → Observing  (subscribed to sentinel against r)
//! entry classified     → Stuck / Unstuck
//! root or callbacks    → cancel, re-subscribe
//! stop()               → cancel, Unobserved
//! ```

mod bottom;
mod source;
mod top;

#[cfg(test)]
pub(crate) mod testing;

pub use bottom::classify_bottom;
pub use source::*;
pub use top::classify_top;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use spark_signals::{effect, untrack, Signal};

use crate::engine::SentinelRegistry;
use crate::primitives::{StickyCallbacks, StickyOptions};
use crate::types::{Edge, EdgeState, Rect, SentinelId, StickyEvent, StickyEventType, TargetId};

// =============================================================================
// Observation Record
// =============================================================================

/// Everything one classification looks at. Lives for one entry only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationRecord {
    pub target: TargetId,
    /// On-screen bounds of the sticky target, if the host could report them.
    pub target_rect: Option<Rect>,
    pub sentinel_rect: Rect,
    pub root_rect: Rect,
    pub ratio: f32,
}

/// Which classification rules matched one record.
///
/// The top rules are exclusive. The bottom rules are not, so a record can be
/// both stuck and unstuck at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeMatch {
    pub stuck: bool,
    pub unstuck: bool,
}

impl EdgeMatch {
    pub const NONE: Self = Self { stuck: false, unstuck: false };

    /// The event `on_change` reports. Unstuck is checked last, so it wins.
    pub fn event(self) -> Option<StickyEventType> {
        if self.unstuck {
            Some(StickyEventType::Unstuck)
        } else if self.stuck {
            Some(StickyEventType::Stuck)
        } else {
            None
        }
    }
}

impl From<Option<StickyEventType>> for EdgeMatch {
    fn from(kind: Option<StickyEventType>) -> Self {
        match kind {
            Some(StickyEventType::Stuck) => Self { stuck: true, unstuck: false },
            Some(StickyEventType::Unstuck) => Self { stuck: false, unstuck: true },
            None => Self::NONE,
        }
    }
}

/// Classify a record for the given edge.
pub fn classify(edge: Edge, record: &ObservationRecord, options: &StickyOptions) -> EdgeMatch {
    match edge {
        Edge::Top => classify_top(record).into(),
        Edge::Bottom => classify_bottom(record, options.pinned_offset),
    }
}

// =============================================================================
// Observer Context
// =============================================================================

/// Shared state every observer of a boundary reads.
#[derive(Clone)]
pub(crate) struct ObserverContext {
    pub registry: Rc<SentinelRegistry>,
    pub source: Rc<dyn IntersectionSource>,
    pub debug: Rc<Cell<bool>>,
    pub callbacks: Rc<RefCell<StickyCallbacks>>,
    pub generation: Signal<u64>,
    pub options: StickyOptions,
}

impl ObserverContext {
    /// Resolve an entry into a record. `None` drops the entry.
    fn record(&self, entry: &IntersectionEntry) -> Option<ObservationRecord> {
        let Some(target) = self.registry.lookup(entry.sentinel) else {
            tracing::trace!(sentinel = ?entry.sentinel, "entry for unregistered sentinel dropped");
            return None;
        };
        let root_rect = entry.root_bounds?;

        Some(ObservationRecord {
            target,
            target_rect: self.source.bounding_rect(target),
            sentinel_rect: entry.bounding_rect,
            root_rect,
            ratio: entry.intersection_ratio,
        })
    }

    /// Fire `on_stuck`, then `on_unstuck`, then one `on_change`.
    ///
    /// Stops as soon as `live` drops: a callback that unmounts the boundary
    /// or replaces its callbacks ends the dispatch.
    fn dispatch(&self, matched: EdgeMatch, target: TargetId, live: &Cell<bool>) {
        let Some(kind) = matched.event() else { return };

        // Clone out before calling so callbacks may replace the set.
        let (on_stuck, on_unstuck, on_change) = {
            let callbacks = self.callbacks.borrow();
            (
                callbacks.on_stuck.clone().filter(|_| matched.stuck),
                callbacks.on_unstuck.clone().filter(|_| matched.unstuck),
                callbacks.on_change.clone(),
            )
        };

        if let Some(on_stuck) = on_stuck {
            on_stuck(target);
        }
        if !live.get() {
            return;
        }
        if let Some(on_unstuck) = on_unstuck {
            on_unstuck(target);
        }
        if !live.get() {
            return;
        }
        if let Some(on_change) = on_change {
            on_change(&StickyEvent { kind, target });
        }
    }
}

// =============================================================================
// Edge Observer
// =============================================================================

/// Running observer for one sentinel.
pub(crate) struct EdgeObserver {
    edge: Edge,
    state: Rc<Cell<EdgeState>>,
    subscription: Rc<RefCell<Option<Subscription>>>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl EdgeObserver {
    /// Start observing `sentinel`. Subscribes immediately if a root is bound.
    pub fn start(edge: Edge, sentinel: SentinelId, context: ObserverContext) -> Self {
        let state = Rc::new(Cell::new(EdgeState::Unobserved));
        let subscription: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let root_signal = context.registry.root_signal();
        let generation = context.generation.clone();
        let state_for_effect = state.clone();
        let subscription_for_effect = subscription.clone();

        let stop = effect(move || {
            let root = root_signal.get();
            let _ = generation.get();

            let previous = subscription_for_effect.borrow_mut().take();
            if let Some(previous) = previous {
                tracing::trace!(?edge, ?sentinel, "re-subscribing");
                untrack(|| previous.cancel());
            }
            state_for_effect.set(EdgeState::Unobserved);

            // Not ready yet
            let Some(root) = root else { return };

            let live = Rc::new(Cell::new(true));
            let handler = entry_handler(edge, context.clone(), state_for_effect.clone(), live.clone());
            let options = ObserveOptions::threshold(edge.threshold());
            let inner = untrack(|| context.source.observe(sentinel, root, &options, handler));

            tracing::trace!(?edge, ?sentinel, root = ?root.id, "observing");
            state_for_effect.set(EdgeState::Observing);
            *subscription_for_effect.borrow_mut() = Some(Subscription::new(move || {
                live.set(false);
                inner.cancel();
            }));
        });

        Self {
            edge,
            state,
            subscription,
            stop_effect: Some(Box::new(stop)),
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn state(&self) -> EdgeState {
        self.state.get()
    }

    /// Stop reacting to root changes and cancel the subscription.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
        self.state.set(EdgeState::Unobserved);
    }
}

impl Drop for EdgeObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn entry_handler(
    edge: Edge,
    context: ObserverContext,
    state: Rc<Cell<EdgeState>>,
    live: Rc<Cell<bool>>,
) -> EntryCallback {
    Rc::new(move |entries: &[IntersectionEntry]| {
        for entry in entries {
            // A callback earlier in this batch may have torn us down.
            if !live.get() {
                return;
            }

            let Some(record) = context.record(entry) else { continue };
            let matched = classify(edge, &record, &context.options);
            let kind = matched.event();

            if context.debug.get() {
                tracing::debug!(
                    ?edge,
                    sentinel = ?entry.sentinel,
                    target = ?record.target,
                    sentinel_rect = ?record.sentinel_rect,
                    root_rect = ?record.root_rect,
                    target_rect = ?record.target_rect,
                    ratio = record.ratio,
                    is_intersecting = entry.is_intersecting,
                    classified = kind.map(StickyEventType::as_str),
                    "sentinel entry"
                );
            }

            let Some(kind) = kind else { continue };
            tracing::debug!(
                ?edge,
                target = ?record.target,
                kind = kind.as_str(),
                both = matched.stuck && matched.unstuck,
                "sticky transition"
            );

            state.set(kind.into());
            context.dispatch(matched, record.target, &live);
        }
    })
}
