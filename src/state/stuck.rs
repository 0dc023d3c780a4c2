//! Stuck Tracker - derived "currently stuck" state per target.
//!
//! Boundaries report edge transitions only. The tracker folds them into a
//! reactive set of stuck targets: the latest event for a target wins.
//!
//! # Example
//!
//! ```ignore
//! let tracker = StuckTracker::new();
//! let boundary = viewport.boundary(tracker.callbacks());
//!
//! let _e = effect(move || {
//!     let pinned = tracker.stuck_targets();
//!     // re-runs whenever a target sticks or unsticks
//! });
//! ```

use std::collections::BTreeSet;
use spark_signals::{signal, untrack, Signal};

use crate::primitives::StickyCallbacks;
use crate::types::{StickyEvent, StickyEventType, TargetId};

/// Writes replace the whole set, so no borrow is held while effects re-run.
#[derive(Clone)]
pub struct StuckTracker {
    stuck: Signal<BTreeSet<TargetId>>,
}

impl StuckTracker {
    pub fn new() -> Self {
        Self {
            stuck: signal(BTreeSet::new()),
        }
    }

    /// Fold one event into the set.
    pub fn record(&self, event: &StickyEvent) {
        let mut next = untrack(|| self.stuck.get());
        let changed = match event.kind {
            StickyEventType::Stuck => next.insert(event.target),
            StickyEventType::Unstuck => next.remove(&event.target),
        };
        if changed {
            self.stuck.set(next);
        }
    }

    /// Callbacks that feed this tracker.
    pub fn callbacks(&self) -> StickyCallbacks {
        let tracker = self.clone();
        StickyCallbacks::default().on_change(move |event| tracker.record(event))
    }

    /// Whether the latest event for `target` was stuck.
    pub fn is_stuck(&self, target: TargetId) -> bool {
        self.stuck.with(|stuck| stuck.contains(&target))
    }

    /// Stuck targets, sorted. Tracked when read inside an effect.
    pub fn stuck_targets(&self) -> Vec<TargetId> {
        self.stuck.with(|stuck| stuck.iter().copied().collect())
    }

    pub fn len(&self) -> usize {
        self.stuck.with(BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.stuck.with(BTreeSet::is_empty)
    }

    pub fn clear(&self) {
        self.stuck.set(BTreeSet::new());
    }
}

impl Default for StuckTracker {
    fn default() -> Self {
        Self::new()
    }
}
