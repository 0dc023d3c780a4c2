//! Sentinel Registry - sentinel → sticky target lookup plus the scroll root.
//!
//! Manages:
//! - Sentinel and target id allocation
//! - Sentinel → target mapping (written at attach time, read per observation)
//! - The scroll-root binding, held in a `Signal` so observer effects
//!   re-subscribe when it changes

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use spark_signals::{signal, untrack, Signal};

use crate::types::{ScrollRoot, SentinelId, StickySection, TargetId};

/// Outcome of [`SentinelRegistry::set_root`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootBinding {
    /// No root was bound; the incoming root is now bound.
    Bound,
    /// The incoming root is the one already bound. Nothing changed.
    Unchanged,
    /// A different root is already bound. Nothing changed.
    Rejected,
}

pub struct SentinelRegistry {
    /// Map sentinel to the target it brackets.
    targets: RefCell<HashMap<SentinelId, TargetId>>,

    /// Current scroll root. Observers read this inside their effects.
    root: Signal<Option<ScrollRoot>>,

    next_sentinel: Cell<u32>,
    next_target: Cell<u32>,
}

impl SentinelRegistry {
    pub fn new() -> Self {
        Self {
            targets: RefCell::new(HashMap::new()),
            root: signal(None),
            next_sentinel: Cell::new(0),
            next_target: Cell::new(0),
        }
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocate a fresh top/bottom sentinel pair.
    pub fn allocate_section(&self) -> StickySection {
        let top = self.next_sentinel.get();
        self.next_sentinel.set(top + 2);
        StickySection {
            top: SentinelId(top),
            bottom: SentinelId(top + 1),
        }
    }

    /// Allocate a fresh sticky target identity.
    pub fn allocate_target(&self) -> TargetId {
        let id = self.next_target.get();
        self.next_target.set(id + 1);
        TargetId(id)
    }

    // =========================================================================
    // Sentinel → Target
    // =========================================================================

    /// Bind both sentinels to `target`. Last write wins per sentinel.
    pub fn register(&self, top: SentinelId, bottom: SentinelId, target: TargetId) {
        let mut targets = self.targets.borrow_mut();
        targets.insert(top, target);
        targets.insert(bottom, target);
        tracing::trace!(?top, ?bottom, ?target, "registered sticky target");
    }

    /// Target bracketed by `sentinel`, if one was registered.
    pub fn lookup(&self, sentinel: SentinelId) -> Option<TargetId> {
        self.targets.borrow().get(&sentinel).copied()
    }

    /// Number of sentinel entries.
    pub fn len(&self) -> usize {
        self.targets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.borrow().is_empty()
    }

    // =========================================================================
    // Scroll Root
    // =========================================================================

    /// Bind the scroll root.
    ///
    /// Binding happens once. Passing the already-bound root is a no-op, so
    /// callers may call this on every render without retriggering observers.
    pub fn set_root(&self, root: ScrollRoot) -> RootBinding {
        match untrack(|| self.root.get()) {
            None => {
                self.root.set(Some(root));
                tracing::debug!(root = ?root.id, "scroll root bound");
                RootBinding::Bound
            }
            Some(current) if current == root => RootBinding::Unchanged,
            Some(current) => {
                tracing::warn!(
                    bound = ?current.id,
                    incoming = ?root.id,
                    "ignoring scroll root re-bind"
                );
                RootBinding::Rejected
            }
        }
    }

    /// Current scroll root. Tracked when read inside an effect.
    pub fn root(&self) -> Option<ScrollRoot> {
        self.root.get()
    }

    /// Handle to the root signal, for effects that outlive a borrow of `self`.
    pub fn root_signal(&self) -> Signal<Option<ScrollRoot>> {
        self.root.clone()
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Drop every entry and unbind the root.
    pub fn clear(&self) {
        self.targets.borrow_mut().clear();
        if self.root.get().is_some() {
            self.root.set(None);
        }
    }
}

impl Default for SentinelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
