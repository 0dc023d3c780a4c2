//! Primitive Types - callback and option types for sticky boundaries.

use std::rc::Rc;

use crate::types::{Edges, StickyEvent, TargetId};

// =============================================================================
// Callback Types
// =============================================================================

/// Called with the target that became stuck or unstuck.
pub type TargetCallback = Rc<dyn Fn(TargetId)>;

/// Called with the normalized event, whichever edge produced it.
pub type ChangeCallback = Rc<dyn Fn(&StickyEvent)>;

/// Callbacks fired by a boundary's observers. Unset callbacks are no-ops.
///
/// ```ignore
/// let callbacks = StickyCallbacks::default()
///     .on_stuck(|target| println!("{target:?} pinned"))
///     .on_change(|event| println!("{}", event.kind.as_str()));
/// ```
#[derive(Clone, Default)]
pub struct StickyCallbacks {
    pub on_stuck: Option<TargetCallback>,
    pub on_unstuck: Option<TargetCallback>,
    pub on_change: Option<ChangeCallback>,
}

impl StickyCallbacks {
    pub fn on_stuck(mut self, callback: impl Fn(TargetId) + 'static) -> Self {
        self.on_stuck = Some(Rc::new(callback));
        self
    }

    pub fn on_unstuck(mut self, callback: impl Fn(TargetId) + 'static) -> Self {
        self.on_unstuck = Some(Rc::new(callback));
        self
    }

    pub fn on_change(mut self, callback: impl Fn(&StickyEvent) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }
}

// =============================================================================
// Options
// =============================================================================

/// Per-boundary configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyOptions {
    /// Which sentinels to observe.
    pub edges: Edges,
    /// Client y the target rests at when pinned. The bottom edge only
    /// reports stuck when the target is exactly here.
    pub pinned_offset: f32,
}

impl StickyOptions {
    pub fn edges(mut self, edges: Edges) -> Self {
        self.edges = edges;
        self
    }

    pub fn pinned_offset(mut self, offset: f32) -> Self {
        self.pinned_offset = offset;
        self
    }
}

impl Default for StickyOptions {
    fn default() -> Self {
        Self {
            edges: Edges::all(),
            pinned_offset: 0.0,
        }
    }
}
