//! Intersection primitive seam.
//!
//! The detection core never computes intersections itself. A host (a browser
//! binding, the taffy-backed [`ScrollHost`](crate::layout::ScrollHost), a test
//! double) implements [`IntersectionSource`] and delivers entries whenever a
//! sentinel's intersection with the root crosses a threshold.

use std::rc::Rc;

use crate::types::{Rect, ScrollRoot, SentinelId, TargetId};

/// One intersection change reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Sentinel the change happened on.
    pub sentinel: SentinelId,
    /// Sentinel bounds in client coordinates.
    pub bounding_rect: Rect,
    /// Root bounds in client coordinates. `None` when the host cannot
    /// report them.
    pub root_bounds: Option<Rect>,
    /// Visible fraction of the sentinel, 0.0..=1.0.
    pub intersection_ratio: f32,
    pub is_intersecting: bool,
}

/// Receives batches of entries for one observation.
pub type EntryCallback = Rc<dyn Fn(&[IntersectionEntry])>;

/// Options for one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    /// Ratios at which the host reports a change.
    pub thresholds: Vec<f32>,
}

impl ObserveOptions {
    pub fn threshold(threshold: f32) -> Self {
        Self {
            thresholds: vec![threshold],
        }
    }
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self::threshold(0.0)
    }
}

/// Cancel handle for an observation. Cancels on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    /// Stop the observation now.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// The platform intersection-observation primitive.
///
/// Hosts must not deliver entries from inside `observe`; the first delivery
/// for a new observation happens on the host's next frame.
pub trait IntersectionSource {
    /// Start watching `sentinel` against `root`.
    fn observe(
        &self,
        sentinel: SentinelId,
        root: ScrollRoot,
        options: &ObserveOptions,
        callback: EntryCallback,
    ) -> Subscription;

    /// Current on-screen bounds of a sticky target.
    fn bounding_rect(&self, target: TargetId) -> Option<Rect>;
}
