//! Scripted intersection source for deterministic tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{EntryCallback, IntersectionEntry, IntersectionSource, ObserveOptions, Subscription};
use crate::types::{Rect, ScrollRoot, SentinelId, TargetId};

struct Scripted {
    sentinel: SentinelId,
    thresholds: Vec<f32>,
    callback: EntryCallback,
    active: Rc<Cell<bool>>,
}

/// Records observations and delivers whatever entries the test emits.
pub(crate) struct ScriptedSource {
    observations: RefCell<Vec<Scripted>>,
    target_rects: RefCell<HashMap<TargetId, Rect>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            observations: RefCell::new(Vec::new()),
            target_rects: RefCell::new(HashMap::new()),
        }
    }

    /// Observations not yet cancelled.
    pub fn active_count(&self) -> usize {
        self.observations
            .borrow()
            .iter()
            .filter(|o| o.active.get())
            .count()
    }

    /// Every observation ever opened, cancelled or not.
    pub fn total_subscriptions(&self) -> usize {
        self.observations.borrow().len()
    }

    /// Thresholds of the live observation on `sentinel`.
    pub fn thresholds(&self, sentinel: SentinelId) -> Option<Vec<f32>> {
        self.observations
            .borrow()
            .iter()
            .find(|o| o.active.get() && o.sentinel == sentinel)
            .map(|o| o.thresholds.clone())
    }

    pub fn set_target_rect(&self, target: TargetId, rect: Rect) {
        self.target_rects.borrow_mut().insert(target, rect);
    }

    /// Deliver `entry` to every live observation of its sentinel.
    pub fn emit(&self, entry: IntersectionEntry) {
        let callbacks: Vec<(EntryCallback, Rc<Cell<bool>>)> = self
            .observations
            .borrow()
            .iter()
            .filter(|o| o.active.get() && o.sentinel == entry.sentinel)
            .map(|o| (o.callback.clone(), o.active.clone()))
            .collect();

        for (callback, active) in callbacks {
            if active.get() {
                callback(&[entry]);
            }
        }
    }
}

impl IntersectionSource for ScriptedSource {
    fn observe(
        &self,
        sentinel: SentinelId,
        _root: ScrollRoot,
        options: &ObserveOptions,
        callback: EntryCallback,
    ) -> Subscription {
        let active = Rc::new(Cell::new(true));
        self.observations.borrow_mut().push(Scripted {
            sentinel,
            thresholds: options.thresholds.clone(),
            callback,
            active: active.clone(),
        });
        Subscription::new(move || active.set(false))
    }

    fn bounding_rect(&self, target: TargetId) -> Option<Rect> {
        self.target_rects.borrow().get(&target).copied()
    }
}

/// Zero-height sentinel entry at `y` against a `[0, 500]` root.
pub(crate) fn entry(sentinel: SentinelId, y: f32, ratio: f32) -> IntersectionEntry {
    IntersectionEntry {
        sentinel,
        bounding_rect: Rect::from_vertical(y, y, 80.0),
        root_bounds: Some(Rect::from_vertical(0.0, 500.0, 80.0)),
        intersection_ratio: ratio,
        is_intersecting: (0.0..=500.0).contains(&y),
    }
}
