//! Sticky Boundary - one section containing one sticky target.
//!
//! A boundary owns a top and a bottom sentinel and runs an edge observer on
//! each. Whatever renders the section places `section().top` immediately
//! before the sticky target and `section().bottom` immediately after it, then
//! calls [`StickyBoundary::sticky`] (or [`attach`](StickyBoundary::attach)) so
//! both sentinels resolve to that target.
//!
//! Stuck and unstuck are computed per edge. The boundary keeps no single
//! "currently stuck" flag; use [`StuckTracker`](crate::state::StuckTracker)
//! when one is needed.

use std::cell::RefCell;
use std::rc::Rc;
use spark_signals::{signal, untrack, Signal};

use crate::engine::SentinelRegistry;
use crate::observe::{EdgeObserver, ObserverContext};
use crate::types::{Edge, EdgeState, Edges, StickySection, TargetId};

use super::types::{StickyCallbacks, StickyOptions};
use super::viewport::StickyViewport;

pub struct StickyBoundary {
    section: StickySection,
    registry: Rc<SentinelRegistry>,
    callbacks: Rc<RefCell<StickyCallbacks>>,
    /// Bumped on callback replacement so both observers re-subscribe.
    generation: Signal<u64>,
    observers: Vec<EdgeObserver>,
    options: StickyOptions,
}

impl StickyBoundary {
    pub(crate) fn mount(viewport: &StickyViewport, callbacks: StickyCallbacks, options: StickyOptions) -> Self {
        let registry = viewport.shared_registry();
        let section = registry.allocate_section();
        let callbacks = Rc::new(RefCell::new(callbacks));
        let generation = signal(0u64);

        let context = ObserverContext {
            registry: registry.clone(),
            source: viewport.source(),
            debug: viewport.debug_flag(),
            callbacks: callbacks.clone(),
            generation: generation.clone(),
            options,
        };

        let observers = [Edge::Top, Edge::Bottom]
            .into_iter()
            .filter(|&edge| options.edges.contains(Edges::from(edge)))
            .map(|edge| EdgeObserver::start(edge, section.sentinel(edge), context.clone()))
            .collect();

        tracing::trace!(top = ?section.top, bottom = ?section.bottom, "boundary mounted");

        Self {
            section,
            registry,
            callbacks,
            generation,
            observers,
            options,
        }
    }

    /// The sentinel pair to render around the sticky target.
    pub fn section(&self) -> StickySection {
        self.section
    }

    pub fn options(&self) -> StickyOptions {
        self.options
    }

    // =========================================================================
    // Sticky Target
    // =========================================================================

    /// Allocate a sticky target and bind both sentinels to it.
    pub fn sticky(&self) -> TargetId {
        let target = self.registry.allocate_target();
        self.attach(target);
        target
    }

    /// Bind both sentinels to an existing target.
    pub fn attach(&self, target: TargetId) {
        self.registry
            .register(self.section.top, self.section.bottom, target);
    }

    /// Target the sentinels currently resolve to.
    pub fn target(&self) -> Option<TargetId> {
        self.registry.lookup(self.section.top)
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Replace the callbacks. Both edges re-subscribe.
    pub fn set_callbacks(&self, callbacks: StickyCallbacks) {
        *self.callbacks.borrow_mut() = callbacks;
        let next = untrack(|| self.generation.get()) + 1;
        self.generation.set(next);
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Lifecycle state of one edge. `Unobserved` for edges not in
    /// `options.edges`.
    pub fn edge_state(&self, edge: Edge) -> EdgeState {
        self.observers
            .iter()
            .find(|observer| observer.edge() == edge)
            .map(EdgeObserver::state)
            .unwrap_or_default()
    }

    pub fn is_mounted(&self) -> bool {
        !self.observers.is_empty()
    }

    /// Stop both observers. No callback fires after this returns.
    pub fn unmount(mut self) {
        self.stop_observers();
    }

    fn stop_observers(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        for mut observer in self.observers.drain(..) {
            observer.stop();
        }
        tracing::trace!(top = ?self.section.top, bottom = ?self.section.bottom, "boundary unmounted");
    }
}

impl Drop for StickyBoundary {
    fn drop(&mut self) {
        self.stop_observers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use crate::observe::testing::{entry, ScriptedSource};
    use crate::types::{Rect, ScrollRoot, StickyEvent, StickyEventType};

    struct Recorded {
        stuck: Rc<RefCell<Vec<TargetId>>>,
        unstuck: Rc<RefCell<Vec<TargetId>>>,
        changes: Rc<RefCell<Vec<StickyEvent>>>,
    }

    fn recording() -> (StickyCallbacks, Recorded) {
        let stuck: Rc<RefCell<Vec<TargetId>>> = Rc::new(RefCell::new(Vec::new()));
        let unstuck: Rc<RefCell<Vec<TargetId>>> = Rc::new(RefCell::new(Vec::new()));
        let changes: Rc<RefCell<Vec<StickyEvent>>> = Rc::new(RefCell::new(Vec::new()));

        let (s, u, c) = (stuck.clone(), unstuck.clone(), changes.clone());
        let callbacks = StickyCallbacks::default()
            .on_stuck(move |target| s.borrow_mut().push(target))
            .on_unstuck(move |target| u.borrow_mut().push(target))
            .on_change(move |event| c.borrow_mut().push(*event));

        (callbacks, Recorded { stuck, unstuck, changes })
    }

    fn setup() -> (StickyViewport, Rc<ScriptedSource>) {
        let source = Rc::new(ScriptedSource::new());
        (StickyViewport::new(source.clone()), source)
    }

    #[test]
    fn test_mount_before_root_then_bind() {
        let (viewport, source) = setup();
        let (callbacks, recorded) = recording();

        // Boundary mounts with no root: attaching produces no subscriptions
        let boundary = viewport.boundary(callbacks);
        let target = boundary.sticky();
        assert_eq!(source.active_count(), 0);
        assert_eq!(boundary.edge_state(Edge::Top), EdgeState::Unobserved);
        assert_eq!(boundary.edge_state(Edge::Bottom), EdgeState::Unobserved);

        // Root set: both observers subscribe
        viewport.set_root(ScrollRoot::new(1));
        assert_eq!(source.active_count(), 2);
        assert_eq!(boundary.edge_state(Edge::Top), EdgeState::Observing);
        assert_eq!(boundary.edge_state(Edge::Bottom), EdgeState::Observing);

        // Top sentinel scrolls from below the root to above it
        let section = boundary.section();
        source.emit(entry(section.top, 600.0, 0.0));
        source.emit(entry(section.top, -10.0, 0.0));

        assert_eq!(*recorded.stuck.borrow(), vec![target]);
        assert!(recorded.unstuck.borrow().is_empty());
        assert_eq!(
            *recorded.changes.borrow(),
            vec![StickyEvent { kind: StickyEventType::Stuck, target }]
        );
        assert_eq!(boundary.edge_state(Edge::Top), EdgeState::Stuck);
        assert_eq!(boundary.edge_state(Edge::Bottom), EdgeState::Observing);
    }

    #[test]
    fn test_top_edge_sequence() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        let (callbacks, recorded) = recording();
        let boundary = viewport.boundary(callbacks);
        let target = boundary.sticky();
        let top = boundary.section().top;

        source.emit(entry(top, -10.0, 0.0));
        source.emit(entry(top, 250.0, 1.0));
        source.emit(entry(top, 600.0, 0.0));

        let kinds: Vec<StickyEventType> = recorded.changes.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![StickyEventType::Stuck, StickyEventType::Unstuck]);
        assert_eq!(*recorded.stuck.borrow(), vec![target]);
        assert_eq!(*recorded.unstuck.borrow(), vec![target]);
    }

    #[test]
    fn test_bottom_edge_sequence() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        let (callbacks, recorded) = recording();
        let boundary = viewport.boundary(callbacks);
        let target = boundary.sticky();
        let bottom = boundary.section().bottom;

        source.set_target_rect(target, Rect::new(0.0, 0.0, 80.0, 40.0));
        source.emit(entry(bottom, 300.0, 1.0));
        source.emit(entry(bottom, 300.0, 0.5));
        source.emit(entry(bottom, -5.0, 0.0));

        let kinds: Vec<StickyEventType> = recorded.changes.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![StickyEventType::Stuck, StickyEventType::Unstuck]);
        assert_eq!(boundary.edge_state(Edge::Bottom), EdgeState::Unstuck);
    }

    #[test]
    fn test_no_callbacks_after_unmount() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        let (callbacks, recorded) = recording();
        let boundary = viewport.boundary(callbacks);
        boundary.sticky();
        let section = boundary.section();

        boundary.unmount();
        source.emit(entry(section.top, -10.0, 0.0));
        source.emit(entry(section.bottom, -10.0, 0.0));

        assert_eq!(source.active_count(), 0);
        assert!(recorded.changes.borrow().is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        {
            let boundary = viewport.boundary(StickyCallbacks::default());
            boundary.sticky();
            assert_eq!(source.active_count(), 2);
        }
        assert_eq!(source.active_count(), 0);
    }

    #[test]
    fn test_unmount_from_inside_callback() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));

        let slot: Rc<RefCell<Option<StickyBoundary>>> = Rc::new(RefCell::new(None));
        let fired = Rc::new(Cell::new(0));
        let changes = Rc::new(Cell::new(0));
        let (slot_cb, fired_cb, changes_cb) = (slot.clone(), fired.clone(), changes.clone());

        let callbacks = StickyCallbacks::default()
            .on_stuck(move |_| {
                fired_cb.set(fired_cb.get() + 1);
                let taken = slot_cb.borrow_mut().take();
                if let Some(boundary) = taken {
                    boundary.unmount();
                }
            })
            .on_change(move |_| changes_cb.set(changes_cb.get() + 1));
        let boundary = viewport.boundary(callbacks);
        boundary.sticky();
        let top = boundary.section().top;
        *slot.borrow_mut() = Some(boundary);

        source.emit(entry(top, -10.0, 0.0));
        source.emit(entry(top, -20.0, 0.0));

        assert_eq!(fired.get(), 1);
        assert_eq!(changes.get(), 0);
        assert_eq!(source.active_count(), 0);
    }

    #[test]
    fn test_set_callbacks_from_inside_callback() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));

        let slot: Rc<RefCell<Option<StickyBoundary>>> = Rc::new(RefCell::new(None));
        let old_changes = Rc::new(Cell::new(0));
        let (replacement, recorded) = recording();
        let replacement = RefCell::new(Some(replacement));
        let (slot_cb, old_cb) = (slot.clone(), old_changes.clone());

        let callbacks = StickyCallbacks::default()
            .on_stuck(move |_| {
                let next = replacement.borrow_mut().take();
                if let (Some(boundary), Some(next)) = (slot_cb.borrow().as_ref(), next) {
                    boundary.set_callbacks(next);
                }
            })
            .on_change(move |_| old_cb.set(old_cb.get() + 1));
        let boundary = viewport.boundary(callbacks);
        let target = boundary.sticky();
        let top = boundary.section().top;
        *slot.borrow_mut() = Some(boundary);

        source.emit(entry(top, -10.0, 0.0));
        assert_eq!(old_changes.get(), 0);
        assert_eq!(source.active_count(), 2);

        // The replacement set owns the re-subscribed observers
        source.emit(entry(top, 250.0, 1.0));
        assert_eq!(old_changes.get(), 0);
        assert_eq!(*recorded.unstuck.borrow(), vec![target]);
        assert_eq!(recorded.changes.borrow().len(), 1);
    }

    #[test]
    fn test_bottom_tie_fires_stuck_then_unstuck() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        let (callbacks, recorded) = recording();
        let boundary = viewport.boundary(callbacks);
        let target = boundary.sticky();

        source.set_target_rect(target, Rect::new(0.0, 0.0, 80.0, 40.0));
        source.emit(entry(boundary.section().bottom, 0.0, 1.0));

        assert_eq!(*recorded.stuck.borrow(), vec![target]);
        assert_eq!(*recorded.unstuck.borrow(), vec![target]);
        assert_eq!(
            *recorded.changes.borrow(),
            vec![StickyEvent { kind: StickyEventType::Unstuck, target }]
        );
        assert_eq!(boundary.edge_state(Edge::Bottom), EdgeState::Unstuck);
    }

    #[test]
    fn test_independent_boundaries() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));

        let (callbacks_a, recorded_a) = recording();
        let (callbacks_b, recorded_b) = recording();
        let a = viewport.boundary(callbacks_a);
        let b = viewport.boundary(callbacks_b);
        let target_a = a.sticky();
        let target_b = b.sticky();
        assert_ne!(target_a, target_b);

        source.emit(entry(a.section().top, -10.0, 0.0));

        assert_eq!(*recorded_a.stuck.borrow(), vec![target_a]);
        assert!(recorded_b.changes.borrow().is_empty());

        source.emit(entry(b.section().top, 100.0, 1.0));

        assert_eq!(*recorded_b.unstuck.borrow(), vec![target_b]);
        assert!(recorded_a.unstuck.borrow().is_empty());
    }

    #[test]
    fn test_set_callbacks_resubscribes() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        let (first, recorded_first) = recording();
        let boundary = viewport.boundary(first);
        boundary.sticky();
        assert_eq!(source.total_subscriptions(), 2);

        let (second, recorded_second) = recording();
        boundary.set_callbacks(second);

        assert_eq!(source.total_subscriptions(), 4);
        assert_eq!(source.active_count(), 2);

        source.emit(entry(boundary.section().top, -10.0, 0.0));
        assert!(recorded_first.changes.borrow().is_empty());
        assert_eq!(recorded_second.changes.borrow().len(), 1);
    }

    #[test]
    fn test_default_callbacks_are_noops() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        let boundary = viewport.boundary(StickyCallbacks::default());
        boundary.sticky();

        source.emit(entry(boundary.section().top, -10.0, 0.0));

        assert_eq!(boundary.edge_state(Edge::Top), EdgeState::Stuck);
    }

    #[test]
    fn test_top_only_boundary() {
        let (viewport, source) = setup();
        viewport.set_root(ScrollRoot::new(1));
        let boundary = viewport.boundary_with(
            StickyCallbacks::default(),
            StickyOptions::default().edges(Edges::TOP),
        );

        assert_eq!(source.active_count(), 1);
        assert_eq!(boundary.edge_state(Edge::Top), EdgeState::Observing);
        assert_eq!(boundary.edge_state(Edge::Bottom), EdgeState::Unobserved);
    }

    #[test]
    fn test_attach_existing_target() {
        let (viewport, _) = setup();
        let boundary = viewport.boundary(StickyCallbacks::default());
        assert_eq!(boundary.target(), None);

        boundary.attach(TargetId(42));
        boundary.attach(TargetId(42));

        assert_eq!(boundary.target(), Some(TargetId(42)));
        assert_eq!(viewport.registry().lookup(boundary.section().bottom), Some(TargetId(42)));
        assert_eq!(viewport.registry().len(), 2);
    }
}
