//! Sticky Viewport - the per-viewport context every boundary hangs off.
//!
//! One viewport per scroll container. It owns the sentinel registry, the
//! intersection source and the debug flag, and hands them to each boundary
//! it mounts.
//!
//! # Example
//!
//! ```ignore
//! let host = Rc::new(ScrollHost::new(ScrollRoot::new(0), 80.0, 500.0)?);
//! let viewport = StickyViewport::new(host.clone());
//!
//! let boundary = viewport.boundary(StickyCallbacks::default().on_stuck(|t| println!("{t:?}")));
//! let target = boundary.sticky();
//! host.mount_section(boundary.section(), target, SectionLayout::new(40.0, 400.0))?;
//!
//! viewport.set_root(host.root());
//! host.scroll_to(120.0);
//! host.flush()?;
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::{RootBinding, SentinelRegistry};
use crate::observe::IntersectionSource;
use crate::types::ScrollRoot;

use super::boundary::StickyBoundary;
use super::types::{StickyCallbacks, StickyOptions};

#[derive(Clone)]
pub struct StickyViewport {
    registry: Rc<SentinelRegistry>,
    source: Rc<dyn IntersectionSource>,
    debug: Rc<Cell<bool>>,
}

impl StickyViewport {
    pub fn new(source: Rc<dyn IntersectionSource>) -> Self {
        Self {
            registry: Rc::new(SentinelRegistry::new()),
            source,
            debug: Rc::new(Cell::new(false)),
        }
    }

    // =========================================================================
    // Root
    // =========================================================================

    /// Bind the scroll root. Every mounted boundary subscribes on first bind.
    pub fn set_root(&self, root: ScrollRoot) -> RootBinding {
        self.registry.set_root(root)
    }

    pub fn root(&self) -> Option<ScrollRoot> {
        self.registry.root()
    }

    pub fn registry(&self) -> &SentinelRegistry {
        &self.registry
    }

    // =========================================================================
    // Boundaries
    // =========================================================================

    /// Mount a boundary observing both edges.
    pub fn boundary(&self, callbacks: StickyCallbacks) -> StickyBoundary {
        self.boundary_with(callbacks, StickyOptions::default())
    }

    pub fn boundary_with(&self, callbacks: StickyCallbacks, options: StickyOptions) -> StickyBoundary {
        StickyBoundary::mount(self, callbacks, options)
    }

    pub(crate) fn shared_registry(&self) -> Rc<SentinelRegistry> {
        self.registry.clone()
    }

    pub(crate) fn source(&self) -> Rc<dyn IntersectionSource> {
        self.source.clone()
    }

    pub(crate) fn debug_flag(&self) -> Rc<Cell<bool>> {
        self.debug.clone()
    }

    // =========================================================================
    // Debug
    // =========================================================================

    /// Flip debug logging of raw entries. Returns the new value.
    pub fn toggle_debug(&self) -> bool {
        let enabled = !self.debug.get();
        self.debug.set(enabled);
        enabled
    }

    pub fn set_debug(&self, enabled: bool) {
        self.debug.set(enabled);
    }

    pub fn is_debug(&self) -> bool {
        self.debug.get()
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Clear the registry and unbind the root.
    ///
    /// Boundaries still mounted drop back to unobserved.
    pub fn teardown(&self) {
        self.registry.clear();
        tracing::debug!("sticky viewport torn down");
    }
}
