//! Sticky Primitives - the pieces a UI layer composes.
//!
//! - [`StickyViewport`] - per-viewport context (registry, source, debug flag)
//! - [`StickyBoundary`] - one section with its sentinel pair and edge observers
//!
//! # Architecture
//!
//! ```text
//! StickyViewport ──set_root──▶ SentinelRegistry (root signal)
//!       │                            │
//!       └─boundary()─▶ StickyBoundary│
//!                        ├─ top observer ◀──┤ effect re-runs on root change
//!                        └─ bottom observer◀┘
//! ```
//!
//! Rendering is up to the caller: place `section().top` right before the
//! sticky target and `section().bottom` right after it.

mod boundary;
mod types;
mod viewport;

pub use boundary::StickyBoundary;
pub use types::*;
pub use viewport::StickyViewport;
