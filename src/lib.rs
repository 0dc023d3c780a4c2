//! # sticky-sentinel
//!
//! Stuck/unstuck detection for sticky elements, built on
//! [spark-signals](https://crates.io/crates/spark-signals).
//!
//! ## Architecture
//!
//! Every sticky section is bracketed by two invisible sentinels. An
//! intersection primitive reports when a sentinel crosses the scroll root's
//! viewport; the edge observers classify those crossings into events:
//!
//! ```text
//! StickyViewport → SentinelRegistry (sentinel → target, root signal)
//!                → StickyBoundary → top/bottom EdgeObserver → callbacks
//! ```
//!
//! Observers are effects over the root signal. Nothing is observed until a
//! root is bound, and everything is unobserved again on unmount.
//!
//! ## Modules
//!
//! - [`types`] - Identities, geometry, events
//! - [`engine`] - Sentinel registry
//! - [`observe`] - Intersection seam and edge classification
//! - [`primitives`] - Viewport and boundary
//! - [`state`] - Derived stuck state
//! - [`layout`] - Taffy-backed headless scroll host

pub mod engine;
pub mod layout;
pub mod observe;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{RootBinding, SentinelRegistry};

pub use observe::{
    classify, classify_bottom, classify_top, EdgeMatch, EntryCallback, IntersectionEntry,
    IntersectionSource, ObservationRecord, ObserveOptions, Subscription,
};

pub use primitives::{
    ChangeCallback, StickyBoundary, StickyCallbacks, StickyOptions, StickyViewport,
    TargetCallback,
};

pub use state::StuckTracker;

pub use layout::{ScrollHost, SectionLayout};
