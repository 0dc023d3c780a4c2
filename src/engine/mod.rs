//! Sticky Engine - shared registry plumbing.
//!
//! The engine owns the data every observer reads:
//! - Registry: sentinel/target id allocation, sentinel → target mapping
//! - Root: the scroll-root binding as a reactive signal
//!
//! # Architecture
//!
//! The platform reports only the sentinel an intersection happened on.
//! Classification needs the logical target that sentinel brackets, so every
//! delivery goes through one indirection table:
//!
//! ```text
//! Sentinel 0 (top)    → Target 0
//! Sentinel 1 (bottom) → Target 0
//! Sentinel 2 (top)    → Target 1
//! Sentinel 3 (bottom) → Target 1
//! ```

mod registry;

pub use registry::*;
