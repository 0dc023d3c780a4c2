//! State Module - state derived from sticky events.
//!
//! - **Stuck** - latest-event-wins set of pinned targets, reactive

mod stuck;

pub use stuck::*;
