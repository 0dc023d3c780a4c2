//! Layout Module - headless intersection host.
//!
//! - [`ScrollHost`] - Taffy-laid-out scroll container implementing
//!   [`IntersectionSource`](crate::observe::IntersectionSource)
//! - [`intersect`], [`intersection_ratio`], [`threshold_index`] - the
//!   geometry an intersection primitive reports

mod intersection;
mod scroll_host;

pub use intersection::{intersect, intersection_ratio, threshold_index};
pub use scroll_host::{ScrollHost, SectionLayout};
