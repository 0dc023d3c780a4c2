//! Top-edge classification.
//!
//! The top sentinel sits immediately before the sticky target, so its bottom
//! edge marks where the target would be if it flowed normally. Once that edge
//! scrolls above the root, the target is pinned.

use crate::types::StickyEventType;

use super::ObservationRecord;

/// Classify a top-sentinel observation.
///
/// - stuck: sentinel bottom above the root top
/// - unstuck: sentinel bottom inside `[root.top, root.bottom)`
/// - otherwise nothing (sentinel below the root)
pub fn classify_top(record: &ObservationRecord) -> Option<StickyEventType> {
    let sentinel_bottom = record.sentinel_rect.bottom();
    let root = record.root_rect;

    if sentinel_bottom < root.top() {
        return Some(StickyEventType::Stuck);
    }

    if sentinel_bottom >= root.top() && sentinel_bottom < root.bottom() {
        return Some(StickyEventType::Unstuck);
    }

    None
}
