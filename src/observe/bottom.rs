//! Bottom-edge classification.
//!
//! The bottom sentinel reaching the viewport is ambiguous: the section may be
//! scrolling away (a real unstick) or the target may simply sit at the top of
//! a short section that is fully visible. Sentinel geometry alone cannot tell
//! these apart at threshold 1, so the stuck rule also checks where the target
//! itself is rendered.

use super::{EdgeMatch, ObservationRecord};

/// Classify a bottom-sentinel observation.
///
/// - stuck: sentinel fully inside the root, ratio 1, target resting at
///   `pinned_offset`
/// - unstuck: sentinel top at or above the root top
///
/// The rules are checked independently. With the sentinel top exactly on the
/// root top both can match.
pub fn classify_bottom(record: &ObservationRecord, pinned_offset: f32) -> EdgeMatch {
    let sentinel = record.sentinel_rect;
    let root = record.root_rect;

    let inside = sentinel.top() >= root.top() && sentinel.bottom() <= root.bottom();
    let fully_visible = record.ratio >= 1.0;
    let pinned = record
        .target_rect
        .is_some_and(|target| (target.y - pinned_offset).abs() <= f32::EPSILON);

    EdgeMatch {
        stuck: inside && fully_visible && pinned,
        unstuck: sentinel.top() <= root.top(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rect, StickyEventType, TargetId};

    fn record(sentinel_top: f32, ratio: f32, target_y: Option<f32>) -> ObservationRecord {
        ObservationRecord {
            target: TargetId(0),
            target_rect: target_y.map(|y| Rect::new(0.0, y, 80.0, 40.0)),
            sentinel_rect: Rect::from_vertical(sentinel_top, sentinel_top, 80.0),
            root_rect: Rect::from_vertical(0.0, 500.0, 80.0),
            ratio,
        }
    }

    #[test]
    fn test_inside_pinned_is_stuck() {
        assert_eq!(
            classify_bottom(&record(300.0, 1.0, Some(0.0)), 0.0).event(),
            Some(StickyEventType::Stuck)
        );
    }

    #[test]
    fn test_above_root_is_unstuck() {
        assert_eq!(
            classify_bottom(&record(-20.0, 0.0, Some(-60.0)), 0.0).event(),
            Some(StickyEventType::Unstuck)
        );
        assert_eq!(
            classify_bottom(&record(0.0, 1.0, Some(-40.0)), 0.0).event(),
            Some(StickyEventType::Unstuck)
        );
    }

    #[test]
    fn test_partial_ratio_is_nothing() {
        assert_eq!(classify_bottom(&record(300.0, 0.5, Some(0.0)), 0.0).event(), None);
    }

    #[test]
    fn test_target_not_pinned_is_nothing() {
        // Short section fully in view, target still flowing below the top
        assert_eq!(classify_bottom(&record(300.0, 1.0, Some(120.0)), 0.0).event(), None);
    }

    #[test]
    fn test_missing_target_rect_is_nothing() {
        assert_eq!(classify_bottom(&record(300.0, 1.0, None), 0.0).event(), None);
    }

    #[test]
    fn test_below_root_is_nothing() {
        assert_eq!(classify_bottom(&record(600.0, 0.0, Some(0.0)), 0.0).event(), None);
    }

    #[test]
    fn test_top_edge_tie_matches_both() {
        let tie = classify_bottom(&record(0.0, 1.0, Some(0.0)), 0.0);

        assert_eq!(tie, EdgeMatch { stuck: true, unstuck: true });
        assert_eq!(tie.event(), Some(StickyEventType::Unstuck));
    }

    #[test]
    fn test_top_edge_tie_not_pinned() {
        assert_eq!(
            classify_bottom(&record(0.0, 1.0, Some(-40.0)), 0.0),
            EdgeMatch { stuck: false, unstuck: true }
        );
    }

    #[test]
    fn test_pinned_offset() {
        // Pinned below a 30px header
        let pinned = record(300.0, 1.0, Some(30.0));
        assert_eq!(classify_bottom(&pinned, 0.0).event(), None);
        assert_eq!(classify_bottom(&pinned, 30.0).event(), Some(StickyEventType::Stuck));
    }
}
