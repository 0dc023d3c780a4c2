//! Intersection geometry - the math an intersection primitive reports.

use crate::types::Rect;

/// Overlap of `target` and `root`, edge-inclusive.
///
/// Touching edges produce a zero-size overlap rather than `None`, so a
/// zero-height sentinel lying on the root's edge still intersects.
pub fn intersect(target: Rect, root: Rect) -> Option<Rect> {
    let left = target.left().max(root.left());
    let right = target.right().min(root.right());
    let top = target.top().max(root.top());
    let bottom = target.bottom().min(root.bottom());

    if left > right || top > bottom {
        return None;
    }

    Some(Rect::new(left, top, right - left, bottom - top))
}

/// Visible fraction of `target` within `root`.
///
/// Zero-area targets report 1.0 when they intersect at all.
pub fn intersection_ratio(target: Rect, root: Rect) -> f32 {
    let Some(overlap) = intersect(target, root) else {
        return 0.0;
    };

    let area = target.area();
    if area <= 0.0 {
        return 1.0;
    }

    (overlap.area() / area).clamp(0.0, 1.0)
}

/// Which threshold band an intersection sits in.
///
/// -1 when not intersecting, otherwise the number of thresholds at or below
/// `ratio`. A host reports an entry whenever this (or the intersecting flag)
/// changes.
pub fn threshold_index(ratio: f32, is_intersecting: bool, thresholds: &[f32]) -> i32 {
    if !is_intersecting {
        return -1;
    }
    thresholds.iter().filter(|&&threshold| ratio >= threshold).count() as i32
}
