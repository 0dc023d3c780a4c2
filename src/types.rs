//! Core types for sticky-sentinel.
//!
//! Identities, geometry and event shapes shared by the registry, the edge
//! observers and the intersection hosts.

use bitflags::bitflags;

// =============================================================================
// Identities
// =============================================================================

/// Identity of an invisible marker node placed before or after a sticky target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentinelId(pub u32);

/// Identity of the element that stays pinned while its section scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// Identity of a physical scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(pub u32);

/// The scrollable container stickiness is measured against.
///
/// Two roots are the same container when their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollRoot {
    pub id: RootId,
}

impl ScrollRoot {
    pub const fn new(id: u32) -> Self {
        Self { id: RootId(id) }
    }
}

/// The sentinel pair of one boundary.
///
/// This is the value a boundary exposes to whatever renders its children:
/// `top` goes immediately before the sticky target, `bottom` immediately after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StickySection {
    pub top: SentinelId,
    pub bottom: SentinelId,
}

impl StickySection {
    /// Sentinel watched by the given edge observer.
    pub fn sentinel(&self, edge: Edge) -> SentinelId {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Axis-aligned rectangle in client coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Full-width band between two vertical edges.
    pub fn from_vertical(top: f32, bottom: f32, width: f32) -> Self {
        Self::new(0.0, top, width, bottom - top)
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

// =============================================================================
// Edges
// =============================================================================

/// Which sentinel of a boundary an observer watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
}

impl Edge {
    /// Intersection threshold the edge is observed at.
    pub fn threshold(self) -> f32 {
        match self {
            Edge::Top => 0.0,
            Edge::Bottom => 1.0,
        }
    }
}

bitflags! {
    /// Set of edges a boundary observes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
    }
}

impl Default for Edges {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Edge> for Edges {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Top => Edges::TOP,
            Edge::Bottom => Edges::BOTTOM,
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// The two observable states of a sticky target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickyEventType {
    Stuck,
    Unstuck,
}

impl StickyEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            StickyEventType::Stuck => "stuck",
            StickyEventType::Unstuck => "unstuck",
        }
    }
}

/// Normalized event delivered to `on_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyEvent {
    pub kind: StickyEventType,
    pub target: TargetId,
}

/// Lifecycle of one edge observer.
///
/// `Unobserved` until a scroll root exists, `Observing` once subscribed, then
/// `Stuck`/`Unstuck` after the latest classified event. Back to `Unobserved`
/// on unmount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeState {
    #[default]
    Unobserved,
    Observing,
    Stuck,
    Unstuck,
}

impl From<StickyEventType> for EdgeState {
    fn from(kind: StickyEventType) -> Self {
        match kind {
            StickyEventType::Stuck => EdgeState::Stuck,
            StickyEventType::Unstuck => EdgeState::Unstuck,
        }
    }
}
