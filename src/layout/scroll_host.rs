//! Scroll Host - a headless intersection primitive backed by Taffy.
//!
//! Lays out a vertical scroll container as a Taffy column, tracks its scroll
//! offset and reports sentinel intersections the way a browser observer does:
//! batched per frame ([`ScrollHost::flush`]), one entry per observation whose
//! threshold band changed.
//!
//! ```text
//! content (column)
//! ├─ spacer
//! ├─ section (column)
//! │  ├─ top sentinel     height 0
//! │  ├─ sticky target    pinned with top: 0 inside its section
//! │  ├─ section content
//! │  └─ bottom sentinel  height 0
//! └─ spacer
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, NodeId, Size, Style, TaffyResult, TaffyTree,
};

use crate::observe::{EntryCallback, IntersectionEntry, IntersectionSource, ObserveOptions, Subscription};
use crate::types::{Rect, ScrollRoot, SentinelId, StickySection, TargetId};

use super::intersection::{intersect, intersection_ratio, threshold_index};

// =============================================================================
// Section Layout
// =============================================================================

/// Heights of one sticky section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionLayout {
    /// Height of the sticky target.
    pub sticky_height: f32,
    /// Height of the section content that follows the target.
    pub content_height: f32,
}

impl SectionLayout {
    pub fn new(sticky_height: f32, content_height: f32) -> Self {
        Self {
            sticky_height,
            content_height,
        }
    }
}

// =============================================================================
// Host State
// =============================================================================

struct SectionNodes {
    node: NodeId,
    top: NodeId,
    target: NodeId,
    content: NodeId,
    bottom: NodeId,
    target_id: TargetId,
}

struct StickyNode {
    node: NodeId,
    section: NodeId,
}

struct Observation {
    id: u64,
    sentinel: SentinelId,
    thresholds: Vec<f32>,
    callback: EntryCallback,
    /// Threshold band and intersecting flag at the last delivery.
    last: Option<(i32, bool)>,
}

struct HostState {
    tree: TaffyTree<()>,
    content: NodeId,
    sections: HashMap<StickySection, SectionNodes>,
    sentinels: HashMap<SentinelId, NodeId>,
    targets: HashMap<TargetId, StickyNode>,
    scroll_y: f32,
    dirty: bool,
    observations: Vec<Observation>,
    next_observation: u64,
}

impl HostState {
    fn ensure_layout(&mut self, width: f32) -> TaffyResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.tree.compute_layout(
            self.content,
            Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::MaxContent,
            },
        )?;
        self.dirty = false;
        Ok(())
    }

    /// Node bounds relative to the top of the scroll content.
    fn document_rect(&self, node: NodeId) -> TaffyResult<Rect> {
        let size = self.tree.layout(node)?.size;
        let (mut x, mut y) = (0.0, 0.0);

        let mut current = Some(node);
        while let Some(id) = current {
            let location = self.tree.layout(id)?.location;
            x += location.x;
            y += location.y;
            current = self.tree.parent(id);
        }

        Ok(Rect::new(x, y, size.width, size.height))
    }

    /// Node bounds in client coordinates at the current scroll offset.
    fn client_rect(&self, node: NodeId, bounds: Rect) -> TaffyResult<Rect> {
        let doc = self.document_rect(node)?;
        Ok(Rect::new(
            bounds.x + doc.x,
            bounds.y + doc.y - self.scroll_y,
            doc.width,
            doc.height,
        ))
    }

    fn sentinel_rect(&self, sentinel: SentinelId, bounds: Rect) -> TaffyResult<Option<Rect>> {
        match self.sentinels.get(&sentinel) {
            Some(&node) => self.client_rect(node, bounds).map(Some),
            None => Ok(None),
        }
    }

    /// Sticky target bounds: pinned to the root top, never leaving its section.
    fn target_rect(&self, target: TargetId, bounds: Rect) -> TaffyResult<Option<Rect>> {
        let Some(sticky) = self.targets.get(&target) else {
            return Ok(None);
        };

        let natural = self.client_rect(sticky.node, bounds)?;
        let section = self.client_rect(sticky.section, bounds)?;
        let limit = section.bottom() - natural.height;
        let y = natural.y.max(bounds.top().min(limit));

        Ok(Some(Rect { y, ..natural }))
    }

    fn content_height(&self) -> TaffyResult<f32> {
        Ok(self.tree.layout(self.content)?.size.height)
    }

    fn is_observing(&self, id: u64) -> bool {
        self.observations.iter().any(|observation| observation.id == id)
    }
}

// =============================================================================
// Styles
// =============================================================================

fn column_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn block_style(height: f32) -> Style {
    Style {
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(height),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

// =============================================================================
// Scroll Host
// =============================================================================

pub struct ScrollHost {
    root: ScrollRoot,
    bounds: Rect,
    state: Rc<RefCell<HostState>>,
}

impl ScrollHost {
    /// Host whose viewport sits at the client origin.
    pub fn new(root: ScrollRoot, width: f32, height: f32) -> TaffyResult<Self> {
        Self::with_bounds(root, Rect::new(0.0, 0.0, width, height))
    }

    /// Host whose viewport occupies `bounds` in client coordinates.
    pub fn with_bounds(root: ScrollRoot, bounds: Rect) -> TaffyResult<Self> {
        let mut tree: TaffyTree<()> = TaffyTree::new();
        let content = tree.new_leaf(Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            size: Size {
                width: Dimension::Length(bounds.width),
                height: Dimension::Auto,
            },
            ..Default::default()
        })?;

        Ok(Self {
            root,
            bounds,
            state: Rc::new(RefCell::new(HostState {
                tree,
                content,
                sections: HashMap::new(),
                sentinels: HashMap::new(),
                targets: HashMap::new(),
                scroll_y: 0.0,
                dirty: true,
                observations: Vec::new(),
                next_observation: 0,
            })),
        })
    }

    pub fn root(&self) -> ScrollRoot {
        self.root
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Live observations.
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observations.len()
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Append a plain block of `height`.
    pub fn push_spacer(&self, height: f32) -> TaffyResult<()> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let spacer = state.tree.new_leaf(block_style(height))?;
        state.tree.add_child(state.content, spacer)?;
        state.dirty = true;
        Ok(())
    }

    /// Append a sticky section: top sentinel, target, content, bottom sentinel.
    ///
    /// Mounting a section that is already mounted replaces it in place at the
    /// end of the content.
    pub fn mount_section(&self, section: StickySection, target: TargetId, layout: SectionLayout) -> TaffyResult<()> {
        self.unmount_section(section)?;

        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        let top = state.tree.new_leaf(block_style(0.0))?;
        let sticky = state.tree.new_leaf(block_style(layout.sticky_height))?;
        let content = state.tree.new_leaf(block_style(layout.content_height))?;
        let bottom = state.tree.new_leaf(block_style(0.0))?;
        let node = state
            .tree
            .new_with_children(column_style(), &[top, sticky, content, bottom])?;
        state.tree.add_child(state.content, node)?;

        state.sentinels.insert(section.top, top);
        state.sentinels.insert(section.bottom, bottom);
        state.targets.insert(target, StickyNode { node: sticky, section: node });
        state.sections.insert(
            section,
            SectionNodes {
                node,
                top,
                target: sticky,
                content,
                bottom,
                target_id: target,
            },
        );
        state.dirty = true;

        tracing::trace!(top = ?section.top, bottom = ?section.bottom, ?target, "section mounted");
        Ok(())
    }

    /// Remove a section's nodes. Unknown sections are ignored.
    pub fn unmount_section(&self, section: StickySection) -> TaffyResult<()> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        let Some(nodes) = state.sections.remove(&section) else {
            return Ok(());
        };

        state.sentinels.remove(&section.top);
        state.sentinels.remove(&section.bottom);
        state.targets.remove(&nodes.target_id);

        for node in [nodes.top, nodes.target, nodes.content, nodes.bottom, nodes.node] {
            state.tree.remove(node)?;
        }
        state.dirty = true;
        Ok(())
    }

    // =========================================================================
    // Scroll
    // =========================================================================

    pub fn scroll_y(&self) -> f32 {
        self.state.borrow().scroll_y
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> TaffyResult<f32> {
        let mut state = self.state.borrow_mut();
        state.ensure_layout(self.bounds.width)?;
        Ok((state.content_height()? - self.bounds.height).max(0.0))
    }

    /// Set the scroll offset, clamped to `[0, max_scroll]`.
    pub fn scroll_to(&self, y: f32) -> TaffyResult<()> {
        let max = self.max_scroll()?;
        self.state.borrow_mut().scroll_y = y.clamp(0.0, max);
        Ok(())
    }

    /// Scroll by a delta.
    ///
    /// Returns `true` if scrolling occurred, `false` if already at boundary.
    pub fn scroll_by(&self, delta: f32) -> TaffyResult<bool> {
        let current = self.scroll_y();
        self.scroll_to(current + delta)?;
        Ok(self.scroll_y() != current)
    }

    pub fn scroll_to_top(&self) -> TaffyResult<()> {
        self.scroll_to(0.0)
    }

    pub fn scroll_to_bottom(&self) -> TaffyResult<()> {
        let max = self.max_scroll()?;
        self.scroll_to(max)
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Deliver one frame of intersection changes.
    ///
    /// Returns the number of entries delivered.
    pub fn flush(&self) -> TaffyResult<usize> {
        let pending = self.collect_changes()?;
        let mut delivered = 0;

        for (id, callback, entry) in pending {
            // An earlier callback this frame may have unobserved it.
            if !self.state.borrow().is_observing(id) {
                continue;
            }
            callback(&[entry]);
            delivered += 1;
        }

        Ok(delivered)
    }

    fn collect_changes(&self) -> TaffyResult<Vec<(u64, EntryCallback, IntersectionEntry)>> {
        let bounds = self.bounds;
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.ensure_layout(bounds.width)?;

        let mut rects = Vec::with_capacity(state.observations.len());
        for observation in &state.observations {
            // Not rendered yet
            let Some(rect) = state.sentinel_rect(observation.sentinel, bounds)? else {
                continue;
            };
            rects.push((observation.id, rect));
        }

        let mut pending = Vec::new();
        for (id, rect) in rects {
            let Some(observation) = state.observations.iter_mut().find(|o| o.id == id) else {
                continue;
            };

            let is_intersecting = intersect(rect, bounds).is_some();
            let ratio = intersection_ratio(rect, bounds);
            let band = (threshold_index(ratio, is_intersecting, &observation.thresholds), is_intersecting);
            if observation.last == Some(band) {
                continue;
            }
            observation.last = Some(band);

            pending.push((
                id,
                observation.callback.clone(),
                IntersectionEntry {
                    sentinel: observation.sentinel,
                    bounding_rect: rect,
                    root_bounds: Some(bounds),
                    intersection_ratio: ratio,
                    is_intersecting,
                },
            ));
        }

        Ok(pending)
    }
}

impl IntersectionSource for ScrollHost {
    fn observe(
        &self,
        sentinel: SentinelId,
        root: ScrollRoot,
        options: &ObserveOptions,
        callback: EntryCallback,
    ) -> Subscription {
        if root != self.root {
            tracing::warn!(host = ?self.root.id, requested = ?root.id, "observation against foreign root refused");
            return Subscription::inert();
        }

        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_observation;
            state.next_observation += 1;
            state.observations.push(Observation {
                id,
                sentinel,
                thresholds: options.thresholds.clone(),
                callback,
                last: None,
            });
            id
        };

        let state = Rc::downgrade(&self.state);
        Subscription::new(move || {
            let Some(state) = state.upgrade() else { return };
            let removed = {
                let mut state = state.borrow_mut();
                state
                    .observations
                    .iter()
                    .position(|observation| observation.id == id)
                    .map(|index| state.observations.remove(index))
            };
            // Dropped outside the borrow: the callback may own things that
            // unobserve on drop.
            drop(removed);
        })
    }

    fn bounding_rect(&self, target: TargetId) -> Option<Rect> {
        let mut state = self.state.borrow_mut();
        let rect = state
            .ensure_layout(self.bounds.width)
            .and_then(|()| state.target_rect(target, self.bounds));

        match rect {
            Ok(rect) => rect,
            Err(error) => {
                tracing::warn!(?target, %error, "target layout unavailable");
                None
            }
        }
    }
}
