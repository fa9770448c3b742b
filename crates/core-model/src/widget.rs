//! Widget arena and capability traits.
//!
//! Parent/child relations live in a flat arena indexed by `WidgetId`; nodes
//! store ids, never references, so there are no ownership cycles between a
//! widget and its parent. Behaviour is attached through small capability
//! traits (`Focusable`, `Scrollable`; painting lives in `core-render`) that a
//! host dispatches to after resolving ids.
//!
//! Invariants:
//! * A node's `parent` always names an earlier node (roots have none).
//! * `children` lists ids in insertion order, which is also paint order.
//! * At most one node is focused.

use crate::geometry::{Point, Rect};
use crate::scrollbar::Orientation;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub usize);

#[derive(Debug, Clone)]
struct Node {
    name: &'static str,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    relative_rect: Rect,
}

/// Result of a focus change; the host forwards `lost` / `gained` to the
/// matching `Focusable` implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusChange {
    pub lost: Option<WidgetId>,
    pub gained: Option<WidgetId>,
}

impl FocusChange {
    pub fn is_noop(&self) -> bool {
        self.lost.is_none() && self.gained.is_none()
    }
}

#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: Vec<Node>,
    focused: Option<WidgetId>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            focused: None,
        }
    }

    pub fn add_root(&mut self, name: &'static str, rect: Rect) -> WidgetId {
        self.push(name, None, rect)
    }

    /// Add a child below `parent`. Unknown parents are treated as absent and
    /// the node becomes a root.
    pub fn add_child(&mut self, parent: WidgetId, name: &'static str, rect: Rect) -> WidgetId {
        let parent = self.contains(parent).then_some(parent);
        let id = self.push(name, parent, rect);
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    fn push(&mut self, name: &'static str, parent: Option<WidgetId>, rect: Rect) -> WidgetId {
        let id = WidgetId(self.nodes.len());
        self.nodes.push(Node {
            name,
            parent,
            children: Vec::new(),
            relative_rect: rect,
        });
        id
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, id: WidgetId) -> Option<&'static str> {
        self.nodes.get(id.0).map(|n| n.name)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn relative_rect(&self, id: WidgetId) -> Option<Rect> {
        self.nodes.get(id.0).map(|n| n.relative_rect)
    }

    pub fn set_relative_rect(&mut self, id: WidgetId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(id.0) {
            n.relative_rect = rect;
        }
    }

    /// Rect in root (window) coordinates, accumulating parent origins.
    pub fn window_rect(&self, id: WidgetId) -> Option<Rect> {
        let mut rect = self.relative_rect(id)?;
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            let pr = self.nodes[p.0].relative_rect;
            rect = rect.translated(pr.x, pr.y);
            cursor = self.nodes[p.0].parent;
        }
        Some(rect)
    }

    /// Deepest widget containing `point` (window coordinates), preferring the
    /// last-added sibling when children overlap.
    pub fn hit_test(&self, point: Point) -> Option<WidgetId> {
        let roots: Vec<WidgetId> = (0..self.nodes.len())
            .map(WidgetId)
            .filter(|id| self.nodes[id.0].parent.is_none())
            .collect();
        roots
            .into_iter()
            .rev()
            .find_map(|root| self.hit_test_from(root, point))
    }

    fn hit_test_from(&self, id: WidgetId, point: Point) -> Option<WidgetId> {
        let rect = self.window_rect(id)?;
        if !rect.contains_point(point) {
            return None;
        }
        self.children(id)
            .iter()
            .rev()
            .find_map(|c| self.hit_test_from(*c, point))
            .or(Some(id))
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Move focus. Focusing the already-focused widget is a no-op.
    pub fn set_focus(&mut self, id: Option<WidgetId>) -> FocusChange {
        let id = id.filter(|i| self.contains(*i));
        if id == self.focused {
            return FocusChange::default();
        }
        let change = FocusChange {
            lost: self.focused,
            gained: id,
        };
        self.focused = id;
        change
    }
}

/// Widgets that react to keyboard focus.
pub trait Focusable {
    fn focus_in(&mut self, now: Instant);
    fn focus_out(&mut self);
    fn is_focused(&self) -> bool;
}

/// Widgets whose content can be larger than their visible area.
pub trait Scrollable {
    /// Current (horizontal, vertical) offsets.
    fn scroll_offsets(&self) -> Point;
    /// Scroll by whole steps along one axis. Returns true if an offset changed.
    fn scroll_by(&mut self, orientation: Orientation, steps: i32) -> bool;
}
