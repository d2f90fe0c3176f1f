//! The view arena: structure, cell bookkeeping, measure/arrange driver.
//!
//! Containers own their children through cells; the tree keeps a parent
//! back-link per view for upward traversal only. Structural mutations mark the
//! owning container chain dirty, and [`ViewTree::layout_pass`] re-arranges the
//! topmost dirty containers depth-first, parent rect first.
//!
//! Views whose appearance changed are queued in an invalidation outbox that the
//! exposure scheduler drains ([`ViewTree::take_invalidated`]).

use std::cmp::Ordering;

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{invariant_violated, ViewError};
use crate::geometry::{Pos, Rect, Size};
use crate::layout::Cell;

use super::node::{LayoutState, ViewId, ViewKind, ViewNode};
use super::traits::Measured;

/// Arena of views, backed by a slotmap.
#[derive(Debug)]
pub struct ViewTree {
    pub(crate) nodes: SlotMap<ViewId, ViewNode>,
    parent: SecondaryMap<ViewId, ViewId>,
    root: Option<ViewId>,
    invalidated: Vec<ViewId>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            parent: SecondaryMap::new(),
            root: None,
            invalidated: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// Insert a detached view. The first one inserted becomes the root.
    pub fn insert(&mut self, node: ViewNode) -> ViewId {
        let id = self.nodes.insert(node);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Append `node` to `container` inside `cell`.
    pub fn add_child(&mut self, container: ViewId, node: ViewNode, cell: Cell) -> Option<ViewId> {
        self.insert_child(container, usize::MAX, node, cell)
    }

    /// Insert `node` into `container` at cell position `index` (clamped).
    pub fn insert_child(
        &mut self,
        container: ViewId,
        index: usize,
        node: ViewNode,
        cell: Cell,
    ) -> Option<ViewId> {
        if !self.check_container(container) {
            return None;
        }
        let id = self.nodes.insert(node);
        self.attach(container, id, cell, index).then_some(id)
    }

    /// Attach an existing detached view to `container` at `index` (clamped).
    pub fn attach(&mut self, container: ViewId, child: ViewId, mut cell: Cell, index: usize) -> bool {
        if !self.check_container(container) {
            return false;
        }
        if !self.nodes.contains_key(child) {
            invariant_violated(ViewError::UnknownView(child));
            return false;
        }
        if self.parent.contains_key(child) {
            invariant_violated(ViewError::AlreadyAttached(child));
            return false;
        }
        cell.view = Some(child);
        if let Some(cells) = self.cells_vec_mut(container) {
            let at = index.min(cells.len());
            cells.insert(at, cell);
        }
        self.parent.insert(child, container);
        if self.root == Some(child) {
            self.root = None;
        }
        if self.nodes.get(container).is_some_and(|n| n.presented) {
            self.set_presented(child, true);
        }
        self.mark_needs_layout(container);
        true
    }

    /// Append a grid span placeholder cell to `container`.
    pub fn add_placeholder(&mut self, container: ViewId) -> bool {
        match self.cells_vec_mut(container) {
            Some(cells) => {
                cells.push(Cell::placeholder());
                self.mark_needs_layout(container);
                true
            }
            None => false,
        }
    }

    /// Remove a view and its whole subtree.
    ///
    /// The view's cell is removed from its parent container. Returns every
    /// removed id in depth-first order, starting with `id`.
    pub fn remove(&mut self, id: ViewId) -> Vec<ViewId> {
        if !self.nodes.contains_key(id) {
            invariant_violated(ViewError::UnknownView(id));
            return Vec::new();
        }
        if let Some(parent) = self.parent.get(id).copied() {
            if let Some(index) = self.cell_index(parent, id) {
                if let Some(cells) = self.cells_vec_mut(parent) {
                    cells.remove(index);
                }
            }
            self.mark_needs_layout(parent);
        }
        self.drop_subtree(id)
    }

    fn drop_subtree(&mut self, id: ViewId) -> Vec<ViewId> {
        let removed = self.walk_depth_first(id);
        for &view in &removed {
            self.parent.remove(view);
            self.nodes.remove(view);
        }
        if self.root.is_some_and(|r| removed.contains(&r)) {
            self.root = None;
        }
        self.invalidated.retain(|v| !removed.contains(v));
        removed
    }

    /// Replace `old` with `node`, keeping the cell and the current rect.
    ///
    /// Returns the new view and the ids removed with `old`.
    pub fn replace_child(
        &mut self,
        container: ViewId,
        old: ViewId,
        node: ViewNode,
    ) -> Option<(ViewId, Vec<ViewId>)> {
        let index = self.cell_index(container, old)?;
        let rect = self.nodes.get(old).map(|n| n.rect).unwrap_or_default();
        let presented = self.nodes.get(container).is_some_and(|n| n.presented);

        let new_id = self.nodes.insert(node);
        if let Some(n) = self.nodes.get_mut(new_id) {
            n.rect = rect;
        }
        if let Some(cells) = self.cells_vec_mut(container) {
            cells[index].view = Some(new_id);
        }
        self.parent.insert(new_id, container);
        self.parent.remove(old);
        let removed = self.drop_subtree(old);
        if presented {
            self.set_presented(new_id, true);
        }
        self.mark_needs_layout(container);
        Some((new_id, removed))
    }

    /// Collapse or restore a child. The cell keeps its list position.
    ///
    /// Returns whether the collapsed state changed.
    pub fn collapse_child(&mut self, container: ViewId, child: ViewId, collapsed: bool) -> bool {
        let Some(index) = self.cell_index(container, child) else {
            return false;
        };
        let Some(cells) = self.cells_vec_mut(container) else {
            return false;
        };
        if cells[index].collapsed == collapsed {
            return false;
        }
        cells[index].collapsed = collapsed;
        self.mark_needs_layout(container);
        if !collapsed {
            self.invalidate(child);
        }
        true
    }

    /// Stable sort of a container's cells.
    pub fn sort_cells(&mut self, container: ViewId, compare: impl FnMut(&Cell, &Cell) -> Ordering) {
        if let Some(cells) = self.cells_vec_mut(container) {
            cells.sort_by(compare);
            self.mark_needs_layout(container);
        }
    }

    // -----------------------------------------------------------------------
    // Cells
    // -----------------------------------------------------------------------

    /// Position of `child`'s cell in `container`.
    ///
    /// Asking for a view the container does not own is an invariant violation.
    pub fn cell_index(&self, container: ViewId, child: ViewId) -> Option<usize> {
        let Some(node) = self.nodes.get(container) else {
            invariant_violated(ViewError::UnknownView(container));
            return None;
        };
        let Some(c) = node.as_container() else {
            invariant_violated(ViewError::NotAContainer(container));
            return None;
        };
        let index = c.cells().iter().position(|cell| cell.view == Some(child));
        if index.is_none() {
            invariant_violated(ViewError::CellNotFound { container, child });
        }
        index
    }

    pub fn cell(&self, container: ViewId, child: ViewId) -> Option<&Cell> {
        let index = self.cell_index(container, child)?;
        self.cells(container).get(index)
    }

    /// Mutable access to a child's cell. Marks the container for layout.
    pub fn cell_mut(&mut self, container: ViewId, child: ViewId) -> Option<&mut Cell> {
        let index = self.cell_index(container, child)?;
        self.mark_needs_layout(container);
        self.cells_vec_mut(container)?.get_mut(index)
    }

    /// Whether `container` has a cell for `child`. Never asserts.
    pub fn contains_child(&self, container: ViewId, child: ViewId) -> bool {
        self.cells(container).iter().any(|c| c.view == Some(child))
    }

    /// A container's cells; empty for leaves and unknown ids.
    pub fn cells(&self, container: ViewId) -> &[Cell] {
        self.nodes
            .get(container)
            .and_then(ViewNode::as_container)
            .map(|c| c.cells())
            .unwrap_or(&[])
    }

    fn cells_vec_mut(&mut self, container: ViewId) -> Option<&mut Vec<Cell>> {
        self.nodes
            .get_mut(container)?
            .as_container_mut()
            .map(|c| c.cells_mut())
    }

    fn check_container(&self, container: ViewId) -> bool {
        match self.nodes.get(container) {
            None => {
                invariant_violated(ViewError::UnknownView(container));
                false
            }
            Some(node) if !node.is_container() => {
                invariant_violated(ViewError::NotAContainer(container));
                false
            }
            Some(_) => true,
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.parent.get(id).copied()
    }

    /// Child views in cell order, skipping collapsed cells.
    pub fn children(&self, id: ViewId) -> Vec<ViewId> {
        self.cells(id)
            .iter()
            .filter(|c| !c.collapsed)
            .filter_map(|c| c.view)
            .collect()
    }

    /// Child views in cell order, including collapsed ones.
    pub fn all_children(&self, id: ViewId) -> Vec<ViewId> {
        self.cells(id).iter().filter_map(|c| c.view).collect()
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent(current) {
            result.push(p);
            current = p;
        }
        result
    }

    /// Pre-order traversal from `start`, collapsed children included.
    pub fn walk_depth_first(&self, start: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            for child in self.all_children(current).into_iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn set_root(&mut self, id: ViewId) {
        self.root = Some(id);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All view ids, in arena order.
    pub fn ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.nodes.keys()
    }

    /// Rect in root coordinates.
    pub fn absolute_rect(&self, id: ViewId) -> Option<Rect> {
        let mut rect = self.nodes.get(id)?.rect;
        for ancestor in self.ancestors(id) {
            if let Some(node) = self.nodes.get(ancestor) {
                rect = rect.translated(node.rect.pos());
            }
        }
        Some(rect)
    }

    /// Whether the view can currently appear: presented, shown along the
    /// whole parent chain, and not inside a collapsed cell.
    pub fn is_displayed(&self, id: ViewId) -> bool {
        let mut current = id;
        loop {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            if !node.presented || !node.shown {
                return false;
            }
            match self.parent(current) {
                Some(p) => {
                    let collapsed = self
                        .cells(p)
                        .iter()
                        .find(|c| c.view == Some(current))
                        .is_some_and(|c| c.collapsed);
                    if collapsed {
                        return false;
                    }
                    current = p;
                }
                None => return true,
            }
        }
    }

    /// Whether any view in the subtree is waiting on a resource.
    pub fn is_loading(&self, id: ViewId) -> bool {
        self.walk_depth_first(id)
            .into_iter()
            .any(|v| self.nodes.get(v).is_some_and(|n| n.loading))
    }

    // -----------------------------------------------------------------------
    // View state
    // -----------------------------------------------------------------------

    /// Mark a subtree as attached to (or detached from) a live window.
    pub fn set_presented(&mut self, id: ViewId, presented: bool) {
        for view in self.walk_depth_first(id) {
            if let Some(node) = self.nodes.get_mut(view) {
                node.presented = presented;
            }
        }
    }

    pub fn set_shown(&mut self, id: ViewId, shown: bool) -> bool {
        self.update_flag(id, shown, |n| &mut n.shown)
    }

    pub fn set_usable(&mut self, id: ViewId, usable: bool) -> bool {
        self.update_flag(id, usable, |n| &mut n.usable)
    }

    pub fn set_highlighted(&mut self, id: ViewId, highlighted: bool) -> bool {
        self.update_flag(id, highlighted, |n| &mut n.highlighted)
    }

    pub fn set_loading(&mut self, id: ViewId, loading: bool) -> bool {
        self.update_flag(id, loading, |n| &mut n.loading)
    }

    /// Set a flag; an actual change invalidates the view's appearance.
    fn update_flag(&mut self, id: ViewId, value: bool, flag: impl FnOnce(&mut ViewNode) -> &mut bool) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            invariant_violated(ViewError::UnknownView(id));
            return false;
        };
        let slot = flag(node);
        if *slot == value {
            return false;
        }
        *slot = value;
        self.invalidate(id);
        true
    }

    // -----------------------------------------------------------------------
    // Measure / arrange
    // -----------------------------------------------------------------------

    /// Natural size of a view, raised to its minimum size.
    ///
    /// Pure: repeated calls with the same input return the same result.
    pub fn calculated_size(&self, id: ViewId, total: Size) -> Measured {
        let Some(node) = self.nodes.get(id) else {
            return Measured::default();
        };
        let measured = match &node.kind {
            ViewKind::Leaf(Some(measure)) => measure.calculated_size(total),
            ViewKind::Leaf(None) => Measured::new(node.min_size),
            ViewKind::Container(c) => c.calculated_size(self, total),
        };
        Measured::with_max(measured.size.max(node.min_size), measured.max)
    }

    /// Assign a rect (relative to the parent).
    ///
    /// A changed rect invalidates the view. Containers whose size changed, or
    /// that are dirty, arrange their children immediately. Returns whether the
    /// rect changed.
    pub fn set_rect(&mut self, id: ViewId, rect: Rect) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            invariant_violated(ViewError::UnknownView(id));
            return false;
        };
        let old = node.rect;
        node.rect = rect;
        let changed = old != rect;
        let needs_arrange = node.is_container()
            && (old.size() != rect.size() || node.layout_state == LayoutState::Dirty);
        if !node.is_container() {
            node.layout_state = LayoutState::Arranged;
        }
        if changed {
            self.invalidate(id);
        }
        if needs_arrange {
            self.arrange(id);
        }
        changed
    }

    /// Lay out a container's children inside its current rect, recursively.
    pub fn arrange(&mut self, id: ViewId) {
        let Some(node) = self.nodes.get_mut(id) else {
            invariant_violated(ViewError::UnknownView(id));
            return;
        };
        if !node.is_container() {
            invariant_violated(ViewError::NotAContainer(id));
            return;
        }
        if node.layout_state == LayoutState::Measuring {
            invariant_violated(ViewError::ReentrantArrange(id));
            return;
        }
        node.layout_state = LayoutState::Measuring;
        let bounds = Rect::from_size(node.rect.size());

        let placements = match self.nodes.get(id).and_then(ViewNode::as_container) {
            Some(c) => c.layout(self, bounds),
            None => Vec::new(),
        };
        log::debug!("arranging {} children of {:?}", placements.len(), id);
        for p in placements {
            self.set_rect(p.view, p.rect);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.layout_state = LayoutState::Arranged;
        }
    }

    /// Record that a view's content changed: it needs a redraw, and every
    /// container above it needs a new layout.
    pub fn mark_needs_layout(&mut self, id: ViewId) {
        let Some(node) = self.nodes.get_mut(id) else {
            invariant_violated(ViewError::UnknownView(id));
            return;
        };
        node.layout_state = LayoutState::Dirty;
        self.invalidate(id);
        let mut current = id;
        while let Some(p) = self.parent(current) {
            if let Some(parent) = self.nodes.get_mut(p) {
                parent.layout_state = LayoutState::Dirty;
            }
            current = p;
        }
    }

    /// Whether any container is waiting for a layout pass.
    pub fn needs_layout(&self) -> bool {
        self.nodes
            .values()
            .any(|n| n.is_container() && n.layout_state == LayoutState::Dirty)
    }

    /// Arrange every topmost dirty container. Returns how many were arranged.
    pub fn layout_pass(&mut self) -> usize {
        let tops: Vec<ViewId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.is_container() && n.layout_state == LayoutState::Dirty)
            .filter(|(id, _)| {
                self.parent(*id)
                    .and_then(|p| self.nodes.get(p))
                    .is_none_or(|p| p.layout_state != LayoutState::Dirty)
            })
            .map(|(id, _)| id)
            .collect();
        for &id in &tops {
            // An earlier arrange in this pass may already have reached it.
            if self.nodes.get(id).is_some_and(|n| n.layout_state == LayoutState::Dirty) {
                self.arrange(id);
            }
        }
        tops.len()
    }

    // -----------------------------------------------------------------------
    // Invalidation outbox
    // -----------------------------------------------------------------------

    /// Queue a drawable view for exposure. Views without drawing state are
    /// ignored.
    pub fn invalidate(&mut self, id: ViewId) {
        if self.nodes.get(id).is_some_and(|n| n.drawable.is_some()) {
            self.invalidated.push(id);
        }
    }

    /// Drain queued invalidations, deduplicated, in first-queued order.
    pub fn take_invalidated(&mut self) -> Vec<ViewId> {
        let mut out: Vec<ViewId> = Vec::with_capacity(self.invalidated.len());
        for id in self.invalidated.drain(..) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }

    /// Offset of the view's origin in root coordinates.
    pub fn origin(&self, id: ViewId) -> Pos {
        self.absolute_rect(id).map(Rect::pos).unwrap_or_default()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
