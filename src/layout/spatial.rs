//! Spatial map for hit testing arranged views.
//!
//! [`SpatialMap`] keeps `(ViewId, Rect)` pairs in painter's order: a depth-first
//! walk puts children after their parents and later siblings after earlier
//! ones, so later entries are in front.

use crate::geometry::{Pos, Rect};
use crate::view::{ViewId, ViewTree};

/// Absolute view rects ordered back to front.
#[derive(Debug, Default)]
pub struct SpatialMap {
    /// Last entry is frontmost.
    entries: Vec<(ViewId, Rect)>,
}

impl SpatialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect absolute rects for `root` and its arranged descendants.
    /// Hidden views and collapsed cells are skipped along with their subtrees.
    pub fn from_tree(tree: &ViewTree, root: ViewId) -> Self {
        let mut map = Self::new();
        map.collect(tree, root, Pos::ZERO);
        map
    }

    fn collect(&mut self, tree: &ViewTree, id: ViewId, origin: Pos) {
        let Some(node) = tree.get(id) else { return };
        if !node.is_shown() {
            return;
        }
        let rect = node.rect().translated(origin);
        self.entries.push((id, rect));
        for child in tree.children(id) {
            self.collect(tree, child, rect.pos());
        }
    }

    /// Replace the contents with an explicit back-to-front list.
    pub fn update_ordered(&mut self, entries: &[(ViewId, Rect)]) {
        self.entries.clear();
        self.entries.extend_from_slice(entries);
    }

    /// Every view containing `pos`, frontmost first.
    pub fn hit_test(&self, pos: Pos) -> Vec<ViewId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, rect)| rect.contains(pos))
            .map(|(id, _)| *id)
            .collect()
    }

    /// The frontmost view containing `pos`.
    pub fn view_at(&self, pos: Pos) -> Option<ViewId> {
        self.entries
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(id, _)| *id)
    }

    /// Every view overlapping `area`, frontmost first.
    pub fn views_in_rect(&self, area: Rect) -> Vec<ViewId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, rect)| rect.overlaps(area))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
