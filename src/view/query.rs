//! Name and path lookups over the view tree.
//!
//! Paths are `/`-separated view names resolved from a starting view:
//!
//! - `name`: a direct child with that name
//! - `..`: the parent
//! - `*`: the next name may be found at any depth below
//!
//! For example `"toolbar/*/ok"` finds the first view named `ok` anywhere below
//! the `toolbar` child.

use super::node::ViewId;
use super::tree::ViewTree;

impl ViewTree {
    /// First view named `name` below `start` (collapsed children included).
    ///
    /// With `recursive` the whole subtree is searched depth-first; otherwise
    /// only direct children.
    pub fn find_view_by_name(&self, start: ViewId, name: &str, recursive: bool) -> Option<ViewId> {
        if recursive {
            return self
                .walk_depth_first(start)
                .into_iter()
                .skip(1)
                .find(|&id| self.has_name(id, name));
        }
        self.all_children(start)
            .into_iter()
            .find(|&id| self.has_name(id, name))
    }

    /// Resolve a `/`-separated path from `start`. An empty path is `start`.
    pub fn child_at_path(&self, start: ViewId, path: &str) -> Option<ViewId> {
        let mut current = start;
        let mut deep = false;
        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => current = self.parent(current)?,
                "*" => deep = true,
                name => {
                    current = self.find_view_by_name(current, name, deep)?;
                    deep = false;
                }
            }
        }
        self.contains(current).then_some(current)
    }

    /// `/`-joined names from the root down to `id`.
    pub fn path_of(&self, id: ViewId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .rev()
            .chain(std::iter::once(id))
            .filter_map(|v| self.get(v).map(|n| n.name.as_str()))
            .collect();
        if names.len() > 1 {
            // The root is implied by the starting point of a path lookup.
            names.remove(0);
        }
        names.join("/")
    }

    fn has_name(&self, id: ViewId, name: &str) -> bool {
        self.get(id).is_some_and(|n| n.name == name)
    }
}
