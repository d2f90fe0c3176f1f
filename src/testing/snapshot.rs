//! Snapshot helpers.
//!
//! [`layout_to_string`] renders an arranged view tree as indented text, one
//! view per line, for inline snapshot assertions.

use std::fmt::Write;

use crate::view::{ViewId, ViewTree};

/// Render `root` and its arranged descendants as `name x,y wxh` lines.
///
/// Children are indented two spaces under their container and listed in cell
/// order. Collapsed cells are left out; views that are not shown are marked
/// `(hidden)`. Rects are relative to the parent, as stored.
///
/// # Examples
///
/// ```ignore
/// let text = layout_to_string(&tree, root);
/// insta::assert_snapshot!(text, @r"
/// row 0,0 100x20
///   a 0,0 10x10
/// ");
/// ```
pub fn layout_to_string(tree: &ViewTree, root: ViewId) -> String {
    let mut out = String::new();
    write_view(tree, root, 0, &mut out);
    out
}

fn write_view(tree: &ViewTree, id: ViewId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    let rect = node.rect();
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = write!(
        out,
        "{:indent$}{} {},{} {}x{}",
        "",
        node.name,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        indent = depth * 2
    );
    if !node.is_shown() {
        out.push_str(" (hidden)");
    }
    for child in tree.children(id) {
        write_view(tree, child, depth + 1, out);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
