//! Grid container with a fixed column count.
//!
//! Non-free cells flow row-major into `columns` columns. Column widths come
//! from a sweep over columns (widest single-column cell), then row heights from
//! a sweep over rows. A placeholder cell (no view) directly right of a cell
//! widens that cell's column span; a full row of placeholders directly below
//! its spanned columns deepens its row span. Cells claim placeholders in
//! row-major order and each placeholder joins at most one span, so the first
//! cell to reach it wins. Spanning cells that need more room grow their last
//! spanned column or row.
//!
//! Surplus space is split between columns (rows) holding a cell that expands
//! horizontally (vertically).

use std::any::Any;

use crate::geometry::{Axis, Insets, Rect, Size};
use crate::view::{Container, Measured, Placement, ViewTree};

use super::cell::Cell;
use super::{measure_cell, split_evenly, CellSize};

/// Default column and row gaps.
pub const DEFAULT_GRID_SPACING: Size = Size::new(6.0, 4.0);

/// Fixed-column grid of cells.
#[derive(Debug)]
pub struct GridView {
    columns: usize,
    cells: Vec<Cell>,
    spacing: Size,
    margin: Insets,
}

/// A cell's position in the grid.
#[derive(Debug)]
struct Entry {
    cell: usize,
    row: usize,
    col: usize,
    col_span: usize,
    row_span: usize,
    measured: CellSize,
    /// Measured size plus cell margin.
    outer: Size,
}

/// Result of the two sizing sweeps.
#[derive(Debug, Default)]
struct Table {
    widths: Vec<f64>,
    heights: Vec<f64>,
    entries: Vec<Entry>,
}

impl Table {
    fn extent(lengths: &[f64], gap: f64) -> f64 {
        let gaps = if lengths.len() > 1 { gap * (lengths.len() - 1) as f64 } else { 0.0 };
        lengths.iter().sum::<f64>() + gaps
    }

    /// Start offsets of each track, beginning at `origin`.
    fn offsets(lengths: &[f64], gap: f64, origin: f64) -> Vec<f64> {
        let mut pos = origin;
        lengths
            .iter()
            .map(|len| {
                let start = pos;
                pos += len + gap;
                start
            })
            .collect()
    }
}

impl GridView {
    /// A grid with `columns` columns (at least one).
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            cells: Vec::new(),
            spacing: DEFAULT_GRID_SPACING,
            margin: Insets::ZERO,
        }
    }

    /// Set column and row gaps (builder).
    pub fn with_spacing(mut self, spacing: Size) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    pub fn spacing(&self) -> Size {
        self.spacing
    }

    pub fn margin(&self) -> Insets {
        self.margin
    }

    fn table(&self, tree: &ViewTree, total: Size) -> Table {
        let cols = self.columns;
        let positioned: Vec<usize> = (0..self.cells.len()).filter(|&i| !self.cells[i].free).collect();
        if positioned.is_empty() {
            return Table::default();
        }
        let rows = positioned.len().div_ceil(cols);
        // A placeholder belongs to at most one spanning cell.
        let mut claimed = vec![false; positioned.len()];
        let is_free_placeholder = |claimed: &[bool], row: usize, col: usize| {
            let pos = row * cols + col;
            pos < positioned.len() && !claimed[pos] && self.cells[positioned[pos]].is_placeholder()
        };

        let mut table = Table {
            widths: vec![0.0; cols.min(positioned.len())],
            heights: vec![0.0; rows],
            entries: Vec::new(),
        };
        for (pos, &index) in positioned.iter().enumerate() {
            let cell = &self.cells[index];
            if !cell.is_arranged() {
                continue;
            }
            let (row, col) = (pos / cols, pos % cols);
            let mut col_span = 1;
            while col + col_span < cols && is_free_placeholder(&claimed, row, col + col_span) {
                claimed[row * cols + col + col_span] = true;
                col_span += 1;
            }
            let mut row_span = 1;
            loop {
                let below = row + row_span;
                if !(col..col + col_span).all(|c| is_free_placeholder(&claimed, below, c)) {
                    break;
                }
                for c in col..col + col_span {
                    claimed[below * cols + c] = true;
                }
                row_span += 1;
            }
            let measured = measure_cell(tree, cell, total);
            let outer = measured.size + cell.margin.size();
            table.entries.push(Entry { cell: index, row, col, col_span, row_span, measured, outer });
        }

        for e in table.entries.iter().filter(|e| e.col_span == 1) {
            table.widths[e.col] = table.widths[e.col].max(e.outer.width);
        }
        for e in table.entries.iter().filter(|e| e.col_span > 1) {
            let last = (e.col + e.col_span).min(table.widths.len()) - 1;
            let have = Table::extent(&table.widths[e.col..=last], self.spacing.width);
            if e.outer.width > have {
                table.widths[last] += e.outer.width - have;
            }
        }
        for e in table.entries.iter().filter(|e| e.row_span == 1) {
            table.heights[e.row] = table.heights[e.row].max(e.outer.height);
        }
        for e in table.entries.iter().filter(|e| e.row_span > 1) {
            let last = (e.row + e.row_span).min(table.heights.len()) - 1;
            let have = Table::extent(&table.heights[e.row..=last], self.spacing.height);
            if e.outer.height > have {
                table.heights[last] += e.outer.height - have;
            }
        }
        table
    }

    /// Give surplus to tracks containing a cell that expands on `axis`.
    fn grow_tracks(&self, table: &mut Table, axis: Axis, available: f64) {
        let (lengths, gap) = match axis {
            Axis::Horizontal => (&table.widths, self.spacing.width),
            Axis::Vertical => (&table.heights, self.spacing.height),
        };
        let surplus = available - Table::extent(lengths, gap);
        if surplus <= 0.0 {
            return;
        }
        let growing: Vec<usize> = (0..lengths.len())
            .filter(|&track| {
                table.entries.iter().any(|e| {
                    let start = if axis.is_vertical() { e.row } else { e.col };
                    start == track && self.cells[e.cell].alignment.is_expand(axis)
                })
            })
            .collect();
        let lengths = match axis {
            Axis::Horizontal => &mut table.widths,
            Axis::Vertical => &mut table.heights,
        };
        for (track, share) in growing.iter().zip(split_evenly(surplus, growing.len())) {
            lengths[*track] += share;
        }
    }
}

impl Container for GridView {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }

    fn calculated_size(&self, tree: &ViewTree, total: Size) -> Measured {
        let inner_total = (total - self.margin.size()).non_negative();
        let table = self.table(tree, inner_total);
        let size = Size::new(
            Table::extent(&table.widths, self.spacing.width),
            Table::extent(&table.heights, self.spacing.height),
        );
        Measured::new(size + self.margin.size())
    }

    fn layout(&self, tree: &ViewTree, bounds: Rect) -> Vec<Placement> {
        let inner = bounds.inset(self.margin);
        let mut table = self.table(tree, inner.size());
        self.grow_tracks(&mut table, Axis::Horizontal, inner.width);
        self.grow_tracks(&mut table, Axis::Vertical, inner.height);

        let xs = Table::offsets(&table.widths, self.spacing.width, inner.x);
        let ys = Table::offsets(&table.heights, self.spacing.height, inner.y);

        let mut placed: Vec<(usize, Placement)> = Vec::new();
        for e in &table.entries {
            let cell = &self.cells[e.cell];
            let Some(view) = cell.view else { continue };
            let last_col = (e.col + e.col_span).min(xs.len()) - 1;
            let last_row = (e.row + e.row_span).min(ys.len()) - 1;
            let frame = Rect::new(
                xs[e.col],
                ys[e.row],
                xs[last_col] + table.widths[last_col] - xs[e.col],
                ys[last_row] + table.heights[last_row] - ys[e.row],
            );
            let rect = frame.align_limited(e.measured.size, cell.alignment, cell.margin, e.measured.max);
            placed.push((e.cell, Placement { view, rect }));
        }

        for (index, cell) in self.cells.iter().enumerate() {
            if !(cell.free && cell.is_arranged()) {
                continue;
            }
            let Some(view) = cell.view else { continue };
            let measured = measure_cell(tree, cell, inner.size());
            let rect = inner.align_limited(measured.size, cell.alignment, cell.margin, measured.max);
            placed.push((index, Placement { view, rect }));
        }

        placed.sort_by_key(|(index, _)| *index);
        placed.into_iter().map(|(_, p)| p).collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::Alignment;
    use crate::view::{ViewId, ViewNode};
    use pretty_assertions::assert_eq;

    fn grid_tree(grid: GridView) -> (ViewTree, ViewId) {
        let mut tree = ViewTree::new();
        let root = tree.insert(ViewNode::container("grid", grid));
        (tree, root)
    }

    fn add(tree: &mut ViewTree, grid: ViewId, w: f64, h: f64, alignment: Alignment) -> ViewId {
        tree.add_child(grid, ViewNode::leaf("c").with_min_size(Size::new(w, h)), Cell::new(alignment))
            .unwrap()
    }

    fn rect_of(tree: &ViewTree, id: ViewId) -> Rect {
        tree.get(id).unwrap().rect()
    }

    #[test]
    fn default_spacing() {
        let grid = GridView::new(3);
        assert_eq!(grid.spacing(), Size::new(6.0, 4.0));
        assert_eq!(GridView::new(0).columns(), 1);
    }

    #[test]
    fn column_then_row_sweeps() {
        let (mut tree, root) = grid_tree(GridView::new(2).with_spacing(Size::new(2.0, 1.0)));
        add(&mut tree, root, 10.0, 5.0, Alignment::TOP_LEFT);
        add(&mut tree, root, 4.0, 8.0, Alignment::TOP_LEFT);
        add(&mut tree, root, 6.0, 3.0, Alignment::TOP_LEFT);
        add(&mut tree, root, 12.0, 2.0, Alignment::TOP_LEFT);
        assert_eq!(tree.calculated_size(root, Size::ZERO).size, Size::new(10.0 + 12.0 + 2.0, 8.0 + 3.0 + 1.0));
    }

    #[test]
    fn incomplete_last_row() {
        let (mut tree, root) = grid_tree(GridView::new(3).with_spacing(Size::ZERO));
        for _ in 0..4 {
            add(&mut tree, root, 5.0, 5.0, Alignment::TOP_LEFT);
        }
        assert_eq!(tree.calculated_size(root, Size::ZERO).size, Size::new(15.0, 10.0));
    }

    #[test]
    fn fewer_cells_than_columns() {
        let (mut tree, root) = grid_tree(GridView::new(7).with_spacing(Size::new(1.0, 1.0)));
        add(&mut tree, root, 5.0, 5.0, Alignment::TOP_LEFT);
        add(&mut tree, root, 5.0, 5.0, Alignment::TOP_LEFT);
        assert_eq!(tree.calculated_size(root, Size::ZERO).size, Size::new(11.0, 5.0));
    }

    #[test]
    fn cells_aligned_inside_their_box() {
        let (mut tree, root) = grid_tree(GridView::new(2).with_spacing(Size::ZERO));
        let wide = add(&mut tree, root, 20.0, 10.0, Alignment::TOP_LEFT);
        let small = add(&mut tree, root, 4.0, 4.0, Alignment::CENTER);
        let narrow = add(&mut tree, root, 6.0, 2.0, Alignment::BOTTOM_RIGHT);
        tree.set_rect(root, Rect::new(0.0, 0.0, 30.0, 12.0));
        assert_eq!(rect_of(&tree, wide), Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(rect_of(&tree, small), Rect::new(20.0, 3.0, 4.0, 4.0));
        assert_eq!(rect_of(&tree, narrow), Rect::new(14.0, 10.0, 6.0, 2.0));
    }

    #[test]
    fn placeholder_extends_column_span() {
        let (mut tree, root) = grid_tree(GridView::new(2).with_spacing(Size::new(2.0, 0.0)));
        let banner = add(&mut tree, root, 30.0, 5.0, Alignment::LEFT | Alignment::TOP | Alignment::HOR_EXPAND);
        tree.add_placeholder(root);
        let a = add(&mut tree, root, 10.0, 5.0, Alignment::TOP_LEFT);
        let b = add(&mut tree, root, 10.0, 5.0, Alignment::TOP_LEFT);
        assert_eq!(tree.calculated_size(root, Size::ZERO).size, Size::new(30.0, 10.0));
        tree.set_rect(root, Rect::new(0.0, 0.0, 30.0, 10.0));
        assert_eq!(rect_of(&tree, banner), Rect::new(0.0, 0.0, 30.0, 5.0));
        assert_eq!(rect_of(&tree, a), Rect::new(0.0, 5.0, 10.0, 5.0));
        assert_eq!(rect_of(&tree, b), Rect::new(12.0, 5.0, 10.0, 5.0));
    }

    #[test]
    fn placeholder_below_extends_row_span() {
        let (mut tree, root) = grid_tree(GridView::new(2).with_spacing(Size::ZERO));
        let tall = add(&mut tree, root, 5.0, 30.0, Alignment::TOP_LEFT);
        let a = add(&mut tree, root, 5.0, 10.0, Alignment::TOP_LEFT);
        tree.add_placeholder(root);
        let b = add(&mut tree, root, 5.0, 10.0, Alignment::TOP_LEFT);
        assert_eq!(tree.calculated_size(root, Size::ZERO).size, Size::new(10.0, 30.0));
        tree.set_rect(root, Rect::new(0.0, 0.0, 10.0, 30.0));
        assert_eq!(rect_of(&tree, tall), Rect::new(0.0, 0.0, 5.0, 30.0));
        assert_eq!(rect_of(&tree, a), Rect::new(5.0, 0.0, 5.0, 10.0));
        assert_eq!(rect_of(&tree, b), Rect::new(5.0, 10.0, 5.0, 10.0));
    }

    #[test]
    fn placeholder_joins_only_first_claiming_span() {
        // B reaches the placeholder as a row span before C reaches it as a column span.
        let (mut tree, root) = grid_tree(GridView::new(2).with_spacing(Size::ZERO));
        let a = add(&mut tree, root, 5.0, 5.0, Alignment::EXPAND);
        let b = add(&mut tree, root, 5.0, 5.0, Alignment::EXPAND);
        let c = add(&mut tree, root, 5.0, 5.0, Alignment::EXPAND);
        tree.add_placeholder(root);
        tree.set_rect(root, Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(rect_of(&tree, a), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rect_of(&tree, b), Rect::new(10.0, 0.0, 10.0, 20.0));
        assert_eq!(rect_of(&tree, c), Rect::new(0.0, 10.0, 10.0, 10.0));
        assert!(!rect_of(&tree, b).overlaps(rect_of(&tree, c)));
    }

    #[test]
    fn row_span_needs_placeholders_under_every_spanned_column() {
        let (mut tree, root) = grid_tree(GridView::new(2).with_spacing(Size::ZERO));
        let wide = add(&mut tree, root, 5.0, 5.0, Alignment::EXPAND);
        tree.add_placeholder(root);
        tree.add_placeholder(root);
        let x = add(&mut tree, root, 5.0, 5.0, Alignment::TOP_LEFT);
        tree.set_rect(root, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rect_of(&tree, wide), Rect::new(0.0, 0.0, 10.0, 5.0));
        assert_eq!(rect_of(&tree, x), Rect::new(5.0, 5.0, 5.0, 5.0));
        assert!(!rect_of(&tree, wide).overlaps(rect_of(&tree, x)));
    }

    #[test]
    fn surplus_goes_to_expanding_columns() {
        let (mut tree, root) = grid_tree(GridView::new(3).with_spacing(Size::ZERO));
        let a = add(&mut tree, root, 10.0, 5.0, Alignment::TOP_LEFT);
        let b = add(&mut tree, root, 10.0, 5.0, Alignment::TOP | Alignment::HOR_EXPAND);
        let c = add(&mut tree, root, 10.0, 5.0, Alignment::TOP_LEFT);
        tree.set_rect(root, Rect::new(0.0, 0.0, 50.0, 5.0));
        assert_eq!(rect_of(&tree, a), Rect::new(0.0, 0.0, 10.0, 5.0));
        assert_eq!(rect_of(&tree, b), Rect::new(10.0, 0.0, 30.0, 5.0));
        assert_eq!(rect_of(&tree, c), Rect::new(40.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn collapsed_cell_keeps_position_but_no_size() {
        let (mut tree, root) = grid_tree(GridView::new(2).with_spacing(Size::ZERO));
        let _a = add(&mut tree, root, 5.0, 5.0, Alignment::TOP_LEFT);
        let b = add(&mut tree, root, 40.0, 5.0, Alignment::TOP_LEFT);
        let c = add(&mut tree, root, 5.0, 5.0, Alignment::TOP_LEFT);
        tree.collapse_child(root, b, true);
        assert_eq!(tree.calculated_size(root, Size::ZERO).size, Size::new(5.0, 10.0));
        tree.set_rect(root, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rect_of(&tree, c), Rect::new(0.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn calculated_size_is_idempotent() {
        let (mut tree, root) = grid_tree(GridView::new(3));
        for i in 0..8 {
            add(&mut tree, root, 3.0 + i as f64, 2.5, Alignment::CENTER);
        }
        let first = tree.calculated_size(root, Size::new(200.0, 200.0));
        assert_eq!(first, tree.calculated_size(root, Size::new(200.0, 200.0)));
    }
}
