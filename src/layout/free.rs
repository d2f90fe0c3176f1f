//! Free-form container: every cell is aligned independently inside the
//! container's inner rect. Cells with an empty alignment keep whatever rect
//! was assigned to their view directly.

use std::any::Any;

use crate::geometry::{Insets, Rect, Size};
use crate::view::{Container, Measured, Placement, ViewTree};

use super::cell::Cell;
use super::measure_cell;

/// A container that does not flow its children.
///
/// Its natural size is zero; give it a minimum size or let its parent expand
/// it.
#[derive(Debug, Default)]
pub struct FreeView {
    cells: Vec<Cell>,
    margin: Insets,
}

impl FreeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    pub fn margin(&self) -> Insets {
        self.margin
    }
}

impl Container for FreeView {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }

    fn calculated_size(&self, _tree: &ViewTree, _total: Size) -> Measured {
        Measured::new(Size::ZERO)
    }

    fn layout(&self, tree: &ViewTree, bounds: Rect) -> Vec<Placement> {
        let inner = bounds.inset(self.margin);
        self.cells
            .iter()
            .filter(|c| c.is_arranged() && !c.alignment.is_empty())
            .filter_map(|cell| {
                let view = cell.view?;
                let measured = measure_cell(tree, cell, inner.size());
                let rect = inner.align_limited(measured.size, cell.alignment, cell.margin, measured.max);
                Some(Placement { view, rect })
            })
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
