//! Cell layout engine: sequential stacks, grids, free-form containers, and
//! hit testing over arranged views.
//!
//! Rounding rule shared by every container: measured cell sizes are rounded up
//! to whole units, surplus or deficit space is split in whole units (earliest
//! eligible cells get the remainder) and centering offsets are floored. Given
//! an integral container rect, every child rect is integral.

pub mod cell;
pub mod free;
pub mod grid;
pub mod spatial;
pub mod stack;

pub use cell::Cell;
pub use free::FreeView;
pub use grid::{GridView, DEFAULT_GRID_SPACING};
pub use spatial::SpatialMap;
pub use stack::{StackView, DEFAULT_STACK_SPACING};

use crate::geometry::Size;
use crate::view::ViewTree;

/// Measured size of a cell's view and the limit it may grow to.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct CellSize {
    pub size: Size,
    /// Zero components mean unlimited.
    pub max: Size,
}

/// Measure a cell: the view's natural size raised to the cell minimum, capped
/// by the cell maximum (or the view's own maximum hint), rounded up.
pub(crate) fn measure_cell(tree: &ViewTree, cell: &Cell, total: Size) -> CellSize {
    let Some(view) = cell.view else {
        return CellSize::default();
    };
    let measured = tree.calculated_size(view, total);
    let mut max = cell.max_size;
    if max.width <= 0.0 {
        max.width = measured.max.width;
    }
    if max.height <= 0.0 {
        max.height = measured.max.height;
    }
    let size = measured.size.max(cell.min_size).limited_to(max).ceil();
    CellSize { size, max }
}

/// Split `amount` whole units over `count` slots. The first
/// `amount % count` slots receive one extra unit.
pub(crate) fn split_evenly(amount: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let total = amount.floor().max(0.0);
    let base = (total / count as f64).floor();
    let extra = (total - base * count as f64) as usize;
    (0..count)
        .map(|i| if i < extra { base + 1.0 } else { base })
        .collect()
}
