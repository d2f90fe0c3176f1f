//! Capability contracts: leaf measurement and cell-owning containers.

use std::any::Any;

use crate::geometry::{Rect, Size};
use crate::layout::Cell;

use super::node::ViewId;
use super::tree::ViewTree;

/// Result of a measure pass: natural size plus an optional maximum.
///
/// A zero component of `max` means unlimited on that axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Measured {
    pub size: Size,
    pub max: Size,
}

impl Measured {
    pub const fn new(size: Size) -> Self {
        Self { size, max: Size::ZERO }
    }

    pub const fn with_max(size: Size, max: Size) -> Self {
        Self { size, max }
    }
}

/// A child rect computed by a container, relative to the container's origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub view: ViewId,
    pub rect: Rect,
}

/// Natural size of a leaf view (text, image, custom content).
///
/// Must be deterministic and side-effect free.
pub trait Measure {
    fn calculated_size(&self, total: Size) -> Measured;
}

impl<F> Measure for F
where
    F: Fn(Size) -> Size,
{
    fn calculated_size(&self, total: Size) -> Measured {
        Measured::new(self(total))
    }
}

/// A view that owns an ordered list of cells and lays them out.
///
/// Both measure and arrange take `&self` and a shared tree: they may read
/// child sizes but cannot mutate anything. The tree applies the returned
/// placements itself, which keeps `calculated_size` idempotent.
pub trait Container: Any {
    fn cells(&self) -> &[Cell];

    fn cells_mut(&mut self) -> &mut Vec<Cell>;

    /// Natural size given `total` available space.
    fn calculated_size(&self, tree: &ViewTree, total: Size) -> Measured;

    /// Child rects for a container whose local bounds are `bounds`.
    ///
    /// Collapsed cells get no placement.
    fn layout(&self, tree: &ViewTree, bounds: Rect) -> Vec<Placement>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
