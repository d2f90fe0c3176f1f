//! Sequential stack container.
//!
//! Flowing cells are laid out one after another along the stack's axis with
//! fixed spacing between them. Along the main axis a cell belongs to one of
//! three groups, picked from its alignment:
//!
//! - leading (left/top, or expanding): packed from the start, in list order
//! - trailing (right/bottom): packed against the end, list order preserved
//! - centered: packed together and centered in the whole inner span
//!
//! Surplus space goes to cells that expand on the main axis; a deficit is
//! taken from cells that shrink on it. On the cross axis each cell is aligned
//! inside the full inner span.

use std::any::Any;

use crate::alignment::Alignment;
use crate::geometry::{Axis, Insets, Rect, Size};
use crate::view::{Container, Measured, Placement, ViewTree};

use super::cell::Cell;
use super::{measure_cell, split_evenly, CellSize};

/// Default gap between adjacent cells.
pub const DEFAULT_STACK_SPACING: f64 = 6.0;

/// A horizontal or vertical stack of cells.
#[derive(Debug)]
pub struct StackView {
    axis: Axis,
    cells: Vec<Cell>,
    spacing: f64,
    margin: Insets,
}

/// One flowing cell during arrangement.
struct Slot {
    index: usize,
    measured: CellSize,
    /// Main-axis length including the cell margin.
    len: f64,
}

impl StackView {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            cells: Vec::new(),
            spacing: DEFAULT_STACK_SPACING,
            margin: Insets::ZERO,
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    /// Set the gap between cells (builder).
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the inner margin (builder).
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: f64) {
        self.spacing = spacing;
    }

    pub fn margin(&self) -> Insets {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Insets) {
        self.margin = margin;
    }

    fn gaps(&self, count: usize) -> f64 {
        if count > 1 {
            self.spacing * (count - 1) as f64
        } else {
            0.0
        }
    }

    fn slots(&self, tree: &ViewTree, total: Size) -> Vec<Slot> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_flowing())
            .map(|(index, cell)| {
                let measured = measure_cell(tree, cell, total);
                let len = measured.size.get(self.axis) + cell.margin.total(self.axis);
                Slot { index, measured, len }
            })
            .collect()
    }

    /// Hand surplus to expanding cells, or take a deficit from shrinking ones.
    fn distribute(&self, slots: &mut [Slot], available: f64) {
        let axis = self.axis;
        let used: f64 = slots.iter().map(|s| s.len).sum::<f64>() + self.gaps(slots.len());
        let diff = available - used;
        if diff > 0.0 {
            let expanders: Vec<usize> = (0..slots.len())
                .filter(|&i| self.cells[slots[i].index].alignment.is_expand(axis))
                .collect();
            for (i, share) in expanders.iter().zip(split_evenly(diff, expanders.len())) {
                let slot = &mut slots[*i];
                let cap = slot.measured.max.get(axis);
                let grow = if cap > 0.0 {
                    share.min((cap - slot.measured.size.get(axis)).max(0.0))
                } else {
                    share
                };
                slot.len += grow;
            }
        } else if diff < 0.0 {
            let shrinkers: Vec<usize> = (0..slots.len())
                .filter(|&i| self.cells[slots[i].index].alignment.is_shrink(axis))
                .collect();
            // What each shrinker can still give up.
            let mut room: Vec<f64> = shrinkers.iter().map(|&i| slots[i].measured.size.get(axis)).collect();
            let mut remaining = (-diff).ceil();
            while remaining > 0.0 {
                let active: Vec<usize> = (0..shrinkers.len()).filter(|&k| room[k] > 0.0).collect();
                if active.is_empty() {
                    break;
                }
                let mut taken = 0.0;
                for (&k, share) in active.iter().zip(split_evenly(remaining, active.len())) {
                    let cut = share.min(room[k]);
                    slots[shrinkers[k]].len -= cut;
                    room[k] -= cut;
                    taken += cut;
                }
                if taken <= 0.0 {
                    break;
                }
                remaining -= taken;
            }
        }
    }
}

impl Container for StackView {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut Vec<Cell> {
        &mut self.cells
    }

    fn calculated_size(&self, tree: &ViewTree, total: Size) -> Measured {
        let axis = self.axis;
        let cross_axis = axis.cross();
        let inner_total = (total - self.margin.size()).non_negative();
        let slots = self.slots(tree, inner_total);

        let main: f64 = slots.iter().map(|s| s.len).sum::<f64>() + self.gaps(slots.len());
        let cross = slots
            .iter()
            .map(|s| {
                s.measured.size.get(cross_axis) + self.cells[s.index].margin.total(cross_axis)
            })
            .fold(0.0, f64::max);
        Measured::new(Size::from_axis(axis, main, cross) + self.margin.size())
    }

    fn layout(&self, tree: &ViewTree, bounds: Rect) -> Vec<Placement> {
        let axis = self.axis;
        let cross_axis = axis.cross();
        let inner = bounds.inset(self.margin);
        let mut placed: Vec<(usize, Placement)> = Vec::new();

        for (index, cell) in self.cells.iter().enumerate() {
            if !(cell.free && cell.is_arranged()) {
                continue;
            }
            let Some(view) = cell.view else { continue };
            let measured = measure_cell(tree, cell, inner.size());
            let rect = inner.align_limited(measured.size, cell.alignment, cell.margin, measured.max);
            placed.push((index, Placement { view, rect }));
        }

        let mut slots = self.slots(tree, inner.size());
        self.distribute(&mut slots, inner.size().get(axis));

        let mut leading = Vec::new();
        let mut centered = Vec::new();
        let mut trailing = Vec::new();
        for (i, slot) in slots.iter().enumerate() {
            let alignment = self.cells[slot.index].alignment;
            if alignment.is_expand(axis) {
                leading.push(i);
            } else if alignment.is_trailing(axis) {
                trailing.push(i);
            } else if alignment.is_centered(axis) {
                centered.push(i);
            } else {
                leading.push(i);
            }
        }

        let mut starts = vec![0.0; slots.len()];
        let mut pos = inner.start(axis);
        for &i in &leading {
            starts[i] = pos;
            pos += slots[i].len + self.spacing;
        }
        let mut end = inner.end(axis);
        for &i in trailing.iter().rev() {
            end -= slots[i].len;
            starts[i] = end;
            end -= self.spacing;
        }
        if !centered.is_empty() {
            let span: f64 = centered.iter().map(|&i| slots[i].len).sum::<f64>() + self.gaps(centered.len());
            let mut pos = inner.start(axis) + ((inner.size().get(axis) - span) / 2.0).floor();
            for &i in &centered {
                starts[i] = pos;
                pos += slots[i].len + self.spacing;
            }
        }

        for (slot, start) in slots.iter().zip(starts) {
            let cell = &self.cells[slot.index];
            let Some(view) = cell.view else { continue };
            let frame = inner.with_span(axis, start, slot.len);
            let mut size = slot.measured.size;
            size.set(axis, (slot.len - cell.margin.total(axis)).max(0.0));
            let mut max = slot.measured.max;
            max.set(axis, 0.0);
            let alignment = cell.alignment.only(cross_axis) | Alignment::leading(axis);
            let rect = frame.align_limited(size, alignment, cell.margin, max);
            placed.push((slot.index, Placement { view, rect }));
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
