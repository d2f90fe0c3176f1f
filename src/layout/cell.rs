//! Cell: a child view plus its layout metadata.

use std::any::Any;
use std::fmt;

use crate::alignment::Alignment;
use crate::geometry::{Insets, Size};
use crate::view::ViewId;

/// Layout wrapper pairing a child view with alignment, margin and size limits.
///
/// Cell order is significant: sequential containers lay cells out in list
/// order, grids in row-major order. A collapsed cell keeps its list position
/// but takes no part in layout. A free cell is excluded from flow sizing and
/// aligned on its own inside the container.
///
/// A cell without a view is a grid placeholder: it extends the span of the
/// cell to its left (or above it).
pub struct Cell {
    pub view: Option<ViewId>,
    pub alignment: Alignment,
    pub margin: Insets,
    /// Zero components mean unlimited.
    pub max_size: Size,
    pub min_size: Size,
    pub free: bool,
    pub collapsed: bool,
    annotation: Option<Box<dyn Any>>,
}

impl Cell {
    /// A cell with `alignment`. The view is filled in when the cell is attached.
    pub fn new(alignment: Alignment) -> Self {
        Self {
            view: None,
            alignment,
            margin: Insets::ZERO,
            max_size: Size::ZERO,
            min_size: Size::ZERO,
            free: false,
            collapsed: false,
            annotation: None,
        }
    }

    /// A grid span placeholder: no view, always collapsed.
    pub fn placeholder() -> Self {
        Self { collapsed: true, ..Self::new(Alignment::empty()) }
    }

    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_max_size(mut self, max_size: Size) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = min_size;
        self
    }

    /// Exclude from flow sizing (builder).
    pub fn free(mut self, free: bool) -> Self {
        self.free = free;
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Attach an opaque annotation (builder).
    pub fn with_annotation<T: Any>(mut self, annotation: T) -> Self {
        self.annotation = Some(Box::new(annotation));
        self
    }

    pub fn set_annotation<T: Any>(&mut self, annotation: T) {
        self.annotation = Some(Box::new(annotation));
    }

    /// The annotation, if one of type `T` is attached.
    pub fn annotation<T: Any>(&self) -> Option<&T> {
        self.annotation.as_ref()?.downcast_ref()
    }

    pub fn annotation_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.annotation.as_mut()?.downcast_mut()
    }

    pub fn is_placeholder(&self) -> bool {
        self.view.is_none()
    }

    /// Takes part in sequential flow: has a view, not collapsed, not free.
    pub fn is_flowing(&self) -> bool {
        self.view.is_some() && !self.collapsed && !self.free
    }

    /// Gets a rect during arrangement: has a view and is not collapsed.
    pub fn is_arranged(&self) -> bool {
        self.view.is_some() && !self.collapsed
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(Alignment::TOP_LEFT)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("view", &self.view)
            .field("alignment", &self.alignment)
            .field("margin", &self.margin)
            .field("max_size", &self.max_size)
            .field("min_size", &self.min_size)
            .field("free", &self.free)
            .field("collapsed", &self.collapsed)
            .field("annotated", &self.annotation.is_some())
            .finish()
    }
}
