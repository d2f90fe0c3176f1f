//! View nodes: ViewId, ViewNode, ViewKind, LayoutState.

use std::fmt;

use slotmap::new_key_type;

use crate::geometry::{Rect, Size};
use crate::render::Drawable;

use super::traits::{Container, Measure};

new_key_type! {
    /// Handle for a view in a [`ViewTree`](super::ViewTree). Copy, lightweight.
    pub struct ViewId;
}

/// Where a container is in its layout cycle.
///
/// `Measuring` only exists inside one synchronous arrange call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LayoutState {
    #[default]
    Dirty,
    Measuring,
    Arranged,
}

/// What a view is, beyond the common node data.
pub enum ViewKind {
    /// Leaf content with an optional measurer. Without one, the leaf's
    /// natural size is its minimum size.
    Leaf(Option<Box<dyn Measure>>),
    Container(Box<dyn Container>),
}

/// Data for one view in the tree.
pub struct ViewNode {
    /// Object name, used by name and path lookups.
    pub name: String,
    /// Rect relative to the parent, assigned by the parent's arrange.
    pub(crate) rect: Rect,
    pub min_size: Size,
    pub(crate) shown: bool,
    pub(crate) usable: bool,
    pub(crate) highlighted: bool,
    /// Attached to a live window.
    pub(crate) presented: bool,
    pub focusable: bool,
    /// Waiting on an external resource; drawing is deferred while set.
    pub(crate) loading: bool,
    pub(crate) layout_state: LayoutState,
    pub(crate) kind: ViewKind,
    pub(crate) drawable: Option<Drawable>,
}

impl ViewNode {
    /// A leaf view without a measurer.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self::with_kind(name, ViewKind::Leaf(None))
    }

    /// A container view.
    pub fn container(name: impl Into<String>, container: impl Container) -> Self {
        Self::with_kind(name, ViewKind::Container(Box::new(container)))
    }

    fn with_kind(name: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            name: name.into(),
            rect: Rect::ZERO,
            min_size: Size::ZERO,
            shown: true,
            usable: true,
            highlighted: false,
            presented: false,
            focusable: false,
            loading: false,
            layout_state: LayoutState::Dirty,
            kind,
            drawable: None,
        }
    }

    /// Set the minimum size (builder).
    pub fn with_min_size(mut self, size: Size) -> Self {
        self.min_size = size;
        self
    }

    /// Set the leaf measurer (builder). Ignored for containers.
    pub fn with_measure(mut self, measure: impl Measure + 'static) -> Self {
        if let ViewKind::Leaf(slot) = &mut self.kind {
            *slot = Some(Box::new(measure));
        }
        self
    }

    /// Attach drawing state (builder).
    pub fn with_drawable(mut self, drawable: Drawable) -> Self {
        self.drawable = Some(drawable);
        self
    }

    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn usable(mut self, usable: bool) -> Self {
        self.usable = usable;
        self
    }

    pub fn shown(mut self, shown: bool) -> Self {
        self.shown = shown;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_usable(&self) -> bool {
        self.usable
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_presented(&self) -> bool {
        self.presented
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn layout_state(&self) -> LayoutState {
        self.layout_state
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, ViewKind::Container(_))
    }

    pub fn as_container(&self) -> Option<&dyn Container> {
        match &self.kind {
            ViewKind::Container(c) => Some(c.as_ref()),
            ViewKind::Leaf(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut dyn Container> {
        match &mut self.kind {
            ViewKind::Container(c) => Some(c.as_mut()),
            ViewKind::Leaf(_) => None,
        }
    }

    /// Downcast the container to a concrete type.
    pub fn container_as<T: Container>(&self) -> Option<&T> {
        self.as_container()?.as_any().downcast_ref()
    }

    pub fn container_as_mut<T: Container>(&mut self) -> Option<&mut T> {
        self.as_container_mut()?.as_any_mut().downcast_mut()
    }

    pub fn drawable(&self) -> Option<&Drawable> {
        self.drawable.as_ref()
    }

    pub fn drawable_mut(&mut self) -> Option<&mut Drawable> {
        self.drawable.as_mut()
    }
}

impl fmt::Debug for ViewNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("name", &self.name)
            .field("rect", &self.rect)
            .field("container", &self.is_container())
            .field("shown", &self.shown)
            .field("layout_state", &self.layout_state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;
    use crate::layout::StackView;

    #[test]
    fn leaf_defaults() {
        let node = ViewNode::leaf("label");
        assert_eq!(node.name, "label");
        assert!(node.is_shown());
        assert!(node.is_usable());
        assert!(!node.is_highlighted());
        assert!(!node.is_presented());
        assert!(!node.focusable);
        assert!(!node.is_container());
        assert_eq!(node.layout_state(), LayoutState::Dirty);
        assert_eq!(node.rect(), Rect::ZERO);
    }

    #[test]
    fn builders() {
        let node = ViewNode::leaf("x")
            .with_min_size(Size::new(3.0, 4.0))
            .focusable(true)
            .usable(false)
            .shown(false)
            .loading(true);
        assert_eq!(node.min_size, Size::new(3.0, 4.0));
        assert!(node.focusable);
        assert!(!node.is_usable());
        assert!(!node.is_shown());
        assert!(node.is_loading());
    }

    #[test]
    fn container_downcast() {
        let mut node = ViewNode::container("row", StackView::new(Axis::Horizontal));
        assert!(node.is_container());
        assert!(node.container_as::<StackView>().is_some());
        if let Some(stack) = node.container_as_mut::<StackView>() {
            stack.set_spacing(2.0);
        }
        assert_eq!(node.container_as::<StackView>().map(StackView::spacing), Some(2.0));
    }

    #[test]
    fn measure_ignored_on_container() {
        let node = ViewNode::container("row", StackView::new(Axis::Horizontal))
            .with_measure(|_: Size| Size::new(1.0, 1.0));
        assert!(node.is_container());
    }

    #[test]
    fn view_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<ViewId>();
    }
}
