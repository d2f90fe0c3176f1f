//! Per-view event handlers and press routing.
//!
//! Pressed, long-pressed and value-changed are single-slot: registering again
//! replaces the previous handler. Removed is multi-slot: registrations append,
//! and all of them run once, in registration order, when the view is removed.

use std::fmt;

use slotmap::SecondaryMap;

use crate::view::{ViewId, ViewTree};

use super::input::PointerKind;

pub type ViewHandler = Box<dyn FnMut(ViewId)>;
pub type RemovedHandler = Box<dyn FnOnce(ViewId)>;

/// Which single-slot handler an event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerSlot {
    Pressed,
    LongPressed,
    ValueChanged,
}

impl HandlerSlot {
    /// The slot a pointer event fires, if any.
    pub fn for_pointer(kind: PointerKind) -> Option<HandlerSlot> {
        match kind {
            PointerKind::Press => Some(HandlerSlot::Pressed),
            PointerKind::LongPress => Some(HandlerSlot::LongPressed),
            PointerKind::Release | PointerKind::Move => None,
        }
    }
}

#[derive(Default)]
struct ViewHandlers {
    pressed: Option<ViewHandler>,
    long_pressed: Option<ViewHandler>,
    value_changed: Option<ViewHandler>,
    removed: Vec<RemovedHandler>,
}

impl ViewHandlers {
    fn slot(&mut self, slot: HandlerSlot) -> &mut Option<ViewHandler> {
        match slot {
            HandlerSlot::Pressed => &mut self.pressed,
            HandlerSlot::LongPressed => &mut self.long_pressed,
            HandlerSlot::ValueChanged => &mut self.value_changed,
        }
    }

    fn has(&self, slot: HandlerSlot) -> bool {
        match slot {
            HandlerSlot::Pressed => self.pressed.is_some(),
            HandlerSlot::LongPressed => self.long_pressed.is_some(),
            HandlerSlot::ValueChanged => self.value_changed.is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// HandlerRegistry
// ---------------------------------------------------------------------------

/// Handlers for every view that registered one.
#[derive(Default)]
pub struct HandlerRegistry {
    views: SecondaryMap<ViewId, ViewHandlers>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a single-slot handler. Returns `true` if one was replaced.
    pub fn set(&mut self, id: ViewId, slot: HandlerSlot, handler: impl FnMut(ViewId) + 'static) -> bool {
        let entry = self.entry(id);
        entry.slot(slot).replace(Box::new(handler)).is_some()
    }

    pub fn on_pressed(&mut self, id: ViewId, handler: impl FnMut(ViewId) + 'static) -> bool {
        self.set(id, HandlerSlot::Pressed, handler)
    }

    pub fn on_long_pressed(&mut self, id: ViewId, handler: impl FnMut(ViewId) + 'static) -> bool {
        self.set(id, HandlerSlot::LongPressed, handler)
    }

    pub fn on_value_changed(&mut self, id: ViewId, handler: impl FnMut(ViewId) + 'static) -> bool {
        self.set(id, HandlerSlot::ValueChanged, handler)
    }

    /// Append a removal handler.
    pub fn on_removed(&mut self, id: ViewId, handler: impl FnOnce(ViewId) + 'static) {
        self.entry(id).removed.push(Box::new(handler));
    }

    pub fn has(&self, id: ViewId, slot: HandlerSlot) -> bool {
        self.views.get(id).is_some_and(|h| h.has(slot))
    }

    /// Run a single-slot handler. Returns whether one ran.
    pub fn fire(&mut self, id: ViewId, slot: HandlerSlot) -> bool {
        match self.views.get_mut(id).and_then(|h| h.slot(slot).as_mut()) {
            Some(handler) => {
                handler(id);
                true
            }
            None => false,
        }
    }

    /// Run and drop every removal handler of the view, then forget the view.
    /// Returns how many handlers ran.
    pub fn fire_removed(&mut self, id: ViewId) -> usize {
        let Some(handlers) = self.views.remove(id) else {
            return 0;
        };
        let count = handlers.removed.len();
        for handler in handlers.removed {
            handler(id);
        }
        count
    }

    /// Forget every handler of the view without running any.
    pub fn clear(&mut self, id: ViewId) {
        self.views.remove(id);
    }

    fn entry(&mut self, id: ViewId) -> &mut ViewHandlers {
        if !self.views.contains_key(id) {
            self.views.insert(id, ViewHandlers::default());
        }
        &mut self.views[id]
    }

    // -----------------------------------------------------------------------
    // Routing
    // -----------------------------------------------------------------------

    /// `[start, parent, grandparent, ..., root]`, or empty for unknown views.
    pub fn bubble_path(tree: &ViewTree, start: ViewId) -> Vec<ViewId> {
        if !tree.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(tree.ancestors(start));
        path
    }

    /// The first view on the bubble path that is usable and has a handler in
    /// `slot`. An unusable view stops the search.
    pub fn target(&self, tree: &ViewTree, start: ViewId, slot: HandlerSlot) -> Option<ViewId> {
        for id in Self::bubble_path(tree, start) {
            if !tree.get(id).is_some_and(|n| n.is_usable()) {
                return None;
            }
            if self.has(id, slot) {
                return Some(id);
            }
        }
        None
    }

    /// Route an event from `start` up to its handler and run it.
    pub fn dispatch(&mut self, tree: &ViewTree, start: ViewId, slot: HandlerSlot) -> Option<ViewId> {
        let target = self.target(tree, start, slot)?;
        self.fire(target, slot);
        Some(target)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry").field("views", &self.views.len()).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
