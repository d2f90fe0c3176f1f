//! Screen: one presented view tree and everything that acts on it.
//!
//! [`Screen`] owns the view tree, the exposure scheduler, the focus navigator,
//! the handler registry and the window layer. Its methods are the mutation
//! entry points that need more than one of those: removing a view cancels its
//! pending draws and runs its removal handlers, a focus move re-exposes both
//! views involved, and [`Screen::tick`] runs one whole frame.

use std::fmt;
use std::time::{Duration, Instant};

use crate::app::AppConfig;
use crate::event::{HandlerRegistry, HandlerSlot, KeyEvent, PointerEvent};
use crate::focus::{FocusChange, FocusNavigator};
use crate::geometry::{Pos, Rect, Size};
use crate::layout::SpatialMap;
use crate::render::{FrameReport, Scheduler, Viewport, WindowLayer};
use crate::view::{ViewId, ViewNode, ViewTree};

type LoadContinuation = Box<dyn FnOnce(ViewId)>;

/// A one-shot continuation waiting for a subtree to finish loading.
struct LoadWaiter {
    container: ViewId,
    then: LoadContinuation,
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

pub struct Screen {
    pub tree: ViewTree,
    pub scheduler: Scheduler,
    pub focus: FocusNavigator,
    pub handlers: HandlerRegistry,
    window: Box<dyn WindowLayer>,
    load_waiters: Vec<LoadWaiter>,
}

impl Screen {
    pub fn new(window: impl WindowLayer + 'static) -> Self {
        Self::with_config(window, &AppConfig::default())
    }

    pub fn with_config(window: impl WindowLayer + 'static, config: &AppConfig) -> Self {
        Self {
            tree: ViewTree::new(),
            scheduler: Scheduler::new()
                .with_coalesce_window(config.coalesce_window)
                .with_retry_delay(config.retry_delay),
            focus: FocusNavigator::new(config.focus_wrap),
            handlers: HandlerRegistry::new(),
            window: Box::new(window),
            load_waiters: Vec::new(),
        }
    }

    /// A screen over a [`Viewport`] of the given size.
    pub fn headless(width: f64, height: f64) -> Self {
        Self::new(Viewport::new(Size::new(width, height)))
    }

    pub fn window(&self) -> &dyn WindowLayer {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> &mut dyn WindowLayer {
        self.window.as_mut()
    }

    pub fn root(&self) -> Option<ViewId> {
        self.tree.root()
    }

    // -----------------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------------

    /// Make `node` the presented root, sized to the window. The first frame
    /// tick draws it.
    pub fn present(&mut self, node: ViewNode) -> ViewId {
        let id = self.tree.insert(node);
        self.present_view(id);
        id
    }

    /// Present an already inserted, detached view.
    pub fn present_view(&mut self, id: ViewId) {
        if let Some(old) = self.tree.root().filter(|&r| r != id) {
            self.tree.set_presented(old, false);
        }
        self.tree.set_root(id);
        self.tree.set_presented(id, true);
        self.tree.set_rect(id, Rect::from_size(self.window.size()));
        self.rebuild_focus();
    }

    /// Resize the window and the root with it.
    pub fn resize(&mut self, size: Size) {
        self.window.resize(size);
        if let Some(root) = self.tree.root() {
            self.tree.set_rect(root, Rect::from_size(size));
        }
    }

    /// Run a layout pass over every dirty container.
    pub fn layout(&mut self) -> usize {
        self.tree.layout_pass()
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// One frame: lay out, turn invalidations into exposures, update
    /// visibility (drawing views that just appeared), draw what is due, then
    /// release load waiters whose subtree is ready.
    pub fn tick(&mut self, now: Instant) -> FrameReport {
        self.tree.layout_pass();
        let window = self.window.as_mut();
        self.scheduler.expose_invalidated(&mut self.tree, window, now);
        let mut report = self.scheduler.refresh_visibility(&mut self.tree, window, now);
        report.merge(self.scheduler.tick(&mut self.tree, window, now));
        self.release_load_waiters();
        report
    }

    pub fn expose(&mut self, id: ViewId, now: Instant) -> bool {
        self.scheduler.expose(&mut self.tree, self.window.as_mut(), id, now)
    }

    pub fn expose_in(&mut self, id: ViewId, delay: Duration, now: Instant) -> bool {
        self.scheduler.expose_in(&mut self.tree, self.window.as_mut(), id, delay, now)
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// Remove a view and its subtree. Pending draws are cancelled, focus is
    /// dropped from the removed views and their removal handlers run.
    pub fn remove(&mut self, id: ViewId) -> bool {
        let removed = self.tree.remove(id);
        self.forget(&removed);
        !removed.is_empty()
    }

    /// Replace a child with a new view that takes over its cell and rect.
    pub fn replace_child(&mut self, container: ViewId, old: ViewId, node: ViewNode) -> Option<ViewId> {
        let (new_id, removed) = self.tree.replace_child(container, old, node)?;
        self.forget(&removed);
        self.rebuild_focus();
        Some(new_id)
    }

    /// Collapse or restore a child in place.
    pub fn collapse_child(&mut self, container: ViewId, child: ViewId, collapsed: bool) -> bool {
        let changed = self.tree.collapse_child(container, child, collapsed);
        if changed {
            self.rebuild_focus();
        }
        changed
    }

    fn forget(&mut self, removed: &[ViewId]) {
        for &view in removed {
            self.scheduler.cancel(view);
            self.focus.unregister(view);
            self.handlers.fire_removed(view);
        }
        self.load_waiters.retain(|w| !removed.contains(&w.container));
    }

    // -----------------------------------------------------------------------
    // View state
    // -----------------------------------------------------------------------

    pub fn set_highlighted(&mut self, id: ViewId, highlighted: bool) -> bool {
        self.tree.set_highlighted(id, highlighted)
    }

    /// Enable or disable a view. Disabled views leave the focus order.
    pub fn set_usable(&mut self, id: ViewId, usable: bool) -> bool {
        let changed = self.tree.set_usable(id, usable);
        if changed {
            self.rebuild_focus();
        }
        changed
    }

    pub fn set_shown(&mut self, id: ViewId, shown: bool) -> bool {
        let changed = self.tree.set_shown(id, shown);
        if changed {
            self.rebuild_focus();
        }
        changed
    }

    pub fn set_loading(&mut self, id: ViewId, loading: bool) -> bool {
        self.tree.set_loading(id, loading)
    }

    /// Run `then` on the first frame where nothing under `container` is
    /// loading.
    pub fn when_loaded(&mut self, container: ViewId, then: impl FnOnce(ViewId) + 'static) {
        self.load_waiters.push(LoadWaiter { container, then: Box::new(then) });
    }

    fn release_load_waiters(&mut self) {
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.load_waiters)
            .into_iter()
            .partition(|w| !self.tree.is_loading(w.container));
        self.load_waiters = waiting;
        for waiter in ready {
            (waiter.then)(waiter.container);
        }
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    pub fn focused_view(&self) -> Option<ViewId> {
        self.focus.current_view()
    }

    /// Re-collect focusable views under the root.
    pub fn rebuild_focus(&mut self) {
        if let Some(root) = self.tree.root() {
            self.focus.rebuild(&self.tree, root);
        }
    }

    pub fn focus_view(&mut self, id: ViewId, now: Instant) -> Option<FocusChange> {
        let change = self.focus.focus(id)?;
        self.expose_focus_change(change, now);
        Some(change)
    }

    fn expose_focus_change(&mut self, change: FocusChange, now: Instant) {
        if let Some(prev) = change.previous {
            self.expose(prev, now);
        }
        self.expose(change.current, now);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Offer a key to the focus navigator. Returns whether it moved focus.
    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        match self.focus.handle_key(key) {
            Some(change) => {
                self.expose_focus_change(change, now);
                true
            }
            None => false,
        }
    }

    /// Route a pointer event to the frontmost view under it, bubbling up to
    /// the first usable view with a matching handler.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<ViewId> {
        let slot = HandlerSlot::for_pointer(event.kind)?;
        self.dispatch_at(event.pos, slot)
    }

    pub fn press(&mut self, pos: Pos) -> Option<ViewId> {
        self.dispatch_at(pos, HandlerSlot::Pressed)
    }

    pub fn long_press(&mut self, pos: Pos) -> Option<ViewId> {
        self.dispatch_at(pos, HandlerSlot::LongPressed)
    }

    /// Run the value-changed handler of a view.
    pub fn value_changed(&mut self, id: ViewId) -> bool {
        self.handlers.fire(id, HandlerSlot::ValueChanged)
    }

    /// The frontmost shown view at `pos`, in root coordinates.
    pub fn view_at(&self, pos: Pos) -> Option<ViewId> {
        let root = self.tree.root()?;
        SpatialMap::from_tree(&self.tree, root).view_at(pos)
    }

    fn dispatch_at(&mut self, pos: Pos, slot: HandlerSlot) -> Option<ViewId> {
        let hit = self.view_at(pos)?;
        self.handlers.dispatch(&self.tree, hit, slot)
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("tree", &self.tree)
            .field("scheduler", &self.scheduler)
            .field("focus", &self.focus)
            .field("load_waiters", &self.load_waiters.len())
            .finish_non_exhaustive()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
