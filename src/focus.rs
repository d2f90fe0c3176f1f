//! Keyboard focus traversal.
//!
//! [`FocusNavigator`] keeps an ordered list of focusable views (usually the
//! leaves of one container, in depth-first order) and a pointer to the focused
//! one. Nothing is focused initially. What happens at either end of the list
//! is an explicit [`FocusWrap`] choice.
//!
//! A forward move with nothing focused lands on the top-left-most view (least
//! y, then least x, as placed at the last rebuild) rather than the first in
//! list order; a backward move lands on the last.

use std::fmt;

use crate::event::{Key, KeyEvent, Modifiers};
use crate::view::{ViewId, ViewTree};

/// Behavior when moving past either end of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusWrap {
    /// Past the last view comes the first, and the other way round.
    #[default]
    Wrap,
    /// Stay at the end; the move is not handled.
    Clamp,
}

/// A completed focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<ViewId>,
    pub current: ViewId,
}

pub type SelectHandler = Box<dyn FnMut(Option<ViewId>, ViewId)>;

// ---------------------------------------------------------------------------
// FocusNavigator
// ---------------------------------------------------------------------------

/// Ordered focusable views and the focused one.
pub struct FocusNavigator {
    views: Vec<ViewId>,
    current: Option<usize>,
    /// Top-left-most view seen by the last rebuild.
    entry: Option<ViewId>,
    wrap: FocusWrap,
    on_select: Option<SelectHandler>,
}

impl FocusNavigator {
    pub fn new(wrap: FocusWrap) -> Self {
        Self { views: Vec::new(), current: None, entry: None, wrap, on_select: None }
    }

    /// Install the handler called with `(previous, new)` on every focus change.
    pub fn set_on_select(&mut self, handler: impl FnMut(Option<ViewId>, ViewId) + 'static) {
        self.on_select = Some(Box::new(handler));
    }

    pub fn wrap(&self) -> FocusWrap {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: FocusWrap) {
        self.wrap = wrap;
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Append a view. Returns `false` if it was already registered.
    pub fn register(&mut self, id: ViewId) -> bool {
        if self.views.contains(&id) {
            return false;
        }
        self.views.push(id);
        true
    }

    /// Drop a view. Dropping the focused view leaves nothing focused.
    pub fn unregister(&mut self, id: ViewId) -> bool {
        let Some(pos) = self.views.iter().position(|&v| v == id) else {
            return false;
        };
        self.views.remove(pos);
        self.current = match self.current {
            Some(cur) if cur == pos => None,
            Some(cur) if cur > pos => Some(cur - 1),
            other => other,
        };
        true
    }

    /// Re-collect the focusable views under `container`, depth first: views
    /// that are focusable, usable and displayed. Focus survives if the focused
    /// view is still in the list. Also records the top-left-most of them as
    /// the entry point for a forward move from nothing.
    pub fn rebuild(&mut self, tree: &ViewTree, container: ViewId) {
        let focused = self.current_view();
        self.views = tree
            .walk_depth_first(container)
            .into_iter()
            .filter(|&id| {
                tree.get(id).is_some_and(|n| n.focusable && n.is_usable()) && tree.is_displayed(id)
            })
            .collect();
        self.current = focused.and_then(|f| self.views.iter().position(|&v| v == f));
        self.entry = self
            .views
            .iter()
            .filter_map(|&id| Some((id, tree.absolute_rect(id)?)))
            .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
            .map(|(id, _)| id);
    }

    pub fn views(&self) -> &[ViewId] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn current_view(&self) -> Option<ViewId> {
        self.current.and_then(|i| self.views.get(i).copied())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    pub fn focus_next(&mut self) -> Option<FocusChange> {
        let len = self.views.len();
        let next = match self.current {
            _ if len == 0 => return None,
            None => self.entry.and_then(|e| self.views.iter().position(|&v| v == e)).unwrap_or(0),
            Some(i) if i + 1 < len => i + 1,
            Some(_) => match self.wrap {
                FocusWrap::Wrap => 0,
                FocusWrap::Clamp => return None,
            },
        };
        self.select(next)
    }

    pub fn focus_previous(&mut self) -> Option<FocusChange> {
        let len = self.views.len();
        let prev = match self.current {
            _ if len == 0 => return None,
            None => len - 1,
            Some(i) if i > 0 => i - 1,
            Some(_) => match self.wrap {
                FocusWrap::Wrap => len - 1,
                FocusWrap::Clamp => return None,
            },
        };
        self.select(prev)
    }

    /// Focus a registered view.
    pub fn focus(&mut self, id: ViewId) -> Option<FocusChange> {
        let index = self.views.iter().position(|&v| v == id)?;
        self.select(index)
    }

    /// Drop focus without notifying.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Map a key to a focus move. Arrows right/down and Tab move forward,
    /// left/up and Shift+Tab move back. Keys with modifiers are declined,
    /// except the Shift that comes with BackTab. Returns the change, or
    /// `None` if the key was not handled.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<FocusChange> {
        let modifiers = if key.code == Key::BackTab {
            key.modifiers - Modifiers::SHIFT
        } else {
            key.modifiers
        };
        if !modifiers.is_empty() {
            return None;
        }
        match key.code {
            Key::Right | Key::Down | Key::Tab => self.focus_next(),
            Key::Left | Key::Up | Key::BackTab => self.focus_previous(),
            _ => None,
        }
    }

    fn select(&mut self, index: usize) -> Option<FocusChange> {
        if self.current == Some(index) {
            return None;
        }
        let current = *self.views.get(index)?;
        let previous = self.current_view();
        self.current = Some(index);
        log::trace!("focus {previous:?} -> {current:?}");
        if let Some(handler) = self.on_select.as_mut() {
            handler(previous, current);
        }
        Some(FocusChange { previous, current })
    }
}

impl Default for FocusNavigator {
    fn default() -> Self {
        Self::new(FocusWrap::default())
    }
}

impl fmt::Debug for FocusNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusNavigator")
            .field("views", &self.views)
            .field("current", &self.current)
            .field("wrap", &self.wrap)
            .finish_non_exhaustive()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
