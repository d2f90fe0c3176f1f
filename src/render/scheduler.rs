//! Exposure scheduling: which drawable views are repainted, and when.
//!
//! An exposed view that is visible gets a due instant; repeated exposures
//! before that instant collapse into the one pending draw. Each frame tick
//! draws every view whose instant has passed, in due order. Invisible views
//! keep their exposed flag but are never drawn; they are drawn as soon as they
//! become visible again.

use std::time::{Duration, Instant};

use slotmap::SecondaryMap;

use crate::error::CanvasError;
use crate::view::{ViewId, ViewTree};

use super::drawable::DrawOutcome;
use super::window::WindowLayer;

/// Delay applied by a plain [`Scheduler::expose`].
pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(100);

/// Delay before retrying a view whose resources were not ready.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// FrameReport
// ---------------------------------------------------------------------------

/// What happened to each view handled during one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// The draw handler ran to completion.
    pub drawn: Vec<ViewId>,
    /// Not ready yet; re-armed after the retry delay.
    pub deferred: Vec<ViewId>,
    /// Still exposed but not drawable right now (invisible, or no area).
    pub skipped: Vec<ViewId>,
    /// The backend rejected a drawing call; retried next tick.
    pub failed: Vec<ViewId>,
}

impl FrameReport {
    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty() && self.deferred.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }

    pub(crate) fn merge(&mut self, other: FrameReport) {
        self.drawn.extend(other.drawn);
        self.deferred.extend(other.deferred);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}

/// Result of trying to draw one view right now.
#[derive(Debug)]
enum Attempt {
    Missing,
    Invisible,
    ZeroRect,
    Loading,
    Busy,
    Finished(Result<DrawOutcome, CanvasError>),
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Pending draws keyed by view.
#[derive(Debug)]
pub struct Scheduler {
    pending: SecondaryMap<ViewId, Instant>,
    coalesce_window: Duration,
    retry_delay: Duration,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            pending: SecondaryMap::new(),
            coalesce_window: DEFAULT_COALESCE_WINDOW,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn coalesce_window(&self) -> Duration {
        self.coalesce_window
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn is_pending(&self, id: ViewId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// When the view's pending draw is due.
    pub fn due_at(&self, id: ViewId) -> Option<Instant> {
        self.pending.get(id).copied()
    }

    /// Earliest due instant over all pending draws.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    // -----------------------------------------------------------------------
    // Exposure
    // -----------------------------------------------------------------------

    /// Expose with the default coalescing delay.
    pub fn expose(&mut self, tree: &mut ViewTree, window: &mut dyn WindowLayer, id: ViewId, now: Instant) -> bool {
        self.expose_in(tree, window, id, self.coalesce_window, now)
    }

    /// Mark the view exposed and, if it is visible with no draw pending, arm
    /// a draw `delay` from `now`. Returns whether a draw was armed.
    ///
    /// Views without drawing state are ignored.
    pub fn expose_in(
        &mut self,
        tree: &mut ViewTree,
        window: &mut dyn WindowLayer,
        id: ViewId,
        delay: Duration,
        now: Instant,
    ) -> bool {
        let Some(drawable) = tree.get_mut(id).and_then(|n| n.drawable.as_mut()) else {
            return false;
        };
        drawable.state.exposed = true;
        if !drawable.state.visible {
            log::trace!("expose {id:?}: not visible, deferred");
            return false;
        }
        if self.pending.contains_key(id) {
            log::trace!("expose {id:?}: coalesced");
            return false;
        }
        self.arm(window, id, now + delay);
        true
    }

    /// Expose every view the tree queued since the last call.
    pub fn expose_invalidated(&mut self, tree: &mut ViewTree, window: &mut dyn WindowLayer, now: Instant) -> usize {
        let ids = tree.take_invalidated();
        ids.iter()
            .filter(|&&id| self.expose(tree, window, id, now))
            .count()
    }

    /// Drop the pending draw of a view. Its exposed flag is left alone.
    pub fn cancel(&mut self, id: ViewId) -> bool {
        let cancelled = self.pending.remove(id).is_some();
        if cancelled {
            log::trace!("cancelled pending draw of {id:?}");
        }
        cancelled
    }

    pub fn cancel_all(&mut self, ids: impl IntoIterator<Item = ViewId>) {
        for id in ids {
            self.cancel(id);
        }
    }

    fn arm(&mut self, window: &mut dyn WindowLayer, id: ViewId, due: Instant) {
        log::trace!("armed draw of {id:?}");
        self.pending.insert(id, due);
        window.request_frame();
    }

    // -----------------------------------------------------------------------
    // Frame tick
    // -----------------------------------------------------------------------

    /// Draw every view whose pending draw is due at `now`.
    ///
    /// Each view is drawn at most once per tick; anything re-armed while the
    /// tick runs waits for a later one.
    pub fn tick(&mut self, tree: &mut ViewTree, window: &mut dyn WindowLayer, now: Instant) -> FrameReport {
        let mut due: Vec<(Instant, ViewId)> = self
            .pending
            .iter()
            .filter(|(_, &at)| at <= now)
            .map(|(id, &at)| (at, id))
            .collect();
        due.sort();

        let mut report = FrameReport::default();
        for (_, id) in due {
            self.pending.remove(id);
            let attempt = Self::draw_now(tree, id);
            self.settle(tree, window, id, attempt, now, &mut report);
        }
        report
    }

    fn draw_now(tree: &mut ViewTree, id: ViewId) -> Attempt {
        let Some(node) = tree.get(id) else {
            return Attempt::Missing;
        };
        let Some(state) = node.drawable().map(|d| d.state()) else {
            return Attempt::Missing;
        };
        let size = node.rect().size();
        if !state.visible {
            return Attempt::Invisible;
        }
        if size.is_empty() {
            return Attempt::ZeroRect;
        }
        if tree.is_loading(id) {
            return Attempt::Loading;
        }
        if state.drawing {
            return Attempt::Busy;
        }
        let Some(drawable) = tree.get_mut(id).and_then(|n| n.drawable.as_mut()) else {
            return Attempt::Missing;
        };
        drawable.state.drawing = true;
        let result = drawable.draw(id, size);
        drawable.state.drawing = false;
        Attempt::Finished(result)
    }

    fn settle(
        &mut self,
        tree: &mut ViewTree,
        window: &mut dyn WindowLayer,
        id: ViewId,
        attempt: Attempt,
        now: Instant,
        report: &mut FrameReport,
    ) {
        match attempt {
            Attempt::Missing => {}
            Attempt::Invisible => {
                log::trace!("skip {id:?}: not visible");
                report.skipped.push(id);
            }
            Attempt::ZeroRect => {
                log::trace!("skip {id:?}: no area yet");
                report.skipped.push(id);
            }
            Attempt::Loading => {
                log::warn!("draw of {id:?} waiting for a resource, retrying");
                self.arm(window, id, now + self.retry_delay);
                report.deferred.push(id);
            }
            Attempt::Busy => {
                self.arm(window, id, now + self.coalesce_window);
                report.deferred.push(id);
            }
            Attempt::Finished(Ok(DrawOutcome::Done)) => {
                if let Some(d) = tree.get_mut(id).and_then(|n| n.drawable.as_mut()) {
                    d.state.exposed = false;
                }
                report.drawn.push(id);
            }
            Attempt::Finished(Ok(DrawOutcome::ExposeAgain)) => {
                self.arm(window, id, now + self.coalesce_window);
                report.drawn.push(id);
            }
            Attempt::Finished(Ok(DrawOutcome::RetryLater)) => {
                log::warn!("draw of {id:?} not ready, retrying");
                self.arm(window, id, now + self.retry_delay);
                report.deferred.push(id);
            }
            Attempt::Finished(Err(err)) => {
                log::warn!("draw of {id:?} failed: {err}");
                self.arm(window, id, now);
                report.failed.push(id);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Record a visibility change reported by the window layer.
    ///
    /// Becoming visible while exposed draws immediately. Becoming invisible
    /// cancels the pending draw but keeps the view exposed.
    pub fn set_visible(
        &mut self,
        tree: &mut ViewTree,
        window: &mut dyn WindowLayer,
        id: ViewId,
        visible: bool,
        now: Instant,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        let Some(drawable) = tree.get_mut(id).and_then(|n| n.drawable.as_mut()) else {
            return report;
        };
        if drawable.state.visible == visible {
            return report;
        }
        drawable.state.visible = visible;
        if !visible {
            self.cancel(id);
            return report;
        }
        if drawable.state.exposed && !drawable.state.drawing {
            self.pending.remove(id);
            let attempt = Self::draw_now(tree, id);
            self.settle(tree, window, id, attempt, now, &mut report);
        }
        report
    }

    /// Recompute visibility of every drawable view: displayed in the tree and
    /// on screen according to the window layer.
    pub fn refresh_visibility(&mut self, tree: &mut ViewTree, window: &mut dyn WindowLayer, now: Instant) -> FrameReport {
        let drawables: Vec<ViewId> = tree
            .ids()
            .filter(|&id| tree.get(id).is_some_and(|n| n.drawable().is_some()))
            .collect();
        let mut report = FrameReport::default();
        for id in drawables {
            let visible = tree.is_displayed(id)
                && tree.absolute_rect(id).is_some_and(|rect| window.is_on_screen(rect));
            report.merge(self.set_visible(tree, window, id, visible, now));
        }
        report
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use crate::render::{Drawable, Viewport};
    use crate::testing::canvas::RecordingCanvas;
    use crate::view::ViewNode;
    use pretty_assertions::assert_eq;

    const MS: Duration = Duration::from_millis(1);

    struct Fixture {
        tree: ViewTree,
        window: Viewport,
        scheduler: Scheduler,
        canvas: RecordingCanvas,
        id: ViewId,
        start: Instant,
    }

    impl Fixture {
        fn with_drawable(make: impl FnOnce(RecordingCanvas) -> Drawable) -> Self {
            let canvas = RecordingCanvas::new();
            let mut tree = ViewTree::new();
            let id = tree.insert(ViewNode::leaf("paint").with_drawable(make(canvas.clone())));
            tree.set_root(id);
            tree.set_presented(id, true);
            tree.set_rect(id, Rect::new(0.0, 0.0, 10.0, 10.0));
            tree.take_invalidated();
            Self {
                tree,
                window: Viewport::new(Size::new(100.0, 100.0)),
                scheduler: Scheduler::new(),
                canvas,
                id,
                start: Instant::now(),
            }
        }

        fn new() -> Self {
            Self::with_drawable(|canvas| Drawable::new(canvas, |_| Ok(())))
        }

        fn at(&self, ms: u64) -> Instant {
            self.start + MS * ms as u32
        }

        fn expose(&mut self, ms: u64) -> bool {
            let now = self.at(ms);
            self.scheduler.expose(&mut self.tree, &mut self.window, self.id, now)
        }

        fn tick(&mut self, ms: u64) -> FrameReport {
            let now = self.at(ms);
            self.scheduler.tick(&mut self.tree, &mut self.window, now)
        }

        fn set_visible(&mut self, visible: bool, ms: u64) -> FrameReport {
            let now = self.at(ms);
            self.scheduler.set_visible(&mut self.tree, &mut self.window, self.id, visible, now)
        }

        /// Make visible and let the initial draw happen.
        fn settled(mut self) -> Self {
            self.set_visible(true, 0);
            self.canvas.log().borrow_mut().clear();
            self.window.take_frame_request();
            self
        }

        fn state(&self) -> crate::render::ExposeState {
            self.tree.get(self.id).and_then(|n| n.drawable()).map(|d| d.state()).unwrap()
        }
    }

    #[test]
    fn becoming_visible_draws_immediately() {
        let mut f = Fixture::new();
        let report = f.set_visible(true, 0);
        assert_eq!(report.drawn, vec![f.id]);
        assert_eq!(f.canvas.draw_count(), 1);
        assert!(!f.state().exposed);
    }

    #[test]
    fn expose_arms_once_and_requests_frame() {
        let mut f = Fixture::new().settled();
        assert!(f.expose(0));
        assert!(f.window.frame_requested());
        assert_eq!(f.scheduler.due_at(f.id), Some(f.at(100)));
        assert!(!f.expose(10));
        assert!(!f.expose(20));
        assert_eq!(f.scheduler.pending_len(), 1);
    }

    #[test]
    fn repeated_exposes_draw_once() {
        let mut f = Fixture::new().settled();
        for ms in 0..5 {
            f.expose(ms);
        }
        assert!(f.tick(50).is_empty());
        assert_eq!(f.tick(100).drawn, vec![f.id]);
        assert!(f.tick(200).is_empty());
        assert_eq!(f.canvas.draw_count(), 1);
    }

    #[test]
    fn invisible_view_is_never_drawn() {
        let mut f = Fixture::new();
        assert!(!f.expose(0));
        assert!(f.tick(1_000).is_empty());
        assert_eq!(f.canvas.draw_count(), 0);
        assert!(f.state().exposed);
    }

    #[test]
    fn hiding_cancels_pending_draw_but_keeps_exposed() {
        let mut f = Fixture::new().settled();
        f.expose(0);
        f.set_visible(false, 10);
        assert!(!f.scheduler.is_pending(f.id));
        assert!(f.tick(200).is_empty());
        assert!(f.state().exposed);

        let report = f.set_visible(true, 300);
        assert_eq!(report.drawn, vec![f.id]);
        assert_eq!(f.canvas.draw_count(), 1);
    }

    #[test]
    fn zero_rect_is_skipped_without_rearming() {
        let mut f = Fixture::new().settled();
        f.tree.set_rect(f.id, Rect::ZERO);
        f.expose(0);
        let report = f.tick(100);
        assert_eq!(report.skipped, vec![f.id]);
        assert!(!f.scheduler.is_pending(f.id));
        assert!(f.state().exposed);

        f.tree.set_rect(f.id, Rect::new(0.0, 0.0, 4.0, 4.0));
        let now = f.at(100);
        f.scheduler.expose_invalidated(&mut f.tree, &mut f.window, now);
        assert_eq!(f.tick(200).drawn, vec![f.id]);
    }

    #[test]
    fn loading_view_is_retried() {
        let mut f = Fixture::new().settled();
        f.tree.set_loading(f.id, true);
        f.expose(0);
        assert_eq!(f.tick(100).deferred, vec![f.id]);
        assert_eq!(f.scheduler.due_at(f.id), Some(f.at(200)));
        f.tree.set_loading(f.id, false);
        assert_eq!(f.tick(200).drawn, vec![f.id]);
        assert_eq!(f.canvas.draw_count(), 1);
    }

    #[test]
    fn handler_retry_later_keeps_exposed() {
        let mut f = Fixture::with_drawable(|canvas| {
            Drawable::new(canvas, |ctx| {
                ctx.retry_later();
                Ok(())
            })
        });
        let report = f.set_visible(true, 0);
        assert_eq!(report.deferred, vec![f.id]);
        assert!(f.state().exposed);
        assert_eq!(f.scheduler.due_at(f.id), Some(f.at(100)));
    }

    #[test]
    fn expose_from_handler_waits_for_later_tick() {
        let mut f = Fixture::with_drawable(|canvas| {
            Drawable::new(canvas, |ctx| {
                ctx.expose();
                Ok(())
            })
        });
        let report = f.set_visible(true, 0);
        assert_eq!(report.drawn, vec![f.id]);
        assert_eq!(f.canvas.draw_count(), 1);
        assert!(f.tick(50).is_empty());
        assert_eq!(f.tick(100).drawn, vec![f.id]);
        assert_eq!(f.canvas.draw_count(), 2);
    }

    #[test]
    fn backend_failure_is_retried_next_tick() {
        let mut f = Fixture::new().settled();
        f.canvas.fail_next(CanvasError::SurfaceLost);
        f.expose(0);
        assert_eq!(f.tick(100).failed, vec![f.id]);
        assert!(f.state().exposed);
        assert_eq!(f.tick(116).drawn, vec![f.id]);
        assert!(!f.state().exposed);
    }

    #[test]
    fn refresh_visibility_uses_window() {
        let mut f = Fixture::new();
        f.window.set_rect(Rect::new(500.0, 500.0, 100.0, 100.0));
        let now = f.at(0);
        let report = f.scheduler.refresh_visibility(&mut f.tree, &mut f.window, now);
        assert!(report.is_empty());
        assert!(!f.state().visible);

        f.window.set_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let report = f.scheduler.refresh_visibility(&mut f.tree, &mut f.window, now);
        assert_eq!(report.drawn, vec![f.id]);
    }

    #[test]
    fn due_order_is_by_instant() {
        let mut f = Fixture::new().settled();
        let other = f.tree.insert(
            ViewNode::leaf("other").with_drawable(Drawable::new(RecordingCanvas::new(), |_| Ok(()))),
        );
        f.tree.set_presented(other, true);
        f.tree.set_rect(other, Rect::new(0.0, 0.0, 5.0, 5.0));
        let now = f.at(0);
        f.scheduler.set_visible(&mut f.tree, &mut f.window, other, true, now);

        f.scheduler.expose_in(&mut f.tree, &mut f.window, other, MS * 10, now);
        f.scheduler.expose_in(&mut f.tree, &mut f.window, f.id, MS * 20, now);
        assert_eq!(f.scheduler.next_due(), Some(f.at(10)));
        assert_eq!(f.tick(30).drawn, vec![other, f.id]);
    }

    #[test]
    fn cancel_drops_pending() {
        let mut f = Fixture::new().settled();
        f.expose(0);
        assert!(f.scheduler.cancel(f.id));
        assert!(!f.scheduler.cancel(f.id));
        assert!(f.tick(100).is_empty());
    }
}
