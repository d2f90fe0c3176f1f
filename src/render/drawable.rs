//! Per-view drawing state: the canvas, the draw handler and the exposure flags.

use std::fmt;

use crate::error::CanvasError;
use crate::geometry::{Rect, Size};
use crate::view::ViewId;

use super::canvas::Canvas;

/// Exposure flags of one drawable view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExposeState {
    /// The view intersects the rendering viewport.
    pub visible: bool,
    /// A repaint has been requested and not yet performed.
    pub exposed: bool,
    /// The draw handler is running.
    pub drawing: bool,
}

impl Default for ExposeState {
    fn default() -> Self {
        Self { visible: false, exposed: true, drawing: false }
    }
}

/// What a draw handler asked for after running.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The view is up to date.
    Done,
    /// The handler exposed the view again; draw it on a later tick.
    ExposeAgain,
    /// A resource was not ready; try again after the retry delay.
    RetryLater,
}

/// Handed to a draw handler for the duration of one draw.
pub struct DrawContext<'a> {
    canvas: &'a mut dyn Canvas,
    view: ViewId,
    bounds: Rect,
    outcome: DrawOutcome,
}

impl<'a> DrawContext<'a> {
    pub fn canvas(&mut self) -> &mut dyn Canvas {
        &mut *self.canvas
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    /// The view's rect in its own coordinates (origin at zero).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Request another draw. It happens on a later frame, never inside this one.
    pub fn expose(&mut self) {
        if self.outcome == DrawOutcome::Done {
            self.outcome = DrawOutcome::ExposeAgain;
        }
    }

    /// Report that something the drawing depends on (an image, a font) is
    /// still loading. The view stays exposed and is retried later.
    pub fn retry_later(&mut self) {
        self.outcome = DrawOutcome::RetryLater;
    }
}

/// Signature of a draw handler.
pub type DrawHandler = Box<dyn FnMut(&mut DrawContext<'_>) -> Result<(), CanvasError>>;

/// Drawing capability of a view.
pub struct Drawable {
    canvas: Box<dyn Canvas>,
    handler: DrawHandler,
    opaque: bool,
    pub(crate) state: ExposeState,
}

impl Drawable {
    pub fn new(
        canvas: impl Canvas + 'static,
        handler: impl FnMut(&mut DrawContext<'_>) -> Result<(), CanvasError> + 'static,
    ) -> Self {
        Self {
            canvas: Box::new(canvas),
            handler: Box::new(handler),
            opaque: false,
            state: ExposeState::default(),
        }
    }

    /// Mark the handler as always painting its whole bounds, so the canvas is
    /// not cleared before drawing.
    pub fn opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    pub fn state(&self) -> ExposeState {
        self.state
    }

    /// Replace the draw handler. The view is not re-exposed.
    pub fn set_handler(
        &mut self,
        handler: impl FnMut(&mut DrawContext<'_>) -> Result<(), CanvasError> + 'static,
    ) {
        self.handler = Box::new(handler);
    }

    /// Size the canvas to `size`, clear it unless opaque, and run the handler.
    pub(crate) fn draw(&mut self, view: ViewId, size: Size) -> Result<DrawOutcome, CanvasError> {
        self.canvas.set_size(size)?;
        let bounds = Rect::from_size(size);
        if !self.opaque {
            self.canvas.clear(bounds)?;
        }
        let mut ctx = DrawContext {
            canvas: self.canvas.as_mut(),
            view,
            bounds,
            outcome: DrawOutcome::Done,
        };
        (self.handler)(&mut ctx)?;
        Ok(ctx.outcome)
    }
}

impl fmt::Debug for Drawable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drawable")
            .field("opaque", &self.opaque)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
