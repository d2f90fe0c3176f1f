//! A canvas that records every call, for asserting on what a draw did.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::CanvasError;
use crate::geometry::{Rect, Size};
use crate::render::{Canvas, Color, ImageRef, Path};

/// One recorded canvas call.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    SetSize(Size),
    Clear(Rect),
    SetColor(Color),
    FillPath(Path),
    StrokePath(Path, f64),
    DrawImage(ImageRef, Rect),
}

/// Shared log of recorded calls. Clone it before handing the canvas to a
/// [`Drawable`](crate::render::Drawable).
pub type CanvasLog = Rc<RefCell<Vec<CanvasOp>>>;

/// Records calls into a shared [`CanvasLog`] and can be told to fail.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    log: CanvasLog,
    failure: Rc<RefCell<Option<CanvasError>>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CanvasLog {
        Rc::clone(&self.log)
    }

    /// Make the next call fail with `err`. Later calls succeed again.
    pub fn fail_next(&self, err: CanvasError) {
        *self.failure.borrow_mut() = Some(err);
    }

    /// Number of times the surface was sized, which is once per draw.
    pub fn draw_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|op| matches!(op, CanvasOp::SetSize(_)))
            .count()
    }

    fn record(&mut self, op: CanvasOp) -> Result<(), CanvasError> {
        if let Some(err) = self.failure.borrow_mut().take() {
            return Err(err);
        }
        self.log.borrow_mut().push(op);
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn set_size(&mut self, size: Size) -> Result<(), CanvasError> {
        self.record(CanvasOp::SetSize(size))
    }

    fn clear(&mut self, rect: Rect) -> Result<(), CanvasError> {
        self.record(CanvasOp::Clear(rect))
    }

    fn set_color(&mut self, color: Color) -> Result<(), CanvasError> {
        self.record(CanvasOp::SetColor(color))
    }

    fn fill_path(&mut self, path: &Path) -> Result<(), CanvasError> {
        self.record(CanvasOp::FillPath(path.clone()))
    }

    fn stroke_path(&mut self, path: &Path, width: f64) -> Result<(), CanvasError> {
        self.record(CanvasOp::StrokePath(path.clone(), width))
    }

    fn draw_image(&mut self, image: &ImageRef, dest: Rect) -> Result<(), CanvasError> {
        self.record(CanvasOp::DrawImage(image.clone(), dest))
    }
}
