//! Window layer contract and its headless and terminal implementations.

use std::io;

use crate::geometry::{Rect, Size};

/// The collaborator that owns the rendering surface.
///
/// The core asks it for two things only: a frame callback, and whether a rect
/// (in root coordinates) is currently on screen.
pub trait WindowLayer {
    /// Ask to be ticked on the next frame.
    fn request_frame(&mut self);

    fn is_on_screen(&self, rect: Rect) -> bool;

    fn size(&self) -> Size;

    fn resize(&mut self, _size: Size) {}

    /// Show `title` in the window chrome, where there is one.
    fn set_title(&mut self, _title: &str) -> io::Result<()> {
        Ok(())
    }

    fn title(&self) -> Option<&str> {
        None
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// A fixed rectangle of root coordinates. Used headless and as the basis of
/// real windows.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    rect: Rect,
    frame_requested: bool,
    title: Option<String>,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self { rect: Rect::from_size(size), frame_requested: false, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Scroll the viewport to show a different part of the root.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Clear and return the pending frame request.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }
}

impl WindowLayer for Viewport {
    fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    /// Rects with no area count as on screen when their origin is.
    fn is_on_screen(&self, rect: Rect) -> bool {
        if rect.is_empty() {
            self.rect.contains(rect.pos())
        } else {
            self.rect.overlaps(rect)
        }
    }

    fn size(&self) -> Size {
        self.rect.size()
    }

    fn resize(&mut self, size: Size) {
        self.rect = Rect::from_pos_size(self.rect.pos(), size);
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.title = Some(title.to_owned());
        Ok(())
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

// ---------------------------------------------------------------------------
// TerminalWindow
// ---------------------------------------------------------------------------

/// A viewport sized to the controlling terminal, one unit per character cell.
#[derive(Debug)]
pub struct TerminalWindow {
    viewport: Viewport,
}

impl TerminalWindow {
    /// Query the terminal size via crossterm.
    pub fn new() -> io::Result<Self> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(Self { viewport: Viewport::new(Size::new(cols as f64, rows as f64)) })
    }

    pub fn take_frame_request(&mut self) -> bool {
        self.viewport.take_frame_request()
    }
}

impl WindowLayer for TerminalWindow {
    fn request_frame(&mut self) {
        self.viewport.request_frame();
    }

    fn is_on_screen(&self, rect: Rect) -> bool {
        self.viewport.is_on_screen(rect)
    }

    fn size(&self) -> Size {
        self.viewport.size()
    }

    fn resize(&mut self, size: Size) {
        self.viewport.resize(size);
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        crossterm::execute!(io::stdout(), crossterm::terminal::SetTitle(title))?;
        self.viewport.set_title(title)
    }

    fn title(&self) -> Option<&str> {
        self.viewport.title()
    }
}
