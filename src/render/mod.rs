//! Drawing: the canvas backend contract, per-view drawing state, the exposure
//! scheduler and the window layer it talks to.

pub mod canvas;
pub mod drawable;
pub mod scheduler;
pub mod window;

pub use canvas::{Canvas, Color, ImageRef, NullCanvas, Path, PathElement};
pub use drawable::{DrawContext, DrawHandler, DrawOutcome, Drawable, ExposeState};
pub use scheduler::{FrameReport, Scheduler, DEFAULT_COALESCE_WINDOW, DEFAULT_RETRY_DELAY};
pub use window::{TerminalWindow, Viewport, WindowLayer};
