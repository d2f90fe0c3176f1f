//! Headless testing helpers: Pilot, recording canvas, layout snapshots.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) without a terminal
//! on a simulated clock. [`RecordingCanvas`] logs every drawing call, and
//! [`layout_to_string`] captures arranged rects as text for snapshot tests.

pub mod canvas;
pub mod pilot;
pub mod snapshot;

pub use canvas::{CanvasLog, CanvasOp, RecordingCanvas};
pub use pilot::Pilot;
pub use snapshot::layout_to_string;
