//! Input events and per-view handler registration.

pub mod handler;
pub mod input;

pub use handler::{HandlerRegistry, HandlerSlot, RemovedHandler, ViewHandler};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, PointerEvent, PointerKind};
