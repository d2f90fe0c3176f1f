//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) in headless mode with its own
//! simulated clock. Input goes through [`App::handle_input`] exactly as
//! terminal input would; [`Pilot::advance`] moves the clock forward and runs a
//! frame, so coalescing and retry delays can be stepped through.

use std::time::{Duration, Instant};

use crate::app::{App, AppConfig};
use crate::event::{InputEvent, Key, KeyEvent, Modifiers, PointerEvent, PointerKind};
use crate::geometry::Pos;
use crate::render::FrameReport;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```ignore
/// use cellkit::testing::Pilot;
/// use cellkit::event::Key;
///
/// let mut pilot = Pilot::new(80, 24);
/// pilot.press_key(Key::Tab);
/// pilot.frame();
/// assert!(pilot.is_running());
/// ```
pub struct Pilot {
    app: App,
    now: Instant,
}

impl Pilot {
    /// Create a headless app with the given viewport size.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_config(width, height, AppConfig::default())
    }

    pub fn with_config(width: u16, height: u16, config: AppConfig) -> Self {
        Self {
            app: App::headless_with_config(width, height, config),
            now: Instant::now(),
        }
    }

    /// The simulated current time.
    pub fn now(&self) -> Instant {
        self.now
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> bool {
        self.press_key_with(key, Modifiers::empty())
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> bool {
        self.send(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Simulate a primary press at (x, y).
    pub fn press_at(&mut self, x: f64, y: f64) -> bool {
        self.send(InputEvent::Pointer(PointerEvent::new(PointerKind::Press, Pos::new(x, y))))
    }

    pub fn long_press_at(&mut self, x: f64, y: f64) -> bool {
        self.send(InputEvent::Pointer(PointerEvent::new(PointerKind::LongPress, Pos::new(x, y))))
    }

    /// Simulate a viewport resize.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        self.send(InputEvent::Resize { width, height })
    }

    fn send(&mut self, event: InputEvent) -> bool {
        self.app.handle_input(event, self.now)
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Run one frame at the current simulated time.
    pub fn frame(&mut self) -> FrameReport {
        self.app.frame(self.now)
    }

    /// Move the clock forward by `by`, then run a frame.
    pub fn advance(&mut self, by: Duration) -> FrameReport {
        self.now += by;
        self.frame()
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Whether the app is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
