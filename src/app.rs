//! Application: configuration, input routing and the frame pump.
//!
//! [`App`] wraps a [`Screen`] and drives it from input events and frame ticks.
//! The `new_headless` constructor gives a fixed-size viewport for tests; the
//! frame pump runs on tokio's timer, so tests can drive it with a paused clock.

use std::io;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::event::{InputEvent, Key, KeyEvent, Modifiers};
use crate::focus::FocusWrap;
use crate::geometry::{Axis, Size};
use crate::layout::{GridView, StackView, DEFAULT_GRID_SPACING, DEFAULT_STACK_SPACING};
use crate::render::{
    FrameReport, TerminalWindow, Viewport, WindowLayer, DEFAULT_COALESCE_WINDOW, DEFAULT_RETRY_DELAY,
};
use crate::screen::Screen;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Title shown by the window layer, if it has chrome for one.
    pub title: Option<String>,
    /// Target frames per second of the frame pump.
    pub fps: u32,
    /// Delay between an exposure and its draw; exposures inside it coalesce.
    pub coalesce_window: Duration,
    /// Delay before redrawing a view whose resources were not ready.
    pub retry_delay: Duration,
    pub focus_wrap: FocusWrap,
    /// Spacing of stacks made with [`AppConfig::stack`].
    pub stack_spacing: f64,
    /// Column and row spacing of grids made with [`AppConfig::grid`].
    pub grid_spacing: Size,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: None,
            fps: 60,
            coalesce_window: DEFAULT_COALESCE_WINDOW,
            retry_delay: DEFAULT_RETRY_DELAY,
            focus_wrap: FocusWrap::Wrap,
            stack_spacing: DEFAULT_STACK_SPACING,
            grid_spacing: DEFAULT_GRID_SPACING,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_focus_wrap(mut self, wrap: FocusWrap) -> Self {
        self.focus_wrap = wrap;
        self
    }

    pub fn with_stack_spacing(mut self, spacing: f64) -> Self {
        self.stack_spacing = spacing;
        self
    }

    pub fn with_grid_spacing(mut self, spacing: Size) -> Self {
        self.grid_spacing = spacing;
        self
    }

    /// Time between frame ticks. An fps of zero is treated as one.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// A stack using the configured spacing.
    pub fn stack(&self, axis: Axis) -> StackView {
        StackView::new(axis).with_spacing(self.stack_spacing)
    }

    /// A grid using the configured spacing.
    pub fn grid(&self, columns: usize) -> GridView {
        GridView::new(columns).with_spacing(self.grid_spacing)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub config: AppConfig,
    running: bool,
    frames: u64,
}

impl App {
    /// An app over the controlling terminal, sized from crossterm.
    pub fn new(config: AppConfig) -> io::Result<Self> {
        let mut window = TerminalWindow::new()?;
        if let Some(title) = &config.title {
            window.set_title(title)?;
        }
        Ok(Self::with_screen(Screen::with_config(window, &config), config))
    }

    /// A headless app with a fixed viewport, for tests.
    pub fn new_headless(width: u16, height: u16) -> Self {
        Self::headless_with_config(width, height, AppConfig::default())
    }

    pub fn headless_with_config(width: u16, height: u16, config: AppConfig) -> Self {
        let mut viewport = Viewport::new(Size::new(width as f64, height as f64));
        if let Some(title) = &config.title {
            viewport = viewport.with_title(title.clone());
        }
        Self::with_screen(Screen::with_config(viewport, &config), config)
    }

    fn with_screen(screen: Screen, config: AppConfig) -> Self {
        Self { screen, config, running: true, frames: 0 }
    }

    /// Route one input event. Ctrl+C requests quit; other keys go to the
    /// focus navigator, pointer events to the view under the pointer.
    /// Returns whether the event was handled.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        match event {
            InputEvent::Key(KeyEvent { code: Key::Char('c'), modifiers }) if modifiers == Modifiers::CTRL => {
                log::debug!("quit requested");
                self.running = false;
                true
            }
            InputEvent::Key(key) => self.screen.handle_key(&key, now),
            InputEvent::Pointer(pointer) => self.screen.handle_pointer(&pointer).is_some(),
            InputEvent::Resize { width, height } => {
                self.screen.resize(Size::new(width as f64, height as f64));
                true
            }
        }
    }

    /// Run one frame at `now`.
    pub fn frame(&mut self, now: Instant) -> FrameReport {
        self.frames += 1;
        self.screen.tick(now)
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    fn frame_timer(&self) -> tokio::time::Interval {
        let mut interval = tokio::time::interval(self.config.frame_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }

    /// Run `count` frames at the configured rate, stopping early on quit.
    pub async fn run_frames(&mut self, count: usize) -> FrameReport {
        let mut interval = self.frame_timer();
        let mut report = FrameReport::default();
        for _ in 0..count {
            if self.should_quit() {
                break;
            }
            let at = interval.tick().await;
            report.merge(self.frame(at.into_std()));
        }
        report
    }

    /// Interleave input events with frame ticks until quit is requested or
    /// the input channel closes. Returns the number of frames run.
    pub async fn pump(&mut self, mut input: mpsc::Receiver<InputEvent>) -> u64 {
        let mut interval = self.frame_timer();
        let start = self.frames;
        while !self.should_quit() {
            tokio::select! {
                biased;

                event = input.recv() => match event {
                    Some(event) => {
                        self.handle_input(event, tokio::time::Instant::now().into_std());
                    }
                    None => break,
                },
                at = interval.tick() => {
                    self.frame(at.into_std());
                }
            }
        }
        self.frames - start
    }
}

/// Read terminal events on a blocking thread and forward the ones the crate
/// understands. The reader stops once the receiver is dropped.
///
/// Must be called from within a tokio runtime.
pub fn spawn_terminal_input(capacity: usize) -> mpsc::Receiver<InputEvent> {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    tokio::task::spawn_blocking(move || loop {
        let event = match crossterm::event::read() {
            Ok(event) => event,
            Err(err) => {
                log::warn!("terminal input failed: {err}");
                break;
            }
        };
        if let Some(event) = InputEvent::from_crossterm(event) {
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
    });
    rx
}

// ===========================================================================
// Tests
// ===========================================================================
