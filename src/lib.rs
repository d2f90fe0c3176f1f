//! # cellkit
//!
//! A retained-mode view toolkit core: cell-based layout, exposure-driven
//! redraw scheduling, and keyboard focus navigation.
//!
//! Views live in a slotmap-backed tree. Containers own an ordered list of
//! [`Cell`](layout::Cell)s, each holding one child plus its placement rules,
//! and arrange them as stacks, grids or freely anchored boxes. Drawing is
//! lazy: a view is *exposed*, and the [`Scheduler`](render::Scheduler) draws
//! it on a later frame once it is visible, coalescing repeated requests.
//!
//! ## Core Systems
//!
//! - **[`geometry`]**: Pos, Size, Rect, Insets, Axis
//! - **[`alignment`]**: Alignment flags and the box-in-rect placement rules
//! - **[`view`]**: View tree, node state, measure/container contracts, name lookups
//! - **[`layout`]**: Cells, stack/grid/free containers, spatial hit testing
//! - **[`render`]**: Canvas contract, drawables, exposure scheduler, window layer
//! - **[`focus`]**: Focus navigator with explicit wrap behavior
//! - **[`event`]**: Input events and per-view handlers
//! - **[`screen`]**: One presented tree and the frame loop over it
//! - **[`app`]**: Configuration, input routing and the tokio frame pump
//! - **[`testing`]**: Headless pilot, recording canvas, layout snapshots

// Foundation
pub mod alignment;
pub mod error;
pub mod geometry;

// Views and layout
pub mod layout;
pub mod view;

// Drawing
pub mod render;

// Input
pub mod event;
pub mod focus;

// Application
pub mod app;
pub mod screen;

pub mod testing;

pub use alignment::Alignment;
pub use app::{App, AppConfig};
pub use error::{AlignmentParseError, CanvasError, ViewError};
pub use focus::{FocusChange, FocusNavigator, FocusWrap};
pub use geometry::{Axis, Insets, Pos, Rect, Size};
pub use layout::{Cell, FreeView, GridView, SpatialMap, StackView};
pub use render::{Canvas, DrawContext, Drawable, FrameReport, Scheduler, WindowLayer};
pub use screen::Screen;
pub use view::{Container, Measure, ViewId, ViewNode, ViewTree};
