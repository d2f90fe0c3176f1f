//! Integration tests for cellkit.
//!
//! These tests exercise the public API from outside the crate: layout through
//! the view tree, the exposure scheduler through a headless screen, focus
//! through the pilot, and the tokio frame pump.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use cellkit::app::{App, AppConfig};
use cellkit::event::{Key, Modifiers};
use cellkit::focus::FocusWrap;
use cellkit::geometry::{Rect, Size};
use cellkit::layout::{Cell, GridView, StackView};
use cellkit::render::{DrawContext, Drawable};
use cellkit::screen::Screen;
use cellkit::testing::{layout_to_string, Pilot, RecordingCanvas};
use cellkit::view::{ViewId, ViewNode, ViewTree};
use cellkit::{Alignment, CanvasError};

const COALESCE: Duration = Duration::from_millis(100);

fn leaf(w: f64, h: f64) -> ViewNode {
    ViewNode::leaf("v").with_min_size(Size::new(w, h))
}

fn rect(tree: &ViewTree, id: ViewId) -> Rect {
    tree.get(id).unwrap().rect()
}

fn painted(name: &str, canvas: &RecordingCanvas) -> ViewNode {
    ViewNode::leaf(name)
        .with_min_size(Size::new(10.0, 10.0))
        .focusable(true)
        .with_drawable(Drawable::new(canvas.clone(), |_: &mut DrawContext<'_>| Ok(())))
}

/// A 100x50 screen with one painted leaf in a row, after its first frame.
fn drawn_screen() -> (Screen, ViewId, ViewId, RecordingCanvas, Instant) {
    let mut screen = Screen::headless(100.0, 50.0);
    let root = screen.present(ViewNode::container("row", StackView::horizontal().with_spacing(0.0)));
    let canvas = RecordingCanvas::new();
    let view = screen.tree.add_child(root, painted("a", &canvas), Cell::default()).unwrap();
    let start = Instant::now();
    screen.tick(start);
    assert_eq!(canvas.draw_count(), 1);
    (screen, root, view, canvas, start)
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn test_stack_expanding_middle_cell() {
    let mut tree = ViewTree::new();
    let row = tree.insert(ViewNode::container("row", StackView::horizontal().with_spacing(10.0)));
    let left = || Cell::new(Alignment::LEFT | Alignment::TOP);
    let a = tree.add_child(row, leaf(20.0, 10.0), left()).unwrap();
    let b = tree
        .add_child(row, leaf(0.0, 10.0), Cell::new(Alignment::HOR_EXPAND | Alignment::TOP))
        .unwrap();
    let c = tree.add_child(row, leaf(40.0, 10.0), left()).unwrap();
    tree.set_rect(row, Rect::new(0.0, 0.0, 200.0, 10.0));

    assert_eq!(rect(&tree, a), Rect::new(0.0, 0.0, 20.0, 10.0));
    assert_eq!(rect(&tree, b), Rect::new(30.0, 0.0, 120.0, 10.0));
    assert_eq!(rect(&tree, c), Rect::new(160.0, 0.0, 40.0, 10.0));
}

#[test]
fn test_stack_size_is_sum_plus_spacing() {
    for widths in [vec![1.0], vec![3.0, 7.0], vec![5.0, 5.0, 12.0, 1.0]] {
        let mut tree = ViewTree::new();
        let row = tree.insert(ViewNode::container("row", StackView::horizontal().with_spacing(4.0)));
        for &w in &widths {
            tree.add_child(row, leaf(w, 2.0), Cell::default()).unwrap();
        }
        let expected = widths.iter().sum::<f64>() + 4.0 * (widths.len() - 1) as f64;
        assert_eq!(tree.calculated_size(row, Size::ZERO).size, Size::new(expected, 2.0));
    }
}

#[test]
fn test_grid_of_seven_columns() {
    let mut tree = ViewTree::new();
    let grid = tree.insert(ViewNode::container("grid", GridView::new(7).with_spacing(Size::ZERO)));
    let ids: Vec<ViewId> = (0..42)
        .map(|_| tree.add_child(grid, leaf(10.0, 4.0), Cell::default()).unwrap())
        .collect();
    assert_eq!(tree.calculated_size(grid, Size::ZERO).size, Size::new(70.0, 24.0));
    tree.set_rect(grid, Rect::new(0.0, 0.0, 70.0, 24.0));

    for (i, &id) in ids.iter().enumerate() {
        let (row, col) = (i / 7, i % 7);
        assert_eq!(rect(&tree, id), Rect::new(col as f64 * 10.0, row as f64 * 4.0, 10.0, 4.0));
    }
}

#[test]
fn test_layout_is_idempotent() {
    let mut tree = ViewTree::new();
    let column = tree.insert(ViewNode::container("column", StackView::vertical()));
    let a = tree.add_child(column, leaf(13.0, 3.0), Cell::new(Alignment::CENTER)).unwrap();
    tree.add_child(column, leaf(8.0, 5.0), Cell::default()).unwrap();
    tree.set_rect(column, Rect::new(0.0, 0.0, 40.0, 30.0));

    let first = rect(&tree, a);
    let size = tree.calculated_size(column, Size::new(40.0, 30.0));
    assert_eq!(tree.layout_pass(), 0);
    tree.arrange(column);
    assert_eq!(rect(&tree, a), first);
    assert_eq!(tree.calculated_size(column, Size::new(40.0, 30.0)), size);
}

#[test]
fn test_collapse_keeps_cell_order() {
    let mut screen = Screen::headless(100.0, 20.0);
    let row = screen.present(ViewNode::container("row", StackView::horizontal().with_spacing(0.0)));
    let ids: Vec<ViewId> = (0..3)
        .map(|_| screen.tree.add_child(row, leaf(10.0, 10.0), Cell::default()).unwrap())
        .collect();
    screen.layout();
    assert_eq!(rect(&screen.tree, ids[2]).x, 20.0);

    assert!(screen.collapse_child(row, ids[1], true));
    screen.layout();
    assert_eq!(screen.tree.children(row), vec![ids[0], ids[2]]);
    assert_eq!(screen.tree.cells(row).len(), 3);
    assert_eq!(rect(&screen.tree, ids[2]).x, 10.0);

    assert!(screen.collapse_child(row, ids[1], false));
    screen.layout();
    assert_eq!(screen.tree.children(row), ids);
    assert_eq!(rect(&screen.tree, ids[2]).x, 20.0);
}

#[test]
fn test_layout_snapshot() {
    let mut tree = ViewTree::new();
    let row = tree.insert(ViewNode::container("row", StackView::horizontal().with_spacing(0.0)));
    tree.add_child(row, ViewNode::leaf("a").with_min_size(Size::new(10.0, 10.0)), Cell::default())
        .unwrap();
    tree.add_child(
        row,
        ViewNode::leaf("b").with_min_size(Size::new(5.0, 5.0)),
        Cell::new(Alignment::LEFT | Alignment::VERT_CENTER),
    )
    .unwrap();
    tree.set_rect(row, Rect::new(0.0, 0.0, 40.0, 10.0));

    insta::assert_snapshot!(layout_to_string(&tree, row), @r"
    row 0,0 40x10
      a 0,0 10x10
      b 10,2 5x5
    ");
}

// ---------------------------------------------------------------------------
// Exposure
// ---------------------------------------------------------------------------

#[test]
fn test_double_invalidation_exposes_once() {
    let (mut screen, _, view, canvas, start) = drawn_screen();
    screen.tree.mark_needs_layout(view);
    screen.tree.mark_needs_layout(view);
    screen.tick(start);
    assert_eq!(screen.scheduler.pending_len(), 1);
    assert!(screen.scheduler.is_pending(view));

    let report = screen.tick(start + COALESCE);
    assert_eq!(report.drawn, vec![view]);
    assert_eq!(canvas.draw_count(), 2);
}

#[test]
fn test_repeated_exposes_draw_once() {
    let (mut screen, _, view, canvas, start) = drawn_screen();
    assert!(screen.expose(view, start));
    for i in 1..5u32 {
        assert!(!screen.expose(view, start + Duration::from_millis(10) * i));
    }
    screen.tick(start + COALESCE);
    screen.tick(start + COALESCE * 3);
    assert_eq!(canvas.draw_count(), 2);
}

#[test]
fn test_hidden_view_is_never_drawn() {
    let mut screen = Screen::headless(100.0, 50.0);
    let root = screen.present(ViewNode::container("row", StackView::horizontal()));
    let canvas = RecordingCanvas::new();
    let view = screen.tree.add_child(root, painted("hidden", &canvas).shown(false), Cell::default()).unwrap();
    let start = Instant::now();
    for i in 0..4u32 {
        let now = start + COALESCE * i;
        assert!(!screen.expose(view, now));
        screen.tick(now);
    }
    assert_eq!(canvas.draw_count(), 0);
    assert!(screen.tree.get(view).unwrap().drawable().unwrap().state().exposed);
}

#[test]
fn test_showing_exposed_view_draws_it() {
    let mut screen = Screen::headless(100.0, 50.0);
    let root = screen.present(ViewNode::container("row", StackView::horizontal()));
    let canvas = RecordingCanvas::new();
    let view = screen.tree.add_child(root, painted("late", &canvas).shown(false), Cell::default()).unwrap();
    let start = Instant::now();
    screen.tick(start);
    assert_eq!(canvas.draw_count(), 0);

    screen.set_shown(view, true);
    let report = screen.tick(start + Duration::from_millis(1));
    assert_eq!(report.drawn, vec![view]);
    assert_eq!(canvas.draw_count(), 1);
}

#[test]
fn test_removal_cancels_draw_and_runs_handlers_in_order() {
    let (mut screen, _, view, canvas, start) = drawn_screen();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second"] {
        let order = Rc::clone(&order);
        screen.handlers.on_removed(view, move |_| order.borrow_mut().push(tag));
    }
    screen.expose(view, start);
    assert!(screen.remove(view));
    assert_eq!(screen.scheduler.pending_len(), 0);
    assert_eq!(*order.borrow(), vec!["first", "second"]);

    screen.tick(start + COALESCE);
    assert_eq!(canvas.draw_count(), 1);
}

#[test]
fn test_failed_draw_is_retried() {
    let (mut screen, _, view, canvas, start) = drawn_screen();
    canvas.fail_next(CanvasError::SurfaceLost);
    screen.expose(view, start);
    let report = screen.tick(start + COALESCE);
    assert_eq!(report.failed, vec![view]);
    let report = screen.tick(start + COALESCE);
    assert_eq!(report.drawn, vec![view]);
    assert_eq!(canvas.draw_count(), 2);
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

fn focus_pilot(wrap: FocusWrap) -> (Pilot, Vec<ViewId>) {
    let mut pilot = Pilot::with_config(60, 10, AppConfig::new().with_focus_wrap(wrap));
    let screen = &mut pilot.app_mut().screen;
    let row = screen.present(ViewNode::container("row", StackView::horizontal()));
    let ids = (0..3)
        .map(|_| screen.tree.add_child(row, leaf(5.0, 5.0).focusable(true), Cell::default()).unwrap())
        .collect();
    screen.rebuild_focus();
    (pilot, ids)
}

#[test]
fn test_focus_wraps_around() {
    let (mut pilot, ids) = focus_pilot(FocusWrap::Wrap);
    pilot.press_key(Key::BackTab);
    assert_eq!(pilot.app().screen.focused_view(), Some(ids[2]));
    pilot.press_key(Key::Right);
    assert_eq!(pilot.app().screen.focused_view(), Some(ids[0]));
}

#[test]
fn test_focus_clamps_at_end() {
    let (mut pilot, ids) = focus_pilot(FocusWrap::Clamp);
    for _ in 0..5 {
        pilot.press_key(Key::Tab);
    }
    assert_eq!(pilot.app().screen.focused_view(), Some(ids[2]));
    assert!(!pilot.press_key(Key::Tab));
    assert!(!pilot.press_key_with(Key::Left, Modifiers::ALT));
}

// ---------------------------------------------------------------------------
// Frame pump
// ---------------------------------------------------------------------------

fn animated(canvas: &RecordingCanvas) -> ViewNode {
    ViewNode::leaf("spinner")
        .with_min_size(Size::new(4.0, 4.0))
        .with_drawable(Drawable::new(canvas.clone(), |ctx: &mut DrawContext<'_>| {
            ctx.expose();
            Ok(())
        }))
}

#[tokio::test(start_paused = true)]
async fn test_self_exposing_view_redraws_every_window() {
    let config = AppConfig::new().with_fps(10).with_coalesce_window(COALESCE);
    let mut app = App::headless_with_config(20, 20, config);
    let canvas = RecordingCanvas::new();
    let root = app.screen.present(ViewNode::container("root", StackView::vertical()));
    let spinner = app.screen.tree.add_child(root, animated(&canvas), Cell::default()).unwrap();

    let report = app.run_frames(5).await;
    assert_eq!(app.frames(), 5);
    assert_eq!(report.drawn, vec![spinner; 5]);
    assert_eq!(canvas.draw_count(), 5);
}

#[test]
fn test_run_frames_on_blocking_runtime() {
    let mut app = App::headless_with_config(20, 20, AppConfig::new().with_fps(1000));
    let canvas = RecordingCanvas::new();
    let root = app.screen.present(ViewNode::container("root", StackView::vertical()));
    app.screen.tree.add_child(root, painted("once", &canvas), Cell::default()).unwrap();

    let report = tokio_test::block_on(app.run_frames(3));
    assert_eq!(report.drawn.len(), 1);
    assert_eq!(app.frames(), 3);
    assert_eq!(canvas.draw_count(), 1);
}
