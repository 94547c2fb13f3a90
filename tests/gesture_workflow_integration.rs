//! Integration tests for input-driven board workflows
//!
//! Events go through `BoardController::handle_event` against a plain `Board`
//! host, the same path the frontend uses.

mod common;

use brainstorm_board::board::{Board, Point};
use brainstorm_board::canvas::{
    to_world, BoardController, GestureKind, HitTarget, InputEvent, Modifiers, PointerButton,
};
use brainstorm_board::config::CanvasSettings;
use common::builders::BoardBuilder;
use common::{assert_float_eq, assert_point_eq, EPSILON};

fn controller() -> BoardController {
    BoardController::seeded(CanvasSettings::default(), 11)
}

fn press(pos: Point, button: PointerButton, target: HitTarget) -> InputEvent {
    InputEvent::PointerDown {
        pos,
        button,
        modifiers: Modifiers::default(),
        target,
    }
}

fn move_to(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove {
        pos: Point::new(x, y),
    }
}

fn release(x: f64, y: f64, target: HitTarget) -> InputEvent {
    InputEvent::PointerUp {
        pos: Point::new(x, y),
        target,
    }
}

#[test]
fn test_drag_moves_node_by_screen_delta_over_zoom() {
    let (mut board, ids) = BoardBuilder::new().node("a", 50.0, 50.0).zoom(2.0).build();
    let node = ids[0];
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &press(Point::new(105.0, 102.0), PointerButton::Primary, HitTarget::NodeBody(node)),
    );
    ctl.handle_event(&mut board, &move_to(145.0, 72.0));
    ctl.handle_event(&mut board, &release(145.0, 72.0, HitTarget::NodeBody(node)));

    assert_point_eq(board.node(node).unwrap().position, Point::new(70.0, 35.0), EPSILON);
    assert!(ctl.gesture().is_idle());
}

#[test]
fn test_wheel_zoom_keeps_point_under_cursor() {
    let mut board = Board::default();
    let mut ctl = controller();
    let cursor = Point::new(100.0, 100.0);
    let before = to_world(&board.viewport, cursor);

    ctl.handle_event(
        &mut board,
        &InputEvent::Wheel {
            pos: cursor,
            delta_y: -120.0,
        },
    );

    assert_float_eq(board.viewport.zoom, 1.1, EPSILON);
    assert_point_eq(to_world(&board.viewport, cursor), before, EPSILON);
}

#[test]
fn test_pinch_doubles_zoom_around_fixed_midpoint() {
    let mut board = Board::default();
    let mut ctl = controller();
    let midpoint = Point::new(200.0, 200.0);
    let before = to_world(&board.viewport, midpoint);

    ctl.handle_event(
        &mut board,
        &InputEvent::TouchStart {
            touches: vec![Point::new(150.0, 200.0), Point::new(250.0, 200.0)],
            target: HitTarget::Canvas,
        },
    );
    assert_eq!(ctl.gesture().kind(), GestureKind::PinchZooming);

    ctl.handle_event(
        &mut board,
        &InputEvent::TouchMove {
            touches: vec![Point::new(100.0, 200.0), Point::new(300.0, 200.0)],
        },
    );

    assert_float_eq(board.viewport.zoom, 2.0, EPSILON);
    assert_point_eq(to_world(&board.viewport, midpoint), before, EPSILON);

    ctl.handle_event(
        &mut board,
        &InputEvent::TouchEnd {
            touches: vec![Point::new(300.0, 200.0)],
            target: HitTarget::Canvas,
        },
    );
    assert!(ctl.gesture().is_idle());
}

#[test]
fn test_middle_drag_pans_by_absolute_offset() {
    let (mut board, _) = BoardBuilder::new().pan(10.0, 10.0).build();
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &press(Point::new(300.0, 300.0), PointerButton::Middle, HitTarget::Canvas),
    );
    ctl.handle_event(&mut board, &move_to(320.0, 310.0));
    ctl.handle_event(&mut board, &move_to(350.0, 250.0));

    assert_eq!(board.viewport.pan, Point::new(60.0, -40.0));
    assert_eq!(board.viewport.zoom, 1.0);
}

#[test]
fn test_alt_drag_on_canvas_pans() {
    let mut board = Board::default();
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &InputEvent::PointerDown {
            pos: Point::ZERO,
            button: PointerButton::Primary,
            modifiers: Modifiers {
                alt: true,
                ..Default::default()
            },
            target: HitTarget::Canvas,
        },
    );
    ctl.handle_event(&mut board, &move_to(-25.0, 5.0));
    assert_eq!(board.viewport.pan, Point::new(-25.0, 5.0));
}

#[test]
fn test_connect_creates_single_edge_either_direction() {
    let (mut board, ids) = BoardBuilder::new()
        .node("a", 0.0, 0.0)
        .node("b", 400.0, 0.0)
        .build();
    let (a, b) = (ids[0], ids[1]);
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &press(Point::new(112.0, 0.0), PointerButton::Primary, HitTarget::ConnectionHandle(a)),
    );
    ctl.handle_event(&mut board, &move_to(390.0, 0.0));
    ctl.handle_event(&mut board, &release(400.0, 0.0, HitTarget::NodeBody(b)));

    ctl.handle_event(
        &mut board,
        &press(Point::new(512.0, 0.0), PointerButton::Primary, HitTarget::ConnectionHandle(b)),
    );
    ctl.handle_event(&mut board, &release(0.0, 0.0, HitTarget::NodeControl(a)));

    assert_eq!(board.edges.len(), 1);
    assert!(board.edges[0].connects(a, b));
}

#[test]
fn test_cancelled_connect_creates_no_edge() {
    let (mut board, ids) = BoardBuilder::new()
        .node("a", 0.0, 0.0)
        .node("b", 400.0, 0.0)
        .build();
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &press(Point::new(112.0, 0.0), PointerButton::Primary, HitTarget::ConnectionHandle(ids[0])),
    );
    ctl.handle_event(&mut board, &move_to(400.0, 0.0));
    assert!(ctl.pending_edge(&board).is_some());

    ctl.handle_event(&mut board, &InputEvent::PointerCancel);
    assert!(ctl.gesture().is_idle());
    assert!(ctl.pending_edge(&board).is_none());

    ctl.handle_event(&mut board, &release(400.0, 0.0, HitTarget::NodeBody(ids[1])));
    assert!(board.edges.is_empty());
}

#[test]
fn test_cancelled_drag_keeps_last_position() {
    let (mut board, ids) = BoardBuilder::new().node("a", 0.0, 0.0).build();
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &press(Point::ZERO, PointerButton::Primary, HitTarget::NodeBody(ids[0])),
    );
    ctl.handle_event(&mut board, &move_to(30.0, 40.0));
    ctl.handle_event(&mut board, &InputEvent::PointerCancel);
    ctl.handle_event(&mut board, &move_to(500.0, 500.0));

    assert_eq!(board.node(ids[0]).unwrap().position, Point::new(30.0, 40.0));
}

#[test]
fn test_wheel_during_drag_keeps_dragging() {
    let (mut board, ids) = BoardBuilder::new().node("a", 100.0, 100.0).build();
    let node = ids[0];
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &press(Point::new(100.0, 100.0), PointerButton::Primary, HitTarget::NodeBody(node)),
    );
    ctl.handle_event(
        &mut board,
        &InputEvent::Wheel {
            pos: Point::ZERO,
            delta_y: -1.0,
        },
    );
    assert_float_eq(board.viewport.zoom, 1.1, EPSILON);
    assert_eq!(ctl.gesture().kind(), GestureKind::DraggingNode);

    // Grab offset was zero, so the node lands under the pointer at the new
    // zoom.
    ctl.handle_event(&mut board, &move_to(220.0, 110.0));
    assert_point_eq(
        board.node(node).unwrap().position,
        Point::new(200.0, 100.0),
        EPSILON,
    );
}

#[test]
fn test_second_touch_during_pan_starts_pinch() {
    let mut board = Board::default();
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &InputEvent::TouchStart {
            touches: vec![Point::new(10.0, 10.0)],
            target: HitTarget::Canvas,
        },
    );
    ctl.handle_event(
        &mut board,
        &InputEvent::TouchStart {
            touches: vec![Point::new(10.0, 10.0), Point::new(200.0, 10.0)],
            target: HitTarget::Canvas,
        },
    );
    assert_eq!(ctl.gesture().kind(), GestureKind::PinchZooming);

    ctl.handle_event(
        &mut board,
        &InputEvent::TouchMove {
            touches: vec![Point::new(30.0, 10.0), Point::new(400.0, 10.0)],
        },
    );

    assert_float_eq(board.viewport.zoom, 370.0 / 190.0, EPSILON);
    // Anchored at the current midpoint.
    assert_point_eq(
        to_world(&board.viewport, Point::new(215.0, 10.0)),
        Point::new(215.0, 10.0),
        EPSILON,
    );
}

#[test]
fn test_touch_drag_on_node() {
    let (mut board, ids) = BoardBuilder::new().node("a", 0.0, 0.0).build();
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &InputEvent::TouchStart {
            touches: vec![Point::new(5.0, 5.0)],
            target: HitTarget::NodeBody(ids[0]),
        },
    );
    ctl.handle_event(
        &mut board,
        &InputEvent::TouchMove {
            touches: vec![Point::new(65.0, -15.0)],
        },
    );
    assert_eq!(board.node(ids[0]).unwrap().position, Point::new(60.0, -20.0));
}

#[test]
fn test_pointer_down_on_node_editor_starts_nothing() {
    let (mut board, ids) = BoardBuilder::new().node("a", 0.0, 0.0).build();
    let before = board.clone();
    let mut ctl = controller();

    ctl.handle_event(
        &mut board,
        &press(Point::ZERO, PointerButton::Primary, HitTarget::NodeControl(ids[0])),
    );
    ctl.handle_event(&mut board, &move_to(100.0, 100.0));

    assert!(ctl.gesture().is_idle());
    assert_eq!(board, before);
}
