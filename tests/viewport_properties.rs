//! Property tests for viewport transforms

mod common;

use brainstorm_board::board::{Point, Viewport};
use brainstorm_board::canvas::{to_screen, to_world, ViewportModel};
use brainstorm_board::config::ZoomLimits;
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

fn point() -> impl Strategy<Value = Point> {
    (-1.0e4..1.0e4f64, -1.0e4..1.0e4f64).prop_map(|(x, y)| Point::new(x, y))
}

fn viewport() -> impl Strategy<Value = Viewport> {
    (point(), 0.1..10.0f64).prop_map(|(pan, zoom)| Viewport { pan, zoom })
}

#[derive(Debug, Clone)]
enum ViewOp {
    Pan(Point),
    ZoomAt(Point, f64),
    Wheel(Point, f64),
}

fn view_op() -> impl Strategy<Value = ViewOp> {
    prop_oneof![
        point().prop_map(ViewOp::Pan),
        (point(), 0.01..50.0f64).prop_map(|(anchor, zoom)| ViewOp::ZoomAt(anchor, zoom)),
        (point(), prop_oneof![Just(-1.0f64), Just(1.0f64), Just(0.0f64)])
            .prop_map(|(anchor, delta)| ViewOp::Wheel(anchor, delta)),
    ]
}

fn apply(model: &ViewportModel, vp: Viewport, op: &ViewOp) -> Viewport {
    match *op {
        ViewOp::Pan(delta) => model.pan(vp, delta),
        ViewOp::ZoomAt(anchor, zoom) => model.zoom_at(vp, anchor, zoom),
        ViewOp::Wheel(anchor, delta_y) => model.wheel_zoom(vp, anchor, delta_y),
    }
}

proptest! {
    #[test]
    fn test_world_screen_round_trip(vp in viewport(), p in point()) {
        let back = to_world(&vp, to_screen(&vp, p));
        prop_assert!((back.x - p.x).abs() < TOLERANCE, "{:?} -> {:?}", p, back);
        prop_assert!((back.y - p.y).abs() < TOLERANCE, "{:?} -> {:?}", p, back);
    }

    #[test]
    fn test_screen_world_round_trip_after_any_sequence(
        ops in prop::collection::vec(view_op(), 0..40),
        p in point(),
    ) {
        let model = ViewportModel::default();
        let vp = ops
            .iter()
            .fold(Viewport::default(), |vp, op| apply(&model, vp, op));

        prop_assert!(vp.zoom >= model.limits().min && vp.zoom <= model.limits().max);
        let back = to_screen(&vp, to_world(&vp, p));
        // Pan grows with the sequence, so compare relative to its size.
        let scale = 1.0 + vp.pan.x.abs().max(vp.pan.y.abs());
        prop_assert!((back.x - p.x).abs() < TOLERANCE * scale, "{:?} -> {:?} via {:?}", p, back, vp);
        prop_assert!((back.y - p.y).abs() < TOLERANCE * scale, "{:?} -> {:?} via {:?}", p, back, vp);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed(
        vp in viewport(),
        anchor in point(),
        requested in 0.01..50.0f64,
    ) {
        let model = ViewportModel::default();
        let before = to_world(&vp, anchor);
        let next = model.zoom_at(vp, anchor, requested);
        let after = to_world(&next, anchor);

        prop_assert!((after.x - before.x).abs() < TOLERANCE);
        prop_assert!((after.y - before.y).abs() < TOLERANCE);
    }

    #[test]
    fn test_zoom_stays_within_limits(
        vp in viewport(),
        anchor in point(),
        steps in prop::collection::vec(prop_oneof![Just(-1.0f64), Just(1.0f64)], 1..80),
    ) {
        let limits = ZoomLimits { min: 0.25, max: 4.0 };
        let model = ViewportModel::new(limits, 1.1);
        let mut current = model.zoom_at(vp, anchor, vp.zoom);
        for delta in steps {
            current = model.wheel_zoom(current, anchor, delta);
            prop_assert!(current.zoom >= limits.min && current.zoom <= limits.max);
        }
    }

    #[test]
    fn test_pan_is_additive(vp in viewport(), a in point(), b in point()) {
        let model = ViewportModel::default();
        let stepwise = model.pan(model.pan(vp, a), b);
        let combined = model.pan(vp, a + b);
        prop_assert!((stepwise.pan.x - combined.pan.x).abs() < TOLERANCE);
        prop_assert!((stepwise.pan.y - combined.pan.y).abs() < TOLERANCE);
        prop_assert_eq!(stepwise.zoom, vp.zoom);
    }
}
