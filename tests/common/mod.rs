//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use brainstorm_board::board::Point;

/// Default tolerance for transform math
pub const EPSILON: f64 = 1e-9;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert two points are approximately equal on both axes
pub fn assert_point_eq(a: Point, b: Point, epsilon: f64) {
    assert!(
        (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon,
        "Expected {:?} to be approximately equal to {:?} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
