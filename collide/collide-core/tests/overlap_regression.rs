//! End-to-end regression tests for the overlap and penetration queries.
//!
//! The concrete offsets here are configurations that historically exposed
//! edge cases: coincident shapes, overlaps a hair away from an axis, and
//! rotated pairs whose supports land near simplex edges.

#![allow(clippy::unreadable_literal)]

use approx::assert_relative_eq;
use collide_core::{overlaps, penetration, CollisionConfig, Shape};
use nalgebra::{Point2, Vector2};

const SQUARE_WIDTH: f64 = 0.2;

/// A square of side [`SQUARE_WIDTH`] centered on its local origin.
fn square() -> Shape {
    let half = SQUARE_WIDTH / 2.0;
    Shape::polygon(vec![
        Point2::new(-half, -half),
        Point2::new(half, -half),
        Point2::new(half, half),
        Point2::new(-half, half),
    ])
    .expect("square corners are convex")
}

fn square_at(x: f64, y: f64) -> Shape {
    square().with_position(Point2::new(x, y))
}

#[test]
fn coincident_squares_at_origin_overlap() {
    let a = square();
    let b = square();

    assert!(overlaps(&a, &b));
    assert!(penetration(&a, &b).norm() > 0.0);
}

#[test]
fn coincident_squares_away_from_origin_overlap() {
    let a = square_at(124.32, 74.428);
    let b = square_at(124.32, 74.428);

    assert!(overlaps(&a, &b));
    assert!(penetration(&a, &b).norm() > 0.0);
}

#[test]
fn square_below_resolves_downward() {
    let offset = -0.00198573451;
    let a = square_at(0.0, offset);
    let b = square();

    assert!(overlaps(&a, &b));
    let v = penetration(&a, &b);

    // The squares overlap by width - |offset|; the result exceeds that by
    // the eps margin and no more than the documented tolerance.
    let excess = v.y.abs() - (SQUARE_WIDTH - offset.abs());
    assert_relative_eq!(v.x, 0.0, epsilon = 1e-9);
    assert!(v.y > 0.0);
    assert!(excess > 0.0 && excess < 1e-6);
    assert_relative_eq!(v.y, 0.198014, epsilon = 1e-6);
}

#[test]
fn square_above_resolves_upward() {
    let offset = 0.0012375095;
    let a = square_at(0.0, offset);
    let b = square();

    assert!(overlaps(&a, &b));
    let v = penetration(&a, &b);

    let excess = v.y.abs() - (SQUARE_WIDTH - offset.abs());
    assert_relative_eq!(v.x, 0.0, epsilon = 1e-9);
    assert!(v.y < 0.0);
    assert!(excess > 0.0 && excess < 1e-6);
    assert_relative_eq!(v.y, -0.198762, epsilon = 1e-6);
}

#[test]
fn square_left_resolves_leftward() {
    let offset = -0.00198573451;
    let a = square_at(offset, 0.0);
    let b = square();

    let v = penetration(&a, &b);

    let excess = v.x.abs() - (SQUARE_WIDTH - offset.abs());
    assert!(v.x > 0.0);
    assert_relative_eq!(v.y, 0.0, epsilon = 1e-9);
    assert!(excess > 0.0 && excess < 1e-6);
}

#[test]
fn square_right_resolves_rightward() {
    let offset = 0.0025823875955451;
    let a = square_at(offset, 0.0);
    let b = square();

    let v = penetration(&a, &b);

    let excess = v.x.abs() - (SQUARE_WIDTH - offset.abs());
    assert!(v.x < 0.0);
    assert_relative_eq!(v.y, 0.0, epsilon = 1e-9);
    assert!(excess > 0.0 && excess < 1e-6);
}

#[test]
fn far_apart_squares_do_not_overlap() {
    let a = square_at(-10.0, 3.0);
    let b = square_at(10.0, 3.0);

    assert!(!overlaps(&a, &b));
    assert_eq!(penetration(&a, &b), Vector2::zeros());
}

#[test]
fn rotated_squares_overlap_and_resolve() {
    let a = square_at(0.037172812997691616, 0.049185297820002166).with_angle(0.9);
    let b = square_at(0.084543391574009308, -0.0087723996977551837).with_angle(0.9);

    assert!(overlaps(&a, &b));

    let v = penetration(&a, &b);
    assert!(v.norm() > 0.0);

    let resolved = a.clone().with_position(a.pos - v);
    assert!(!overlaps(&resolved, &b));
}

#[test]
fn square_and_triangle_overlap() {
    let a = square_at(0.23018915569370604, 0.12568087279723208);
    let b = Shape::polygon(vec![
        Point2::new(-0.1, -0.1),
        Point2::new(0.1, -0.1),
        Point2::new(0.1, 0.1),
    ])
    .expect("triangle corners are convex")
    .with_position(Point2::new(0.12345679012345689, 0.29012345679012341));

    assert!(overlaps(&a, &b));
}

#[test]
fn disk_pair_overlap_and_depth() {
    let a = Shape::disk(1.0);
    let b = Shape::disk(1.0).with_position(Point2::new(1.5, 0.0));

    assert!(overlaps(&a, &b));

    // Radii sum 2.0, centers 1.5 apart: depth 0.5 along -X for `a`.
    let v = penetration(&a, &b);
    assert_relative_eq!(v.x, -0.5, epsilon = 1e-3);
    assert_relative_eq!(v.y, 0.0, epsilon = 1e-3);

    let resolved = a.clone().with_position(a.pos - v);
    assert!(!overlaps(&resolved, &b));
}

#[test]
fn disk_against_square_resolves() {
    let square = square();
    let disk = Shape::disk(0.3).with_position(Point2::new(0.25, 0.05));

    assert!(overlaps(&square, &disk));

    let v = penetration(&square, &disk);
    assert!(v.norm() > 0.0);

    let resolved = square.clone().with_position(square.pos - v);
    assert!(!overlaps(&resolved, &disk));
}

#[test]
fn penetration_is_antisymmetric() {
    let a = square_at(0.031, -0.047);
    let b = square_at(-0.012, 0.008).with_angle(0.3);

    assert!(overlaps(&a, &b));

    let config = CollisionConfig::default();
    let tolerance = 10.0 * config.eps_for(&a, &b);

    let v_ab = penetration(&a, &b);
    let v_ba = penetration(&b, &a);
    assert!((v_ab + v_ba).norm() <= tolerance);
}

#[test]
fn queries_are_translation_invariant() {
    let t = Vector2::new(124.32, 74.428);

    let a = square_at(0.0, -0.00198573451);
    let b = square();
    let a_moved = a.clone().with_position(a.pos + t);
    let b_moved = b.clone().with_position(b.pos + t);

    assert_eq!(overlaps(&a, &b), overlaps(&a_moved, &b_moved));

    let v = penetration(&a, &b);
    let v_moved = penetration(&a_moved, &b_moved);
    assert_relative_eq!(v.x, v_moved.x, epsilon = 1e-9);
    assert_relative_eq!(v.y, v_moved.y, epsilon = 1e-9);
}

#[test]
fn resolved_configuration_is_barely_separated() {
    let a = square_at(0.0, -0.00198573451);
    let b = square();

    let v = penetration(&a, &b);
    let resolved = a.clone().with_position(a.pos - v);

    assert!(!overlaps(&resolved, &b));
    assert_eq!(penetration(&resolved, &b), Vector2::zeros());

    // Undoing slightly more than the margin restores the overlap: the
    // resolved pair is separated by only a few eps.
    let config = CollisionConfig::default();
    let eps = config.eps_for(&a, &b);
    let nearly = resolved
        .clone()
        .with_position(resolved.pos + math_scale(v, 10.0 * eps));
    assert!(overlaps(&nearly, &b));
}

/// Rescale `v` to the given length.
fn math_scale(v: Vector2<f64>, length: f64) -> Vector2<f64> {
    v / v.norm() * length
}
