//! Property-based tests for the collision queries.
//!
//! These tests generate random shape pairs and verify the query contracts:
//! symmetry, anti-symmetry of penetration, resolution correctness,
//! translation invariance, and bounding-disk soundness.
//!
//! Run with: cargo test -p collide-core -- proptest

use collide_core::{overlaps, penetration, CollisionConfig, Shape};
use nalgebra::{Point2, Vector2};
use proptest::prelude::*;

// =============================================================================
// Strategies for generating random shapes
// =============================================================================

/// A random triangle with corners in a unit-ish box, skipping corner sets
/// the constructor rejects (collinear or duplicate draws).
fn arb_triangle() -> impl Strategy<Value = Shape> {
    prop::array::uniform6(-0.5..0.5f64).prop_filter_map(
        "corners must form a valid triangle",
        |[x0, y0, x1, y1, x2, y2]| {
            Shape::polygon(vec![
                Point2::new(x0, y0),
                Point2::new(x1, y1),
                Point2::new(x2, y2),
            ])
            .ok()
        },
    )
}

/// An axis-aligned square with a random half-width.
fn arb_square() -> impl Strategy<Value = Shape> {
    (0.05..0.5f64).prop_map(|half| {
        Shape::polygon(vec![
            Point2::new(-half, -half),
            Point2::new(half, -half),
            Point2::new(half, half),
            Point2::new(-half, half),
        ])
        .expect("square corners are convex")
    })
}

/// A disk with a random positive radius.
fn arb_disk() -> impl Strategy<Value = Shape> {
    (0.01..1.5f64).prop_map(Shape::disk)
}

/// Any supported shape, positioned and rotated randomly.
fn arb_shape() -> impl Strategy<Value = Shape> {
    let geometry = prop_oneof![arb_triangle(), arb_square(), arb_disk()];
    (geometry, -3.0..3.0f64, -3.0..3.0f64, 0.0..std::f64::consts::TAU).prop_map(
        |(shape, x, y, angle)| shape.with_position(Point2::new(x, y)).with_angle(angle),
    )
}

// =============================================================================
// Property Tests: query contracts
// =============================================================================

proptest! {
    /// Overlap is symmetric in its arguments.
    #[test]
    fn overlap_is_symmetric(a in arb_shape(), b in arb_shape()) {
        prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
    }

    /// Penetration is exactly zero for disjoint pairs and nonzero for
    /// overlapping ones.
    #[test]
    fn penetration_is_zero_iff_disjoint(a in arb_shape(), b in arb_shape()) {
        let v = penetration(&a, &b);
        if overlaps(&a, &b) {
            prop_assert!(v.norm() > 0.0);
        } else {
            prop_assert_eq!(v, Vector2::zeros());
        }
    }

    /// Swapping the arguments negates the penetration vector.
    #[test]
    fn penetration_is_antisymmetric(a in arb_shape(), b in arb_shape()) {
        if overlaps(&a, &b) {
            let config = CollisionConfig::default();
            let tolerance = 10.0 * config.eps_for(&a, &b);

            let v_ab = penetration(&a, &b);
            let v_ba = penetration(&b, &a);
            prop_assert!(
                (v_ab + v_ba).norm() <= tolerance,
                "v_ab = {v_ab:?}, v_ba = {v_ba:?}"
            );
        }
    }

    /// Subtracting a nonzero penetration vector from the first shape's
    /// position resolves the overlap.
    #[test]
    fn nonzero_penetration_resolves_the_overlap(a in arb_shape(), b in arb_shape()) {
        let v = penetration(&a, &b);
        if v != Vector2::zeros() {
            let resolved = a.clone().with_position(a.pos - v);
            prop_assert!(
                !overlaps(&resolved, &b),
                "v = {v:?} did not separate the pair"
            );
        }
    }

    /// Pairs whose bounding disks are disjoint never overlap.
    #[test]
    fn disjoint_bounding_disks_never_overlap(a in arb_shape(), b in arb_shape()) {
        let center_gap = (b.pos - a.pos).norm();
        if center_gap > a.bounding_radius() + b.bounding_radius() {
            prop_assert!(!overlaps(&a, &b));
        }
    }

    /// Translating both shapes together changes neither the verdict nor
    /// (within float noise) the penetration vector.
    #[test]
    fn queries_are_translation_invariant(
        a in arb_shape(),
        b in arb_shape(),
        tx in -50.0..50.0f64,
        ty in -50.0..50.0f64,
    ) {
        let t = Vector2::new(tx, ty);
        let a_moved = a.clone().with_position(a.pos + t);
        let b_moved = b.clone().with_position(b.pos + t);

        prop_assert_eq!(overlaps(&a, &b), overlaps(&a_moved, &b_moved));

        if overlaps(&a, &b) {
            let v = penetration(&a, &b);
            let v_moved = penetration(&a_moved, &b_moved);
            prop_assert!(
                (v - v_moved).norm() <= 1e-6,
                "v = {v:?}, v_moved = {v_moved:?}"
            );
        }
    }

    /// Reversing the corner winding constructs the same polygon.
    #[test]
    fn either_winding_constructs_the_same_polygon(
        corners in prop::array::uniform6(-0.5..0.5f64)
    ) {
        let [x0, y0, x1, y1, x2, y2] = corners;
        let forward = vec![
            Point2::new(x0, y0),
            Point2::new(x1, y1),
            Point2::new(x2, y2),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        match (Shape::polygon(forward), Shape::polygon(reversed)) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "windings disagree: {a:?} vs {b:?}"),
        }
    }
}
