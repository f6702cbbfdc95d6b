//! 2D vector operations used by the collision predicates.
//!
//! These are the handful of planar operations GJK and EPA are built from.
//! They deliberately return **exactly zero** for degenerate inputs instead of
//! NaN so that callers can branch on the zero vector: a zero result from
//! [`normal_in_direction_or_zero`] means "the direction is parallel to the
//! segment", which the descent loops treat as a containment verdict.
//!
//! Everything else (length, distance, dot product) comes straight from
//! [`nalgebra`] and is not wrapped.

use nalgebra::{Rotation2, Vector2};

/// Check whether a vector is exactly zero in both components.
#[must_use]
pub fn is_zero(v: Vector2<f64>) -> bool {
    v.x == 0.0 && v.y == 0.0
}

/// Normalize a vector, returning exactly `(0, 0)` for a zero input.
///
/// For nonzero input the result is a unit vector within one ulp of
/// `v / ‖v‖`.
#[must_use]
pub fn normalized_or_zero(v: Vector2<f64>) -> Vector2<f64> {
    if is_zero(v) {
        Vector2::zeros()
    } else {
        v / v.norm()
    }
}

/// The right-hand perpendicular `(y, -x)`, normalized, or zero for zero input.
#[must_use]
pub fn right_normal_or_zero(v: Vector2<f64>) -> Vector2<f64> {
    normalized_or_zero(Vector2::new(v.y, -v.x))
}

/// The unit perpendicular of `v` that points along `direction`.
///
/// Returns zero when `direction` is exactly parallel to `v` (neither
/// perpendicular has a positive inner product), or when `v` is zero.
#[must_use]
pub fn normal_in_direction_or_zero(v: Vector2<f64>, direction: Vector2<f64>) -> Vector2<f64> {
    let normal = right_normal_or_zero(v);
    let alignment = normal.dot(&direction);

    if alignment > 0.0 {
        normal
    } else if alignment < 0.0 {
        -normal
    } else {
        Vector2::zeros()
    }
}

/// Rotate `v` by `radians`, where **positive is clockwise**.
///
/// The clockwise-positive convention is load-bearing: shape angles and the
/// polygon support function both assume it. `Rotation2` is counter-clockwise,
/// so the angle is negated here and nowhere else.
#[must_use]
pub fn rotated_cw(v: Vector2<f64>, radians: f64) -> Vector2<f64> {
    Rotation2::new(-radians) * v
}
