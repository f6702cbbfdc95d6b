//! GJK (Gilbert-Johnson-Keerthi) and EPA (Expanding Polytope Algorithm)
//! implementation.
//!
//! This module provides narrow-phase collision detection for 2D convex
//! shapes using the GJK algorithm to decide overlap, and EPA to compute the
//! penetration vector when shapes do overlap.
//!
//! # Algorithm Overview
//!
//! ## GJK (Gilbert-Johnson-Keerthi)
//!
//! GJK works in Minkowski space (the "Minkowski difference" of two shapes).
//! If two convex shapes overlap, their Minkowski difference contains the
//! origin. GJK iteratively builds a simplex (point, segment, triangle) that
//! tries to enclose the origin.
//!
//! The predicates never test against an exact line: every segment is
//! treated as a thin strip of half-width `eps` (see
//! [`CollisionConfig::eps_for`]), so float error in the support computation
//! cannot flip a side-of-line verdict and cycle the descent. An origin
//! inside the strip counts as contained.
//!
//! ## EPA (Expanding Polytope Algorithm)
//!
//! When GJK encloses the origin, EPA expands the final simplex into a
//! polygon that hugs the Minkowski boundary from inside, edge by edge,
//! until the closest edge stops moving. The perpendicular from the origin
//! to that edge is the minimum translation vector; a small outward margin
//! is added so the resolved configuration is just separated rather than
//! tangent.
//!
//! # Usage
//!
//! ```
//! use collide_core::{overlaps, penetration, Shape};
//! use nalgebra::Point2;
//!
//! let a = Shape::disk(1.0);
//! let b = Shape::disk(1.0).with_position(Point2::new(1.5, 0.0));
//!
//! assert!(overlaps(&a, &b));
//!
//! let v = penetration(&a, &b);
//! assert!(v.norm() > 0.0);
//! ```
//!
//! # References
//!
//! - Gilbert, Johnson, Keerthi: "A Fast Procedure for Computing the Distance
//!   Between Complex Objects in Three-Dimensional Space" (1988)
//! - van den Bergen: "Collision Detection in Interactive 3D Environments" (2003)

use nalgebra::{Point2, Vector2};
use tracing::debug;

use collide_types::{math, CollisionConfig, Shape, ShapeKind};

use crate::broad_phase::Aabb;

/// Result of a GJK query.
#[derive(Debug, Clone)]
pub struct GjkResult {
    /// Whether the shapes overlap.
    pub overlapping: bool,
    /// The final simplex (input to EPA when overlapping).
    pub simplex: Simplex,
    /// Number of iterations used.
    pub iterations: usize,
}

/// A simplex in Minkowski space: one, two, or three points.
///
/// Never contains duplicates; the descent declares a stall instead of
/// pushing a point it already holds.
#[derive(Debug, Clone)]
pub struct Simplex {
    points: [Vector2<f64>; 3],
    len: usize,
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplex {
    /// Create an empty simplex.
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: [Vector2::zeros(); 3],
            len: 0,
        }
    }

    /// Append a point.
    pub fn push(&mut self, point: Vector2<f64>) {
        debug_assert!(self.len < 3);
        self.points[self.len] = point;
        self.len += 1;
    }

    /// Number of points held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the simplex holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The points as a slice.
    #[must_use]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points[..self.len]
    }

    /// Replace the contents with the given points.
    fn set(&mut self, points: &[Vector2<f64>]) {
        self.len = points.len().min(3);
        self.points[..self.len].copy_from_slice(&points[..self.len]);
    }
}

// =============================================================================
// Support Functions
// =============================================================================

/// The point of a shape farthest along `direction`, in world space.
///
/// For polygons this rotates each corner by the shape's angle and picks the
/// one with the largest inner product; ties keep the first corner in hull
/// order. For disks it is the center pushed out by one radius along the
/// direction (the center itself when the direction is zero).
#[must_use]
pub fn support(shape: &Shape, direction: &Vector2<f64>) -> Point2<f64> {
    match shape.kind() {
        ShapeKind::Disk { radius } => support_disk(shape.pos, *radius, direction),
        ShapeKind::Polygon { corners, .. } => {
            support_polygon(shape.pos, shape.angle, corners, direction)
        }
    }
}

fn support_disk(pos: Point2<f64>, radius: f64, direction: &Vector2<f64>) -> Point2<f64> {
    pos + math::normalized_or_zero(*direction) * radius
}

fn support_polygon(
    pos: Point2<f64>,
    angle: f64,
    corners: &[Point2<f64>],
    direction: &Vector2<f64>,
) -> Point2<f64> {
    let mut best = Vector2::zeros();
    let mut best_dot = f64::NEG_INFINITY;

    for corner in corners {
        let rotated = math::rotated_cw(corner.coords, angle);
        let dot = rotated.dot(direction);
        if dot > best_dot {
            best_dot = dot;
            best = rotated;
        }
    }

    pos + best
}

/// The support point of the Minkowski difference `a - b` along `direction`.
#[must_use]
pub fn minkowski_support(a: &Shape, b: &Shape, direction: &Vector2<f64>) -> Vector2<f64> {
    support(a, direction) - support(b, &-direction)
}

// =============================================================================
// GJK Algorithm
// =============================================================================

/// Run the GJK descent and return the verdict with its witness simplex.
///
/// The simplex is the input to [`epa_penetration`] when the shapes overlap.
/// Reaching the iteration cap reports no overlap, which is the conservative
/// verdict for collision response.
#[must_use]
pub fn gjk_query(a: &Shape, b: &Shape, config: &CollisionConfig) -> GjkResult {
    let eps = config.eps_for(a, b);

    // Seed perpendicular to the center line; any nonzero direction works,
    // but this one tends to find a wide first simplex.
    let mut direction = math::right_normal_or_zero(b.pos - a.pos);
    if math::is_zero(direction) {
        direction = Vector2::x();
    }

    let mut simplex = Simplex::new();
    let first = minkowski_support(a, b, &direction);
    simplex.push(first);
    direction = -first;

    for iteration in 0..config.gjk_max_iterations {
        if direction.norm_squared() <= eps * eps {
            // The previous feature already sits on the origin.
            return GjkResult {
                overlapping: true,
                simplex,
                iterations: iteration,
            };
        }
        direction = direction.normalize();

        let new_point = minkowski_support(a, b, &direction);

        // The farthest reachable point does not cross the origin: the
        // origin is outside the Minkowski difference.
        if new_point.dot(&direction) <= eps {
            return GjkResult {
                overlapping: false,
                simplex,
                iterations: iteration,
            };
        }

        // A support we already hold means the descent has stalled, which in
        // exact arithmetic only happens when the origin is outside.
        if simplex
            .points()
            .iter()
            .any(|p| (p - new_point).norm() <= eps)
        {
            return GjkResult {
                overlapping: false,
                simplex,
                iterations: iteration,
            };
        }

        simplex.push(new_point);

        if refine_simplex(&mut simplex, &mut direction, eps) {
            return GjkResult {
                overlapping: true,
                simplex,
                iterations: iteration,
            };
        }
    }

    debug!(
        cap = config.gjk_max_iterations,
        "GJK iteration cap reached; reporting no overlap"
    );
    GjkResult {
        overlapping: false,
        simplex,
        iterations: config.gjk_max_iterations,
    }
}

/// Refine the simplex toward the origin and update the search direction.
///
/// Returns true when the origin is contained, i.e. inside the triangle or
/// within the `eps` strip of an edge or vertex.
fn refine_simplex(simplex: &mut Simplex, direction: &mut Vector2<f64>, eps: f64) -> bool {
    if simplex.len() == 3 {
        let a = simplex.points[0];
        let b = simplex.points[1];
        let c = simplex.points[2];

        // Outward normal of each edge, away from the vertex it excludes.
        let ab_away_from_c = math::normal_in_direction_or_zero(b - a, a - c);
        let bc_away_from_a = math::normal_in_direction_or_zero(c - b, b - a);
        let ca_away_from_b = math::normal_in_direction_or_zero(a - c, c - b);

        // A zero outward normal means the triangle has collapsed to a
        // segment; the strip rule already counts that as containment.
        if math::is_zero(ab_away_from_c)
            || math::is_zero(bc_away_from_a)
            || math::is_zero(ca_away_from_b)
        {
            return true;
        }

        // An exactly-zero dot means the origin is on an edge's line; that
        // tie takes the segment path too, which settles it with the strip
        // rule.
        return if ab_away_from_c.dot(&-a) >= 0.0 {
            simplex.set(&[a, b]);
            refine_segment(simplex, direction, eps)
        } else if bc_away_from_a.dot(&-b) >= 0.0 {
            simplex.set(&[b, c]);
            refine_segment(simplex, direction, eps)
        } else if ca_away_from_b.dot(&-c) >= 0.0 {
            simplex.set(&[c, a]);
            refine_segment(simplex, direction, eps)
        } else {
            // Strictly inside all three edges.
            true
        };
    }

    refine_segment(simplex, direction, eps)
}

/// Refine a two-point simplex.
///
/// The segment is a strip of half-width `eps`: an origin whose perpendicular
/// distance to the line is within `eps` counts as contained. Otherwise the
/// new search direction is the segment perpendicular toward the origin, or
/// the direction from the nearest endpoint to the origin when the origin
/// projects outside the segment.
fn refine_segment(simplex: &mut Simplex, direction: &mut Vector2<f64>, eps: f64) -> bool {
    let a = simplex.points[0];
    let b = simplex.points[1];

    let beyond_a = (b - a).dot(&-a) >= 0.0;
    let beyond_b = (a - b).dot(&-b) >= 0.0;

    if beyond_a && beyond_b {
        // The origin projects onto the segment.
        let toward_origin = math::normal_in_direction_or_zero(b - a, -a);
        if math::is_zero(toward_origin) {
            // The origin lies on the line through a and b.
            return true;
        }
        let distance = toward_origin.dot(&-a);
        if distance <= eps {
            return true;
        }
        *direction = toward_origin;
        false
    } else if !beyond_a {
        // Vertex a is the closest feature.
        simplex.set(&[a]);
        *direction = math::normalized_or_zero(-a);
        math::is_zero(*direction)
    } else {
        simplex.set(&[b]);
        *direction = math::normalized_or_zero(-b);
        math::is_zero(*direction)
    }
}

// =============================================================================
// EPA Algorithm
// =============================================================================

/// Compute the penetration vector for a pair GJK found overlapping.
///
/// Expands the simplex into a polygon approaching the Minkowski boundary
/// and returns the perpendicular from the origin to the closest boundary
/// edge, lengthened by a small margin so that subtracting the vector from
/// `a.pos` leaves the shapes just separated.
///
/// A simplex with fewer than three points means the origin sat on a support
/// point or edge; such a vanishing overlap has no meaningful direction, so
/// the result is an `eps`-sized nudge along the center line.
#[must_use]
pub fn epa_penetration(
    a: &Shape,
    b: &Shape,
    simplex: &Simplex,
    config: &CollisionConfig,
) -> Vector2<f64> {
    let eps = config.eps_for(a, b);

    if simplex.len() < 3 {
        return shallow_nudge(a, b, eps);
    }

    let mut polytope: Vec<Vector2<f64>> = simplex.points().to_vec();

    for _ in 0..config.epa_max_iterations {
        let Some(closest) = closest_edge(&polytope) else {
            return shallow_nudge(a, b, eps);
        };

        let new_point = minkowski_support(a, b, &closest.normal);

        // Converged when the new support lands on a vertex the polytope
        // already holds: the closest edge is a face of the true Minkowski
        // boundary. A support landing on the interior of that edge gets
        // inserted; the next iteration reproduces it and stalls.
        if polytope.iter().any(|v| (v - new_point).norm() <= eps) {
            return edge_resolution(&polytope, &closest, eps);
        }

        // Split the edge, keeping the boundary ordered.
        polytope.insert(closest.index + 1, new_point);
    }

    debug!(
        cap = config.epa_max_iterations,
        "EPA iteration cap reached; returning best edge so far"
    );
    match closest_edge(&polytope) {
        Some(closest) => edge_resolution(&polytope, &closest, eps),
        None => shallow_nudge(a, b, eps),
    }
}

/// The polytope edge currently closest to the origin.
struct ClosestEdge {
    /// Index of the edge's first vertex.
    index: usize,
    /// Outward unit normal of the edge.
    normal: Vector2<f64>,
    /// Perpendicular distance from the origin to the edge's line.
    distance: f64,
}

/// Find the boundary edge whose line is nearest the origin.
///
/// Ties keep the lowest index. Returns `None` when an edge's line passes
/// through the origin and no outward side can be told apart (the polytope
/// has collapsed onto the origin).
fn closest_edge(polytope: &[Vector2<f64>]) -> Option<ClosestEdge> {
    let mut best: Option<ClosestEdge> = None;

    for s0 in 0..polytope.len() {
        let s1 = (s0 + 1) % polytope.len();
        let s2 = (s0 + 2) % polytope.len();

        let edge = polytope[s1] - polytope[s0];
        // Outward is away from the vertex that follows the edge or, when
        // that vertex is collinear with the edge (a support inserted on an
        // edge interior), away from the interior side holding the origin.
        let mut normal = math::normal_in_direction_or_zero(edge, polytope[s0] - polytope[s2]);
        if math::is_zero(normal) {
            normal = math::normal_in_direction_or_zero(edge, polytope[s0]);
        }
        if math::is_zero(normal) {
            return None;
        }

        let distance = normal.dot(&polytope[s0]);
        if best.as_ref().map_or(true, |b| distance < b.distance) {
            best = Some(ClosestEdge {
                index: s0,
                normal,
                distance,
            });
        }
    }

    best
}

/// Resolve a converged edge into the penetration vector.
///
/// Projects the origin onto the edge's line; the foot of that projection is
/// the nearest point of the Minkowski boundary, so the penetration is the
/// foot direction scaled by its distance plus an outward margin. The margin
/// is twice the strip half-width: anything smaller leaves the resolved
/// configuration inside the containment strip, where the next query would
/// still report an overlap.
fn edge_resolution(polytope: &[Vector2<f64>], closest: &ClosestEdge, eps: f64) -> Vector2<f64> {
    let p = polytope[closest.index];
    let q = polytope[(closest.index + 1) % polytope.len()];

    let margin = 2.0 * eps;
    let along = math::normalized_or_zero(q - p);
    let foot = p + along * along.dot(&-p);

    let direction = math::normalized_or_zero(foot);
    if math::is_zero(direction) {
        // The origin sits exactly on the boundary edge; push out along its
        // normal instead.
        return closest.normal * margin;
    }

    direction * (foot.norm() + margin)
}

/// Nudge for overlaps too shallow for EPA to orient.
fn shallow_nudge(a: &Shape, b: &Shape, eps: f64) -> Vector2<f64> {
    let direction = math::normalized_or_zero(b.pos - a.pos);
    if math::is_zero(direction) {
        return Vector2::new(eps, 0.0);
    }
    direction * eps
}

// =============================================================================
// High-Level API
// =============================================================================

/// Check whether two shapes overlap, with the default configuration.
#[must_use]
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    overlaps_with(a, b, &CollisionConfig::default())
}

/// Check whether two shapes overlap.
///
/// Rejects pairs whose bounding boxes are disjoint before running GJK; the
/// rejection only skips work, it never changes the verdict.
#[must_use]
pub fn overlaps_with(a: &Shape, b: &Shape, config: &CollisionConfig) -> bool {
    if !Aabb::of_shape(a).overlaps(&Aabb::of_shape(b)) {
        return false;
    }
    gjk_query(a, b, config).overlapping
}

/// The minimum translation vector separating `a` from `b`, with the default
/// configuration.
#[must_use]
pub fn penetration(a: &Shape, b: &Shape) -> Vector2<f64> {
    penetration_with(a, b, &CollisionConfig::default())
}

/// The minimum translation vector separating `a` from `b`.
///
/// Returns exactly `(0, 0)` when the shapes do not overlap. For overlapping
/// shapes the result `v` is nonzero and moving `a` to `a.pos - v` resolves
/// the overlap.
#[must_use]
pub fn penetration_with(a: &Shape, b: &Shape, config: &CollisionConfig) -> Vector2<f64> {
    if !Aabb::of_shape(a).overlaps(&Aabb::of_shape(b)) {
        return Vector2::zeros();
    }

    let gjk = gjk_query(a, b, config);
    if !gjk.overlapping {
        return Vector2::zeros();
    }

    epa_penetration(a, b, &gjk.simplex, config)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names,
    clippy::unreadable_literal
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    fn square(half_width: f64) -> Shape {
        Shape::polygon(vec![
            Point2::new(-half_width, -half_width),
            Point2::new(half_width, -half_width),
            Point2::new(half_width, half_width),
            Point2::new(-half_width, half_width),
        ])
        .expect("square corners are convex")
    }

    fn at(shape: Shape, x: f64, y: f64) -> Shape {
        shape.with_position(Point2::new(x, y))
    }

    #[test]
    fn test_support_polygon_axis_directions() {
        let shape = square(0.1);

        let right = support(&shape, &Vector2::x());
        assert_relative_eq!(right.x, 0.1, epsilon = 1e-12);

        let down = support(&shape, &Vector2::new(0.0, -1.0));
        assert_relative_eq!(down.y, -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_support_polygon_respects_rotation() {
        // An eighth turn clockwise puts a corner of the square on the +X
        // axis, stretching the support to the circumradius.
        let shape = square(0.1).with_angle(FRAC_PI_4);
        let right = support(&shape, &Vector2::x());
        assert_relative_eq!(right.x, 0.1 * std::f64::consts::SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_support_polygon_offset_by_position() {
        let shape = at(square(0.1), 2.0, 3.0);
        let s = support(&shape, &Vector2::x());
        assert_relative_eq!(s.x, 2.1, epsilon = 1e-12);
    }

    #[test]
    fn test_support_disk() {
        let disk = at(Shape::disk(0.5), 1.0, 2.0);

        let s = support(&disk, &Vector2::x());
        assert_relative_eq!(s.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(s.y, 2.0, epsilon = 1e-12);

        let diagonal = support(&disk, &Vector2::new(1.0, 1.0));
        assert_relative_eq!((diagonal - disk.pos).norm(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_support_disk_zero_direction_returns_center() {
        let disk = at(Shape::disk(0.5), 1.0, 2.0);
        assert_eq!(support(&disk, &Vector2::zeros()), disk.pos);
    }

    #[test]
    fn test_minkowski_support_of_offset_squares() {
        let a = at(square(0.1), 1.0, 0.0);
        let b = square(0.1);

        // Rightmost of a minus leftmost of b.
        let s = minkowski_support(&a, &b, &Vector2::x());
        assert_relative_eq!(s.x, 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_simplex_operations() {
        let mut simplex = Simplex::new();
        assert!(simplex.is_empty());

        simplex.push(Vector2::new(1.0, 0.0));
        simplex.push(Vector2::new(0.0, 1.0));
        assert_eq!(simplex.len(), 2);

        simplex.set(&[Vector2::new(0.0, 1.0)]);
        assert_eq!(simplex.len(), 1);
        assert_eq!(simplex.points()[0], Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_gjk_coincident_squares_overlap() {
        let a = square(0.1);
        let b = square(0.1);
        assert!(gjk_query(&a, &b, &CollisionConfig::default()).overlapping);
    }

    #[test]
    fn test_gjk_separated_squares() {
        let a = at(square(0.1), -10.0, 3.0);
        let b = at(square(0.1), 10.0, 3.0);
        assert!(!gjk_query(&a, &b, &CollisionConfig::default()).overlapping);
    }

    #[test]
    fn test_gjk_disks() {
        let config = CollisionConfig::default();

        let a = Shape::disk(1.0);
        let b = at(Shape::disk(1.0), 1.5, 0.0);
        assert!(gjk_query(&a, &b, &config).overlapping);

        let far = at(Shape::disk(1.0), 3.0, 0.0);
        assert!(!gjk_query(&a, &far, &config).overlapping);
    }

    #[test]
    fn test_gjk_disk_against_square() {
        let config = CollisionConfig::default();

        let disk = at(Shape::disk(0.5), 0.55, 0.0);
        assert!(gjk_query(&square(0.1), &disk, &config).overlapping);

        let far_disk = at(Shape::disk(0.5), 0.7, 0.0);
        assert!(!gjk_query(&square(0.1), &far_disk, &config).overlapping);
    }

    #[test]
    fn test_gjk_rotated_squares_overlap() {
        let a = at(square(0.1), 0.037172812997691616, 0.049185297820002166).with_angle(0.9);
        let b = at(square(0.1), 0.084543391574009308, -0.0087723996977551837).with_angle(0.9);
        assert!(gjk_query(&a, &b, &CollisionConfig::default()).overlapping);
    }

    #[test]
    fn test_penetration_zero_when_separated() {
        let a = at(square(0.1), -10.0, 3.0);
        let b = at(square(0.1), 10.0, 3.0);
        assert_eq!(penetration(&a, &b), Vector2::zeros());
    }

    #[test]
    fn test_penetration_of_vertically_offset_squares() {
        // Overlap of two 0.2-wide squares with centers 0.00198... apart:
        // resolving pushes a downward by just over 0.2 - offset.
        let offset = 0.00198573451;
        let a = at(square(0.1), 0.0, -offset);
        let b = square(0.1);

        let v = penetration(&a, &b);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(v.y, 0.2 - offset, epsilon = 1e-6);
        assert!(v.y > 0.2 - offset, "margin keeps the result just past touching");
    }

    #[test]
    fn test_penetration_of_coincident_squares_is_nonzero() {
        let a = square(0.1);
        let b = square(0.1);
        assert!(overlaps(&a, &b));
        assert!(penetration(&a, &b).norm() > 0.0);
    }

    #[test]
    fn test_penetration_resolves_the_overlap() {
        let a = at(square(0.1), 0.02, 0.05);
        let b = square(0.1);

        let v = penetration(&a, &b);
        assert!(v.norm() > 0.0);

        let resolved = a.clone().with_position(a.pos - v);
        assert!(!overlaps(&resolved, &b));
    }

    #[test]
    fn test_degenerate_simplex_falls_back_to_center_line_nudge() {
        let config = CollisionConfig::default();
        let a = square(0.1);
        let b = at(square(0.1), 0.1, 0.0);
        let eps = config.eps_for(&a, &b);

        let mut simplex = Simplex::new();
        simplex.push(Vector2::zeros());

        let v = epa_penetration(&a, &b, &simplex, &config);
        assert_relative_eq!(v.x, eps, epsilon = 1e-15);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_degenerate_simplex_with_coincident_centers() {
        let config = CollisionConfig::default();
        let a = square(0.1);
        let b = square(0.1);
        let eps = config.eps_for(&a, &b);

        let mut simplex = Simplex::new();
        simplex.push(Vector2::zeros());

        let v = epa_penetration(&a, &b, &simplex, &config);
        assert_eq!(v, Vector2::new(eps, 0.0));
    }

    #[test]
    fn test_iteration_caps_do_not_hang_or_panic() {
        let strict = CollisionConfig::default()
            .gjk_max_iterations(2)
            .epa_max_iterations(2);

        let a = at(square(0.1), 0.01, 0.02);
        let b = square(0.1);

        // Verdicts under a starved cap are best-effort but must terminate.
        let _ = overlaps_with(&a, &b, &strict);
        let _ = penetration_with(&a, &b, &strict);
    }
}
