//! Shape model for 2D collision queries.
//!
//! A [`Shape`] is a disk or a convex polygon together with a world position
//! and a rotation angle. Polygon invariants (at least three corners, no
//! duplicates, no collinear triple, convex winding) are enforced once at
//! construction so the query code never re-validates.

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::math;

/// Geometry of a collision shape, in local coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeKind {
    /// Disk with the given radius.
    Disk {
        /// Disk radius; must be positive.
        radius: f64,
    },
    /// Convex polygon given by its corners around the local origin.
    ///
    /// Corners are stored in hull order; [`Shape::polygon`] validates its
    /// input and reorders it onto the hull winding.
    Polygon {
        /// Hull-ordered corners in local coordinates.
        corners: Vec<Point2<f64>>,
        /// Largest distance from the local origin to any corner.
        bounding_radius: f64,
    },
}

/// A positioned, rotated convex shape.
///
/// Shapes are plain values: queries borrow them, never retain them, and
/// callers are free to mutate `pos` and `angle` between queries.
///
/// # Example
///
/// ```
/// use collide_types::Shape;
/// use nalgebra::Point2;
///
/// let square = Shape::polygon(vec![
///     Point2::new(-0.1, -0.1),
///     Point2::new(0.1, -0.1),
///     Point2::new(0.1, 0.1),
///     Point2::new(-0.1, 0.1),
/// ])
/// .expect("square corners are convex");
///
/// assert!(square.bounding_radius() > 0.14);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    kind: ShapeKind,
    /// World position of the shape's local origin.
    pub pos: Point2<f64>,
    /// Rotation in radians; **positive is clockwise**. Stored but ignored
    /// for disks.
    pub angle: f64,
}

impl Shape {
    /// Create a disk with the given radius, at the world origin.
    ///
    /// Never fails; the radius must be positive for queries to be
    /// meaningful.
    #[must_use]
    pub fn disk(radius: f64) -> Self {
        Self {
            kind: ShapeKind::Disk { radius },
            pos: Point2::origin(),
            angle: 0.0,
        }
    }

    /// Create a convex polygon from corners in local coordinates.
    ///
    /// The corners may be supplied in either winding direction and in any
    /// rotation of that winding; the constructed shape stores them in hull
    /// order. Construction fails when fewer than three corners are given,
    /// when two corners coincide, when any three corners are collinear, or
    /// when the corner set is not convex.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] describing the first violated invariant.
    pub fn polygon(corners: Vec<Point2<f64>>) -> crate::Result<Self> {
        if corners.len() < 3 {
            return Err(ShapeError::TooFewCorners {
                count: corners.len(),
            });
        }
        if contains_duplicates(&corners) {
            return Err(ShapeError::DuplicateCorners);
        }
        if has_collinear_triple(&corners) {
            return Err(ShapeError::CollinearCorners);
        }

        let hull = gift_wrapped_hull(&corners).ok_or(ShapeError::NotConvex)?;
        if hull.len() < corners.len() {
            // At least one input corner sits strictly inside the hull.
            return Err(ShapeError::NotConvex);
        }

        let bounding_radius = hull.iter().map(|c| c.coords.norm()).fold(0.0, f64::max);

        Ok(Self {
            kind: ShapeKind::Polygon {
                corners: hull,
                bounding_radius,
            },
            pos: Point2::origin(),
            angle: 0.0,
        })
    }

    /// Move the shape to a world position.
    #[must_use]
    pub fn with_position(mut self, pos: Point2<f64>) -> Self {
        self.pos = pos;
        self
    }

    /// Set the rotation angle (radians, positive = clockwise).
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// The shape's geometry.
    #[must_use]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Radius of the smallest origin-centered disk containing the local
    /// geometry.
    ///
    /// Disks return their radius; polygons return the cached
    /// `max(‖corner‖)`. Rotation does not change it, so it bounds the shape
    /// around `pos` at every angle.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        match &self.kind {
            ShapeKind::Disk { radius } => *radius,
            ShapeKind::Polygon {
                bounding_radius, ..
            } => *bounding_radius,
        }
    }
}

fn contains_duplicates(corners: &[Point2<f64>]) -> bool {
    for (i, a) in corners.iter().enumerate() {
        for b in corners.iter().skip(i + 1) {
            if a == b {
                return true;
            }
        }
    }
    false
}

fn has_collinear_triple(corners: &[Point2<f64>]) -> bool {
    for (i, a) in corners.iter().enumerate() {
        for (j, b) in corners.iter().enumerate().skip(i + 1) {
            for c in corners.iter().skip(j + 1) {
                let cross = (b - a).perp(&(c - a));
                if cross == 0.0 {
                    return true;
                }
            }
        }
    }
    false
}

/// Gift-wrap the corners into a convex hull, starting from the leftmost one.
///
/// The walk searches for the corner with the smallest turn from the current
/// search direction; when no corner lies ahead it rotates the search
/// direction a quarter turn to the right and retries. Returns `None` when
/// the walk cannot close the hull.
fn gift_wrapped_hull(corners: &[Point2<f64>]) -> Option<Vec<Point2<f64>>> {
    let mut leftmost = corners[0];
    for &corner in corners {
        if corner.x < leftmost.x {
            leftmost = corner;
        }
    }

    let mut hull = vec![leftmost];
    let mut search_dir = Vector2::new(0.0, 1.0);
    let mut stalled_turns = 0;

    loop {
        let last = hull[hull.len() - 1];

        let mut best: Option<Point2<f64>> = None;
        let mut best_alignment = f64::NEG_INFINITY;
        for &corner in corners {
            if corner == last {
                continue;
            }
            let toward = math::normalized_or_zero(corner - last);
            let alignment = search_dir.dot(&toward);
            if alignment >= 0.0 && alignment > best_alignment {
                best_alignment = alignment;
                best = Some(corner);
            }
        }

        match best {
            Some(corner) if corner == hull[0] => return Some(hull),
            Some(corner) => {
                if hull.len() == corners.len() {
                    // Walked through every corner without closing.
                    return None;
                }
                search_dir = math::normalized_or_zero(corner - last);
                hull.push(corner);
                stalled_turns = 0;
            }
            None => {
                // Nothing ahead of the search direction; turn right.
                stalled_turns += 1;
                if stalled_turns == 4 {
                    return None;
                }
                search_dir = math::right_normal_or_zero(search_dir);
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::unreadable_literal
)]
mod tests {
    use super::*;

    fn polygon(corners: &[(f64, f64)]) -> Result<Shape, ShapeError> {
        Shape::polygon(corners.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    #[test]
    fn test_disk_construction() {
        let disk = Shape::disk(1.5);
        assert_eq!(disk.bounding_radius(), 1.5);
        assert_eq!(disk.pos, Point2::origin());
        assert_eq!(disk.angle, 0.0);
    }

    #[test]
    fn test_valid_triangles_in_every_rotation_of_the_winding() {
        let corners = [
            (0.38129108817537805, 0.0073923092139486363),
            (-0.48871174908274423, 0.034026436793289747),
            (-0.078922328003752942, -0.41132716476704667),
        ];

        for start in 0..corners.len() {
            let mut rotated = corners.to_vec();
            rotated.rotate_left(start);
            assert!(polygon(&rotated).is_ok(), "rotation {start} rejected");
        }
    }

    #[test]
    fn test_both_windings_accepted() {
        let clockwise = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let anticlockwise = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];

        assert!(polygon(&clockwise).is_ok());
        assert!(polygon(&anticlockwise).is_ok());
    }

    #[test]
    fn test_near_degenerate_rotated_square_accepted() {
        // A square rotated so three of its corners sit within 1e-16 of an
        // axis; the tiny components must not trip the collinearity check.
        let corners = [
            (0.2182808, 0.0000000000000000069388939039072284),
            (0.000000000000000023390227265590813, -0.2182808),
            (-0.2182808, -0.000000000000000019792794399625128),
            (-0.000000000000000030073149341473899, 0.2182808),
        ];
        assert!(polygon(&corners).is_ok());
    }

    #[test]
    fn test_hexagon_accepted() {
        let corners = [
            (0.32557760000000002, 0.0000000000000000092518585385429707),
            (0.16278880000000004, -0.28195847250316841),
            (-0.16278879999999993, -0.28195847250316847),
            (-0.32557759999999991, -0.000000000000000074014868308343765),
            (-0.16278880000000007, 0.28195847250316836),
            (0.16278879999999987, 0.28195847250316852),
        ];
        let shape = polygon(&corners).unwrap();
        match shape.kind() {
            ShapeKind::Polygon { corners, .. } => assert_eq!(corners.len(), 6),
            ShapeKind::Disk { .. } => panic!("expected polygon"),
        }
    }

    #[test]
    fn test_too_few_corners_rejected() {
        assert_eq!(
            polygon(&[]),
            Err(ShapeError::TooFewCorners { count: 0 })
        );
        assert_eq!(
            polygon(&[(0.0, 1.0)]),
            Err(ShapeError::TooFewCorners { count: 1 })
        );
        assert_eq!(
            polygon(&[(0.0, 0.0), (0.0, 1.0)]),
            Err(ShapeError::TooFewCorners { count: 2 })
        );
    }

    #[test]
    fn test_duplicate_corners_rejected() {
        assert_eq!(
            polygon(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
            Err(ShapeError::DuplicateCorners)
        );
    }

    #[test]
    fn test_collinear_corners_rejected_in_any_order() {
        // (1,1), (2,1), (3,1) are collinear; every cyclic order is rejected.
        let orders = [
            [(2.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0)],
            [(3.0, 1.0), (2.0, 0.0), (1.0, 1.0), (2.0, 1.0)],
            [(2.0, 1.0), (3.0, 1.0), (2.0, 0.0), (1.0, 1.0)],
        ];
        for corners in &orders {
            assert_eq!(polygon(corners), Err(ShapeError::CollinearCorners));
        }

        assert_eq!(
            polygon(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (1.0, 1.0)]),
            Err(ShapeError::CollinearCorners)
        );
    }

    #[test]
    fn test_concave_corner_rejected() {
        assert_eq!(
            polygon(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.1, 0.9)]),
            Err(ShapeError::NotConvex)
        );
    }

    #[test]
    fn test_corners_stored_in_hull_order() {
        // Input winds the hull but starts mid-sequence; the stored corners
        // begin at the leftmost one and wind consistently.
        let shape = polygon(&[(1.0, 1.0), (0.0, 0.0), (0.0, 1.0)]).unwrap();
        match shape.kind() {
            ShapeKind::Polygon { corners, .. } => {
                assert_eq!(corners[0], Point2::new(0.0, 0.0));
                assert_eq!(corners.len(), 3);
            }
            ShapeKind::Disk { .. } => panic!("expected polygon"),
        }
    }

    #[test]
    fn test_bounding_radius_is_farthest_corner() {
        let shape = polygon(&[(-0.1, -0.1), (0.3, -0.1), (0.3, 0.1), (-0.1, 0.1)]).unwrap();
        let expected = (0.3f64 * 0.3 + 0.1 * 0.1).sqrt();
        assert!((shape.bounding_radius() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_builder_methods() {
        let shape = Shape::disk(0.5)
            .with_position(Point2::new(3.0, -2.0))
            .with_angle(0.25);
        assert_eq!(shape.pos, Point2::new(3.0, -2.0));
        assert_eq!(shape.angle, 0.25);
    }
}
