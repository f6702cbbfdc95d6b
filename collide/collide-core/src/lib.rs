//! Narrow-phase collision queries for 2D convex shapes.
//!
//! This crate answers two questions about pairs of positioned, rotated
//! convex shapes (disks and polygons): do they overlap, and by what minimum
//! translation can the first be moved to stop overlapping the second. It
//! builds on [`collide_types`] for the data structures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  overlaps / penetration                      │
//! │  Facade: broad-phase rejection, degenerate-simplex fallback │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GJK / EPA                             │
//! │  Simplex descent over the Minkowski difference, polytope    │
//! │  expansion to the penetration vector                        │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Support functions                         │
//! │  Farthest point of a rotated shape along a direction        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use collide_core::{overlaps, penetration, Shape};
//! use nalgebra::Point2;
//!
//! let corners = vec![
//!     Point2::new(-0.1, -0.1),
//!     Point2::new(0.1, -0.1),
//!     Point2::new(0.1, 0.1),
//!     Point2::new(-0.1, 0.1),
//! ];
//!
//! let a = Shape::polygon(corners.clone()).unwrap();
//! let b = Shape::polygon(corners)
//!     .unwrap()
//!     .with_position(Point2::new(0.15, 0.0));
//!
//! assert!(overlaps(&a, &b));
//!
//! // Moving `a` against the penetration vector resolves the overlap.
//! let v = penetration(&a, &b);
//! let resolved = a.clone().with_position(a.pos - v);
//! assert!(!overlaps(&resolved, &b));
//! ```
//!
//! # Guarantees
//!
//! - `overlaps(a, b) == overlaps(b, a)` for all shape pairs
//! - `penetration(a, b)` is exactly `(0, 0)` iff the shapes do not overlap
//! - queries never panic and never loop unboundedly: both descents carry
//!   iteration caps and degrade to conservative best-effort verdicts
//! - no shared state; queries on disjoint shape pairs can run in parallel
//!
//! Shapes are borrowed for the duration of a query and never retained.

#![doc(html_root_url = "https://docs.rs/collide-core/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
)]

pub mod broad_phase;
pub mod gjk_epa;

pub use broad_phase::{Aabb, Axis, BroadPhase, BruteForce, SweepAndPrune};
pub use gjk_epa::{
    epa_penetration, gjk_query, minkowski_support, overlaps, overlaps_with, penetration,
    penetration_with, support, GjkResult, Simplex,
};

// Re-export key types from collide-types for convenience
pub use collide_types::{math, CollisionConfig, Shape, ShapeError, ShapeKind};

// Re-export math types for convenience
pub use nalgebra::{Point2, Vector2};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn square(half_width: f64) -> Shape {
        Shape::polygon(vec![
            Point2::new(-half_width, -half_width),
            Point2::new(half_width, -half_width),
            Point2::new(half_width, half_width),
            Point2::new(-half_width, half_width),
        ])
        .expect("square is convex")
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = square(0.1).with_position(Point2::new(0.05, 0.02));
        let b = square(0.1);

        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));

        let far = square(0.1).with_position(Point2::new(5.0, 0.0));
        assert_eq!(overlaps(&a, &far), overlaps(&far, &a));
    }

    #[test]
    fn test_broad_phase_agrees_with_narrow_phase() {
        let shapes = vec![
            square(0.1),
            square(0.1).with_position(Point2::new(0.15, 0.0)),
            Shape::disk(0.5).with_position(Point2::new(3.0, 3.0)),
        ];

        let pairs = BruteForce::new().find_potential_pairs(&shapes);
        // Every genuinely overlapping pair must survive the broad phase.
        for i in 0..shapes.len() {
            for j in (i + 1)..shapes.len() {
                if overlaps(&shapes[i], &shapes[j]) {
                    assert!(pairs.contains(&(i, j)));
                }
            }
        }
    }
}
