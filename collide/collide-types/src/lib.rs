//! Core types for 2D convex collision detection.
//!
//! This crate provides the foundational types for narrow-phase collision
//! queries:
//!
//! - [`Shape`] - A disk or convex polygon with world position and rotation
//! - [`ShapeKind`] - The shape's local geometry
//! - [`CollisionConfig`] - Epsilon model and iteration caps
//! - [`math`] - The planar vector operations the predicates are built from
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no collision logic. They're the
//! common language between:
//!
//! - The narrow-phase queries (`collide-core`)
//! - Simulation loops that own and move the shapes
//! - Logging and replay (serialized shape configurations)
//!
//! # Conventions
//!
//! - X right, Y up, right-handed plane
//! - Angles in radians, **positive is clockwise**
//! - Polygon corners are local to the shape's origin; `pos` places that
//!   origin in the world
//!
//! # Example
//!
//! ```
//! use collide_types::Shape;
//! use nalgebra::Point2;
//!
//! let triangle = Shape::polygon(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//! ])
//! .expect("corners are convex");
//!
//! let disk = Shape::disk(0.5).with_position(Point2::new(2.0, 0.0));
//!
//! assert!(triangle.bounding_radius() < disk.pos.x);
//! ```

#![doc(html_root_url = "https://docs.rs/collide-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
)]

mod config;
mod error;
pub mod math;
mod shape;

pub use config::CollisionConfig;
pub use error::ShapeError;
pub use shape::{Shape, ShapeKind};

// Re-export math types for convenience
pub use nalgebra::{Point2, Vector2};

/// Result type for shape construction.
pub type Result<T> = std::result::Result<T, ShapeError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_round_trip_through_public_surface() {
        let shape = Shape::polygon(vec![
            Point2::new(-0.1, -0.1),
            Point2::new(0.1, -0.1),
            Point2::new(0.1, 0.1),
            Point2::new(-0.1, 0.1),
        ])
        .expect("square is convex")
        .with_position(Point2::new(1.0, 2.0))
        .with_angle(0.9);

        assert_eq!(shape.pos, Point2::new(1.0, 2.0));
        assert_eq!(shape.angle, 0.9);
        match shape.kind() {
            ShapeKind::Polygon { corners, .. } => assert_eq!(corners.len(), 4),
            ShapeKind::Disk { .. } => panic!("expected polygon"),
        }
    }

    #[test]
    fn test_construction_error_is_reported() {
        let result = Shape::polygon(vec![Point2::new(0.0, 0.0)]);
        assert_eq!(result, Err(ShapeError::TooFewCorners { count: 1 }));
    }
}
