//! Error types for shape construction.

use thiserror::Error;

/// Errors rejecting invalid polygon input.
///
/// A rejected construction produces no partial shape; queries may assume
/// every [`Shape`](crate::Shape) upholds its invariants.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// Fewer than three corners were supplied.
    #[error("polygon needs at least 3 corners, got {count}")]
    TooFewCorners {
        /// Number of corners supplied.
        count: usize,
    },

    /// Two corners are exactly equal.
    #[error("polygon corners contain duplicates")]
    DuplicateCorners,

    /// Three corners lie on a single line.
    #[error("three polygon corners are collinear")]
    CollinearCorners,

    /// At least one corner forms a concave angle.
    #[error("polygon corners do not form a convex winding")]
    NotConvex,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShapeError::TooFewCorners { count: 2 };
        assert!(err.to_string().contains('2'));

        let err = ShapeError::NotConvex;
        assert!(err.to_string().contains("convex"));
    }
}
