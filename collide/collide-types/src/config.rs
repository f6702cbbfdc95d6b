//! Configuration for collision queries.
//!
//! The central tunable is the line-thickness epsilon: every side-of-line
//! predicate in GJK and EPA treats a segment as a thin strip of half-width
//! `eps` instead of an exact line, so float error in the support computation
//! cannot flip a predicate and send the descent into a cycle. The epsilon
//! scales with shape size and is clamped above an absolute floor.

use crate::shape::Shape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables for the GJK/EPA descent loops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionConfig {
    /// Absolute lower bound on the line-thickness epsilon.
    pub eps_floor: f64,
    /// Factor applied to the larger bounding radius to scale the epsilon
    /// with shape size.
    pub eps_scale: f64,
    /// Iteration cap for the GJK descent. Reaching it reports no overlap.
    pub gjk_max_iterations: usize,
    /// Iteration cap for the EPA expansion. Reaching it returns the best
    /// edge found so far.
    pub epa_max_iterations: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            eps_floor: 1e-7,
            eps_scale: 1e-9,
            gjk_max_iterations: 64,
            epa_max_iterations: 64,
        }
    }
}

impl CollisionConfig {
    /// Set the epsilon floor.
    #[must_use]
    pub fn eps_floor(mut self, eps_floor: f64) -> Self {
        self.eps_floor = eps_floor;
        self
    }

    /// Set the epsilon scale factor.
    #[must_use]
    pub fn eps_scale(mut self, eps_scale: f64) -> Self {
        self.eps_scale = eps_scale;
        self
    }

    /// Set the GJK iteration cap.
    #[must_use]
    pub fn gjk_max_iterations(mut self, iterations: usize) -> Self {
        self.gjk_max_iterations = iterations;
        self
    }

    /// Set the EPA iteration cap.
    #[must_use]
    pub fn epa_max_iterations(mut self, iterations: usize) -> Self {
        self.epa_max_iterations = iterations;
        self
    }

    /// The query-scoped line-thickness epsilon for a shape pair.
    ///
    /// Half the thickness of any segment used in a predicate:
    /// `max(eps_floor, eps_scale * max(bounding_radius))`.
    #[must_use]
    pub fn eps_for(&self, a: &Shape, b: &Shape) -> f64 {
        let radius = a.bounding_radius().max(b.bounding_radius());
        (self.eps_scale * radius).max(self.eps_floor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollisionConfig::default();
        assert_eq!(config.eps_floor, 1e-7);
        assert_eq!(config.eps_scale, 1e-9);
        assert_eq!(config.gjk_max_iterations, 64);
        assert_eq!(config.epa_max_iterations, 64);
    }

    #[test]
    fn test_eps_floor_dominates_small_shapes() {
        let config = CollisionConfig::default();
        let a = Shape::disk(0.1);
        let b = Shape::disk(0.2);
        assert_eq!(config.eps_for(&a, &b), 1e-7);
    }

    #[test]
    fn test_eps_scales_with_large_shapes() {
        let config = CollisionConfig::default();
        let a = Shape::disk(1.0);
        let b = Shape::disk(1000.0);
        // Scaled term is 1e-6, well above the floor.
        assert_eq!(config.eps_for(&a, &b), config.eps_scale * 1000.0);
    }

    #[test]
    fn test_builder_methods() {
        let config = CollisionConfig::default()
            .eps_floor(1e-6)
            .eps_scale(1e-8)
            .gjk_max_iterations(32)
            .epa_max_iterations(128);
        assert_eq!(config.eps_floor, 1e-6);
        assert_eq!(config.eps_scale, 1e-8);
        assert_eq!(config.gjk_max_iterations, 32);
        assert_eq!(config.epa_max_iterations, 128);
    }
}
