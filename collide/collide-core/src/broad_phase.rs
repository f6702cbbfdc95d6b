//! Broad-phase collision detection over shape collections.
//!
//! This module provides O(n log n) broad-phase pruning to reduce the number
//! of narrow-phase GJK queries from O(n²) to O(n + k), where k is the
//! number of overlapping AABB pairs.
//!
//! Pruning is purely an optimization: a pair rejected here is guaranteed
//! disjoint, so skipping its narrow-phase query never changes a verdict.
//!
//! # Algorithm
//!
//! Sweep-and-Prune (also known as Sort-and-Sweep) works by:
//! 1. Computing axis-aligned bounding boxes (AABBs) for all shapes
//! 2. Projecting the AABBs onto the axis with the most positional spread
//! 3. Sorting intervals by their minimum endpoint
//! 4. Sweeping through sorted intervals to find overlaps
//!
//! # Example
//!
//! ```
//! use collide_core::broad_phase::{BroadPhase, SweepAndPrune};
//! use collide_core::Shape;
//! use nalgebra::Point2;
//!
//! let shapes = vec![
//!     Shape::disk(1.0),
//!     Shape::disk(1.0).with_position(Point2::new(1.5, 0.0)),
//!     Shape::disk(1.0).with_position(Point2::new(10.0, 0.0)),
//! ];
//!
//! let mut sap = SweepAndPrune::new();
//! let pairs = sap.find_potential_pairs(&shapes);
//!
//! // Only the first two disks are close enough to need a narrow-phase test.
//! assert_eq!(pairs, vec![(0, 1)]);
//! ```

use nalgebra::{Point2, Vector2};

use collide_types::Shape;

/// An axis-aligned bounding box for broad-phase rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point2<f64>,
    /// Maximum corner of the bounding box.
    pub max: Point2<f64>,
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    #[must_use]
    pub const fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with the given half-extents.
    #[must_use]
    pub fn from_center(center: Point2<f64>, half_extents: Vector2<f64>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// The box of radius `bounding_radius` around a shape's position.
    ///
    /// Valid at every rotation angle, so it can be cached across angular
    /// motion.
    #[must_use]
    pub fn of_shape(shape: &Shape) -> Self {
        let radius = shape.bounding_radius();
        Self::from_center(shape.pos, Vector2::new(radius, radius))
    }

    /// Check if this AABB overlaps another.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Expand this AABB by a margin on all sides.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Get the extent (size) along a specific axis.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max.x - self.min.x,
            Axis::Y => self.max.y - self.min.y,
        }
    }

    /// Get the minimum value along a specific axis.
    #[must_use]
    pub fn min_on_axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.min.x,
            Axis::Y => self.min.y,
        }
    }

    /// Get the maximum value along a specific axis.
    #[must_use]
    pub fn max_on_axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max.x,
            Axis::Y => self.max.y,
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Point2::origin(), Point2::origin())
    }
}

/// Coordinate axis for the sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X-axis (left-right).
    X,
    /// Y-axis (up-down).
    Y,
}

impl Axis {
    /// Get both axes.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::X, Self::Y]
    }
}

/// Trait for broad-phase collision detection algorithms.
pub trait BroadPhase {
    /// Find all pairs of shapes that potentially collide.
    ///
    /// Returns index pairs `(i, j)` with `i < j` whose AABBs overlap. The
    /// narrow phase should then check these pairs for actual collision.
    fn find_potential_pairs(&mut self, shapes: &[Shape]) -> Vec<(usize, usize)>;
}

/// Sweep-and-Prune (Sort-and-Sweep) broad-phase algorithm.
///
/// For temporal coherence (shapes moving slowly between frames) the sort
/// runs on nearly-sorted data, which Rust's adaptive sort handles in O(n).
#[derive(Debug, Clone)]
pub struct SweepAndPrune {
    /// Cached sorted intervals on the sweep axis.
    intervals: Vec<Interval>,
    /// The axis to sweep along (auto-selected from the scene extent).
    sweep_axis: Axis,
    /// Margin added to AABBs for predictive collision detection.
    margin: f64,
}

/// An interval on the sweep axis.
#[derive(Debug, Clone, Copy)]
struct Interval {
    /// Index into the shapes slice.
    index: usize,
    /// Minimum endpoint on the sweep axis.
    min: f64,
    /// Maximum endpoint on the sweep axis.
    max: f64,
}

impl Default for SweepAndPrune {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepAndPrune {
    /// Create a new sweep-and-prune broad phase.
    #[must_use]
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            sweep_axis: Axis::X,
            margin: 0.0,
        }
    }

    /// Create with a predictive margin for fast-moving shapes.
    ///
    /// The margin expands AABBs to catch collisions before they happen.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Choose the sweep axis with the largest spread of positions, which
    /// tends to minimize the number of overlapping intervals.
    fn choose_sweep_axis(shapes: &[Shape]) -> Axis {
        if shapes.is_empty() {
            return Axis::X;
        }

        let mut min_pos = Vector2::new(f64::INFINITY, f64::INFINITY);
        let mut max_pos = Vector2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for shape in shapes {
            min_pos.x = min_pos.x.min(shape.pos.x);
            min_pos.y = min_pos.y.min(shape.pos.y);
            max_pos.x = max_pos.x.max(shape.pos.x);
            max_pos.y = max_pos.y.max(shape.pos.y);
        }

        if max_pos.x - min_pos.x >= max_pos.y - min_pos.y {
            Axis::X
        } else {
            Axis::Y
        }
    }

    fn aabb_with_margin(&self, shape: &Shape) -> Aabb {
        let aabb = Aabb::of_shape(shape);
        if self.margin > 0.0 {
            aabb.expanded(self.margin)
        } else {
            aabb
        }
    }
}

impl BroadPhase for SweepAndPrune {
    fn find_potential_pairs(&mut self, shapes: &[Shape]) -> Vec<(usize, usize)> {
        self.sweep_axis = Self::choose_sweep_axis(shapes);

        self.intervals.clear();
        for (index, shape) in shapes.iter().enumerate() {
            let aabb = self.aabb_with_margin(shape);
            self.intervals.push(Interval {
                index,
                min: aabb.min_on_axis(self.sweep_axis),
                max: aabb.max_on_axis(self.sweep_axis),
            });
        }

        self.intervals.sort_by(|a, b| {
            a.min
                .partial_cmp(&b.min)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut pairs = Vec::new();
        for (i, interval_i) in self.intervals.iter().enumerate() {
            for interval_j in &self.intervals[i + 1..] {
                // Once an interval starts past this one's end, no later
                // interval can overlap it either.
                if interval_j.min > interval_i.max {
                    break;
                }

                // Confirm on the full AABB to drop sweep-axis false
                // positives.
                let aabb_i = self.aabb_with_margin(&shapes[interval_i.index]);
                let aabb_j = self.aabb_with_margin(&shapes[interval_j.index]);
                if aabb_i.overlaps(&aabb_j) {
                    let (lo, hi) = if interval_i.index < interval_j.index {
                        (interval_i.index, interval_j.index)
                    } else {
                        (interval_j.index, interval_i.index)
                    };
                    pairs.push((lo, hi));
                }
            }
        }

        pairs
    }
}

/// Simple O(n²) brute-force broad phase for comparison and small scenes.
///
/// This is the baseline that checks all pairs. It's suitable for scenes
/// with a few dozen shapes where the overhead of sorting isn't worth it.
#[derive(Debug, Clone, Default)]
pub struct BruteForce {
    /// Margin for AABB expansion.
    margin: f64,
}

impl BruteForce {
    /// Create a new brute-force broad phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a predictive margin.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }
}

impl BroadPhase for BruteForce {
    fn find_potential_pairs(&mut self, shapes: &[Shape]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        for (i, shape_a) in shapes.iter().enumerate() {
            for (j, shape_b) in shapes.iter().enumerate().skip(i + 1) {
                let mut aabb_a = Aabb::of_shape(shape_a);
                let mut aabb_b = Aabb::of_shape(shape_b);
                if self.margin > 0.0 {
                    aabb_a = aabb_a.expanded(self.margin);
                    aabb_b = aabb_b.expanded(self.margin);
                }

                if aabb_a.overlaps(&aabb_b) {
                    pairs.push((i, j));
                }
            }
        }

        pairs
    }
}
