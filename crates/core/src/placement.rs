//! Placement rules for desks on a room canvas.
//!
//! Pure functions only: the [`LayoutCanvas`](crate::canvas::LayoutCanvas)
//! owns the desks and calls into these to clamp a drag candidate and to find
//! a desk it would collide with.

use serde::{Deserialize, Serialize};

use crate::desk::Desk;
use crate::types::ClientId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Two desks overlap when both coordinate deltas are below this (pixels).
pub const OVERLAP_THRESHOLD_PX: f64 = 10.0;

/// Margin subtracted from the canvas size when clamping a desk's anchor.
///
/// This is a fixed footprint and does not follow the desk's configured
/// width/height.
pub const DESK_FOOTPRINT_PX: f64 = 10.0;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in canvas-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a pointer delta.
    pub fn offset(self, delta: Delta) -> Self {
        Self {
            x: self.x + delta.dx,
            y: self.y + delta.dy,
        }
    }
}

/// Pointer displacement accumulated since a drag started.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    pub const ZERO: Delta = Delta { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Euclidean length of the displacement.
    pub fn distance(self) -> f64 {
        self.dx.hypot(self.dy)
    }

    pub fn is_finite(self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

/// Size of the rendered canvas container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest valid anchor x. Never negative.
    pub fn max_x(&self) -> f64 {
        (self.width - DESK_FOOTPRINT_PX).max(0.0)
    }

    /// Largest valid anchor y. Never negative.
    pub fn max_y(&self) -> f64 {
        (self.height - DESK_FOOTPRINT_PX).max(0.0)
    }

    /// Whether `point` satisfies the bounds invariant.
    pub fn contains(&self, point: Point) -> bool {
        (0.0..=self.max_x()).contains(&point.x) && (0.0..=self.max_y()).contains(&point.y)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Clamp a candidate anchor into `[0, width - footprint] x [0, height - footprint]`.
pub fn clamp_to_bounds(candidate: Point, bounds: CanvasBounds) -> Point {
    Point {
        x: candidate.x.clamp(0.0, bounds.max_x()),
        y: candidate.y.clamp(0.0, bounds.max_y()),
    }
}

/// Returns `true` if two anchors are closer than the threshold on both axes.
pub fn overlaps(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < OVERLAP_THRESHOLD_PX && (a.y - b.y).abs() < OVERLAP_THRESHOLD_PX
}

/// Find the first desk, other than `moving`, that `candidate` would overlap.
pub fn find_conflict<'a>(desks: &'a [Desk], moving: &ClientId, candidate: Point) -> Option<&'a Desk> {
    desks
        .iter()
        .filter(|d| &d.client_id != moving)
        .find(|d| overlaps(d.position(), candidate))
}
