use crate::error::{GeometryError, Result};
use crate::math::{Isometry3, Point3, Vector3, TOLERANCE};

use super::Curve;

/// A sampled spline: straight pieces through ordered points.
///
/// Keeps a cumulative arclength table so distance queries are a binary
/// search plus one linear interpolation.
#[derive(Debug, Clone)]
pub struct Polyline {
    points: Vec<Point3>,
    arc: Vec<f64>,
    placement: Isometry3,
}

impl Polyline {
    /// Creates a polyline through `points`, dropping consecutive duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if a point is not finite or fewer than two distinct
    /// points remain.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        if !points.iter().all(|p| p.coords.iter().all(|c| c.is_finite())) {
            return Err(
                GeometryError::Degenerate("polyline points must be finite".into()).into(),
            );
        }
        let mut kept: Vec<Point3> = Vec::with_capacity(points.len());
        for p in points {
            if kept.last().is_none_or(|last| (p - last).norm() > TOLERANCE) {
                kept.push(p);
            }
        }
        if kept.len() < 2 {
            return Err(
                GeometryError::Degenerate("polyline needs two distinct points".into()).into(),
            );
        }

        let mut arc = Vec::with_capacity(kept.len());
        let mut total = 0.0;
        arc.push(total);
        for pair in kept.windows(2) {
            total += (pair[1] - pair[0]).norm();
            arc.push(total);
        }

        Ok(Self {
            points: kept,
            arc,
            placement: Isometry3::identity(),
        })
    }

    /// Returns the polyline with the given local-to-world placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Isometry3) -> Self {
        self.placement = placement;
        self
    }

    /// Returns the local-space sample points.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Index `i` of the piece `[points[i], points[i + 1]]` containing `distance`.
    fn piece(&self, distance: f64) -> usize {
        let last_piece = self.points.len() - 2;
        self.arc
            .partition_point(|&s| s <= distance)
            .saturating_sub(1)
            .min(last_piece)
    }
}

impl Curve for Polyline {
    fn length(&self) -> f64 {
        self.arc.last().copied().unwrap_or(0.0)
    }

    fn local_point(&self, distance: f64) -> Point3 {
        let i = self.piece(distance);
        let span = self.arc[i + 1] - self.arc[i];
        let t = (distance - self.arc[i]) / span;
        self.points[i] + (self.points[i + 1] - self.points[i]) * t
    }

    fn local_direction(&self, distance: f64) -> Vector3 {
        let i = self.piece(distance);
        (self.points[i + 1] - self.points[i]).normalize()
    }

    fn placement(&self) -> &Isometry3 {
        &self.placement
    }
}
