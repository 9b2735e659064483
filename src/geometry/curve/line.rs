use crate::error::{GeometryError, Result};
use crate::math::{Isometry3, Point3, Vector3, TOLERANCE};

use super::Curve;

/// A straight track run from `start` along a unit `direction`.
///
/// The parametric form is: `P(s) = start + s * direction`, `s ∈ [0, length]`.
#[derive(Debug, Clone)]
pub struct Line {
    start: Point3,
    direction: Vector3,
    length: f64,
    placement: Isometry3,
}

impl Line {
    /// Creates a line between two local-space points.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide or are not finite.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        let span = end - start;
        let length = span.norm();
        if !length.is_finite() || !start.coords.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::Degenerate("line endpoints must be finite".into()).into());
        }
        if length < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            start,
            direction: span / length,
            length,
            placement: Isometry3::identity(),
        })
    }

    /// Returns the line with the given local-to-world placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Isometry3) -> Self {
        self.placement = placement;
        self
    }

    /// Returns the local-space start point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Returns the unit direction of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Curve for Line {
    fn length(&self) -> f64 {
        self.length
    }

    fn local_point(&self, distance: f64) -> Point3 {
        self.start + self.direction * distance
    }

    fn local_direction(&self, _distance: f64) -> Vector3 {
        self.direction
    }

    fn placement(&self) -> &Isometry3 {
        &self.placement
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::Space;
    use approx::assert_relative_eq;

    #[test]
    fn length_3_4_5() {
        let line = Line::new(Point3::origin(), Point3::new(300.0, 400.0, 0.0)).unwrap();
        assert_relative_eq!(line.length(), 500.0);
        let mid = line.point_at(250.0, Space::World);
        assert_relative_eq!(mid.x, 150.0);
        assert_relative_eq!(mid.y, 200.0);
    }

    #[test]
    fn non_finite_points_fail() {
        let origin = Point3::origin();
        assert!(Line::new(origin, Point3::new(f64::NAN, 0.0, 0.0)).is_err());
        assert!(Line::new(origin, Point3::new(f64::INFINITY, 0.0, 0.0)).is_err());
        assert!(Line::new(Point3::new(0.0, f64::NAN, 0.0), origin).is_err());
    }

    #[test]
    fn coincident_points_fail() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(Line::new(p, p).is_err());
    }
}
