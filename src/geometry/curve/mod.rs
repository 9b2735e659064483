mod arc;
mod line;
mod polyline;

pub use arc::Arc;
pub use line::Line;
pub use polyline::Polyline;

use crate::math::{Isometry3, Point3, Vector3};

/// Coordinate space of a curve query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// The curve's own frame, before its placement is applied.
    Local,
    /// World coordinates.
    World,
}

/// A 3D curve parametrised by arclength.
///
/// Queries outside `[0, length]` are clamped to the nearest end.
pub trait Curve {
    /// Total arclength of the curve.
    fn length(&self) -> f64;

    /// Local-space point at an arclength already within `[0, length]`.
    fn local_point(&self, distance: f64) -> Point3;

    /// Local-space unit direction at an arclength already within `[0, length]`.
    fn local_direction(&self, distance: f64) -> Vector3;

    /// Local-to-world transform of the curve.
    fn placement(&self) -> &Isometry3;

    /// Evaluates the curve at `distance` along it.
    fn point_at(&self, distance: f64, space: Space) -> Point3 {
        let local = self.local_point(distance.clamp(0.0, self.length()));
        match space {
            Space::Local => local,
            Space::World => self.placement() * local,
        }
    }

    /// Returns the unit direction of travel at `distance` along the curve.
    fn direction_at(&self, distance: f64, space: Space) -> Vector3 {
        let local = self.local_direction(distance.clamp(0.0, self.length()));
        match space {
            Space::Local => local,
            Space::World => self.placement() * local,
        }
    }
}

/// The curve carried by a track segment.
#[derive(Debug, Clone)]
pub enum TrackCurve {
    /// A straight run.
    Line(Line),
    /// A circular bend.
    Arc(Arc),
    /// A sampled spline.
    Polyline(Polyline),
}

impl Curve for TrackCurve {
    fn length(&self) -> f64 {
        match self {
            Self::Line(c) => c.length(),
            Self::Arc(c) => c.length(),
            Self::Polyline(c) => c.length(),
        }
    }

    fn local_point(&self, distance: f64) -> Point3 {
        match self {
            Self::Line(c) => c.local_point(distance),
            Self::Arc(c) => c.local_point(distance),
            Self::Polyline(c) => c.local_point(distance),
        }
    }

    fn local_direction(&self, distance: f64) -> Vector3 {
        match self {
            Self::Line(c) => c.local_direction(distance),
            Self::Arc(c) => c.local_direction(distance),
            Self::Polyline(c) => c.local_direction(distance),
        }
    }

    fn placement(&self) -> &Isometry3 {
        match self {
            Self::Line(c) => c.placement(),
            Self::Arc(c) => c.placement(),
            Self::Polyline(c) => c.placement(),
        }
    }
}

impl From<Line> for TrackCurve {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for TrackCurve {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

impl From<Polyline> for TrackCurve {
    fn from(polyline: Polyline) -> Self {
        Self::Polyline(polyline)
    }
}
