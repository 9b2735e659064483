use crate::error::{GeometryError, Result};
use crate::math::{Isometry3, Point3, Vector3, TOLERANCE};

use super::Curve;

/// A circular bend parametrised by arclength.
///
/// The bend starts at `start_angle` (measured from `ref_dir` around `normal`)
/// and sweeps by `sweep` radians; a negative sweep turns clockwise.
#[derive(Debug, Clone)]
pub struct Arc {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
    start_angle: f64,
    sweep: f64,
    placement: Isometry3,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the arc circle
    /// * `radius` - Radius (must be positive)
    /// * `normal` - Normal vector defining the arc plane
    /// * `ref_dir` - Reference direction for angle = 0 (must be perpendicular to normal)
    /// * `start_angle` - Start angle in radians
    /// * `sweep` - Signed swept angle in radians (must be non-zero)
    ///
    /// # Errors
    ///
    /// Returns an error if any input is not finite, the radius is non-positive,
    /// the normal or reference direction is zero-length, they are not
    /// perpendicular, or the sweep is zero.
    pub fn new(
        center: Point3,
        radius: f64,
        normal: Vector3,
        ref_dir: Vector3,
        start_angle: f64,
        sweep: f64,
    ) -> Result<Self> {
        let finite = [radius, start_angle, sweep]
            .iter()
            .chain(center.coords.iter())
            .chain(normal.iter())
            .chain(ref_dir.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(GeometryError::Degenerate("arc parameters must be finite".into()).into());
        }
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if sweep.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("arc sweep must be non-zero".into()).into());
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if normal.dot(&ref_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
            start_angle,
            sweep,
            placement: Isometry3::identity(),
        })
    }

    /// Returns the arc with the given local-to-world placement.
    #[must_use]
    pub fn with_placement(mut self, placement: Isometry3) -> Self {
        self.placement = placement;
        self
    }

    /// Returns the center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the signed sweep angle.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }

    fn angle_at(&self, distance: f64) -> f64 {
        self.start_angle + self.sweep.signum() * distance / self.radius
    }
}

impl Curve for Arc {
    fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    fn local_point(&self, distance: f64) -> Point3 {
        let t = self.angle_at(distance);
        self.center + (self.ref_dir * t.cos() + self.binormal() * t.sin()) * self.radius
    }

    fn local_direction(&self, distance: f64) -> Vector3 {
        let t = self.angle_at(distance);
        // Unit derivative of the angle; flipped so it follows the sweep.
        (self.ref_dir * -t.sin() + self.binormal() * t.cos()) * self.sweep.signum()
    }

    fn placement(&self) -> &Isometry3 {
        &self.placement
    }
}
