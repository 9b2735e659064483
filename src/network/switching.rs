use crate::error::NetworkError;
use crate::geometry::{Curve, Space};
use crate::math::{lerp_point, lerp_vector, Point3, Vector3};
use crate::params::RailParams;

use super::connector::{ConnectorData, ConnectorId};
use super::TrackNetwork;

/// Endpoints of the active route, sampled where the direction indicator meets
/// the active in-track and out-track. Tangents are scaled to indicator length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteGeometry {
    /// Sample point on the active in-track.
    pub in_position: Point3,
    /// Scaled travel direction at `in_position`.
    pub in_tangent: Vector3,
    /// Sample point on the active out-track.
    pub out_position: Point3,
    /// Scaled travel direction at `out_position`.
    pub out_tangent: Vector3,
}

impl RouteGeometry {
    fn lerp(&self, to: &Self, alpha: f64) -> Self {
        Self {
            in_position: lerp_point(&self.in_position, &to.in_position, alpha),
            in_tangent: lerp_vector(&self.in_tangent, &to.in_tangent, alpha),
            out_position: lerp_point(&self.out_position, &to.out_position, alpha),
            out_tangent: lerp_vector(&self.out_tangent, &to.out_tangent, alpha),
        }
    }
}

/// A timed blend of the direction indicator from the pre-switch route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchTransition {
    /// Simulation time at which the switch happened.
    pub started_at: f64,
    /// Route geometry before the switch.
    pub from: RouteGeometry,
}

impl SwitchTransition {
    /// Blend factor in `[0, 1]` at time `now` for an ease window of `ease` seconds.
    #[must_use]
    pub fn alpha(&self, now: f64, ease: f64) -> f64 {
        if ease <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / ease).clamp(0.0, 1.0)
    }

    /// Whether the blend has not reached the new route yet.
    #[must_use]
    pub fn is_running(&self, now: f64, ease: f64) -> bool {
        self.alpha(now, ease) < 1.0
    }
}

/// Spline endpoints of a connector's direction indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPose {
    /// Start point of the indicator spline.
    pub start: Point3,
    /// Tangent at the start point.
    pub start_tangent: Vector3,
    /// End point of the indicator spline.
    pub end: Point3,
    /// Tangent at the end point.
    pub end_tangent: Vector3,
}

/// Receiver of direction indicator placements, typically a renderer.
pub trait IndicatorSink {
    /// Places the indicator of `connector`.
    fn set_endpoints(&mut self, connector: ConnectorId, pose: &IndicatorPose);
}

/// Samples the active route of `connector`.
///
/// Returns `None` if the connector is missing, inert, or its active entries
/// dangle. With several in-tracks the in side is sampled `indicator_offset`
/// past its start and the out side at its very end; with one in-track the
/// offsets swap, keeping the indicator clear of a converging junction.
pub(crate) fn compute_active_geometry(
    network: &TrackNetwork,
    connector: ConnectorId,
    params: &RailParams,
) -> Option<RouteGeometry> {
    let data = network.connector(connector).ok()?;
    if data.is_inert() {
        return None;
    }
    let in_curve = network.segment(data.active_in_track()?).ok()?.curve();
    let out_curve = network.segment(data.active_out_track()?).ok()?.curve();
    let diverging = data.in_tracks().len() > 1;
    let scale = params.indicator_tangent_scale;

    let in_offset = if diverging { params.indicator_offset } else { 0.0 };
    let out_at = out_curve.length() - if diverging { 0.0 } else { params.indicator_offset };

    Some(RouteGeometry {
        in_position: in_curve.point_at(in_offset, Space::World),
        in_tangent: in_curve.direction_at(in_offset, Space::World) * scale,
        out_position: out_curve.point_at(out_at, Space::World),
        out_tangent: out_curve.direction_at(out_at, Space::World) * scale,
    })
}

/// Switches a connector to its next route.
///
/// Both active indices advance by one, wrapping at their list length; an
/// empty side stays put. The new route geometry is available immediately,
/// the indicator blends towards it over `switch_ease` seconds from `now`.
pub struct ChangeDirection {
    connector: ConnectorId,
    now: f64,
}

impl ChangeDirection {
    /// Creates a new `ChangeDirection` operation at simulation time `now`.
    #[must_use]
    pub fn new(connector: ConnectorId, now: f64) -> Self {
        Self { connector, now }
    }

    /// Executes the switch in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is not in the network.
    pub fn execute(&self, network: &mut TrackNetwork, params: &RailParams) -> Result<(), NetworkError> {
        let previous = compute_active_geometry(network, self.connector, params);

        let connector = network.connector_mut(self.connector)?;
        if !connector.in_tracks.is_empty() {
            connector.active_in = (connector.active_in + 1) % connector.in_tracks.len();
        }
        if !connector.out_tracks.is_empty() {
            connector.active_out = (connector.active_out + 1) % connector.out_tracks.len();
        }
        tracing::trace!(
            connector = ?self.connector,
            active_in = connector.active_in,
            active_out = connector.active_out,
            "junction switched"
        );

        let geometry = compute_active_geometry(network, self.connector, params);
        let connector = network.connector_mut(self.connector)?;
        connector.geometry = geometry;
        connector.transition = previous.map(|from| SwitchTransition {
            started_at: self.now,
            from,
        });
        Ok(())
    }
}

impl ConnectorData {
    /// Direction indicator placement at simulation time `now`.
    ///
    /// Blends from the pre-switch route while a transition runs. With several
    /// in-tracks the indicator runs in→out with negated tangents, otherwise
    /// out→in.
    #[must_use]
    pub fn indicator(&self, now: f64, params: &RailParams) -> Option<IndicatorPose> {
        if self.is_inert() {
            return None;
        }
        let target = self.geometry?;
        let shown = match self.transition {
            Some(t) => t.from.lerp(&target, t.alpha(now, params.switch_ease)),
            None => target,
        };

        let pose = if self.in_tracks.len() > 1 {
            IndicatorPose {
                start: shown.in_position,
                start_tangent: -shown.in_tangent,
                end: shown.out_position,
                end_tangent: -shown.out_tangent,
            }
        } else {
            IndicatorPose {
                start: shown.out_position,
                start_tangent: shown.out_tangent,
                end: shown.in_position,
                end_tangent: shown.in_tangent,
            }
        };
        Some(pose)
    }
}
