//! Carriages riding the track graph on two tracked points.

use crate::geometry::{Curve, Space};
use crate::math::{rotation_towards, Point3, Rotation, Vector3};
use crate::network::TrackNetwork;
use crate::params::RailParams;
use crate::physics::CarriageBody;
use crate::traversal::{advance, Advance, Outcome, TrackedPoint};

/// Why a carriage left the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerailReason {
    /// No starting segment at activation.
    NoStartSegment,
    /// A tracked point ran off an unconnected track end.
    EndOfTrack,
    /// A tracked point's segment was removed from the network.
    MissingSegment,
    /// Front and back points drifted further apart than `max_stretch`.
    OverStretch,
    /// Contact with another carriage.
    Collision,
    /// Requested by the driver.
    Manual,
}

/// Carriage state. `Derailed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarriageState {
    /// Following the track graph.
    OnTrack,
    /// Off the track under free physics, for the given reason.
    Derailed(DerailReason),
}

/// World placement of a carriage body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Track midpoint raised by the carriage height.
    pub position: Point3,
    /// Unit direction from the back point to the front point.
    pub heading: Vector3,
    /// Yaw/pitch orientation of the heading, with zero roll.
    pub rotation: Rotation,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            heading: Vector3::x(),
            rotation: Rotation::identity(),
        }
    }
}

/// A rigid carriage following the track on a back and a front point.
#[derive(Debug, Clone)]
pub struct Carriage {
    back: Option<TrackedPoint>,
    front: Option<TrackedPoint>,
    back_is_backwards: bool,
    front_is_backwards: bool,
    back_location: Point3,
    front_location: Point3,
    speed: f64,
    height: f64,
    state: CarriageState,
    pose: Pose,
    last_location: Point3,
    movement_velocity: Vector3,
}

impl Carriage {
    /// Creates a carriage whose back point starts at `back`.
    ///
    /// The front point defaults to the back point until set with
    /// [`Carriage::with_front`].
    #[must_use]
    pub fn new(back: Option<TrackedPoint>) -> Self {
        Self {
            back,
            front: None,
            back_is_backwards: false,
            front_is_backwards: false,
            back_location: Point3::origin(),
            front_location: Point3::origin(),
            speed: 0.0,
            height: 0.0,
            state: CarriageState::OnTrack,
            pose: Pose::default(),
            last_location: Point3::origin(),
            movement_velocity: Vector3::zeros(),
        }
    }

    /// Sets the starting position of the front point.
    #[must_use]
    pub fn with_front(mut self, front: TrackedPoint) -> Self {
        self.front = Some(front);
        self
    }

    /// Signed speed along the global travel sense, in units per second.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Vertical offset of the body above the track midpoint.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Changes the signed speed for subsequent updates.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Returns the back tracked point.
    #[must_use]
    pub fn back(&self) -> Option<TrackedPoint> {
        self.back
    }

    /// Returns the front tracked point, set at the latest on activation.
    #[must_use]
    pub fn front(&self) -> Option<TrackedPoint> {
        self.front
    }

    /// Whether the back point last moved against the curve direction.
    #[must_use]
    pub fn back_is_backwards(&self) -> bool {
        self.back_is_backwards
    }

    /// Whether the front point last moved against the curve direction.
    #[must_use]
    pub fn front_is_backwards(&self) -> bool {
        self.front_is_backwards
    }

    /// World location of the back point at the last update.
    #[must_use]
    pub fn back_location(&self) -> &Point3 {
        &self.back_location
    }

    /// World location of the front point at the last update.
    #[must_use]
    pub fn front_location(&self) -> &Point3 {
        &self.front_location
    }

    /// Returns the signed speed in units per second.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns the vertical offset of the body above the track.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> CarriageState {
        self.state
    }

    /// Whether the carriage has not derailed.
    #[must_use]
    pub fn is_on_track(&self) -> bool {
        self.state == CarriageState::OnTrack
    }

    /// Returns the body placement computed by the last update.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Body position before the last update.
    #[must_use]
    pub fn last_location(&self) -> &Point3 {
        &self.last_location
    }

    /// Velocity implied by the last pose change.
    #[must_use]
    pub fn movement_velocity(&self) -> &Vector3 {
        &self.movement_velocity
    }

    /// Takes the carriage off the track.
    ///
    /// Hands the body to free fall and applies the last movement velocity as
    /// an impulse. Returns `false` without side effects if already derailed.
    pub fn derail(&mut self, reason: DerailReason, body: &mut dyn CarriageBody) -> bool {
        if !self.is_on_track() {
            return false;
        }
        self.state = CarriageState::Derailed(reason);
        body.enable_free_fall();
        body.apply_impulse(self.movement_velocity);
        tracing::debug!(?reason, velocity = ?self.movement_velocity, "carriage derailed");
        true
    }

    /// Places the carriage on the track before the first update.
    ///
    /// Derails immediately without a starting segment.
    pub fn activate(&mut self, network: &TrackNetwork, body: &mut dyn CarriageBody) {
        if !self.is_on_track() {
            return;
        }
        let Some(back) = self.back else {
            self.derail(DerailReason::NoStartSegment, body);
            return;
        };
        let front = *self.front.get_or_insert(back);
        let (Some(back_location), Some(front_location)) =
            (sample(network, back), sample(network, front))
        else {
            self.derail(DerailReason::MissingSegment, body);
            return;
        };
        self.place(back_location, front_location);
        self.last_location = self.pose.position;
    }

    /// Advances the carriage by one tick of `dt` seconds.
    ///
    /// The back point moves and is sampled before the front point. Does
    /// nothing once derailed.
    pub fn update(
        &mut self,
        dt: f64,
        network: &TrackNetwork,
        body: &mut dyn CarriageBody,
        params: &RailParams,
    ) {
        if !self.is_on_track() {
            return;
        }
        let Some(back) = self.back else {
            self.derail(DerailReason::NoStartSegment, body);
            return;
        };
        let movement = self.speed * dt;

        let step = advance(network, back, movement, params);
        let Some(back_location) = self.settle(network, step, body) else {
            return;
        };
        self.back = Some(step.point);
        self.back_is_backwards = step.backwards;

        let front = self.front.unwrap_or(back);
        let step = advance(network, front, movement, params);
        let Some(front_location) = self.settle(network, step, body) else {
            return;
        };
        self.front = Some(step.point);
        self.front_is_backwards = step.backwards;

        self.last_location = self.pose.position;
        self.place(back_location, front_location);
        if dt > 0.0 {
            self.movement_velocity = (self.pose.position - self.last_location) / dt;
        }

        let stretch = (front_location - back_location).norm();
        if stretch > params.max_stretch {
            tracing::debug!(stretch, "carriage over-stretched");
            self.derail(DerailReason::OverStretch, body);
        }
    }

    /// Samples a moved point, derailing if the move left the track.
    fn settle(
        &mut self,
        network: &TrackNetwork,
        step: Advance,
        body: &mut dyn CarriageBody,
    ) -> Option<Point3> {
        let reason = match step.outcome {
            Outcome::EndOfTrack(_) => DerailReason::EndOfTrack,
            Outcome::MissingSegment => DerailReason::MissingSegment,
            Outcome::Settled | Outcome::Blocked(_) | Outcome::Capped => {
                if let Some(location) = sample(network, step.point) {
                    return Some(location);
                }
                DerailReason::MissingSegment
            }
        };
        self.derail(reason, body);
        None
    }

    fn place(&mut self, back_location: Point3, front_location: Point3) {
        self.back_location = back_location;
        self.front_location = front_location;
        let span = front_location - back_location;
        let midpoint = back_location + span * 0.5;
        let heading = span.try_normalize(0.0).unwrap_or(self.pose.heading);
        self.pose = Pose {
            position: midpoint + Vector3::z() * self.height,
            heading,
            rotation: rotation_towards(&heading),
        };
    }
}

/// World location of a tracked point, if its segment exists.
fn sample(network: &TrackNetwork, point: TrackedPoint) -> Option<Point3> {
    network
        .segment(point.segment)
        .ok()
        .map(|segment| segment.curve().point_at(point.distance, Space::World))
}
