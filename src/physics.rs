use crate::math::Vector3;

/// The physics body behind a carriage, driven only once it derails.
pub trait CarriageBody {
    /// Hands the body over to free fall under gravity.
    fn enable_free_fall(&mut self);

    /// Applies an impulse, expressed as a mass-independent velocity change.
    fn apply_impulse(&mut self, impulse: Vector3);
}

/// Minimal body that records the free-fall hand-over.
///
/// Impulses accumulate into a linear velocity; nothing is integrated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KinematicBody {
    gravity_enabled: bool,
    velocity: Vector3,
    impulses: usize,
}

impl KinematicBody {
    /// Creates a body resting on the track.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the body has been handed to free fall.
    #[must_use]
    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Sum of all impulses received.
    #[must_use]
    pub fn velocity(&self) -> &Vector3 {
        &self.velocity
    }

    /// Number of impulses received.
    #[must_use]
    pub fn impulse_count(&self) -> usize {
        self.impulses
    }
}

impl CarriageBody for KinematicBody {
    fn enable_free_fall(&mut self) {
        self.gravity_enabled = true;
    }

    fn apply_impulse(&mut self, impulse: Vector3) {
        self.velocity += impulse;
        self.impulses += 1;
    }
}
