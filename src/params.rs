/// Tunable constants of the track simulation.
///
/// Distances are in world units, durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailParams {
    /// Arclength from a junction at which the direction indicator samples a track.
    pub indicator_offset: f64,
    /// Length the unit tangents of the direction indicator are scaled to.
    pub indicator_tangent_scale: f64,
    /// Duration of the indicator blend after a junction switch.
    pub switch_ease: f64,
    /// Maximum allowed distance between a carriage's front and back points.
    pub max_stretch: f64,
    /// Maximum number of boundary-crossing steps per tracked point per tick.
    pub max_crossings: usize,
    /// Radius of the bounding sphere used for carriage contact detection.
    ///
    /// `None` leaves contact detection to an external collision system.
    pub contact_radius: Option<f64>,
}

impl Default for RailParams {
    fn default() -> Self {
        Self {
            indicator_offset: 1500.0,
            indicator_tangent_scale: 1500.0,
            switch_ease: 0.1,
            max_stretch: 1400.0,
            max_crossings: 10,
            contact_radius: None,
        }
    }
}
