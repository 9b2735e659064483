use super::segment::{End, SegmentId};
use super::switching::{RouteGeometry, SwitchTransition};

slotmap::new_key_type! {
    /// Unique identifier for a junction connector in the network.
    pub struct ConnectorId;
}

/// Data associated with a junction connector.
///
/// `in_tracks` lists segments whose In end sits at this connector (they lead
/// away from it), `out_tracks` segments whose Out end sits here (they lead
/// into it). Exactly one entry of each list is active at a time.
#[derive(Debug, Clone, Default)]
pub struct ConnectorData {
    pub(crate) in_tracks: Vec<SegmentId>,
    pub(crate) out_tracks: Vec<SegmentId>,
    pub(crate) active_in: usize,
    pub(crate) active_out: usize,
    pub(crate) geometry: Option<RouteGeometry>,
    pub(crate) transition: Option<SwitchTransition>,
}

impl ConnectorData {
    /// Creates a connector with no tracks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments whose In end meets this connector, in switching order.
    #[must_use]
    pub fn in_tracks(&self) -> &[SegmentId] {
        &self.in_tracks
    }

    /// Segments whose Out end meets this connector, in switching order.
    #[must_use]
    pub fn out_tracks(&self) -> &[SegmentId] {
        &self.out_tracks
    }

    /// The track list for segments meeting this connector with `end`.
    #[must_use]
    pub fn tracks(&self, end: End) -> &[SegmentId] {
        match end {
            End::In => &self.in_tracks,
            End::Out => &self.out_tracks,
        }
    }

    pub(crate) fn tracks_mut(&mut self, end: End) -> &mut Vec<SegmentId> {
        match end {
            End::In => &mut self.in_tracks,
            End::Out => &mut self.out_tracks,
        }
    }

    /// Index of the active entry in [`ConnectorData::in_tracks`].
    #[must_use]
    pub fn active_in_index(&self) -> usize {
        self.active_in
    }

    /// Index of the active entry in [`ConnectorData::out_tracks`].
    #[must_use]
    pub fn active_out_index(&self) -> usize {
        self.active_out
    }

    /// The active segment leaving the connector.
    #[must_use]
    pub fn active_in_track(&self) -> Option<SegmentId> {
        self.in_tracks.get(self.active_in).copied()
    }

    /// The active segment entering the connector.
    #[must_use]
    pub fn active_out_track(&self) -> Option<SegmentId> {
        self.out_tracks.get(self.active_out).copied()
    }

    /// A connector missing either side has no active route.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.in_tracks.is_empty() || self.out_tracks.is_empty()
    }

    /// Geometry of the active route, once computed.
    #[must_use]
    pub fn geometry(&self) -> Option<&RouteGeometry> {
        self.geometry.as_ref()
    }

    /// The running or finished indicator blend of the last switch.
    #[must_use]
    pub fn transition(&self) -> Option<&SwitchTransition> {
        self.transition.as_ref()
    }

    /// Sign of travel after passing this connector from `segment`.
    ///
    /// In-tracks and out-tracks are traversed in opposite arclength senses, so
    /// the speed flips when leaving through an in-track with positive speed or
    /// through an out-track with non-positive speed.
    #[must_use]
    pub fn find_exit_direction(&self, speed: f64, segment: SegmentId) -> f64 {
        let going_in = self.in_tracks.contains(&segment);
        let positive = speed > 0.0;
        if going_in == positive {
            -speed
        } else {
            speed
        }
    }
}
