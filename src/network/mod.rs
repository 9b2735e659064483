pub mod connector;
pub mod repair;
pub mod segment;
pub mod switching;

pub use connector::{ConnectorData, ConnectorId};
pub use repair::RepairGraph;
pub use segment::{End, SegmentData, SegmentId};
pub use switching::{ChangeDirection, IndicatorPose, IndicatorSink, RouteGeometry, SwitchTransition};

use crate::error::NetworkError;
use crate::params::RailParams;
use slotmap::SlotMap;

/// Central arena that owns all segments and connectors.
///
/// Segments and connectors reference each other via typed IDs (generational
/// indices), so the cyclic junction graph needs no shared ownership and a
/// removed entity's ID never resolves to a newer one.
#[derive(Debug, Default)]
pub struct TrackNetwork {
    segments: SlotMap<SegmentId, SegmentData>,
    connectors: SlotMap<ConnectorId, ConnectorData>,
}

impl TrackNetwork {
    /// Creates a new, empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Segment operations ---

    /// Inserts a segment and returns its ID.
    pub fn add_segment(&mut self, data: SegmentData) -> SegmentId {
        self.segments.insert(data)
    }

    /// Returns a reference to the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is not in the network.
    pub fn segment(&self, id: SegmentId) -> Result<&SegmentData, NetworkError> {
        self.segments
            .get(id)
            .ok_or(NetworkError::EntityNotFound("segment"))
    }

    /// Returns a mutable reference to the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is not in the network.
    pub fn segment_mut(&mut self, id: SegmentId) -> Result<&mut SegmentData, NetworkError> {
        self.segments
            .get_mut(id)
            .ok_or(NetworkError::EntityNotFound("segment"))
    }

    /// Removes a segment. Connector entries naming it dangle until repaired.
    pub fn remove_segment(&mut self, id: SegmentId) -> Option<SegmentData> {
        self.segments.remove(id)
    }

    /// Whether the segment is still in the network.
    #[must_use]
    pub fn contains_segment(&self, id: SegmentId) -> bool {
        self.segments.contains_key(id)
    }

    // --- Connector operations ---

    /// Inserts a connector and returns its ID.
    pub fn add_connector(&mut self, data: ConnectorData) -> ConnectorId {
        self.connectors.insert(data)
    }

    /// Returns a reference to the connector data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is not in the network.
    pub fn connector(&self, id: ConnectorId) -> Result<&ConnectorData, NetworkError> {
        self.connectors
            .get(id)
            .ok_or(NetworkError::EntityNotFound("connector"))
    }

    /// Returns a mutable reference to the connector data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is not in the network.
    pub fn connector_mut(&mut self, id: ConnectorId) -> Result<&mut ConnectorData, NetworkError> {
        self.connectors
            .get_mut(id)
            .ok_or(NetworkError::EntityNotFound("connector"))
    }

    /// Removes a connector. Segment references to it dangle and read as absent.
    pub fn remove_connector(&mut self, id: ConnectorId) -> Option<ConnectorData> {
        self.connectors.remove(id)
    }

    /// Whether the connector is still in the network.
    #[must_use]
    pub fn contains_connector(&self, id: ConnectorId) -> bool {
        self.connectors.contains_key(id)
    }

    /// Iterates over all connector IDs in insertion order of their slots.
    pub fn connector_ids(&self) -> impl Iterator<Item = ConnectorId> + '_ {
        self.connectors.keys()
    }

    // --- Authoring ---

    /// Joins `end` of `segment` to `connector`.
    ///
    /// Sets the segment's back reference and appends it to the connector's
    /// matching track list. A previous connector at that end keeps its stale
    /// entry until its next repair pass.
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is not in the network.
    pub fn attach(
        &mut self,
        connector: ConnectorId,
        segment: SegmentId,
        end: End,
    ) -> Result<(), NetworkError> {
        if !self.contains_connector(connector) {
            return Err(NetworkError::EntityNotFound("connector"));
        }
        *self.segment_mut(segment)?.connector_mut(end) = Some(connector);
        let tracks = self.connector_mut(connector)?.tracks_mut(end);
        if !tracks.contains(&segment) {
            tracks.push(segment);
        }
        Ok(())
    }

    /// Clears the back reference at `end` of `segment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is not in the network.
    pub fn detach(&mut self, segment: SegmentId, end: End) -> Result<(), NetworkError> {
        *self.segment_mut(segment)?.connector_mut(end) = None;
        Ok(())
    }

    /// Runs [`RepairGraph`] on every connector.
    ///
    /// # Errors
    ///
    /// Returns an error if a connector disappears mid-pass.
    pub fn repair_all(&mut self, params: &RailParams) -> Result<(), NetworkError> {
        let ids: Vec<ConnectorId> = self.connector_ids().collect();
        for id in ids {
            RepairGraph::new(id).execute(self, params)?;
        }
        Ok(())
    }

    // --- Routing queries ---

    /// The segment a train continues onto past the Out end of `segment`.
    #[must_use]
    pub fn next_segment(&self, segment: SegmentId) -> Option<SegmentId> {
        let connector = self.segment(segment).ok()?.out_connector()?;
        self.connector(connector)
            .ok()?
            .active_in_track()
            .filter(|&id| self.contains_segment(id))
    }

    /// The segment a train backs onto past the In end of `segment`.
    #[must_use]
    pub fn previous_segment(&self, segment: SegmentId) -> Option<SegmentId> {
        let connector = self.segment(segment).ok()?.in_connector()?;
        self.connector(connector)
            .ok()?
            .active_out_track()
            .filter(|&id| self.contains_segment(id))
    }
}
