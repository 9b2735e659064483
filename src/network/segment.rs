use crate::geometry::TrackCurve;

use super::connector::ConnectorId;

slotmap::new_key_type! {
    /// Unique identifier for a track segment in the network.
    pub struct SegmentId;
}

/// One of the two endpoints of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// The start of the curve (arclength 0).
    In,
    /// The end of the curve (arclength = length).
    Out,
}

/// Data associated with a track segment.
///
/// A segment owns its curve; the connectors at either end are plain handles
/// into the same network and may be absent.
#[derive(Debug, Clone)]
pub struct SegmentData {
    curve: TrackCurve,
    in_connector: Option<ConnectorId>,
    out_connector: Option<ConnectorId>,
}

impl SegmentData {
    /// Creates an unconnected segment.
    #[must_use]
    pub fn new(curve: impl Into<TrackCurve>) -> Self {
        Self {
            curve: curve.into(),
            in_connector: None,
            out_connector: None,
        }
    }

    /// Returns the segment's curve.
    #[must_use]
    pub fn curve(&self) -> &TrackCurve {
        &self.curve
    }

    /// Returns the connector at the In end, if any.
    #[must_use]
    pub fn in_connector(&self) -> Option<ConnectorId> {
        self.in_connector
    }

    /// Returns the connector at the Out end, if any.
    #[must_use]
    pub fn out_connector(&self) -> Option<ConnectorId> {
        self.out_connector
    }

    /// Returns the connector at the given end.
    #[must_use]
    pub fn connector(&self, end: End) -> Option<ConnectorId> {
        match end {
            End::In => self.in_connector,
            End::Out => self.out_connector,
        }
    }

    pub(crate) fn connector_mut(&mut self, end: End) -> &mut Option<ConnectorId> {
        match end {
            End::In => &mut self.in_connector,
            End::Out => &mut self.out_connector,
        }
    }
}
