use crate::error::NetworkError;
use crate::params::RailParams;

use super::connector::ConnectorId;
use super::segment::{End, SegmentId};
use super::switching::compute_active_geometry;
use super::TrackNetwork;

/// Prunes stale track entries from a connector and refreshes its route.
///
/// An entry survives only if its segment still exists and the segment's back
/// reference at the matching end names this connector. Surviving entries keep
/// their order; pruned ones are never re-added. Active indices are wrapped
/// back into range afterwards.
pub struct RepairGraph {
    connector: ConnectorId,
}

impl RepairGraph {
    /// Creates a new `RepairGraph` operation.
    #[must_use]
    pub fn new(connector: ConnectorId) -> Self {
        Self { connector }
    }

    /// Executes the repair in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is not in the network.
    pub fn execute(&self, network: &mut TrackNetwork, params: &RailParams) -> Result<(), NetworkError> {
        let connector = network.connector(self.connector)?;
        let out_tracks = self.owned(network, connector.out_tracks(), End::Out);
        let in_tracks = self.owned(network, connector.in_tracks(), End::In);

        let pruned = connector.out_tracks().len() - out_tracks.len()
            + connector.in_tracks().len()
            - in_tracks.len();
        if pruned > 0 {
            tracing::debug!(connector = ?self.connector, pruned, "pruned stale track entries");
        }

        let connector = network.connector_mut(self.connector)?;
        connector.active_out = wrap(connector.active_out, out_tracks.len());
        connector.active_in = wrap(connector.active_in, in_tracks.len());
        connector.out_tracks = out_tracks;
        connector.in_tracks = in_tracks;

        let geometry = compute_active_geometry(network, self.connector, params);
        network.connector_mut(self.connector)?.geometry = geometry;
        Ok(())
    }

    fn owned(&self, network: &TrackNetwork, tracks: &[SegmentId], end: End) -> Vec<SegmentId> {
        tracks
            .iter()
            .copied()
            .filter(|&id| {
                network
                    .segment(id)
                    .is_ok_and(|segment| segment.connector(end) == Some(self.connector))
            })
            .collect()
    }
}

fn wrap(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index % len
    }
}
