use slotmap::SlotMap;

use crate::carriage::{Carriage, DerailReason};
use crate::error::{NetworkError, Result};
use crate::math::Point3;
use crate::network::{ChangeDirection, ConnectorId, IndicatorPose, IndicatorSink, TrackNetwork};
use crate::params::RailParams;
use crate::physics::{CarriageBody, KinematicBody};

slotmap::new_key_type! {
    /// Unique identifier for a carriage on the railway.
    pub struct CarriageId;
}

#[derive(Debug)]
struct Mounted<B> {
    carriage: Carriage,
    body: B,
}

/// The simulated railway: a track network, the carriages on it and a clock.
///
/// All movement, switching and contact handling runs on the caller's thread,
/// in the order the driver invokes it. Topology edits go through
/// [`Railway::network_mut`] and therefore never overlap a traversal.
#[derive(Debug)]
pub struct Railway<B: CarriageBody = KinematicBody> {
    network: TrackNetwork,
    carriages: SlotMap<CarriageId, Mounted<B>>,
    params: RailParams,
    now: f64,
    active: bool,
}

impl<B: CarriageBody> Railway<B> {
    /// Creates a railway over `network`. Nothing moves until [`Railway::activate`].
    #[must_use]
    pub fn new(network: TrackNetwork, params: RailParams) -> Self {
        Self {
            network,
            carriages: SlotMap::with_key(),
            params,
            now: 0.0,
            active: false,
        }
    }

    /// Returns the track network.
    #[must_use]
    pub fn network(&self) -> &TrackNetwork {
        &self.network
    }

    /// Returns the track network for topology edits.
    pub fn network_mut(&mut self) -> &mut TrackNetwork {
        &mut self.network
    }

    /// Returns the simulation constants.
    #[must_use]
    pub fn params(&self) -> &RailParams {
        &self.params
    }

    /// Simulation time in seconds since activation.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Whether [`Railway::activate`] has run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Puts a carriage on the railway, activating it if the railway already runs.
    pub fn add_carriage(&mut self, carriage: Carriage, body: B) -> CarriageId {
        let mut mounted = Mounted { carriage, body };
        if self.active {
            mounted.carriage.activate(&self.network, &mut mounted.body);
        }
        self.carriages.insert(mounted)
    }

    /// Takes a carriage and its body off the railway.
    pub fn remove_carriage(&mut self, id: CarriageId) -> Option<(Carriage, B)> {
        self.carriages.remove(id).map(|m| (m.carriage, m.body))
    }

    /// Returns the carriage, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the carriage is not on the railway.
    pub fn carriage(&self, id: CarriageId) -> std::result::Result<&Carriage, NetworkError> {
        self.carriages
            .get(id)
            .map(|m| &m.carriage)
            .ok_or(NetworkError::EntityNotFound("carriage"))
    }

    /// Returns the carriage's physics body, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the carriage is not on the railway.
    pub fn body(&self, id: CarriageId) -> std::result::Result<&B, NetworkError> {
        self.carriages
            .get(id)
            .map(|m| &m.body)
            .ok_or(NetworkError::EntityNotFound("carriage"))
    }

    /// Iterates over all carriage IDs.
    pub fn carriage_ids(&self) -> impl Iterator<Item = CarriageId> + '_ {
        self.carriages.keys()
    }

    /// Repairs every connector and activates every carriage.
    ///
    /// # Errors
    ///
    /// Returns an error if the network changes under the repair pass.
    pub fn activate(&mut self) -> Result<()> {
        self.network.repair_all(&self.params)?;
        for mounted in self.carriages.values_mut() {
            mounted.carriage.activate(&self.network, &mut mounted.body);
        }
        self.active = true;
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Does nothing until [`Railway::activate`] has run.
    pub fn update(&mut self, dt: f64) {
        if !self.active {
            return;
        }
        self.now += dt;
        for mounted in self.carriages.values_mut() {
            mounted
                .carriage
                .update(dt, &self.network, &mut mounted.body, &self.params);
        }
        if let Some(radius) = self.params.contact_radius {
            for (a, b) in self.contacts(radius) {
                self.handle_contact(a, b);
            }
        }
    }

    /// Derails both carriages of a contact between two distinct carriages.
    ///
    /// Contacts naming an unknown carriage are ignored.
    pub fn handle_contact(&mut self, a: CarriageId, b: CarriageId) {
        if a == b || !self.carriages.contains_key(a) || !self.carriages.contains_key(b) {
            return;
        }
        for id in [a, b] {
            if let Some(mounted) = self.carriages.get_mut(id) {
                mounted
                    .carriage
                    .derail(DerailReason::Collision, &mut mounted.body);
            }
        }
    }

    /// Switches a junction to its next route.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is not in the network.
    pub fn change_direction(&mut self, connector: ConnectorId) -> Result<()> {
        ChangeDirection::new(connector, self.now).execute(&mut self.network, &self.params)?;
        Ok(())
    }

    /// Direction indicator of a connector at the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector is not in the network.
    pub fn indicator(&self, connector: ConnectorId) -> Result<Option<IndicatorPose>> {
        Ok(self
            .network
            .connector(connector)?
            .indicator(self.now, &self.params))
    }

    /// Writes the indicator of every non-inert connector to `sink`.
    pub fn publish_indicators(&self, sink: &mut dyn IndicatorSink) {
        for id in self.network.connector_ids() {
            let pose = self
                .network
                .connector(id)
                .ok()
                .and_then(|c| c.indicator(self.now, &self.params));
            if let Some(pose) = pose {
                sink.set_endpoints(id, &pose);
            }
        }
    }

    /// Pairs of carriages whose bounding spheres overlap, with at least one
    /// still on track.
    ///
    /// A derailed carriage stays where it left the track and blocks it.
    fn contacts(&self, radius: f64) -> Vec<(CarriageId, CarriageId)> {
        let placed: Vec<(CarriageId, Point3, bool)> = self
            .carriages
            .iter()
            .map(|(id, m)| (id, m.carriage.pose().position, m.carriage.is_on_track()))
            .collect();

        let mut pairs = Vec::new();
        for (i, (a, pa, a_on_track)) in placed.iter().enumerate() {
            for (b, pb, b_on_track) in &placed[i + 1..] {
                if (*a_on_track || *b_on_track) && (pb - pa).norm() < 2.0 * radius {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }
}

impl Default for Railway {
    fn default() -> Self {
        Self::new(TrackNetwork::new(), RailParams::default())
    }
}
