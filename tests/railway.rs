#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use railgraph::geometry::Line;
use railgraph::math::Point3;
use railgraph::network::{IndicatorPose, IndicatorSink};
use railgraph::{
    advance, Carriage, CarriageState, ConnectorData, ConnectorId, DerailReason, End,
    KinematicBody, Outcome, RailParams, Railway, SegmentData, SegmentId, TrackNetwork,
    TrackedPoint,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn line(network: &mut TrackNetwork, from: (f64, f64), to: (f64, f64)) -> SegmentId {
    let curve = Line::new(Point3::new(from.0, from.1, 0.0), Point3::new(to.0, to.1, 0.0)).unwrap();
    network.add_segment(SegmentData::new(curve))
}

/// Feeder along -X into a junction at the origin that diverges east and north.
struct Junction {
    network: TrackNetwork,
    feeder: SegmentId,
    east: SegmentId,
    north: SegmentId,
    connector: ConnectorId,
}

fn junction() -> Junction {
    let mut network = TrackNetwork::new();
    let feeder = line(&mut network, (-2000.0, 0.0), (0.0, 0.0));
    let east = line(&mut network, (0.0, 0.0), (5000.0, 0.0));
    let north = line(&mut network, (0.0, 0.0), (0.0, 5000.0));
    let connector = network.add_connector(ConnectorData::new());
    network.attach(connector, feeder, End::Out).unwrap();
    network.attach(connector, east, End::In).unwrap();
    network.attach(connector, north, End::In).unwrap();
    Junction {
        network,
        feeder,
        east,
        north,
        connector,
    }
}

#[derive(Default)]
struct RecordingSink {
    placed: Vec<(ConnectorId, IndicatorPose)>,
}

impl IndicatorSink for RecordingSink {
    fn set_endpoints(&mut self, connector: ConnectorId, pose: &IndicatorPose) {
        self.placed.push((connector, *pose));
    }
}

#[test]
fn activation_repairs_every_connector() {
    init_tracing();
    let Junction {
        mut network,
        feeder,
        east,
        north,
        connector,
    } = junction();
    let stray = line(&mut network, (0.0, 0.0), (-10.0, 900.0));
    network.attach(connector, stray, End::In).unwrap();
    network.remove_segment(stray);
    let elsewhere = network.add_connector(ConnectorData::new());
    network.attach(elsewhere, north, End::In).unwrap();

    let mut railway: Railway = Railway::new(network, RailParams::default());
    railway.activate().unwrap();

    let network = railway.network();
    for id in network.connector_ids() {
        let c = network.connector(id).unwrap();
        for &s in c.out_tracks() {
            assert_eq!(network.segment(s).unwrap().out_connector(), Some(id));
        }
        for &s in c.in_tracks() {
            assert_eq!(network.segment(s).unwrap().in_connector(), Some(id));
        }
    }
    let c = network.connector(connector).unwrap();
    assert_eq!(c.in_tracks(), &[east]);
    assert_eq!(c.out_tracks(), &[feeder]);
}

#[test]
fn switching_cycles_through_routes() {
    let j = junction();
    let mut railway: Railway = Railway::new(j.network, RailParams::default());
    railway.activate().unwrap();

    let start = railway.network().connector(j.connector).unwrap().active_in_index();
    railway.change_direction(j.connector).unwrap();
    assert_eq!(railway.network().next_segment(j.feeder), Some(j.north));
    railway.change_direction(j.connector).unwrap();

    let c = railway.network().connector(j.connector).unwrap();
    assert_eq!(c.active_in_index(), start);
    assert_eq!(c.active_out_index(), 0);
    assert_eq!(railway.network().next_segment(j.feeder), Some(j.east));
}

#[test]
fn converging_junction_cycles_its_feeders() {
    let mut network = TrackNetwork::new();
    let west = line(&mut network, (-2000.0, 0.0), (0.0, 0.0));
    let south = line(&mut network, (0.0, -2000.0), (0.0, 0.0));
    let north = line(&mut network, (0.0, 2000.0), (0.0, 0.0));
    let exit = line(&mut network, (0.0, 0.0), (5000.0, 0.0));
    let connector = network.add_connector(ConnectorData::new());
    for feeder in [west, south, north] {
        network.attach(connector, feeder, End::Out).unwrap();
    }
    network.attach(connector, exit, End::In).unwrap();

    let mut railway: Railway = Railway::new(network, RailParams::default());
    let id = railway.add_carriage(
        Carriage::new(Some(TrackedPoint::new(exit, 300.0)))
            .with_front(TrackedPoint::new(exit, 1000.0))
            .with_speed(-100.0),
        KinematicBody::new(),
    );
    railway.activate().unwrap();

    let expected = [south, north, west];
    for feeder in expected {
        railway.change_direction(connector).unwrap();
        assert_eq!(railway.network().previous_segment(exit), Some(feeder));
    }
    assert_eq!(
        railway.network().connector(connector).unwrap().active_out_index(),
        0
    );

    railway.change_direction(connector).unwrap();
    railway.update(4.0);
    let back = railway.carriage(id).unwrap().back().unwrap();
    assert_eq!(back.segment, south);
    assert_relative_eq!(back.distance, 1900.0);
}

#[test]
fn carriage_without_start_segment_derails_at_activation() {
    let mut railway: Railway = Railway::default();
    let id = railway.add_carriage(Carriage::new(None).with_speed(100.0), KinematicBody::new());
    railway.activate().unwrap();

    let carriage = railway.carriage(id).unwrap();
    assert!(!carriage.is_on_track());
    assert_eq!(carriage.pose().position, Point3::origin());
    assert!(railway.body(id).unwrap().gravity_enabled());
}

#[test]
fn overshooting_an_open_end_derails() {
    let mut network = TrackNetwork::new();
    let a = line(&mut network, (0.0, 0.0), (1000.0, 0.0));
    let mut railway: Railway = Railway::new(network, RailParams::default());
    let id = railway.add_carriage(
        Carriage::new(Some(TrackedPoint::new(a, 950.0))).with_speed(100.0),
        KinematicBody::new(),
    );
    railway.activate().unwrap();

    railway.update(1.0);

    assert_eq!(
        railway.carriage(id).unwrap().state(),
        CarriageState::Derailed(DerailReason::EndOfTrack)
    );
}

#[test]
fn aligned_junction_carries_the_back_point_across() {
    let mut network = TrackNetwork::new();
    let a = line(&mut network, (0.0, 0.0), (500.0, 0.0));
    let b = line(&mut network, (500.0, 0.0), (1000.0, 0.0));
    let c = network.add_connector(ConnectorData::new());
    network.attach(c, a, End::Out).unwrap();
    network.attach(c, b, End::In).unwrap();

    let mut railway: Railway = Railway::new(network, RailParams::default());
    let id = railway.add_carriage(
        Carriage::new(Some(TrackedPoint::new(a, 450.0)))
            .with_front(TrackedPoint::new(b, 100.0))
            .with_speed(100.0),
        KinematicBody::new(),
    );
    railway.activate().unwrap();

    railway.update(1.0);

    let back = railway.carriage(id).unwrap().back().unwrap();
    assert_eq!(back.segment, b);
    assert_relative_eq!(back.distance, 50.0);
}

#[test]
fn switching_under_a_carriage_overstretches_it() {
    init_tracing();
    let j = junction();
    let mut railway: Railway = Railway::new(j.network, RailParams::default());
    let id = railway.add_carriage(
        Carriage::new(Some(TrackedPoint::new(j.feeder, 1000.0)))
            .with_front(TrackedPoint::new(j.feeder, 1900.0))
            .with_speed(500.0),
        KinematicBody::new(),
    );
    railway.activate().unwrap();

    railway.update(0.5);
    assert_eq!(railway.carriage(id).unwrap().front().unwrap().segment, j.east);

    railway.change_direction(j.connector).unwrap();
    railway.update(1.0);
    railway.update(1.0);
    assert!(railway.carriage(id).unwrap().is_on_track());

    railway.update(1.0);
    let carriage = railway.carriage(id).unwrap();
    assert_eq!(carriage.back().unwrap().segment, j.north);
    assert_eq!(
        carriage.state(),
        CarriageState::Derailed(DerailReason::OverStretch)
    );
    let impulse = railway.body(id).unwrap().velocity();
    assert!(impulse.norm() > 0.0);
}

#[test]
fn crossing_cap_terminates_on_a_tiny_loop() {
    let mut network = TrackNetwork::new();
    let ring = line(&mut network, (0.0, 0.0), (1.0, 0.0));
    let c = network.add_connector(ConnectorData::new());
    network.attach(c, ring, End::Out).unwrap();
    network.attach(c, ring, End::In).unwrap();

    let result = advance(
        &network,
        TrackedPoint::new(ring, 0.0),
        1.0e9,
        &RailParams::default(),
    );
    assert_eq!(result.outcome, Outcome::Capped);
    assert!(result.iterations <= 10);
}

#[test]
fn repeated_contacts_apply_one_impulse() {
    let mut network = TrackNetwork::new();
    let a = line(&mut network, (0.0, 0.0), (10_000.0, 0.0));
    let mut railway: Railway = Railway::new(network, RailParams::default());
    let first = railway.add_carriage(
        Carriage::new(Some(TrackedPoint::new(a, 0.0)))
            .with_front(TrackedPoint::new(a, 500.0))
            .with_speed(100.0),
        KinematicBody::new(),
    );
    let second = railway.add_carriage(
        Carriage::new(Some(TrackedPoint::new(a, 600.0))).with_front(TrackedPoint::new(a, 1100.0)),
        KinematicBody::new(),
    );
    railway.activate().unwrap();
    railway.update(1.0);

    railway.handle_contact(first, second);
    railway.handle_contact(second, first);

    assert_eq!(railway.body(first).unwrap().impulse_count(), 1);
    assert_relative_eq!(railway.body(first).unwrap().velocity().x, 100.0);
    assert_eq!(railway.body(second).unwrap().impulse_count(), 1);
}

#[test]
fn late_carriage_is_activated_on_insertion() {
    let mut railway: Railway = Railway::default();
    railway.activate().unwrap();
    let id = railway.add_carriage(Carriage::new(None), KinematicBody::new());
    assert!(!railway.carriage(id).unwrap().is_on_track());
}

#[test]
fn indicators_blend_after_a_switch() {
    let j = junction();
    let mut railway: Railway = Railway::new(j.network, RailParams::default());
    railway.activate().unwrap();
    railway.update(1.0);

    let mut sink = RecordingSink::default();
    railway.publish_indicators(&mut sink);
    assert_eq!(sink.placed.len(), 1);
    let (id, before) = sink.placed[0];
    assert_eq!(id, j.connector);
    assert_relative_eq!(before.start.x, 1500.0);

    railway.change_direction(j.connector).unwrap();
    railway.update(0.05);
    let halfway = railway.indicator(j.connector).unwrap().unwrap();
    assert_relative_eq!(halfway.start.x, 750.0, epsilon = 1e-6);
    assert_relative_eq!(halfway.start.y, 750.0, epsilon = 1e-6);

    railway.update(0.05);
    railway.update(0.05);
    let settled = railway.indicator(j.connector).unwrap().unwrap();
    assert_relative_eq!(settled.start.x, 0.0);
    assert_relative_eq!(settled.start.y, 1500.0);
}

#[test]
fn unknown_connector_switch_is_an_error() {
    let j = junction();
    let mut railway: Railway = Railway::new(j.network, RailParams::default());
    railway.network_mut().remove_connector(j.connector);
    assert!(railway.change_direction(j.connector).is_err());
}
