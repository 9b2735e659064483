//! Train carriages traversing a branching, switchable spline track network.
//!
//! Track segments meet at connectors that route one in-track and one
//! out-track at a time. Carriages follow the graph on two tracked points and
//! derail at open track ends, on over-stretch, or on contact.

pub mod carriage;
pub mod error;
pub mod geometry;
pub mod math;
pub mod network;
pub mod params;
pub mod physics;
pub mod railway;
pub mod traversal;

pub use carriage::{Carriage, CarriageState, DerailReason, Pose};
pub use error::{RailError, Result};
pub use network::{ConnectorData, ConnectorId, End, SegmentData, SegmentId, TrackNetwork};
pub use params::RailParams;
pub use physics::{CarriageBody, KinematicBody};
pub use railway::{CarriageId, Railway};
pub use traversal::{advance, Advance, Outcome, TrackedPoint};
