//! Movement of a tracked point along the segment graph.
//!
//! A tracked point is a value: [`advance`] takes one and returns the moved
//! copy together with what happened on the way.

use crate::geometry::Curve;
use crate::network::{End, SegmentId, TrackNetwork};
use crate::params::RailParams;

/// A position on the track graph: a segment and an arclength along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPoint {
    /// The segment the point is on.
    pub segment: SegmentId,
    /// Arclength from the segment's In end.
    pub distance: f64,
}

impl TrackedPoint {
    /// Creates a tracked point.
    #[must_use]
    pub fn new(segment: SegmentId, distance: f64) -> Self {
        Self { segment, distance }
    }
}

/// How an [`advance`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The point lies within its segment.
    Settled,
    /// The track ends at `End` with no segment beyond it.
    EndOfTrack(End),
    /// The point's segment is no longer in the network.
    MissingSegment,
    /// The junction at `End` does not lead back into this segment's connector;
    /// the point was parked on the boundary.
    Blocked(End),
    /// The crossing cap was reached; the distance is left unresolved.
    Capped,
}

impl Outcome {
    /// Whether the carriage must leave the track.
    #[must_use]
    pub fn derails(self) -> bool {
        matches!(self, Self::EndOfTrack(_) | Self::MissingSegment)
    }
}

/// Result of moving a tracked point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// The moved point. Meaningless when the outcome derails.
    pub point: TrackedPoint,
    /// Whether the movement was net-negative along the global travel sense.
    pub backwards: bool,
    /// How the movement ended.
    pub outcome: Outcome,
    /// Number of boundary-crossing steps taken, at most `max_crossings`.
    pub iterations: usize,
}

/// Moves `point` by `movement` arclength, crossing segment boundaries.
///
/// Past the Out end the point continues onto [`TrackNetwork::next_segment`]
/// if that segment's In end sits at the same connector; below zero it backs
/// onto [`TrackNetwork::previous_segment`] under the mirrored check. A missing
/// neighbour ends the track, a mismatched one blocks at the boundary.
#[must_use]
pub fn advance(
    network: &TrackNetwork,
    point: TrackedPoint,
    movement: f64,
    params: &RailParams,
) -> Advance {
    let backwards = movement < 0.0;
    let mut point = TrackedPoint {
        distance: point.distance + movement,
        ..point
    };
    let mut iterations = 0;

    let finish = |point, outcome, iterations| Advance {
        point,
        backwards,
        outcome,
        iterations,
    };

    loop {
        let Ok(segment) = network.segment(point.segment) else {
            return finish(point, Outcome::MissingSegment, iterations);
        };
        let length = segment.curve().length();
        if (0.0..=length).contains(&point.distance) {
            return finish(point, Outcome::Settled, iterations);
        }
        if iterations >= params.max_crossings {
            tracing::warn!(
                segment = ?point.segment,
                distance = point.distance,
                "crossing cap reached, retrying next tick"
            );
            return finish(point, Outcome::Capped, iterations);
        }
        iterations += 1;

        if point.distance > length {
            let Some(next) = network.next_segment(point.segment) else {
                return finish(point, Outcome::EndOfTrack(End::Out), iterations);
            };
            let aligned = segment.out_connector().is_some()
                && network
                    .segment(next)
                    .is_ok_and(|s| s.in_connector() == segment.out_connector());
            if !aligned {
                tracing::debug!(segment = ?point.segment, "misaligned junction at out end");
                point.distance = length;
                return finish(point, Outcome::Blocked(End::Out), iterations);
            }
            tracing::trace!(from = ?point.segment, to = ?next, "crossed out end");
            point = TrackedPoint::new(next, point.distance - length);
        } else {
            let Some(previous) = network.previous_segment(point.segment) else {
                return finish(point, Outcome::EndOfTrack(End::In), iterations);
            };
            let Some(previous_length) = network
                .segment(previous)
                .ok()
                .filter(|s| {
                    segment.in_connector().is_some()
                        && s.out_connector() == segment.in_connector()
                })
                .map(|s| s.curve().length())
            else {
                tracing::debug!(segment = ?point.segment, "misaligned junction at in end");
                point.distance = 0.0;
                return finish(point, Outcome::Blocked(End::In), iterations);
            };
            tracing::trace!(from = ?point.segment, to = ?previous, "crossed in end");
            point = TrackedPoint::new(previous, point.distance + previous_length);
        }
    }
}
