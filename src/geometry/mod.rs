pub mod curve;

pub use curve::{Arc, Curve, Line, Polyline, Space, TrackCurve};
