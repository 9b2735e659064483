use thiserror::Error;

/// Top-level error type for the railgraph crate.
#[derive(Debug, Error)]
pub enum RailError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Errors raised while constructing track curves.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the segment/connector arena.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),
}

/// Convenience type alias for results using [`RailError`].
pub type Result<T> = std::result::Result<T, RailError>;
