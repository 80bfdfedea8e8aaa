use thiserror::Error;

/// Boundary errors of the prediction service. The probability math itself
/// never raises; everything here is rejected or degraded at the edges.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A fixture arrived without one of its required sections. The fixture
    /// is excluded from the batch; siblings are unaffected.
    #[error("fixture {fixture_id} is missing required sections: {missing}")]
    MalformedSnapshot { fixture_id: u64, missing: &'static str },

    /// A fixture id that is not a valid integer, rejected before any
    /// computation.
    #[error("invalid fixture id {0:?}")]
    InvalidId(String),

    /// The id parsed but no live fixture carries it.
    #[error("no live fixture with id {0}")]
    NotFound(u64),

    /// The live snapshot feed itself failed. Per-fixture context fetch
    /// failures never surface here; they degrade that fixture instead.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}
