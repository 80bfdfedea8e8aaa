//! Live match prediction engine: turns in-play telemetry (events, running
//! stats, pre-match priors, historical scoring-time distributions) into
//! calibrated outcome, goal-market and per-window goal probabilities.
//!
//! The math is pure and synchronous; all fetching and waiting lives behind
//! the [`provider::LiveFeed`] seam.

pub mod aggregate;
pub mod blend;
pub mod cache;
pub mod error;
pub mod fake_feed;
pub mod feed;
pub mod history;
pub mod markets;
pub mod model;
pub mod outcome;
pub mod poisson;
pub mod prediction;
pub mod provider;
pub mod recommend;
pub mod service;
pub mod temporal;
pub mod xg;

pub use aggregate::analyze_snapshot;
pub use blend::BlendPolicy;
pub use error::EngineError;
pub use history::{FixtureContext, PreMatchPriors, TeamSeasonStats};
pub use model::{MatchEvent, MatchSnapshot};
pub use prediction::MatchPrediction;
pub use service::{PredictionBatch, PredictionService};
