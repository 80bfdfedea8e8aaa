use chrono::{SecondsFormat, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::aggregate;
use crate::blend::BlendPolicy;
use crate::error::EngineError;
use crate::feed;
use crate::model::MatchSnapshot;
use crate::prediction::MatchPrediction;
use crate::provider::LiveFeed;

/// Response envelope for the all-live read interface.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionBatch {
    pub data: Vec<MatchPrediction>,
    pub count: usize,
    pub timestamp: String,
}

/// Read surface over the engine: the whole live batch, or one fixture by
/// id. Every fixture's pipeline is independent; one bad fixture never
/// degrades its siblings.
pub struct PredictionService<F: LiveFeed> {
    feed: F,
    policy: BlendPolicy,
}

impl<F: LiveFeed> PredictionService<F> {
    pub fn new(feed: F) -> Self {
        Self::with_policy(feed, BlendPolicy::default())
    }

    pub fn with_policy(feed: F, policy: BlendPolicy) -> Self {
        Self { feed, policy }
    }

    /// Predictions for every structurally valid fixture in the current
    /// live batch. Context fetches fan out per fixture.
    pub fn live_predictions(&self) -> Result<PredictionBatch, EngineError> {
        let raw = self.feed.live_matches()?;
        let snapshots: Vec<MatchSnapshot> = raw
            .iter()
            .filter_map(|m| match feed::snapshot_from_raw(m) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!(%err, "excluding fixture from batch");
                    None
                }
            })
            .collect();

        let data: Vec<MatchPrediction> = snapshots
            .par_iter()
            .map(|snapshot| self.predict_one(snapshot))
            .collect();

        Ok(PredictionBatch {
            count: data.len(),
            data,
            timestamp: now_iso(),
        })
    }

    /// One fixture by its raw (string) id. Non-numeric ids are rejected
    /// before any computation; ids absent from the live batch are
    /// not-found.
    pub fn prediction_by_id(&self, raw_id: &str) -> Result<MatchPrediction, EngineError> {
        let fixture_id: u64 = raw_id
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidId(raw_id.to_string()))?;

        let raw = self.feed.live_matches()?;
        let m = raw
            .iter()
            .find(|m| m.id == fixture_id)
            .ok_or(EngineError::NotFound(fixture_id))?;

        // A malformed fixture cannot be predicted, which from the reader's
        // side is the same as not being in the batch.
        let snapshot = feed::snapshot_from_raw(m).map_err(|err| {
            warn!(%err, "requested fixture is malformed");
            EngineError::NotFound(fixture_id)
        })?;
        Ok(self.predict_one(&snapshot))
    }

    /// A failed context fetch degrades this fixture to its live-only path;
    /// it never cancels siblings.
    fn predict_one(&self, snapshot: &MatchSnapshot) -> MatchPrediction {
        let context = match self.feed.fixture_context(snapshot.fixture_id) {
            Ok(context) => Some(context),
            Err(err) => {
                warn!(
                    fixture_id = snapshot.fixture_id,
                    %err,
                    "context fetch failed, using live-only estimate"
                );
                None
            }
        };
        aggregate::analyze_snapshot(snapshot, context.as_ref(), self.policy)
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
