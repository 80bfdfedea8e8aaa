use chrono::DateTime;

use goalcast::error::EngineError;
use goalcast::fake_feed::{FakeFeed, raw_event, raw_match};
use goalcast::history::{FixtureContext, PreMatchPriors};
use goalcast::service::PredictionService;

const HOME_ID: u64 = 10;
const AWAY_ID: u64 = 11;

fn live_match(fixture_id: u64, minute: u32) -> goalcast::feed::RawMatch {
    let events = vec![
        raw_event(1, fixture_id, 8, HOME_ID, "shot", true, Some((92.0, 28.0))),
        raw_event(2, fixture_id, 41, AWAY_ID, "freekick", false, None),
    ];
    raw_match(fixture_id, minute, 1, 0, HOME_ID, AWAY_ID, events)
}

fn priors_context() -> FixtureContext {
    FixtureContext {
        priors: Some(PreMatchPriors {
            home: 0.61,
            draw: 0.24,
            away: 0.15,
            over15: 0.7,
            over25: 0.5,
            over35: 0.3,
            btts: 0.5,
        }),
        home_season: None,
        away_season: None,
    }
}

#[test]
fn batch_envelope_has_count_and_timestamp() {
    let feed = FakeFeed::new(vec![live_match(100, 30), live_match(101, 60)]);
    let batch = PredictionService::new(feed).live_predictions().unwrap();

    assert_eq!(batch.count, 2);
    assert_eq!(batch.data.len(), 2);
    assert!(DateTime::parse_from_rfc3339(&batch.timestamp).is_ok());
}

#[test]
fn malformed_fixtures_are_excluded_not_fatal() {
    let mut broken = live_match(102, 20);
    broken.stats = None;
    let feed = FakeFeed::new(vec![live_match(100, 30), broken]);

    let batch = PredictionService::new(feed).live_predictions().unwrap();
    assert_eq!(batch.count, 1);
    assert_eq!(batch.data[0].fixture_id, 100);
}

#[test]
fn by_id_finds_live_fixtures() {
    let feed = FakeFeed::new(vec![live_match(100, 30)]).with_context(100, priors_context());
    let service = PredictionService::new(feed);

    let p = service.prediction_by_id("100").unwrap();
    assert_eq!(p.fixture_id, 100);
    assert!(p.status.is_live);
}

#[test]
fn non_numeric_ids_are_rejected_before_computation() {
    let feed = FakeFeed::new(vec![live_match(100, 30)]);
    let err = PredictionService::new(feed).prediction_by_id("10x").unwrap_err();
    assert!(matches!(err, EngineError::InvalidId(ref s) if s == "10x"));
}

#[test]
fn unknown_ids_are_not_found() {
    let feed = FakeFeed::new(vec![live_match(100, 30)]);
    let err = PredictionService::new(feed).prediction_by_id("999").unwrap_err();
    assert!(matches!(err, EngineError::NotFound(999)));
}

#[test]
fn failed_context_fetch_degrades_that_fixture_only() {
    let feed = FakeFeed::new(vec![live_match(100, 0), live_match(101, 0)])
        .with_context(100, priors_context())
        .with_failing_context(101);
    let batch = PredictionService::new(feed).live_predictions().unwrap();
    assert_eq!(batch.count, 2);

    let with_priors = batch.data.iter().find(|p| p.fixture_id == 100).unwrap();
    let degraded = batch.data.iter().find(|p| p.fixture_id == 101).unwrap();

    // At kickoff the prior-backed fixture reports its prior; the degraded
    // sibling falls back to uniform thirds.
    assert_eq!(with_priors.prediction.win_probability.home, 0.61);
    assert_eq!(degraded.prediction.win_probability.home, 1.0 / 3.0);
}

#[test]
fn batch_output_serializes_with_the_wire_contract() {
    let feed = FakeFeed::new(vec![live_match(100, 30)]);
    let batch = PredictionService::new(feed).live_predictions().unwrap();
    let json = serde_json::to_value(&batch).unwrap();

    let fixture = &json["data"][0];
    assert_eq!(fixture["fixtureId"], 100);
    assert!(fixture["prediction"]["winProbability"]["home"].is_number());
    assert!(fixture["prediction"]["recommendedBet"].is_string());
    assert!(fixture["temporalGoalProbability"]["windows"].is_array());
    assert_eq!(
        fixture["temporalGoalProbability"]["windows"]
            .as_array()
            .unwrap()
            .len(),
        4
    );
}
