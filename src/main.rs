use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use goalcast::fake_feed::FakeFeed;
use goalcast::provider::{HttpFeed, LiveFeed};
use goalcast::service::PredictionService;
use goalcast::temporal;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut fixture_id: Option<String> = None;
    let mut use_fake = env::var("GOALCAST_SOURCE").is_ok_and(|v| v.eq_ignore_ascii_case("fake"));
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--fake" => use_fake = true,
            other => fixture_id = Some(other.to_string()),
        }
    }

    if use_fake {
        run(PredictionService::new(FakeFeed::sampled()), fixture_id)
    } else {
        run(PredictionService::new(HttpFeed::from_env()), fixture_id)
    }
}

fn run<F: LiveFeed>(service: PredictionService<F>, fixture_id: Option<String>) -> Result<()> {
    match fixture_id {
        Some(id) => {
            let prediction = service.prediction_by_id(&id)?;
            tracing::info!(
                fixture_id = prediction.fixture_id,
                summary = %temporal::temporal_summary(&prediction.temporal_goal_probability.windows),
                "single fixture"
            );
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        None => {
            let batch = service.live_predictions()?;
            tracing::info!(count = batch.count, "live batch");
            println!("{}", serde_json::to_string_pretty(&batch)?);
        }
    }
    Ok(())
}
