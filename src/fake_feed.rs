use std::collections::{HashMap, HashSet};

use anyhow::Result;
use rand::Rng;
use serde_json::Value;

use crate::feed::{
    DataList, RawAttacks, RawEvent, RawLeague, RawMatch, RawScores, RawShots, RawTeam,
    RawTeamStats, RawTime, Wrapped,
};
use crate::history::{FixtureContext, PreMatchPriors, SCORING_BUCKETS, ScoringBucket, TeamSeasonStats};
use crate::provider::LiveFeed;

/// In-memory feed for demos, tests and benches. Serves a fixed batch and
/// per-fixture contexts; selected fixtures can be made to fail their
/// context fetch to exercise the degraded path.
pub struct FakeFeed {
    matches: Vec<RawMatch>,
    contexts: HashMap<u64, FixtureContext>,
    failing_contexts: HashSet<u64>,
}

impl FakeFeed {
    pub fn new(matches: Vec<RawMatch>) -> Self {
        Self {
            matches,
            contexts: HashMap::new(),
            failing_contexts: HashSet::new(),
        }
    }

    pub fn with_context(mut self, fixture_id: u64, context: FixtureContext) -> Self {
        self.contexts.insert(fixture_id, context);
        self
    }

    /// Make the context fetch for one fixture fail, as a dead upstream
    /// would.
    pub fn with_failing_context(mut self, fixture_id: u64) -> Self {
        self.failing_contexts.insert(fixture_id);
        self
    }

    /// A small randomized live batch, in the shape the real feed ships.
    pub fn sampled() -> Self {
        let mut rng = rand::thread_rng();
        let mut feed = Self::new(Vec::new());
        let mut matches = Vec::new();

        for n in 0..3u64 {
            let fixture_id = 1000 + n;
            let minute = rng.gen_range(5..88);
            let score_home = rng.gen_range(0..3);
            let score_away = rng.gen_range(0..2);
            let home_id = 10 + n * 2;
            let away_id = 11 + n * 2;

            let mut events = Vec::new();
            let mut next_event = 1u64;
            for _ in 0..rng.gen_range(3..12) {
                let event_minute = rng.gen_range(1..=minute);
                let kind = match rng.gen_range(0..6) {
                    0 => "freekick",
                    1 => "corner",
                    2 => "yellowcard",
                    _ => "shot",
                };
                let team_id = if rng.gen_bool(0.55) { home_id } else { away_id };
                let coords = (kind == "shot").then(|| {
                    if team_id == home_id {
                        (rng.gen_range(70.0..100.0), rng.gen_range(15.0..45.0))
                    } else {
                        (rng.gen_range(0.0..30.0), rng.gen_range(15.0..45.0))
                    }
                });
                events.push(raw_event(
                    next_event,
                    fixture_id,
                    event_minute,
                    team_id,
                    kind,
                    rng.gen_bool(0.4),
                    coords,
                ));
                next_event += 1;
            }
            for _ in 0..score_home {
                events.push(raw_event(
                    next_event,
                    fixture_id,
                    rng.gen_range(1..=minute),
                    home_id,
                    "goal",
                    true,
                    None,
                ));
                next_event += 1;
            }

            matches.push(raw_match(
                fixture_id,
                minute,
                score_home,
                score_away,
                home_id,
                away_id,
                events,
            ));
            feed = feed.with_context(fixture_id, sample_context(&mut rng));
        }

        feed.matches = matches;
        feed
    }
}

impl LiveFeed for FakeFeed {
    fn live_matches(&self) -> Result<Vec<RawMatch>> {
        Ok(self.matches.clone())
    }

    fn fixture_context(&self, fixture_id: u64) -> Result<FixtureContext> {
        if self.failing_contexts.contains(&fixture_id) {
            anyhow::bail!("fixture info endpoint unavailable");
        }
        Ok(self.contexts.get(&fixture_id).cloned().unwrap_or_default())
    }
}

/// A complete raw fixture with all required sections present.
pub fn raw_match(
    fixture_id: u64,
    minute: u32,
    score_home: u32,
    score_away: u32,
    home_id: u64,
    away_id: u64,
    events: Vec<RawEvent>,
) -> RawMatch {
    RawMatch {
        id: fixture_id,
        localteam_id: Some(home_id),
        visitorteam_id: Some(away_id),
        time: Some(RawTime {
            minute: Some(minute),
            status: Some("LIVE".to_string()),
        }),
        scores: Some(RawScores {
            local_team_score: Some(score_home),
            visitor_team_score: Some(score_away),
        }),
        league: Some(Wrapped {
            data: RawLeague {
                name: "Sample League".to_string(),
                logo_path: None,
                country: None,
            },
        }),
        local_team: Some(Wrapped {
            data: RawTeam {
                id: home_id,
                name: format!("Home {home_id}"),
                logo_path: None,
            },
        }),
        visitor_team: Some(Wrapped {
            data: RawTeam {
                id: away_id,
                name: format!("Away {away_id}"),
                logo_path: None,
            },
        }),
        stats: Some(DataList {
            data: vec![
                raw_side_stats(home_id, 55.0, 9, 4),
                raw_side_stats(away_id, 45.0, 5, 2),
            ],
        }),
        events: Some(DataList { data: events }),
    }
}

pub fn raw_event(
    id: u64,
    fixture_id: u64,
    minute: u32,
    team_id: u64,
    kind: &str,
    is_dangerous: bool,
    coords: Option<(f64, f64)>,
) -> RawEvent {
    RawEvent {
        id: Some(id),
        fixture_id: Some(fixture_id),
        minute: Some(minute),
        extra_minute: None,
        team_id: Some(Value::String(team_id.to_string())),
        kind: Some(kind.to_string()),
        reason: None,
        is_dangerous: Some(is_dangerous),
        x: coords.map(|(x, _)| x),
        y: coords.map(|(_, y)| y),
    }
}

fn raw_side_stats(team_id: u64, possession: f64, shots: u32, on_target: u32) -> RawTeamStats {
    RawTeamStats {
        team_id: Some(team_id),
        possessiontime: Some(possession),
        shots: Some(RawShots {
            total: Some(shots),
            ongoal: Some(on_target),
            offgoal: Some(shots.saturating_sub(on_target)),
        }),
        attacks: Some(RawAttacks {
            attacks: Some(shots * 8),
            dangerous_attacks: Some(shots * 3),
        }),
        corners: Some(shots / 2),
        yellowcards: Some(1),
        redcards: Some(0),
    }
}

fn sample_season(rng: &mut impl Rng) -> TeamSeasonStats {
    TeamSeasonStats {
        matches_played: 20,
        avg_goals_for: 1.5,
        avg_goals_against: 1.2,
        avg_home_goals_for: 1.7,
        avg_home_goals_against: 1.1,
        avg_away_goals_for: 1.3,
        avg_away_goals_against: 1.4,
        scoring_minutes: SCORING_BUCKETS
            .iter()
            .map(|bucket| ScoringBucket {
                minutes: (*bucket).to_string(),
                goals: rng.gen_range(2..9),
            })
            .collect(),
    }
}

fn sample_context(rng: &mut impl Rng) -> FixtureContext {
    let home = rng.gen_range(0.25..0.55);
    let away = rng.gen_range(0.15..0.30);
    FixtureContext {
        priors: Some(PreMatchPriors {
            home,
            draw: 1.0 - home - away,
            away,
            over15: rng.gen_range(0.55..0.85),
            over25: rng.gen_range(0.35..0.65),
            over35: rng.gen_range(0.15..0.40),
            btts: rng.gen_range(0.35..0.65),
        }),
        home_season: Some(sample_season(rng)),
        away_season: Some(sample_season(rng)),
    }
}
