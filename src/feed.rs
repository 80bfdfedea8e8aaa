use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::EngineError;
use crate::history::{FixtureContext, PreMatchPriors, ScoringBucket, TeamSeasonStats};
use crate::model::{
    EventKind, LeagueMeta, MAX_MATCH_MINUTE, MatchEvent, MatchSnapshot, SideStats, TeamMeta,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Wrapped<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataList<T> {
    #[serde(default)]
    pub data: Vec<T>,
}

/// One fixture as the livescore feed ships it. Every section the engine
/// needs is optional here; `snapshot_from_raw` decides what is malformed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    pub id: u64,
    #[serde(default)]
    pub localteam_id: Option<u64>,
    #[serde(default)]
    pub visitorteam_id: Option<u64>,
    #[serde(default)]
    pub time: Option<RawTime>,
    #[serde(default)]
    pub scores: Option<RawScores>,
    #[serde(default)]
    pub league: Option<Wrapped<RawLeague>>,
    #[serde(default)]
    pub local_team: Option<Wrapped<RawTeam>>,
    #[serde(default)]
    pub visitor_team: Option<Wrapped<RawTeam>>,
    #[serde(default)]
    pub stats: Option<DataList<RawTeamStats>>,
    #[serde(default)]
    pub events: Option<DataList<RawEvent>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTime {
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScores {
    #[serde(default)]
    pub local_team_score: Option<u32>,
    #[serde(default)]
    pub visitor_team_score: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeague {
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub country: Option<Wrapped<RawCountry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeamStats {
    #[serde(rename = "teamId", default)]
    pub team_id: Option<u64>,
    #[serde(default)]
    pub possessiontime: Option<f64>,
    #[serde(default)]
    pub shots: Option<RawShots>,
    #[serde(default)]
    pub attacks: Option<RawAttacks>,
    #[serde(default)]
    pub corners: Option<u32>,
    #[serde(default)]
    pub yellowcards: Option<u32>,
    #[serde(default)]
    pub redcards: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawShots {
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub ongoal: Option<u32>,
    #[serde(default)]
    pub offgoal: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAttacks {
    #[serde(default)]
    pub attacks: Option<u32>,
    #[serde(default)]
    pub dangerous_attacks: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub fixture_id: Option<u64>,
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub extra_minute: Option<u32>,
    #[serde(default)]
    pub team_id: Option<Value>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub is_dangerous: Option<bool>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// The livescore payload is a map keyed by fixture id; older feed versions
/// ship a bare array. Accept both.
pub fn parse_livescores_json(raw: &str) -> Result<Vec<RawMatch>> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid livescores json")?;
    let entries: Vec<Value> = match root {
        Value::Object(map) => map.into_values().collect(),
        Value::Array(items) => items,
        _ => anyhow::bail!("unexpected livescores payload shape"),
    };
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        out.push(serde_json::from_value(entry).context("invalid livescore fixture")?);
    }
    Ok(out)
}

/// Validate one raw fixture into an engine snapshot. A missing required
/// section excludes the fixture (never the batch); everything optional
/// inside a present section defaults to a neutral value.
pub fn snapshot_from_raw(raw: &RawMatch) -> Result<MatchSnapshot, EngineError> {
    let missing = |section: &'static str| EngineError::MalformedSnapshot {
        fixture_id: raw.id,
        missing: section,
    };

    let time = raw.time.as_ref().ok_or_else(|| missing("time"))?;
    let scores = raw.scores.as_ref().ok_or_else(|| missing("scores"))?;
    let stats = raw.stats.as_ref().ok_or_else(|| missing("stats"))?;
    let events = raw.events.as_ref().ok_or_else(|| missing("events"))?;
    let league = raw.league.as_ref().ok_or_else(|| missing("league"))?;
    let local_team = raw.local_team.as_ref().ok_or_else(|| missing("localTeam"))?;
    let visitor_team = raw
        .visitor_team
        .as_ref()
        .ok_or_else(|| missing("visitorTeam"))?;

    let home_id = raw.localteam_id.unwrap_or(local_team.data.id);
    let away_id = raw.visitorteam_id.unwrap_or(visitor_team.data.id);

    let stats_for = |team_id: u64| {
        stats
            .data
            .iter()
            .find(|s| s.team_id == Some(team_id))
            .map(side_stats_from_raw)
            .unwrap_or_else(SideStats::neutral)
    };

    Ok(MatchSnapshot {
        fixture_id: raw.id,
        league: LeagueMeta {
            name: league.data.name.clone(),
            country: league
                .data
                .country
                .as_ref()
                .and_then(|c| c.data.name.clone())
                .unwrap_or_default(),
            logo_url: league.data.logo_path.clone().unwrap_or_default(),
        },
        home: TeamMeta {
            id: home_id,
            name: local_team.data.name.clone(),
            logo_url: local_team.data.logo_path.clone().unwrap_or_default(),
        },
        away: TeamMeta {
            id: away_id,
            name: visitor_team.data.name.clone(),
            logo_url: visitor_team.data.logo_path.clone().unwrap_or_default(),
        },
        minute: time.minute.unwrap_or(0).min(MAX_MATCH_MINUTE),
        status: time.status.clone().unwrap_or_default(),
        score_home: scores.local_team_score.unwrap_or(0),
        score_away: scores.visitor_team_score.unwrap_or(0),
        stats_home: stats_for(home_id),
        stats_away: stats_for(away_id),
        events: events
            .data
            .iter()
            .filter_map(|e| event_from_raw(e, raw.id))
            .collect(),
    })
}

fn side_stats_from_raw(raw: &RawTeamStats) -> SideStats {
    SideStats {
        possession: raw.possessiontime.unwrap_or(50.0),
        shots_total: raw.shots.as_ref().and_then(|s| s.total).unwrap_or(0),
        shots_on_target: raw.shots.as_ref().and_then(|s| s.ongoal).unwrap_or(0),
        shots_off_target: raw.shots.as_ref().and_then(|s| s.offgoal).unwrap_or(0),
        attacks: raw.attacks.as_ref().and_then(|a| a.attacks).unwrap_or(0),
        dangerous_attacks: raw
            .attacks
            .as_ref()
            .and_then(|a| a.dangerous_attacks)
            .unwrap_or(0),
        corners: raw.corners.unwrap_or(0),
        yellow_cards: raw.yellowcards.unwrap_or(0),
        red_cards: raw.redcards.unwrap_or(0),
    }
}

fn event_from_raw(raw: &RawEvent, fixture_id: u64) -> Option<MatchEvent> {
    let kind = event_kind(raw.kind.as_deref()?)?;
    Some(MatchEvent {
        id: raw.id.unwrap_or(0),
        fixture_id: raw.fixture_id.unwrap_or(fixture_id),
        minute: raw.minute.unwrap_or(0).min(MAX_MATCH_MINUTE),
        extra_minute: raw.extra_minute,
        team_id: team_id_string(raw.team_id.as_ref()?)?,
        kind,
        reason: raw.reason.clone(),
        is_dangerous: raw.is_dangerous.unwrap_or(false),
        x: raw.x.filter(|v| (0.0..=100.0).contains(v)),
        y: raw.y.filter(|v| (0.0..=100.0).contains(v)),
    })
}

/// Feed versions disagree on whether teamId is a string or a number.
fn team_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn event_kind(raw: &str) -> Option<EventKind> {
    let kind = match raw.to_ascii_lowercase().as_str() {
        "goal" | "penalty" | "own-goal" => EventKind::Goal,
        "yellowcard" => EventKind::YellowCard,
        "redcard" | "yellowred" => EventKind::RedCard,
        "substitution" => EventKind::Substitution,
        "freekick" => EventKind::FreeKick,
        "offside" => EventKind::Offside,
        "var" => EventKind::Var,
        "shot" => EventKind::Shot,
        "corner" => EventKind::Corner,
        _ => return None,
    };
    Some(kind)
}

// ---- fixture info (priors + season stats) ----

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFixtureInfo {
    #[serde(default)]
    probability: Option<RawProbability>,
    #[serde(default)]
    local_team_season_stats: Option<RawSeasonStats>,
    #[serde(default)]
    visitor_team_season_stats: Option<RawSeasonStats>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawProbability {
    #[serde(default)]
    home: Option<f64>,
    #[serde(default)]
    draw: Option<f64>,
    #[serde(default)]
    away: Option<f64>,
    #[serde(rename = "over_1_5", default)]
    over15: Option<f64>,
    #[serde(rename = "over_2_5", default)]
    over25: Option<f64>,
    #[serde(rename = "over_3_5", default)]
    over35: Option<f64>,
    #[serde(default)]
    btts: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeasonStats {
    #[serde(default)]
    nb_matches: Option<u32>,
    #[serde(default)]
    avg_total_goals: Option<f64>,
    #[serde(default)]
    avg_total_conceded_goals: Option<f64>,
    #[serde(default)]
    avg_total_home_goals: Option<f64>,
    #[serde(default)]
    avg_total_home_conceded_goals: Option<f64>,
    #[serde(default)]
    avg_total_away_goals: Option<f64>,
    #[serde(default)]
    avg_total_away_conceded_goals: Option<f64>,
    #[serde(default)]
    season_stats: Option<RawSeasonDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeasonDetail {
    #[serde(default)]
    scoring_minutes: Vec<RawScoringMinutes>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawScoringMinutes {
    #[serde(default)]
    period: Vec<RawScoringPeriod>,
}

/// Bucket counts arrive stringly typed ("minute": "0-15", "count": "12").
#[derive(Debug, Clone, Deserialize)]
struct RawScoringPeriod {
    #[serde(default)]
    minute: Option<String>,
    #[serde(default)]
    count: Option<String>,
}

/// Per-fixture priors and season stats from the fixture-info endpoint.
/// Anything absent stays `None` and degrades downstream.
pub fn parse_fixture_info_json(raw: &str) -> Result<FixtureContext> {
    let info: RawFixtureInfo =
        serde_json::from_str(raw.trim()).context("invalid fixture info json")?;

    Ok(FixtureContext {
        priors: info.probability.map(|p| PreMatchPriors {
            home: p.home.unwrap_or(1.0 / 3.0),
            draw: p.draw.unwrap_or(1.0 / 3.0),
            away: p.away.unwrap_or(1.0 / 3.0),
            over15: p.over15.unwrap_or(0.5),
            over25: p.over25.unwrap_or(0.5),
            over35: p.over35.unwrap_or(0.5),
            btts: p.btts.unwrap_or(0.5),
        }),
        home_season: info.local_team_season_stats.map(season_from_raw),
        away_season: info.visitor_team_season_stats.map(season_from_raw),
    })
}

fn season_from_raw(raw: RawSeasonStats) -> TeamSeasonStats {
    let scoring_minutes = raw
        .season_stats
        .as_ref()
        .and_then(|s| s.scoring_minutes.first())
        .map(|sm| {
            sm.period
                .iter()
                .filter_map(|p| {
                    let minutes = p.minute.clone()?;
                    let goals = p.count.as_deref()?.trim().parse::<u32>().ok()?;
                    Some(ScoringBucket { minutes, goals })
                })
                .collect()
        })
        .unwrap_or_default();

    TeamSeasonStats {
        matches_played: raw.nb_matches.unwrap_or(0),
        avg_goals_for: raw.avg_total_goals.unwrap_or(0.0),
        avg_goals_against: raw.avg_total_conceded_goals.unwrap_or(0.0),
        avg_home_goals_for: raw.avg_total_home_goals.unwrap_or(0.0),
        avg_home_goals_against: raw.avg_total_home_conceded_goals.unwrap_or(0.0),
        avg_away_goals_for: raw.avg_total_away_goals.unwrap_or(0.0),
        avg_away_goals_against: raw.avg_total_away_conceded_goals.unwrap_or(0.0),
        scoring_minutes,
    }
}
