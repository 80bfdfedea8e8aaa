use chrono::{SecondsFormat, Utc};

use crate::blend::BlendPolicy;
use crate::history::FixtureContext;
use crate::model::{EventKind, MODEL_HORIZON_MINUTES, MatchSnapshot};
use crate::prediction::{
    AttackBreakdown, CardBreakdown, HomeAway, KeyMoments, LeagueBadge, MatchPrediction,
    MomentumAnalysis, PredictionBlock, ShotBreakdown, StatsBlock, StatusBlock, TeamBadge,
    TemporalGoalProbability, WinProbability,
};
use crate::{markets, outcome, recommend, temporal, xg};

/// Defensive solidity has no event-level signal in this feed; reported at
/// the neutral midpoint.
const NEUTRAL_DEFENSE_STABILITY: f64 = 0.5;
const FATIGUE_SCALE: f64 = 0.3;

/// Run the full model against one snapshot plus whatever per-fixture
/// context is available. Total, never fails on a structurally valid
/// snapshot: absent priors or season stats only degrade the estimate.
pub fn analyze_snapshot(
    snapshot: &MatchSnapshot,
    context: Option<&FixtureContext>,
    policy: BlendPolicy,
) -> MatchPrediction {
    let home_id = snapshot.home_team_id();
    let away_id = snapshot.away_team_id();
    let minute = snapshot.minute;

    let xg_home = xg::team_xg(&snapshot.events, &home_id, &home_id);
    let xg_away = xg::team_xg(&snapshot.events, &away_id, &home_id);

    let priors = context.and_then(|c| c.priors);
    let prior_outcome = priors.map(|p| WinProbability {
        home: p.home,
        draw: p.draw,
        away: p.away,
    });

    let win = outcome::win_probabilities(
        snapshot.score_home,
        snapshot.score_away,
        minute,
        xg_home,
        xg_away,
        prior_outcome,
        policy,
    );

    let lambda_home = outcome::remaining_lambda(xg_home, minute);
    let lambda_away = outcome::remaining_lambda(xg_away, minute);
    let goals = markets::goal_markets(
        snapshot.score_home,
        snapshot.score_away,
        minute,
        lambda_home,
        lambda_away,
        priors.as_ref(),
        policy,
    );

    let pick = recommend::recommend(&win, &goals);
    let reasons = recommend::prediction_reasons(
        &snapshot.stats_home,
        &snapshot.stats_away,
        snapshot.score_home,
        snapshot.score_away,
    );

    let home_season = context.and_then(|c| c.home_season.as_ref());
    let away_season = context.and_then(|c| c.away_season.as_ref());
    let windows = temporal::analyze_windows(&snapshot.events, minute, home_season, away_season);

    let closing_window = temporal::PREDICTION_WINDOWS[temporal::PREDICTION_WINDOWS.len() - 1];
    let team_comparison = HomeAway {
        home: temporal::team_window_stats(&snapshot.events, &closing_window, &home_id),
        away: temporal::team_window_stats(&snapshot.events, &closing_window, &away_id),
    };
    let key_moments = KeyMoments {
        pre_window_goals: snapshot
            .events
            .iter()
            .filter(|e| e.kind == EventKind::Goal)
            .cloned()
            .collect(),
        pressure_build_up: snapshot
            .events
            .iter()
            .filter(|e| e.is_dangerous)
            .cloned()
            .collect(),
        defensive_errors: snapshot.events.iter().filter(|e| e.is_card()).cloned().collect(),
    };
    let momentum_analysis = MomentumAnalysis {
        attack_momentum: temporal::attack_momentum(&snapshot.events, &closing_window, None),
        defense_stability: NEUTRAL_DEFENSE_STABILITY,
        fatigue_index: FATIGUE_SCALE * f64::from(minute.min(MODEL_HORIZON_MINUTES))
            / f64::from(MODEL_HORIZON_MINUTES),
    };

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    MatchPrediction {
        fixture_id: snapshot.fixture_id,
        league: LeagueBadge {
            name: snapshot.league.name.clone(),
            country: snapshot.league.country.clone(),
            logo_url: snapshot.league.logo_url.clone(),
        },
        teams: HomeAway {
            home: TeamBadge {
                name: snapshot.home.name.clone(),
                logo_url: snapshot.home.logo_url.clone(),
                score: snapshot.score_home,
            },
            away: TeamBadge {
                name: snapshot.away.name.clone(),
                logo_url: snapshot.away.logo_url.clone(),
                score: snapshot.score_away,
            },
        },
        status: StatusBlock {
            minute,
            status: snapshot.status.clone(),
            is_live: snapshot.is_live(),
        },
        prediction: PredictionBlock {
            win_probability: win,
            recommended_bet: pick.bet,
            confidence: pick.confidence,
            reasons,
            goals,
        },
        stats: stats_passthrough(snapshot),
        temporal_goal_probability: TemporalGoalProbability {
            windows,
            key_moments,
            team_comparison,
            momentum_analysis,
            last_updated: now.clone(),
        },
        last_updated: now,
    }
}

/// Raw running stats, regrouped but value-identical.
fn stats_passthrough(snapshot: &MatchSnapshot) -> StatsBlock {
    let h = &snapshot.stats_home;
    let a = &snapshot.stats_away;
    StatsBlock {
        possession: HomeAway {
            home: h.possession,
            away: a.possession,
        },
        shots: HomeAway {
            home: ShotBreakdown {
                total: h.shots_total,
                on_target: h.shots_on_target,
                off_target: h.shots_off_target,
            },
            away: ShotBreakdown {
                total: a.shots_total,
                on_target: a.shots_on_target,
                off_target: a.shots_off_target,
            },
        },
        attacks: HomeAway {
            home: AttackBreakdown {
                total: h.attacks,
                dangerous: h.dangerous_attacks,
            },
            away: AttackBreakdown {
                total: a.attacks,
                dangerous: a.dangerous_attacks,
            },
        },
        corners: HomeAway {
            home: h.corners,
            away: a.corners,
        },
        cards: HomeAway {
            home: CardBreakdown {
                yellow: h.yellow_cards,
                red: h.red_cards,
            },
            away: CardBreakdown {
                yellow: a.yellow_cards,
                red: a.red_cards,
            },
        },
    }
}
