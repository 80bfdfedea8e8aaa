use serde::{Deserialize, Serialize};

use crate::model::MatchEvent;

/// Outcome triple. Always normalized so the three sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinProbability {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl WinProbability {
    pub const UNIFORM: Self = Self {
        home: 1.0 / 3.0,
        draw: 1.0 / 3.0,
        away: 1.0 / 3.0,
    };

    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }

    pub fn normalized(self) -> Self {
        let sum = self.sum();
        if sum <= 0.0 {
            return Self::UNIFORM;
        }
        Self {
            home: self.home / sum,
            draw: self.draw / sum,
            away: self.away / sum,
        }
    }
}

/// Over/under and both-teams-to-score probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalMarkets {
    pub over15: f64,
    pub over25: f64,
    pub over35: f64,
    pub btts: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionBlock {
    pub win_probability: WinProbability,
    pub recommended_bet: String,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub goals: GoalMarkets,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeAway<T> {
    pub home: T,
    pub away: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotBreakdown {
    pub total: u32,
    pub on_target: u32,
    pub off_target: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackBreakdown {
    pub total: u32,
    pub dangerous: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardBreakdown {
    pub yellow: u32,
    pub red: u32,
}

/// Raw stat passthrough, regrouped per market convention but unchanged in
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsBlock {
    pub possession: HomeAway<f64>,
    pub shots: HomeAway<ShotBreakdown>,
    pub attacks: HomeAway<AttackBreakdown>,
    pub corners: HomeAway<u32>,
    pub cards: HomeAway<CardBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBadge {
    pub name: String,
    pub logo_url: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueBadge {
    pub name: String,
    pub country: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBlock {
    pub minute: u32,
    pub status: String,
    pub is_live: bool,
}

/// A fixed match-minute segment with its own goal-likelihood forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemporalWindow {
    pub start: u32,
    pub end: u32,
    pub label: &'static str,
}

/// Where the current minute sits relative to a window. One policy for
/// every consumer: Elapsed windows carry probability zero, the other two
/// are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    Upcoming,
    Active,
    Elapsed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAnalysis {
    pub window: TemporalWindow,
    pub status: WindowStatus,
    pub probability: f64,
    pub key_factors: Vec<String>,
    pub pressure_index: f64,
    pub danger_ratio: f64,
    pub shot_frequency: f64,
    pub set_piece_count: u32,
    pub goal_intensity: f64,
    pub pattern_strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamWindowStats {
    pub pressure_intensity: f64,
    pub defensive_actions: u32,
    pub set_piece_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMoments {
    pub pre_window_goals: Vec<MatchEvent>,
    pub pressure_build_up: Vec<MatchEvent>,
    pub defensive_errors: Vec<MatchEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumAnalysis {
    pub attack_momentum: f64,
    pub defense_stability: f64,
    pub fatigue_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalGoalProbability {
    pub windows: Vec<WindowAnalysis>,
    pub key_moments: KeyMoments,
    pub team_comparison: HomeAway<TeamWindowStats>,
    pub momentum_analysis: MomentumAnalysis,
    pub last_updated: String,
}

/// The full per-fixture prediction record. Value object, built fresh per
/// computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPrediction {
    pub fixture_id: u64,
    pub league: LeagueBadge,
    pub teams: HomeAway<TeamBadge>,
    pub status: StatusBlock,
    pub prediction: PredictionBlock,
    pub stats: StatsBlock,
    pub temporal_goal_probability: TemporalGoalProbability,
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_a_zero_triple_falls_back_to_uniform() {
        let p = WinProbability {
            home: 0.0,
            draw: 0.0,
            away: 0.0,
        }
        .normalized();
        assert_eq!(p, WinProbability::UNIFORM);
    }

    #[test]
    fn normalized_triples_sum_to_one() {
        let p = WinProbability {
            home: 2.0,
            draw: 1.0,
            away: 1.0,
        }
        .normalized();
        assert!((p.sum() - 1.0).abs() < 1e-12);
        assert!((p.home - 0.5).abs() < 1e-12);
    }

    #[test]
    fn prediction_json_uses_camel_case_contract() {
        let block = StatusBlock {
            minute: 12,
            status: "LIVE".to_string(),
            is_live: true,
        };
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"isLive\":true"));
    }
}
