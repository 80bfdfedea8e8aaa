use crate::model::SideStats;
use crate::prediction::{GoalMarkets, WinProbability};

const STRONG_SIDE_THRESHOLD: f64 = 0.6;
const STRONG_DRAW_THRESHOLD: f64 = 0.5;
const STRONG_OVER_THRESHOLD: f64 = 0.7;
const NO_BET_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub bet: String,
    pub confidence: f64,
}

/// Reduce the probability set to one market label. First rule wins.
pub fn recommend(win: &WinProbability, goals: &GoalMarkets) -> Recommendation {
    if win.home > STRONG_SIDE_THRESHOLD {
        Recommendation {
            bet: "Home Win".to_string(),
            confidence: win.home,
        }
    } else if win.away > STRONG_SIDE_THRESHOLD {
        Recommendation {
            bet: "Away Win".to_string(),
            confidence: win.away,
        }
    } else if win.draw > STRONG_DRAW_THRESHOLD {
        Recommendation {
            bet: "Draw".to_string(),
            confidence: win.draw,
        }
    } else if goals.over25 > STRONG_OVER_THRESHOLD {
        Recommendation {
            bet: "Over 2.5 Goals".to_string(),
            confidence: goals.over25,
        }
    } else {
        Recommendation {
            bet: "No Clear Bet".to_string(),
            confidence: NO_BET_CONFIDENCE,
        }
    }
}

/// Human-readable rationale, derived from raw stat comparisons rather than
/// the model output. Always yields at least one line.
pub fn prediction_reasons(
    home: &SideStats,
    away: &SideStats,
    score_home: u32,
    score_away: u32,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if home.possession > 60.0 {
        reasons.push(format!(
            "Home team controlling possession ({}%)",
            home.possession
        ));
    }
    if away.possession > 60.0 {
        reasons.push(format!(
            "Away team controlling possession ({}%)",
            away.possession
        ));
    }
    if home.shots_on_target > away.shots_on_target * 2 {
        reasons.push(format!(
            "Home team creating better chances ({} shots on target)",
            home.shots_on_target
        ));
    }
    if away.shots_on_target > home.shots_on_target * 2 {
        reasons.push(format!(
            "Away team creating better chances ({} shots on target)",
            away.shots_on_target
        ));
    }
    if f64::from(home.attacks) > f64::from(away.attacks) * 1.5 {
        reasons.push(format!(
            "Home team dominating attacks ({} attacks)",
            home.attacks
        ));
    }
    if f64::from(away.attacks) > f64::from(home.attacks) * 1.5 {
        reasons.push(format!(
            "Away team dominating attacks ({} attacks)",
            away.attacks
        ));
    }
    if score_home > 0 && score_away > 0 {
        reasons.push("Both teams have scored already".to_string());
    }

    if reasons.is_empty() {
        reasons.push("Based on balanced match statistics".to_string());
    }
    reasons
}
