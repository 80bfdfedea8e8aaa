use serde::{Deserialize, Serialize};

/// The six fixed scoring-minute buckets spanning regulation time.
pub const SCORING_BUCKETS: [&str; 6] = ["0-15", "15-30", "30-45", "45-60", "60-75", "75-90"];

/// Goals a team scored inside one fixed minute bucket, season to date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringBucket {
    /// Bucket label, one of [`SCORING_BUCKETS`].
    pub minutes: String,
    pub goals: u32,
}

/// Season-level aggregates for one team. Supplied by the historical rate
/// provider; read-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSeasonStats {
    pub matches_played: u32,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub avg_home_goals_for: f64,
    pub avg_home_goals_against: f64,
    pub avg_away_goals_for: f64,
    pub avg_away_goals_against: f64,
    #[serde(default)]
    pub scoring_minutes: Vec<ScoringBucket>,
}

impl TeamSeasonStats {
    /// Season scoring rate (goals per match) inside the named bucket.
    /// Unknown buckets and empty seasons rate as zero.
    pub fn bucket_rate(&self, bucket: &str) -> f64 {
        if self.matches_played == 0 {
            return 0.0;
        }
        let goals = self
            .scoring_minutes
            .iter()
            .find(|b| b.minutes == bucket)
            .map(|b| b.goals)
            .unwrap_or(0);
        f64::from(goals) / f64::from(self.matches_played)
    }

    pub fn has_scoring_minutes(&self) -> bool {
        self.matches_played > 0 && !self.scoring_minutes.is_empty()
    }
}

/// Pre-match market probabilities computed before kickoff, used to
/// stabilize early live estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreMatchPriors {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
    pub over15: f64,
    pub over25: f64,
    pub over35: f64,
    pub btts: f64,
}

/// Optional per-fixture inputs from the historical rate provider. Every
/// part is individually optional; absence degrades the estimate, it never
/// fails it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priors: Option<PreMatchPriors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_season: Option<TeamSeasonStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_season: Option<TeamSeasonStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(matches: u32, buckets: &[(&str, u32)]) -> TeamSeasonStats {
        TeamSeasonStats {
            matches_played: matches,
            scoring_minutes: buckets
                .iter()
                .map(|(m, g)| ScoringBucket {
                    minutes: (*m).to_string(),
                    goals: *g,
                })
                .collect(),
            ..TeamSeasonStats::default()
        }
    }

    #[test]
    fn bucket_rate_is_goals_per_match() {
        let s = season(20, &[("0-15", 10), ("75-90", 4)]);
        assert_eq!(s.bucket_rate("0-15"), 0.5);
        assert_eq!(s.bucket_rate("75-90"), 0.2);
        assert_eq!(s.bucket_rate("30-45"), 0.0);
    }

    #[test]
    fn empty_season_never_divides_by_zero() {
        let s = season(0, &[("0-15", 3)]);
        assert_eq!(s.bucket_rate("0-15"), 0.0);
        assert!(!s.has_scoring_minutes());
    }
}
