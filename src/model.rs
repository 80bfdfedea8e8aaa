use serde::{Deserialize, Serialize};

/// Longest minute the feed can report (regulation plus extra time).
pub const MAX_MATCH_MINUTE: u32 = 120;

/// Minutes of regulation the projection model reasons over.
pub const MODEL_HORIZON_MINUTES: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Goal,
    YellowCard,
    RedCard,
    Substitution,
    FreeKick,
    Offside,
    Var,
    Shot,
    Corner,
}

/// A discrete in-play occurrence as reported by the feed. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    pub id: u64,
    pub fixture_id: u64,
    pub minute: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_minute: Option<u32>,
    pub team_id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Free-text qualifier from the feed ("corner", "handball", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub is_dangerous: bool,
    /// Pitch coordinates in [0,100], present on shot-like events only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl MatchEvent {
    /// Match clock including stoppage time.
    pub fn absolute_minute(&self) -> u32 {
        self.minute + self.extra_minute.unwrap_or(0)
    }

    pub fn is_card(&self) -> bool {
        matches!(self.kind, EventKind::YellowCard | EventKind::RedCard)
    }

    /// Corner kicks arrive either as a dedicated event type or as a
    /// free-kick tagged with a corner reason, depending on feed vintage.
    pub fn is_corner_kick(&self) -> bool {
        match self.kind {
            EventKind::Corner => true,
            EventKind::FreeKick => self
                .reason
                .as_deref()
                .is_some_and(|r| r.to_ascii_lowercase().contains("corner")),
            _ => false,
        }
    }

}

/// Running totals for one side, as carried by the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideStats {
    pub possession: f64,
    pub shots_total: u32,
    pub shots_on_target: u32,
    pub shots_off_target: u32,
    pub attacks: u32,
    pub dangerous_attacks: u32,
    pub corners: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

impl SideStats {
    /// Neutral stand-in when the feed omits a side's stat block.
    pub fn neutral() -> Self {
        Self {
            possession: 50.0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueMeta {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMeta {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_url: String,
}

/// Point-in-time state of one live fixture. One prediction computation
/// consumes exactly one snapshot; nothing in the engine outlives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub fixture_id: u64,
    pub league: LeagueMeta,
    pub home: TeamMeta,
    pub away: TeamMeta,
    pub minute: u32,
    pub status: String,
    pub score_home: u32,
    pub score_away: u32,
    pub stats_home: SideStats,
    pub stats_away: SideStats,
    pub events: Vec<MatchEvent>,
}

impl MatchSnapshot {
    pub fn is_live(&self) -> bool {
        self.status.eq_ignore_ascii_case("live")
    }

    pub fn home_team_id(&self) -> String {
        self.home.id.to_string()
    }

    pub fn away_team_id(&self) -> String {
        self.away.id.to_string()
    }

    pub fn total_goals(&self) -> u32 {
        self.score_home + self.score_away
    }
}
