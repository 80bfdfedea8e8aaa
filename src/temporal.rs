use crate::history::TeamSeasonStats;
use crate::model::{EventKind, MatchEvent};
use crate::prediction::{TeamWindowStats, TemporalWindow, WindowAnalysis, WindowStatus};

/// The four fixed forecast windows.
pub const PREDICTION_WINDOWS: [TemporalWindow; 4] = [
    TemporalWindow {
        start: 0,
        end: 15,
        label: "First 15",
    },
    TemporalWindow {
        start: 35,
        end: 45,
        label: "First Half End",
    },
    TemporalWindow {
        start: 45,
        end: 55,
        label: "Second Half Start",
    },
    TemporalWindow {
        start: 80,
        end: 90,
        label: "Final 10",
    },
];

/// Lookback widening the event selection for pressure/momentum purposes.
const BUILDUP_MINUTES: u32 = 5;
/// Events further apart than this belong to separate attack sequences.
const SEQUENCE_GAP_MINUTES: u32 = 2;

const BASE_GOAL_PROBABILITY: f64 = 0.15;
const PRESSURE_WEIGHT: f64 = 0.25;
const MOMENTUM_WEIGHT: f64 = 0.20;
const SET_PIECE_STEP: f64 = 0.05;
const SET_PIECE_CAP: f64 = 0.20;
const CARD_STEP: f64 = 0.05;
const CARD_CAP: f64 = 0.15;
const LIVE_PROBABILITY_FLOOR: f64 = 0.01;
const LIVE_PROBABILITY_CEIL: f64 = 0.95;

/// Weight on the historical estimate for a window that is entirely in the
/// future; decays linearly to zero while the window is being played.
const HISTORICAL_WEIGHT_FUTURE: f64 = 0.6;

impl TemporalWindow {
    pub fn status(&self, minute: u32) -> WindowStatus {
        if minute < self.start {
            WindowStatus::Upcoming
        } else if minute > self.end {
            WindowStatus::Elapsed
        } else {
            WindowStatus::Active
        }
    }

    pub fn length(&self) -> f64 {
        f64::from(self.end - self.start)
    }

    /// How far the clock has run through this window, in [0,1].
    fn progress(&self, minute: u32) -> f64 {
        ((f64::from(minute) - f64::from(self.start)) / self.length()).clamp(0.0, 1.0)
    }

    /// Per-window scaling of the live estimate: the open and the close of
    /// a match concentrate more goals than the middle phases.
    fn weight(&self) -> f64 {
        match self.label {
            "First 15" | "Final 10" => 0.4,
            _ => 0.3,
        }
    }

    /// The season scoring-minute bucket this window reads from.
    fn scoring_bucket(&self) -> &'static str {
        match self.label {
            "First 15" => "0-15",
            "First Half End" => "30-45",
            "Second Half Start" => "45-60",
            _ => "75-90",
        }
    }
}

/// Events whose clock falls inside the window, optionally widened by the
/// buildup lookback (used for pressure/momentum only, never for counts).
pub fn window_events<'a>(
    events: &'a [MatchEvent],
    window: &TemporalWindow,
    include_buildup: bool,
) -> Vec<&'a MatchEvent> {
    let buffer = if include_buildup { BUILDUP_MINUTES } else { 0 };
    let from = window.start.saturating_sub(buffer);
    events
        .iter()
        .filter(|e| {
            let minute = e.absolute_minute();
            minute >= from && minute <= window.end
        })
        .collect()
}

fn is_pressure_event(e: &MatchEvent) -> bool {
    e.kind == EventKind::Goal || e.is_dangerous
}

/// Rate-normalized composite of attacking intensity, capped at 1.
fn pressure_index(events: &[&MatchEvent], window_minutes: f64) -> f64 {
    if window_minutes <= 0.0 {
        return 0.0;
    }
    let shots = events.iter().filter(|e| is_pressure_event(e)).count() as f64;
    let corners = events.iter().filter(|e| e.is_corner_kick()).count() as f64;
    let cards = events.iter().filter(|e| e.is_card()).count() as f64;

    let composite = (shots / window_minutes) * 0.5
        + (corners / window_minutes) * 0.3
        + (cards / window_minutes) * 0.2;
    composite.min(1.0)
}

fn event_momentum_weight(e: &MatchEvent) -> f64 {
    match e.kind {
        EventKind::Goal => 1.0,
        EventKind::FreeKick => {
            if e.is_dangerous {
                0.4
            } else {
                0.2
            }
        }
        EventKind::Var => 0.3,
        _ => {
            if e.is_dangerous {
                0.3
            } else {
                0.1
            }
        }
    }
}

/// Momentum over a window: how consolidated the attacking play is. Events
/// at most two minutes apart chain into one sequence; each sequence scores
/// by event weight with a length bonus, and the average is capped at 1.
pub fn attack_momentum(events: &[MatchEvent], window: &TemporalWindow, team_id: Option<&str>) -> f64 {
    let mut scoped = window_events(events, window, true);
    if let Some(id) = team_id {
        scoped.retain(|e| e.team_id == id);
    }
    if scoped.is_empty() {
        return 0.0;
    }
    sequence_momentum(scoped)
}

fn sequence_momentum(mut events: Vec<&MatchEvent>) -> f64 {
    events.sort_by_key(|e| e.absolute_minute());

    let mut sequences: Vec<Vec<&MatchEvent>> = Vec::new();
    let mut current: Vec<&MatchEvent> = Vec::new();
    let mut last_minute: Option<u32> = None;

    for event in events {
        let minute = event.absolute_minute();
        if let Some(last) = last_minute
            && minute - last > SEQUENCE_GAP_MINUTES
            && !current.is_empty()
        {
            sequences.push(std::mem::take(&mut current));
        }
        current.push(event);
        last_minute = Some(minute);
    }
    if !current.is_empty() {
        sequences.push(current);
    }

    let mut total = 0.0;
    for sequence in &sequences {
        let score: f64 = sequence.iter().map(|e| event_momentum_weight(e)).sum();
        let length_bonus = (sequence.len() as f64 / 5.0).min(1.0);
        total += score * length_bonus;
    }
    (total / sequences.len().max(1) as f64).min(1.0)
}

/// Rule-based factor strings for one window; never empty.
fn key_factors(buildup: &[&MatchEvent], window: &TemporalWindow) -> Vec<String> {
    let shot_count = buildup.iter().filter(|e| e.is_dangerous).count();
    let corner_count = buildup.iter().filter(|e| e.is_corner_kick()).count();
    let foul_count = buildup
        .iter()
        .filter(|e| e.kind == EventKind::FreeKick && !e.is_corner_kick())
        .count();
    let card_count = buildup.iter().filter(|e| e.is_card()).count();

    let mut factors = Vec::new();
    if shot_count >= 3 {
        factors.push(format!(
            "{shot_count} shots in last {}min",
            window.end - window.start
        ));
    }
    if corner_count >= 2 {
        factors.push(format!("{corner_count} corners"));
    }
    if card_count >= 1 {
        factors.push(format!("{card_count} cards"));
    }
    if foul_count >= 3 {
        factors.push("High foul count".to_string());
    }
    if window.label == "First 15" && shot_count > 0 {
        factors.push("Early pressure".to_string());
    }
    if window.label == "Final 10" && (shot_count > 0 || corner_count > 0) {
        factors.push("Late game pressure".to_string());
    }

    if factors.is_empty() {
        factors.push("Normal play".to_string());
    }
    factors
}

/// Live goal likelihood for one window, before any historical blending.
/// Clamped to [0.01, 0.95].
fn live_goal_probability(events: &[MatchEvent], window: &TemporalWindow) -> f64 {
    let buildup = window_events(events, window, true);
    let pressure = pressure_index(&buildup, window.length());
    let momentum = attack_momentum(events, window, None);
    let set_pieces = buildup.iter().filter(|e| e.kind == EventKind::FreeKick).count();
    let set_piece_factor = (set_pieces as f64 * SET_PIECE_STEP).min(SET_PIECE_CAP);
    let cards = buildup.iter().filter(|e| e.is_card()).count();
    let card_factor = (cards as f64 * CARD_STEP).min(CARD_CAP);

    let raw = (BASE_GOAL_PROBABILITY
        + pressure * PRESSURE_WEIGHT
        + momentum * MOMENTUM_WEIGHT
        + set_piece_factor
        + card_factor)
        * window.weight();
    raw.clamp(LIVE_PROBABILITY_FLOOR, LIVE_PROBABILITY_CEIL)
}

/// Season scoring rates mapped onto this window: per-team bucket rate,
/// summed into a bucket lambda, converted to a "goal occurs" probability.
fn historical_goal_probability(
    window: &TemporalWindow,
    home_season: Option<&TeamSeasonStats>,
    away_season: Option<&TeamSeasonStats>,
) -> Option<f64> {
    let bucket = window.scoring_bucket();
    let mut lambda = 0.0;
    let mut usable = false;
    for season in [home_season, away_season].into_iter().flatten() {
        if season.has_scoring_minutes() {
            lambda += season.bucket_rate(bucket);
            usable = true;
        }
    }
    usable.then(|| 1.0 - (-lambda).exp())
}

fn historical_weight(window: &TemporalWindow, minute: u32) -> f64 {
    match window.status(minute) {
        WindowStatus::Upcoming => HISTORICAL_WEIGHT_FUTURE,
        WindowStatus::Active => HISTORICAL_WEIGHT_FUTURE * (1.0 - window.progress(minute)),
        WindowStatus::Elapsed => 0.0,
    }
}

/// Goal likelihood for one window under the unified status policy:
/// elapsed windows are exactly zero, everything else blends the live
/// estimate with season history as far as history is usable.
pub fn window_probability(
    events: &[MatchEvent],
    window: &TemporalWindow,
    minute: u32,
    home_season: Option<&TeamSeasonStats>,
    away_season: Option<&TeamSeasonStats>,
) -> f64 {
    if window.status(minute) == WindowStatus::Elapsed {
        return 0.0;
    }
    let live = live_goal_probability(events, window);
    match historical_goal_probability(window, home_season, away_season) {
        Some(historical) => {
            let w = historical_weight(window, minute);
            (1.0 - w) * live + w * historical
        }
        None => live,
    }
}

/// Full per-window analysis for all four fixed windows.
pub fn analyze_windows(
    events: &[MatchEvent],
    minute: u32,
    home_season: Option<&TeamSeasonStats>,
    away_season: Option<&TeamSeasonStats>,
) -> Vec<WindowAnalysis> {
    PREDICTION_WINDOWS
        .iter()
        .map(|window| {
            let in_window = window_events(events, window, false);
            let buildup = window_events(events, window, true);

            let dangerous = in_window.iter().filter(|e| e.is_dangerous).count();
            let set_piece_count =
                in_window.iter().filter(|e| e.kind == EventKind::FreeKick).count() as u32;
            let pressure = pressure_index(&buildup, window.length());
            let shot_frequency = dangerous as f64 / window.length();

            WindowAnalysis {
                window: *window,
                status: window.status(minute),
                probability: window_probability(events, window, minute, home_season, away_season),
                key_factors: key_factors(&buildup, window),
                pressure_index: pressure,
                danger_ratio: dangerous as f64 / in_window.len().max(1) as f64,
                shot_frequency,
                set_piece_count,
                goal_intensity: pressure * 0.8,
                pattern_strength: (f64::from(set_piece_count) * 0.5 + shot_frequency * 0.5).min(10.0),
            }
        })
        .collect()
}

/// Per-side intensity figures over one window (the closing window, in the
/// aggregate output).
pub fn team_window_stats(
    events: &[MatchEvent],
    window: &TemporalWindow,
    team_id: &str,
) -> TeamWindowStats {
    let team_events: Vec<MatchEvent> = events
        .iter()
        .filter(|e| e.team_id == team_id)
        .cloned()
        .collect();
    let scoped = window_events(&team_events, window, true);

    let set_pieces = scoped.iter().filter(|e| e.kind == EventKind::FreeKick).count();
    let dangerous_set_pieces = scoped
        .iter()
        .filter(|e| e.kind == EventKind::FreeKick && e.is_dangerous)
        .count();
    let set_piece_efficiency = if set_pieces == 0 {
        0.0
    } else {
        dangerous_set_pieces as f64 / set_pieces as f64
    };

    TeamWindowStats {
        pressure_intensity: pressure_index(&scoped, window.length()),
        defensive_actions: scoped.iter().filter(|e| e.is_card()).count() as u32,
        set_piece_efficiency,
    }
}

/// One-line summary of the most promising window still in play.
pub fn temporal_summary(windows: &[WindowAnalysis]) -> String {
    let best = windows
        .iter()
        .filter(|w| w.status != WindowStatus::Elapsed)
        .max_by(|a, b| a.probability.total_cmp(&b.probability));
    let Some(best) = best else {
        return "No temporal data available".to_string();
    };

    let percent = (best.probability * 100.0).round() as u32;
    let factors = best.key_factors.join(" + ");
    if factors == "Normal play" {
        format!("{percent}% Goal in {}", best.window.label)
    } else {
        format!("{percent}% Goal in {}: {factors}", best.window.label)
    }
}
