use crate::model::{EventKind, MatchEvent};

// Inverse-square calibration: a central shot 11 units out rates ~0.75 xG.
const DISTANCE_SCALE: f64 = 90.75;
// Exponential penalty on wide-angle shots.
const CENTRALITY_DECAY: f64 = 1.22;
// Goal-mouth center on the feed's 0-100 pitch grid.
const GOAL_MOUTH_Y: f64 = 30.0;

/// Expected-goal value in [0,1] for one shot event. The home side attacks
/// toward x=100, the away side toward x=0. Shots without coordinates
/// contribute exactly zero.
pub fn shot_xg(event: &MatchEvent, is_home_team: bool) -> f64 {
    let (Some(x), Some(y)) = (event.x, event.y) else {
        return 0.0;
    };

    let goal_x = if is_home_team { 100.0 } else { 0.0 };
    let distance = ((goal_x - x).powi(2) + (GOAL_MOUTH_Y - y).powi(2)).sqrt();
    if distance == 0.0 {
        return 1.0;
    }

    let centrality = (-CENTRALITY_DECAY * (y - GOAL_MOUTH_Y).abs() / GOAL_MOUTH_Y).exp();
    (DISTANCE_SCALE / distance.powi(2) * centrality).min(1.0)
}

/// Running xG for one team: the sum over its shot events so far.
pub fn team_xg(events: &[MatchEvent], team_id: &str, home_team_id: &str) -> f64 {
    let is_home_team = team_id == home_team_id;
    events
        .iter()
        .filter(|e| e.kind == EventKind::Shot && e.team_id == team_id)
        .map(|e| shot_xg(e, is_home_team))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(team_id: &str, x: Option<f64>, y: Option<f64>) -> MatchEvent {
        MatchEvent {
            id: 0,
            fixture_id: 1,
            minute: 30,
            extra_minute: None,
            team_id: team_id.to_string(),
            kind: EventKind::Shot,
            reason: None,
            is_dangerous: true,
            x,
            y,
        }
    }

    #[test]
    fn missing_coordinates_contribute_exactly_zero() {
        assert_eq!(shot_xg(&shot("1", None, None), true), 0.0);
        assert_eq!(shot_xg(&shot("1", Some(88.0), None), true), 0.0);
    }

    #[test]
    fn goal_mouth_shot_is_a_certain_goal() {
        assert_eq!(shot_xg(&shot("1", Some(100.0), Some(30.0)), true), 1.0);
        assert_eq!(shot_xg(&shot("2", Some(0.0), Some(30.0)), false), 1.0);
    }

    #[test]
    fn xg_decays_with_distance_and_width() {
        let close = shot_xg(&shot("1", Some(94.0), Some(30.0)), true);
        let far = shot_xg(&shot("1", Some(70.0), Some(30.0)), true);
        assert!(close > far);
        assert!(far > 0.0);

        let central = shot_xg(&shot("1", Some(88.0), Some(30.0)), true);
        let wide = shot_xg(&shot("1", Some(88.0), Some(5.0)), true);
        assert!(central > wide);
    }

    #[test]
    fn attack_direction_depends_on_side() {
        // Same spot is a close-range chance for home, a long-ranger for away.
        let e = shot("1", Some(92.0), Some(30.0));
        assert!(shot_xg(&e, true) > shot_xg(&e, false));
    }

    #[test]
    fn team_xg_sums_only_that_teams_shots() {
        let events = vec![
            shot("10", Some(90.0), Some(30.0)),
            shot("10", Some(80.0), Some(40.0)),
            shot("20", Some(10.0), Some(30.0)),
        ];
        let home = team_xg(&events, "10", "10");
        let away = team_xg(&events, "20", "10");
        assert!(home > away);
        assert!(away > 0.0);

        // Non-shot events never contribute.
        let mut with_goal = events.clone();
        with_goal.push(MatchEvent {
            kind: EventKind::Goal,
            ..shot("10", Some(95.0), Some(30.0))
        });
        assert_eq!(team_xg(&with_goal, "10", "10"), home);
    }
}
