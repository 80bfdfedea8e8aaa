use crate::blend::BlendPolicy;
use crate::model::MODEL_HORIZON_MINUTES;
use crate::poisson;
use crate::prediction::WinProbability;

/// Ten additional goals per side carries all the mass that matters; the
/// pmf folds the remainder into its last cell.
const MAX_EXTRA_GOALS: usize = 10;

/// Expected additional goals for one side over the remaining minutes,
/// projecting its accumulated xG forward at the observed per-minute rate.
pub fn remaining_lambda(xg_so_far: f64, minute: u32) -> f64 {
    if minute == 0 || minute >= MODEL_HORIZON_MINUTES {
        return 0.0;
    }
    let rate = xg_so_far / f64::from(minute);
    rate * f64::from(MODEL_HORIZON_MINUTES - minute)
}

/// Win/draw/away triple from the live state alone: convolve each side's
/// capped Poisson mass over the score grid and compare final totals.
pub fn live_outcome(
    score_home: u32,
    score_away: u32,
    lambda_home: f64,
    lambda_away: f64,
) -> WinProbability {
    let pmf_home = poisson::pmf(lambda_home, MAX_EXTRA_GOALS);
    let pmf_away = poisson::pmf(lambda_away, MAX_EXTRA_GOALS);

    let mut p_home = 0.0;
    let mut p_draw = 0.0;
    let mut p_away = 0.0;
    for (h, ph) in pmf_home.iter().enumerate() {
        for (a, pa) in pmf_away.iter().enumerate() {
            let p = ph * pa;
            let final_home = score_home + h as u32;
            let final_away = score_away + a as u32;
            if final_home > final_away {
                p_home += p;
            } else if final_home < final_away {
                p_away += p;
            } else {
                p_draw += p;
            }
        }
    }

    WinProbability {
        home: p_home,
        draw: p_draw,
        away: p_away,
    }
    .normalized()
}

/// Full outcome model: degenerate endpoints, otherwise the live Poisson
/// triple blended with the pre-match prior. A missing prior substitutes
/// uniform thirds so early-match estimates stay anchored.
pub fn win_probabilities(
    score_home: u32,
    score_away: u32,
    minute: u32,
    xg_home: f64,
    xg_away: f64,
    prior: Option<WinProbability>,
    policy: BlendPolicy,
) -> WinProbability {
    let prior = prior.unwrap_or(WinProbability::UNIFORM);

    if minute == 0 {
        return prior;
    }
    if minute >= MODEL_HORIZON_MINUTES {
        return settled_outcome(score_home, score_away);
    }

    let live = live_outcome(
        score_home,
        score_away,
        remaining_lambda(xg_home, minute),
        remaining_lambda(xg_away, minute),
    );
    policy.blend_outcome(minute, live, prior)
}

/// No time remaining: certainty for the leader, certainty of the draw when
/// level.
fn settled_outcome(score_home: u32, score_away: u32) -> WinProbability {
    if score_home > score_away {
        WinProbability {
            home: 1.0,
            draw: 0.0,
            away: 0.0,
        }
    } else if score_home < score_away {
        WinProbability {
            home: 0.0,
            draw: 0.0,
            away: 1.0,
        }
    } else {
        WinProbability {
            home: 0.0,
            draw: 1.0,
            away: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_zero_without_prior_is_exact_thirds() {
        let p = win_probabilities(0, 0, 0, 0.0, 0.0, None, BlendPolicy::FixedHalf);
        assert_eq!(p.home, 1.0 / 3.0);
        assert_eq!(p.draw, 1.0 / 3.0);
        assert_eq!(p.away, 1.0 / 3.0);
    }

    #[test]
    fn minute_zero_returns_the_prior_verbatim() {
        let prior = WinProbability {
            home: 0.5,
            draw: 0.3,
            away: 0.2,
        };
        let p = win_probabilities(0, 0, 0, 0.0, 0.0, Some(prior), BlendPolicy::FixedHalf);
        assert_eq!(p, prior);
    }

    #[test]
    fn full_time_is_deterministic() {
        let lead = win_probabilities(2, 1, 90, 1.0, 1.0, None, BlendPolicy::FixedHalf);
        assert_eq!((lead.home, lead.draw, lead.away), (1.0, 0.0, 0.0));

        let level = win_probabilities(1, 1, 95, 1.0, 1.0, None, BlendPolicy::FixedHalf);
        assert_eq!((level.home, level.draw, level.away), (0.0, 1.0, 0.0));

        let behind = win_probabilities(0, 3, 90, 1.0, 1.0, None, BlendPolicy::FixedHalf);
        assert_eq!((behind.home, behind.draw, behind.away), (0.0, 0.0, 1.0));
    }

    #[test]
    fn probabilities_always_sum_to_one() {
        for minute in [1, 10, 45, 60, 89] {
            let p = win_probabilities(1, 0, minute, 1.2, 0.3, None, BlendPolicy::FixedHalf);
            assert!((p.sum() - 1.0).abs() < 1e-6, "minute {minute}: {p:?}");
        }
    }

    #[test]
    fn lambda_projection_matches_rate_times_remaining() {
        // 1.2 xG over 60 minutes projects 0.6 over the last 30.
        assert!((remaining_lambda(1.2, 60) - 0.6).abs() < 1e-12);
        assert!((remaining_lambda(0.3, 60) - 0.15).abs() < 1e-12);
        // Guards: kickoff and full time project nothing.
        assert_eq!(remaining_lambda(1.2, 0), 0.0);
        assert_eq!(remaining_lambda(1.2, 90), 0.0);
    }

    #[test]
    fn xg_edge_with_a_lead_dominates() {
        let p = win_probabilities(1, 0, 60, 1.2, 0.3, None, BlendPolicy::FixedHalf);
        assert!(p.home > 2.0 * p.away, "{p:?}");
    }

    #[test]
    fn zero_rates_leave_current_score_as_final() {
        let p = live_outcome(2, 0, 0.0, 0.0);
        assert_eq!((p.home, p.draw, p.away), (1.0, 0.0, 0.0));
    }
}
