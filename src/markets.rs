use crate::blend::BlendPolicy;
use crate::history::PreMatchPriors;
use crate::poisson;
use crate::prediction::GoalMarkets;

/// Market prior to fall back on when no pre-match figure is supplied.
const NEUTRAL_MARKET_PRIOR: f64 = 0.5;

/// P(final total > threshold) given the goals already on the board and the
/// combined remaining-goal rate. Thresholds are the usual half-goal lines.
pub fn over_probability(current_total: u32, total_lambda: f64, threshold: f64) -> f64 {
    if f64::from(current_total) > threshold {
        return 1.0;
    }
    // Strictly-over a half line needs floor(threshold)+1 goals in total.
    let needed = threshold.floor() as u32 + 1;
    let more_needed = needed - current_total;
    1.0 - poisson::cdf(total_lambda, more_needed - 1)
}

/// Both teams to score: each side's "scores at least once more" chance is
/// certain once it already has, else 1 - e^(-lambda). The two sides are
/// multiplied as if independent, ignoring the timing correlation between
/// them; a known simplification.
pub fn btts_probability(score_home: u32, score_away: u32, lambda_home: f64, lambda_away: f64) -> f64 {
    let p_home_scores = if score_home >= 1 {
        1.0
    } else {
        1.0 - (-lambda_home.max(0.0)).exp()
    };
    let p_away_scores = if score_away >= 1 {
        1.0
    } else {
        1.0 - (-lambda_away.max(0.0)).exp()
    };
    p_home_scores * p_away_scores
}

/// All goal markets, each live figure blended with its pre-match
/// counterpart through the injected policy.
pub fn goal_markets(
    score_home: u32,
    score_away: u32,
    minute: u32,
    lambda_home: f64,
    lambda_away: f64,
    priors: Option<&PreMatchPriors>,
    policy: BlendPolicy,
) -> GoalMarkets {
    let current_total = score_home + score_away;
    let total_lambda = lambda_home + lambda_away;

    let live_over15 = over_probability(current_total, total_lambda, 1.5);
    let live_over25 = over_probability(current_total, total_lambda, 2.5);
    let live_over35 = over_probability(current_total, total_lambda, 3.5);
    let live_btts = btts_probability(score_home, score_away, lambda_home, lambda_away);

    let pre = |f: fn(&PreMatchPriors) -> f64| priors.map(f).unwrap_or(NEUTRAL_MARKET_PRIOR);

    GoalMarkets {
        over15: policy.blend(minute, live_over15, pre(|p| p.over15)),
        over25: policy.blend(minute, live_over25, pre(|p| p.over25)),
        over35: policy.blend(minute, live_over35, pre(|p| p.over35)),
        btts: policy.blend(minute, live_btts, pre(|p| p.btts)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_line_is_certain() {
        // Three goals already beat the 2.5 line no matter the rate.
        assert_eq!(over_probability(3, 0.0, 2.5), 1.0);
        assert_eq!(over_probability(4, 1.0, 2.5), 1.0);
    }

    #[test]
    fn one_more_goal_needed_is_complement_of_zero_arrivals() {
        let lambda = 0.8;
        let p = over_probability(2, lambda, 2.5);
        assert!((p - (1.0 - (-lambda as f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn over_probability_is_non_decreasing_in_lambda() {
        let mut last = 0.0;
        for step in 0..40 {
            let lambda = f64::from(step) * 0.25;
            let p = over_probability(0, lambda, 2.5);
            assert!(p >= last, "lambda {lambda}: {p} < {last}");
            last = p;
        }
    }

    #[test]
    fn zero_rate_and_empty_board_means_no_overs() {
        assert_eq!(over_probability(0, 0.0, 2.5), 0.0);
        assert_eq!(over_probability(0, 0.0, 1.5), 0.0);
    }

    #[test]
    fn btts_is_certain_once_both_have_scored() {
        assert_eq!(btts_probability(1, 2, 0.0, 0.0), 1.0);
    }

    #[test]
    fn btts_multiplies_per_side_chances() {
        let p = btts_probability(1, 0, 0.5, 0.7);
        let expected = 1.0 - (-0.7f64).exp();
        assert!((p - expected).abs() < 1e-12);

        let both_open = btts_probability(0, 0, 0.5, 0.7);
        let expected_both = (1.0 - (-0.5f64).exp()) * (1.0 - (-0.7f64).exp());
        assert!((both_open - expected_both).abs() < 1e-12);
    }

    #[test]
    fn missing_priors_blend_against_a_neutral_half() {
        let m = goal_markets(3, 0, 60, 0.0, 0.0, None, BlendPolicy::FixedHalf);
        // Live over2.5 is settled at 1, prior defaults to 0.5.
        assert!((m.over25 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn supplied_priors_are_respected() {
        let priors = PreMatchPriors {
            home: 0.4,
            draw: 0.3,
            away: 0.3,
            over15: 0.8,
            over25: 0.6,
            over35: 0.4,
            btts: 0.55,
        };
        let m = goal_markets(0, 0, 45, 0.6, 0.6, Some(&priors), BlendPolicy::FixedHalf);
        let live_over15 = over_probability(0, 1.2, 1.5);
        assert!((m.over15 - (live_over15 + 0.8) / 2.0).abs() < 1e-12);
    }
}
