use crate::model::MODEL_HORIZON_MINUTES;
use crate::prediction::WinProbability;

/// How much weight the live model gets against its pre-match counterpart.
///
/// Injected rather than hard-coded: which policy is canonical is a product
/// decision, and both observed variants stay available and testable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendPolicy {
    /// Unweighted average of live and pre-match, all match long.
    #[default]
    FixedHalf,
    /// Live weight ramps linearly from 0 at kickoff to 1 at 90'.
    MinuteRamp,
}

impl BlendPolicy {
    pub fn live_weight(&self, minute: u32) -> f64 {
        match self {
            Self::FixedHalf => 0.5,
            Self::MinuteRamp => (f64::from(minute) / f64::from(MODEL_HORIZON_MINUTES)).clamp(0.0, 1.0),
        }
    }

    /// Blend one live probability with its pre-match counterpart.
    pub fn blend(&self, minute: u32, live: f64, pre_match: f64) -> f64 {
        let w = self.live_weight(minute);
        w * live + (1.0 - w) * pre_match
    }

    /// Blend a live outcome triple with the prior triple. Stays normalized
    /// because both inputs are.
    pub fn blend_outcome(
        &self,
        minute: u32,
        live: WinProbability,
        prior: WinProbability,
    ) -> WinProbability {
        WinProbability {
            home: self.blend(minute, live.home, prior.home),
            draw: self.blend(minute, live.draw, prior.draw),
            away: self.blend(minute, live.away, prior.away),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_half_is_the_unweighted_average() {
        let p = BlendPolicy::FixedHalf;
        assert!((p.blend(7, 0.8, 0.4) - 0.6).abs() < 1e-12);
        assert_eq!(p.live_weight(0), 0.5);
        assert_eq!(p.live_weight(89), 0.5);
    }

    #[test]
    fn minute_ramp_reaches_full_live_weight_at_ninety() {
        let p = BlendPolicy::MinuteRamp;
        assert_eq!(p.live_weight(0), 0.0);
        assert_eq!(p.live_weight(45), 0.5);
        assert_eq!(p.live_weight(90), 1.0);
        assert_eq!(p.live_weight(104), 1.0);
    }

    #[test]
    fn blended_outcome_triples_stay_normalized() {
        let live = WinProbability {
            home: 0.7,
            draw: 0.2,
            away: 0.1,
        };
        let prior = WinProbability {
            home: 0.25,
            draw: 0.45,
            away: 0.30,
        };
        for policy in [BlendPolicy::FixedHalf, BlendPolicy::MinuteRamp] {
            for minute in [1, 30, 60, 90] {
                let out = policy.blend_outcome(minute, live, prior);
                assert!((out.sum() - 1.0).abs() < 1e-12);
            }
        }
    }
}
