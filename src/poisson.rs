/// Poisson mass function over 0..=max_k with the tail beyond max_k folded
/// into the last cell, so the vector always sums to 1.
pub fn pmf(lambda: f64, max_k: usize) -> Vec<f64> {
    let lambda = lambda.max(0.0);
    let mut out = vec![0.0; max_k + 1];
    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    let sum: f64 = out.iter().sum();
    if sum < 1.0 {
        out[max_k] += 1.0 - sum;
    }
    out
}

/// P(X <= k) for X ~ Poisson(lambda).
pub fn cdf(lambda: f64, k: u32) -> f64 {
    let lambda = lambda.max(0.0);
    let mut term = (-lambda).exp();
    let mut acc = term;
    for i in 1..=k {
        term *= lambda / f64::from(i);
        acc += term;
    }
    acc.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmf_sums_to_one_with_folded_tail() {
        for lambda in [0.0, 0.3, 1.7, 6.0] {
            let p = pmf(lambda, 10);
            let sum: f64 = p.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "lambda {lambda}: sum {sum}");
        }
    }

    #[test]
    fn zero_rate_is_a_point_mass_at_zero() {
        let p = pmf(0.0, 10);
        assert_eq!(p[0], 1.0);
        assert!(p[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn cdf_matches_pmf_prefix_sums() {
        let lambda = 1.3;
        let p = pmf(lambda, 20);
        let mut acc = 0.0;
        for k in 0..=5u32 {
            acc += p[k as usize];
            assert!((cdf(lambda, k) - acc).abs() < 1e-9);
        }
    }

    #[test]
    fn cdf_is_monotone_in_k_and_decreasing_in_lambda() {
        assert!(cdf(2.0, 3) > cdf(2.0, 2));
        assert!(cdf(1.0, 2) > cdf(2.0, 2));
    }
}
