//! Metric Functions
//!
//! Pure closed-form transforms of the psychological cascade, plus the Gini
//! coefficient. Each function is total over finite inputs: zero denominators
//! and out-of-domain intermediates return documented fallbacks instead of
//! letting NaN or Inf propagate down the cascade.

use crate::params::Params;

/// Logistic influence curve: saturates at `i_max`, centered at `w0`.
pub fn influence(params: &Params, wealth: f64) -> f64 {
    params.i_max / (1.0 + (-params.k1 * (wealth - params.w0)).exp())
}

/// Power-law agent status. Zero (or negative) influence maps to zero status.
pub fn status(params: &Params, influence: f64) -> f64 {
    if influence <= 0.0 {
        return 0.0;
    }
    params.k2 * influence.powf(params.status_exponent)
}

/// Exponential responsibility growth in status.
pub fn responsibility(params: &Params, status: f64) -> f64 {
    params.r0 * (params.k3 * status).exp()
}

/// Inverted parabola around the optimal responsibility level, peaking at
/// `s_max` and floored at zero.
pub fn self_esteem(params: &Params, responsibility: f64) -> f64 {
    let gap = responsibility - params.r_opt;
    (params.s_max - params.k4 * gap * gap).max(0.0)
}

/// Logistic willpower curve in self-esteem, saturating at `v_max`.
pub fn willpower(params: &Params, self_esteem: f64) -> f64 {
    params.v_max / (1.0 + (-params.k5 * (self_esteem - params.s0)).exp())
}

/// Quadratic ambition in willpower.
pub fn ambition(params: &Params, willpower: f64) -> f64 {
    params.k6 * willpower * willpower
}

/// Self-driven competence increment: the drive signal pulls competence toward
/// the ceiling in proportion to the remaining headroom.
pub fn competence_gain(params: &Params, drive: f64, competence: f64) -> f64 {
    params.k7 * drive * (params.c_max - competence)
}

/// Inspiration from the gap to the historical best performers. Negative when
/// the agent has already surpassed them.
pub fn inspiration(params: &Params, competence: f64) -> f64 {
    params.phi * (params.c_best_initial - competence)
}

/// Action level from inspiration, willpower and ambition.
pub fn action_level(params: &Params, inspiration: f64, willpower: f64, ambition: f64) -> f64 {
    params.psi * inspiration * (willpower + ambition)
}

/// Gini coefficient of a holdings distribution.
///
/// Standard sorted-index form: `G = 2 * sum(i * x_i) / (n * sum(x)) - (n + 1) / n`
/// with 1-based ranks over the ascending-sorted values. Returns 0 for empty
/// or all-zero populations.
pub fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let total: f64 = sorted.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(rank, value)| (rank as f64 + 1.0) * value)
        .sum();
    let n = n as f64;
    2.0 * weighted / (n * total) - (n + 1.0) / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_influence_midpoint_and_saturation() {
        let params = Params::default();
        let at_midpoint = influence(&params, params.w0);
        assert!((at_midpoint - params.i_max / 2.0).abs() < 1e-9);
        assert!(influence(&params, 1e6) < params.i_max);
        assert!(influence(&params, 1e6) > params.i_max - 1e-6);
        assert!(influence(&params, -1e6) >= 0.0);
    }

    #[test]
    fn test_influence_is_monotone_in_wealth() {
        let params = Params::default();
        let mut last = influence(&params, 0.0);
        for wealth in [10.0, 25.0, 50.0, 75.0, 200.0] {
            let next = influence(&params, wealth);
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn test_status_handles_zero_influence() {
        let params = Params::default();
        assert_eq!(status(&params, 0.0), 0.0);
        assert!(status(&params, 50.0) > 0.0);
    }

    #[test]
    fn test_self_esteem_peaks_at_optimum() {
        let params = Params::default();
        let at_optimum = self_esteem(&params, params.r_opt);
        assert_eq!(at_optimum, params.s_max);
        assert!(self_esteem(&params, params.r_opt + 100.0) < at_optimum);
        assert!(self_esteem(&params, params.r_opt + 1e6) >= 0.0);
    }

    #[test]
    fn test_willpower_is_bounded() {
        let params = Params::default();
        for esteem in [-1e6, 0.0, 50.0, 100.0, 1e6] {
            let v = willpower(&params, esteem);
            assert!(v >= 0.0 && v <= params.v_max);
        }
    }

    #[test]
    fn test_competence_gain_vanishes_at_ceiling() {
        let params = Params::default();
        assert_eq!(competence_gain(&params, 10.0, params.c_max), 0.0);
        assert!(competence_gain(&params, 10.0, 0.0) > 0.0);
    }

    #[test]
    fn test_gini_equal_distribution_is_zero() {
        assert_eq!(gini(&[10.0, 10.0, 10.0]), 0.0);
    }

    #[test]
    fn test_gini_concentrated_distribution() {
        // All wealth in one of three hands: maximal value for n=3 is 2/3.
        let g = gini(&[0.0, 0.0, 100.0]);
        assert!((g - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_gini_degenerate_inputs() {
        assert_eq!(gini(&[]), 0.0);
        assert_eq!(gini(&[0.0, 0.0]), 0.0);
    }
}
