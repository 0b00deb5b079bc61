//! Tax and Redistribution Policies
//!
//! Per-agent levy rates and population-wide redistribution under four
//! interchangeable policies, selectable at runtime. Every redistributing
//! policy pays out exactly what was collected (up to floating-point
//! tolerance) unless the wealth ceiling clamps a credit; `flat` removes the
//! proceeds from the economy.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SimError;
use crate::params::Params;

/// Selectable taxation-and-redistribution policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxPolicy {
    /// Wealth/status/economy-weighted rate with payouts weighted toward
    /// below-average holdings. Active at startup.
    #[default]
    Adaptive,
    /// Fixed rate; proceeds leave the economy.
    Flat,
    /// Fixed rate; proceeds paid back as an equal per-capita dividend.
    Ubi,
    /// Rate scales with holdings inside a configured band; payouts split
    /// into an equal base share and an inverse-wealth share.
    Progressive,
}

impl TaxPolicy {
    /// Parse an external policy name. Unknown names are rejected so the
    /// caller can keep the previously active policy.
    pub fn parse(name: &str) -> Result<Self, SimError> {
        match name {
            "adaptive" => Ok(Self::Adaptive),
            "flat" => Ok(Self::Flat),
            "ubi" => Ok(Self::Ubi),
            "progressive" => Ok(Self::Progressive),
            other => Err(SimError::UnknownPolicy(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Flat => "flat",
            Self::Ubi => "ubi",
            Self::Progressive => "progressive",
        }
    }
}

/// Population extrema consumed by the rate formulas, captured over the
/// pre-tick population before any wealth moves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WealthExtrema {
    pub wealth_min: f64,
    pub wealth_max: f64,
    pub status_max: f64,
}

/// Per-agent tax rate under `policy`.
pub fn tax_rate(
    policy: TaxPolicy,
    params: &Params,
    wealth: f64,
    status: f64,
    extrema: &WealthExtrema,
) -> f64 {
    match policy {
        TaxPolicy::Adaptive => adaptive_tax_rate(params, wealth, status, extrema),
        TaxPolicy::Flat | TaxPolicy::Ubi => params.flat_tax_rate.max(0.0),
        TaxPolicy::Progressive => progressive_tax_rate(params, wealth, extrema),
    }
}

/// tau = min(tau_max, tau_max * (omega_w * norm_wealth + omega_as *
/// norm_status + omega_e * E)), with each normalization falling back to zero
/// when its denominator vanishes.
fn adaptive_tax_rate(params: &Params, wealth: f64, status: f64, extrema: &WealthExtrema) -> f64 {
    let span = extrema.wealth_max - extrema.wealth_min;
    let wealth_component = if span > 0.0 {
        params.omega_wealth * (wealth - extrema.wealth_min) / span
    } else {
        0.0
    };
    let status_component = if extrema.status_max != 0.0 {
        params.omega_status * status / extrema.status_max
    } else {
        0.0
    };
    let economic_component = params.omega_economy * params.economic_stability;

    (params.tau_max * (wealth_component + status_component + economic_component))
        .clamp(0.0, params.tau_max)
}

/// Rate linear in the agent's position within the observed wealth span,
/// clamped to the configured [min, max] band.
fn progressive_tax_rate(params: &Params, wealth: f64, extrema: &WealthExtrema) -> f64 {
    let span = extrema.wealth_max - extrema.wealth_min;
    let normalized = if span > 0.0 {
        ((wealth - extrema.wealth_min) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let rate = params.progressive_rate_min
        + (params.progressive_rate_max - params.progressive_rate_min) * normalized;
    rate.clamp(params.progressive_rate_min, params.progressive_rate_max)
}

/// Redistribute `pool` across `wealths` in place under `policy`, clamping
/// every credited balance to the configured ceiling.
pub fn redistribute(policy: TaxPolicy, params: &Params, wealths: &mut [f64], pool: f64) {
    if wealths.is_empty() {
        warn!("redistribution skipped: population is empty");
        return;
    }
    if pool <= 0.0 {
        return;
    }
    match policy {
        TaxPolicy::Flat => {}
        TaxPolicy::Ubi => {
            let dividend = pool / wealths.len() as f64;
            for wealth in wealths.iter_mut() {
                *wealth = (*wealth + dividend).min(params.wealth_ceiling);
            }
        }
        TaxPolicy::Adaptive => redistribute_adaptive(params, wealths, pool),
        TaxPolicy::Progressive => redistribute_progressive(params, wealths, pool),
    }
}

/// Below-average agents receive shares proportional to their normalized
/// wealth deficit raised to `theta`; agents at or above the mean receive
/// nothing.
fn redistribute_adaptive(params: &Params, wealths: &mut [f64], pool: f64) {
    let mean = wealths.iter().sum::<f64>() / wealths.len() as f64;
    if mean <= 0.0 {
        warn!("adaptive redistribution skipped: total holdings are zero");
        return;
    }
    let indices: Vec<f64> = wealths
        .iter()
        .map(|&wealth| {
            let deficit = (mean - wealth) / mean;
            if deficit > 0.0 {
                deficit.powf(params.theta)
            } else {
                0.0
            }
        })
        .collect();
    let total: f64 = indices.iter().sum();
    if total <= 0.0 {
        // Perfectly equal population: nobody is below the mean.
        return;
    }
    for (wealth, index) in wealths.iter_mut().zip(&indices) {
        *wealth = (*wealth + pool * index / total).min(params.wealth_ceiling);
    }
}

/// Equal base share for everyone plus an inverse-wealth weighted share
/// (weights 1/(w+1), normalized across the population).
fn redistribute_progressive(params: &Params, wealths: &mut [f64], pool: f64) {
    let base_fraction = params.progressive_base_share.clamp(0.0, 1.0);
    let base_share = pool * base_fraction / wealths.len() as f64;
    let progressive_pool = pool * (1.0 - base_fraction);

    let weights: Vec<f64> = wealths.iter().map(|&w| 1.0 / (w.max(0.0) + 1.0)).collect();
    let total: f64 = weights.iter().sum();

    for (wealth, weight) in wealths.iter_mut().zip(&weights) {
        let progressive_share = if total > 0.0 {
            progressive_pool * weight / total
        } else {
            0.0
        };
        *wealth = (*wealth + base_share + progressive_share).min(params.wealth_ceiling);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extrema(min: f64, max: f64, status_max: f64) -> WealthExtrema {
        WealthExtrema {
            wealth_min: min,
            wealth_max: max,
            status_max,
        }
    }

    #[test]
    fn test_parse_known_and_unknown_names() {
        assert_eq!(TaxPolicy::parse("flat").unwrap(), TaxPolicy::Flat);
        assert_eq!(TaxPolicy::parse("ubi").unwrap(), TaxPolicy::Ubi);
        assert_eq!(
            TaxPolicy::parse("progressive").unwrap(),
            TaxPolicy::Progressive
        );
        assert_eq!(TaxPolicy::parse("adaptive").unwrap(), TaxPolicy::Adaptive);
        assert!(matches!(
            TaxPolicy::parse("georgist"),
            Err(SimError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_adaptive_rate_is_capped() {
        let params = Params::default();
        let ext = extrema(0.0, 100.0, 50.0);
        let rate = tax_rate(TaxPolicy::Adaptive, &params, 100.0, 50.0, &ext);
        assert!(rate <= params.tau_max);
        assert!(rate >= 0.0);
    }

    #[test]
    fn test_adaptive_rate_degenerate_extrema() {
        let params = Params::default();
        // Equal wealth and zero status: only the economic component remains.
        let ext = extrema(50.0, 50.0, 0.0);
        let rate = tax_rate(TaxPolicy::Adaptive, &params, 50.0, 0.0, &ext);
        let expected = params.tau_max * params.omega_economy * params.economic_stability;
        assert!((rate - expected).abs() < 1e-12);
    }

    #[test]
    fn test_progressive_rate_band() {
        let params = Params::default();
        let ext = extrema(0.0, 100.0, 1.0);
        let poorest = tax_rate(TaxPolicy::Progressive, &params, 0.0, 0.0, &ext);
        let richest = tax_rate(TaxPolicy::Progressive, &params, 100.0, 0.0, &ext);
        assert_eq!(poorest, params.progressive_rate_min);
        assert_eq!(richest, params.progressive_rate_max);
    }

    #[test]
    fn test_ubi_conserves_the_pool() {
        let params = Params::default();
        let mut wealths = vec![16.0, 40.0, 64.0];
        let before: f64 = wealths.iter().sum();
        redistribute(TaxPolicy::Ubi, &params, &mut wealths, 30.0);
        let after: f64 = wealths.iter().sum();
        assert!((after - before - 30.0).abs() < 1e-9);
        assert_eq!(wealths, vec![26.0, 50.0, 74.0]);
    }

    #[test]
    fn test_progressive_conserves_and_favors_the_poor() {
        let params = Params::default();
        let mut wealths = vec![10.0, 50.0, 90.0];
        let before: f64 = wealths.iter().sum();
        redistribute(TaxPolicy::Progressive, &params, &mut wealths, 30.0);
        let after: f64 = wealths.iter().sum();
        assert!((after - before - 30.0).abs() < 1e-9);
        // The poorest agent's credit must exceed the richest agent's.
        assert!(wealths[0] - 10.0 > wealths[2] - 90.0);
    }

    #[test]
    fn test_adaptive_redistribution_targets_deficits() {
        let params = Params::default();
        let mut wealths = vec![10.0, 50.0, 90.0];
        redistribute(TaxPolicy::Adaptive, &params, &mut wealths, 30.0);
        // Only the below-average agent receives a share.
        assert!((wealths[0] - 40.0).abs() < 1e-9);
        assert_eq!(wealths[1], 50.0);
        assert_eq!(wealths[2], 90.0);
    }

    #[test]
    fn test_flat_removes_the_pool() {
        let params = Params::default();
        let mut wealths = vec![16.0, 40.0, 64.0];
        redistribute(TaxPolicy::Flat, &params, &mut wealths, 30.0);
        assert_eq!(wealths, vec![16.0, 40.0, 64.0]);
    }

    #[test]
    fn test_empty_population_is_a_noop() {
        let params = Params::default();
        let mut wealths: Vec<f64> = Vec::new();
        redistribute(TaxPolicy::Ubi, &params, &mut wealths, 30.0);
        assert!(wealths.is_empty());
    }

    #[test]
    fn test_zero_total_holdings_skips_adaptive_payout() {
        let params = Params::default();
        let mut wealths = vec![0.0, 0.0, 0.0];
        redistribute(TaxPolicy::Adaptive, &params, &mut wealths, 30.0);
        assert_eq!(wealths, vec![0.0, 0.0, 0.0]);
    }
}
