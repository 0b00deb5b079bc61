//! Model Parameters
//!
//! Every model constant lives in one owned `Params` value held by the
//! simulation as a resource. External layers tune it through
//! [`Params::adjust`]; nothing in the engine reads process-wide state.
//!
//! A parameters file is optional: missing keys fall back to the model
//! defaults, so a file only needs to list the values it overrides.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SimError;

/// Default parameters file path.
pub const DEFAULT_PARAMS_PATH: &str = "params.toml";

/// All model constants, clamps and learning rates.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // Influence and status curves
    /// Maximum influence (logistic saturation).
    pub i_max: f64,
    /// Growth rate of the influence curve.
    pub k1: f64,
    /// Wealth at which influence reaches half of `i_max`.
    pub w0: f64,
    /// Proportionality constant for agent status.
    pub k2: f64,
    /// Exponent controlling status non-linearity.
    pub status_exponent: f64,

    // Responsibility and self-esteem
    /// Base responsibility.
    pub r0: f64,
    /// Growth rate for responsibility.
    pub k3: f64,
    /// Curve width for self-esteem around the optimum.
    pub k4: f64,
    /// Optimal responsibility level.
    pub r_opt: f64,
    /// Maximum self-esteem.
    pub s_max: f64,

    // Willpower and ambition
    /// Maximum willpower (logistic saturation).
    pub v_max: f64,
    /// Growth rate of the willpower curve.
    pub k5: f64,
    /// Self-esteem at which willpower reaches half of `v_max`.
    pub s0: f64,
    /// Proportionality constant for ambition.
    pub k6: f64,

    // Competence, inspiration and action level
    /// Self-driven competence learning rate.
    pub k7: f64,
    /// Maximum competence.
    pub c_max: f64,
    /// Sensitivity to inspiration.
    pub phi: f64,
    /// Proportionality constant for action level.
    pub psi: f64,
    /// Reference competence of the historical best performers.
    pub c_best_initial: f64,

    // Taxation and redistribution
    /// Maximum tax rate under the adaptive formula.
    pub tau_max: f64,
    /// Weight of normalized wealth in the adaptive tax rate.
    pub omega_wealth: f64,
    /// Weight of normalized status in the adaptive tax rate.
    pub omega_status: f64,
    /// Weight of the economic-stability factor in the adaptive tax rate.
    pub omega_economy: f64,
    /// Redistribution sensitivity exponent for below-average shares.
    pub theta: f64,
    /// Exogenous economic-stability scalar.
    pub economic_stability: f64,
    /// Rate for the flat and UBI policies.
    pub flat_tax_rate: f64,
    /// Lower bound of the progressive tax-rate band.
    pub progressive_rate_min: f64,
    /// Upper bound of the progressive tax-rate band.
    pub progressive_rate_max: f64,
    /// Fraction of the progressive pool paid out as an equal base share;
    /// the remainder is split by inverse wealth.
    pub progressive_base_share: f64,

    // Population and income
    /// Number of agents spawned on initialization.
    pub num_agents: usize,
    /// Constant per-tick income credited to every agent.
    pub income_delta: f64,
    /// Minimum initial endowment.
    pub initial_wealth_min: f64,
    /// Maximum initial endowment.
    pub initial_wealth_max: f64,
    /// Holdings are clamped to [0, ceiling] after every wealth movement.
    pub wealth_ceiling: f64,

    // Social network
    /// Independent edge probability of the Erdos-Renyi graph.
    pub edge_probability: f64,

    // Relative standing (DFIA)
    /// Fixed theoretical capacity divided evenly across agents as baseline.
    pub zone_capacity: f64,

    // Adaptive reward engine
    /// Gradient step size for the reward weights.
    pub eta: f64,
    /// Exponential smoothing factor for performance.
    pub lambda: f64,

    // Competence diffusion learning-rate band
    /// Initial social learning rate.
    pub kappa_initial: f64,
    /// Lower bound of the social learning rate.
    pub kappa_min: f64,
    /// Upper bound of the social learning rate.
    pub kappa_max: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            i_max: 100.0,
            k1: 0.1,
            w0: 50.0,
            k2: 1.0,
            status_exponent: 1.2,
            r0: 1.0,
            k3: 0.0001,
            k4: 0.0001,
            r_opt: 30.0,
            s_max: 100.0,
            v_max: 100.0,
            k5: 0.1,
            s0: 50.0,
            k6: 0.001,
            k7: 0.01,
            c_max: 100.0,
            phi: 0.5,
            psi: 0.01,
            c_best_initial: 80.0,
            tau_max: 0.4,
            omega_wealth: 0.5,
            omega_status: 0.3,
            omega_economy: 0.2,
            theta: 2.0,
            economic_stability: 0.2,
            flat_tax_rate: 0.2,
            progressive_rate_min: 0.1,
            progressive_rate_max: 0.4,
            progressive_base_share: 0.5,
            num_agents: 100,
            income_delta: 5.0,
            initial_wealth_min: 20.0,
            initial_wealth_max: 80.0,
            wealth_ceiling: 1_000_000.0,
            edge_probability: 0.05,
            zone_capacity: 100.0,
            eta: 0.05,
            lambda: 0.9,
            kappa_initial: 0.1,
            kappa_min: 0.01,
            kappa_max: 0.2,
        }
    }
}

impl Params {
    /// Load parameters from a TOML file; keys absent from the file keep
    /// their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Tune a single named parameter. Unknown names are rejected so callers
    /// can report them without mutating anything.
    ///
    /// Structural parameters (`num_agents`, `edge_probability`,
    /// `initial_wealth_*`) are tunable too but only take effect on the next
    /// reinitialization, since population and graph are fixed per run.
    pub fn adjust(&mut self, name: &str, value: f64) -> Result<(), SimError> {
        match name {
            "income_delta" => self.income_delta = value,
            "flat_tax_rate" => self.flat_tax_rate = value,
            "tau_max" => self.tau_max = value,
            "economic_stability" => self.economic_stability = value,
            "theta" => self.theta = value,
            "progressive_rate_min" => self.progressive_rate_min = value,
            "progressive_rate_max" => self.progressive_rate_max = value,
            "progressive_base_share" => self.progressive_base_share = value,
            "eta" => self.eta = value,
            "lambda" => self.lambda = value,
            "k7" => self.k7 = value,
            "phi" => self.phi = value,
            "psi" => self.psi = value,
            "zone_capacity" => self.zone_capacity = value,
            "wealth_ceiling" => self.wealth_ceiling = value,
            "edge_probability" => self.edge_probability = value,
            "initial_wealth_min" => self.initial_wealth_min = value,
            "initial_wealth_max" => self.initial_wealth_max = value,
            "num_agents" => self.num_agents = value.max(0.0) as usize,
            _ => return Err(SimError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_model_constants() {
        let params = Params::default();
        assert_eq!(params.i_max, 100.0);
        assert_eq!(params.w0, 50.0);
        assert_eq!(params.tau_max, 0.4);
        assert_eq!(params.c_max, 100.0);
        assert_eq!(params.num_agents, 100);
        assert_eq!(params.kappa_min, 0.01);
        assert_eq!(params.kappa_max, 0.2);
    }

    #[test]
    fn test_adjust_known_parameter() {
        let mut params = Params::default();
        params.adjust("flat_tax_rate", 0.35).unwrap();
        assert_eq!(params.flat_tax_rate, 0.35);
    }

    #[test]
    fn test_adjust_unknown_parameter_is_rejected() {
        let mut params = Params::default();
        let before = params.clone();
        let err = params.adjust("gravity", 9.81).unwrap_err();
        assert!(matches!(err, SimError::UnknownParameter(_)));
        assert_eq!(params, before);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let params: Params = toml::from_str("flat_tax_rate = 0.1\nnum_agents = 7\n").unwrap();
        assert_eq!(params.flat_tax_rate, 0.1);
        assert_eq!(params.num_agents, 7);
        assert_eq!(params.i_max, 100.0);
    }
}
