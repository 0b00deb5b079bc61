//! Agent Components
//!
//! One agent is an entity carrying these components: holdings, relative
//! standing, the psychological cascade, competence, the adaptive reward
//! state, and an append-only history log.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::params::Params;

/// Dense, stable identifier for an agent (spawn order, fixed for the run).
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AgentId(pub u32);

/// Scalar force holdings and the current tick's tax bookkeeping.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wealth {
    /// Current holdings, kept inside [0, wealth ceiling].
    pub current: f64,
    /// Tax debited this tick; feeds the reward engine as the agent's
    /// community contribution.
    pub last_tax_paid: f64,
}

impl Wealth {
    pub fn new(initial: f64) -> Self {
        Self {
            current: initial.max(0.0),
            last_tax_paid: 0.0,
        }
    }
}

/// Relative standing maintained by the population-wide normalization pass.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// Signed deviation from the even-split baseline.
    pub influence: f64,
    /// Relative share of the fixed zone capacity.
    pub status: f64,
    /// Previous tick's status, kept for the reward engine's status delta.
    pub prev_status: f64,
    /// Relative-share factor of the normalization.
    pub share_factor: f64,
}

impl Standing {
    /// Standing seeded from the absolute curves at spawn time, before the
    /// first normalization pass has run.
    pub fn seeded(influence: f64, status: f64) -> Self {
        Self {
            influence,
            status,
            prev_status: status,
            share_factor: 1.0,
        }
    }
}

/// Derived psychological variables, recomputed every tick from the
/// normalized standing.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cascade {
    pub responsibility: f64,
    pub self_esteem: f64,
    pub willpower: f64,
    pub ambition: f64,
    pub inspiration: f64,
    pub action_level: f64,
}

/// Bounded competence plus its adaptive social learning rate.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competence {
    /// Current competence, kept inside [0, c_max].
    pub value: f64,
    /// Social learning rate, kept inside [kappa_min, kappa_max].
    pub kappa: f64,
}

impl Competence {
    pub fn new(kappa: f64) -> Self {
        Self { value: 0.0, kappa }
    }

    /// Re-derive the learning rate from the gap to the neighbor-best
    /// competence, linearly interpolated over the configured band.
    pub fn adapt_learning_rate(&mut self, gap: f64, params: &Params) {
        let mut normalized = gap / params.c_max;
        if !normalized.is_finite() {
            normalized = 0.0;
        }
        let kappa = params.kappa_min + (params.kappa_max - params.kappa_min) * normalized;
        self.kappa = kappa.clamp(params.kappa_min, params.kappa_max);
    }
}

/// Per-agent adaptive reward state: three blend weights, the smoothed
/// performance signal, and the last raw reward and TD-style error.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardState {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub performance: f64,
    pub prev_performance: f64,
    pub raw_reward: f64,
    pub td_error: f64,
}

impl Default for RewardState {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            beta: 0.3,
            gamma: 0.3,
            performance: 0.0,
            prev_performance: 0.0,
            raw_reward: 0.0,
            td_error: 0.0,
        }
    }
}

impl RewardState {
    /// One adaptive-reward step: blend the raw signal, smooth it, take an
    /// LMS step on each weight with its own input as gradient, and
    /// renormalize the weights to sum to one.
    ///
    /// If the pre-normalization sum is exactly zero (or non-finite), the
    /// weights reset to 1/3 each instead of dividing by zero.
    pub fn update(
        &mut self,
        delta_wealth: f64,
        contribution: f64,
        delta_status: f64,
        eta: f64,
        lambda: f64,
    ) {
        self.raw_reward =
            self.alpha * delta_wealth + self.beta * contribution + self.gamma * delta_status;
        self.performance = (1.0 - lambda) * self.raw_reward + lambda * self.prev_performance;
        self.td_error = self.raw_reward + lambda * self.performance - self.prev_performance;

        self.alpha += eta * self.td_error * delta_wealth;
        self.beta += eta * self.td_error * contribution;
        self.gamma += eta * self.td_error * delta_status;

        let total = self.alpha + self.beta + self.gamma;
        if total == 0.0 || !total.is_finite() {
            self.alpha = 1.0 / 3.0;
            self.beta = 1.0 / 3.0;
            self.gamma = 1.0 / 3.0;
        } else {
            self.alpha /= total;
            self.beta /= total;
            self.gamma /= total;
        }

        self.prev_performance = self.performance;
    }

    pub fn weight_sum(&self) -> f64 {
        self.alpha + self.beta + self.gamma
    }
}

/// One fixed-schema row of an agent's history, appended after every
/// completed tick. Named fields instead of string-keyed parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u64,
    pub wealth: f64,
    pub tax_paid: f64,
    pub influence: f64,
    pub status: f64,
    pub share_factor: f64,
    pub responsibility: f64,
    pub self_esteem: f64,
    pub willpower: f64,
    pub ambition: f64,
    pub competence: f64,
    pub inspiration: f64,
    pub action_level: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub performance: f64,
}

/// Append-only per-agent log, one record per completed tick. Written by the
/// history phase, read back only by external consumers.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub records: Vec<TickRecord>,
}

impl History {
    pub fn push(&mut self, record: TickRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&TickRecord> {
        self.records.last()
    }
}
