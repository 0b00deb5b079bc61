//! Adaptive Reward Phase
//!
//! Phase 7: per-agent reward signal and online weight adaptation. Inputs are
//! this tick's income delta, the tax the agent actually paid (its community
//! contribution), and the status change produced by the normalization pass.
//! Each agent's weight drift is independent of every other agent's.

use bevy_ecs::prelude::*;

use crate::components::{RewardState, Standing, Wealth};
use crate::params::Params;

pub fn update_rewards(
    params: Res<Params>,
    mut query: Query<(&Wealth, &Standing, &mut RewardState)>,
) {
    for (wealth, standing, mut reward) in &mut query {
        let delta_status = standing.status - standing.prev_status;
        reward.update(
            params.income_delta,
            wealth.last_tax_paid,
            delta_status,
            params.eta,
            params.lambda,
        );
    }
}
