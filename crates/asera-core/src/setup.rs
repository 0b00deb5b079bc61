//! Population Setup
//!
//! Spawns the initial population with randomized endowments and seeds each
//! agent's pre-normalization standing from the absolute influence and status
//! curves, so tick 1's tax extrema and status delta are well-defined before
//! the first normalization pass has run.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::info;

use crate::components::{AgentId, Cascade, Competence, History, RewardState, Standing, Wealth};
use crate::metrics;
use crate::params::Params;

/// Draw one endowment per agent, uniform over the configured range.
pub fn draw_endowments(params: &Params, rng: &mut SmallRng) -> Vec<f64> {
    let low = params.initial_wealth_min.min(params.initial_wealth_max);
    let high = params.initial_wealth_min.max(params.initial_wealth_max);
    (0..params.num_agents)
        .map(|_| rng.gen_range(low..=high))
        .collect()
}

/// Spawn one agent per endowment, ids in spawn order.
pub fn spawn_population(world: &mut World, params: &Params, endowments: &[f64]) {
    for (id, &endowment) in endowments.iter().enumerate() {
        let influence = metrics::influence(params, endowment);
        let status = metrics::status(params, influence);
        world.spawn((
            AgentId(id as u32),
            Wealth::new(endowment),
            Standing::seeded(influence, status),
            Cascade::default(),
            Competence::new(params.kappa_initial),
            RewardState::default(),
            History::default(),
        ));
    }
    info!(agents = endowments.len(), "population spawned");
}
