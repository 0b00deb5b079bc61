//! Relative-Standing Normalization (DFIA)
//!
//! Phase 4: convert each agent's absolute holdings into a standing relative
//! to the rest of the population, against a fixed zone capacity divided
//! evenly across agents as baseline. Runs as a single population-wide pass
//! between redistribution and the cascade, because every agent's share
//! factor depends on everyone else's force this tick.

use bevy_ecs::prelude::*;

use crate::components::{Standing, Wealth};
use crate::params::Params;

/// For agent `i` with force `F_i` over total force `F`:
/// `sigma_i = (F * (n - 1)) / ((F - F_i) * n)`, falling back to the neutral
/// multiplier 1 when the rest of the population holds nothing (the agent is
/// the entire economy) or the population is a single agent.
///
/// Status becomes the agent's relative share of the capacity
/// (`baseline * sigma`), influence the signed deviation from the even-split
/// baseline. The previous status is preserved for the reward engine's delta.
pub fn normalize_standing(params: Res<Params>, mut query: Query<(&Wealth, &mut Standing)>) {
    let n = query.iter().count();
    if n == 0 {
        return;
    }
    let total: f64 = query.iter().map(|(wealth, _)| wealth.current).sum();
    let population = n as f64;
    let baseline = params.zone_capacity / population;

    for (wealth, mut standing) in &mut query {
        let rest = total - wealth.current;
        let sigma = if n <= 1 || rest <= f64::EPSILON {
            1.0
        } else {
            (total * (population - 1.0)) / (rest * population)
        };
        let relative_status = baseline * sigma;

        standing.prev_status = standing.status;
        standing.share_factor = sigma;
        standing.status = relative_status;
        standing.influence = relative_status - baseline;
    }
}
