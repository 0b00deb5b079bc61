//! Competence Diffusion Phase
//!
//! Phase 6: blend a self-driven gain toward the competence ceiling with a
//! pull toward the mean competence of graph neighbors. Neighbor values are
//! read from a snapshot of the pre-phase population (explicit double
//! buffer), so no agent observes another agent's same-tick update.

use bevy_ecs::prelude::*;
use tracing::warn;

use crate::components::{AgentId, Cascade, Competence};
use crate::metrics;
use crate::network::SocialGraph;
use crate::params::Params;

/// Resource: competence values captured before the diffusion pass, indexed
/// by dense agent id.
#[derive(Resource, Debug, Clone, Default)]
pub struct CompetenceSnapshot(pub Vec<f64>);

/// Copy every agent's competence into the read buffer.
pub fn snapshot_competence(
    mut snapshot: ResMut<CompetenceSnapshot>,
    query: Query<(&AgentId, &Competence)>,
) {
    let n = query.iter().count();
    snapshot.0.clear();
    snapshot.0.resize(n, 0.0);
    for (id, competence) in &query {
        if let Some(slot) = snapshot.0.get_mut(id.0 as usize) {
            *slot = competence.value;
        }
    }
}

/// Diffusion proper: re-derive the social learning rate from the gap to the
/// neighbor reference, apply the self-driven and social terms, and clamp the
/// result to [0, c_max].
pub fn diffuse_competence(
    params: Res<Params>,
    graph: Res<SocialGraph>,
    snapshot: Res<CompetenceSnapshot>,
    mut query: Query<(&AgentId, &Cascade, &mut Competence)>,
) {
    for (id, cascade, mut competence) in &mut query {
        let reference = neighbor_reference(&snapshot.0, graph.neighbors(id.0), competence.value);
        let gap = reference - competence.value;
        competence.adapt_learning_rate(gap, &params);

        let drive = cascade.ambition + cascade.inspiration;
        let self_gain = metrics::competence_gain(&params, drive, competence.value);
        let social_gain = competence.kappa * gap;

        let mut next = competence.value + self_gain + social_gain;
        if !next.is_finite() {
            warn!(agent = id.0, "non-finite competence update, keeping previous value");
            next = competence.value;
        }
        competence.value = next.clamp(0.0, params.c_max);
    }
}

/// Mean competence of the agent's neighbors from the pre-phase buffer. An
/// isolated agent references its own value, which zeroes the social pull.
fn neighbor_reference(snapshot: &[f64], neighbors: &[u32], own: f64) -> f64 {
    if neighbors.is_empty() {
        return own;
    }
    let sum: f64 = neighbors
        .iter()
        .filter_map(|&id| snapshot.get(id as usize))
        .sum();
    sum / neighbors.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_agent_references_itself() {
        let snapshot = vec![10.0, 20.0, 30.0];
        assert_eq!(neighbor_reference(&snapshot, &[], 42.0), 42.0);
    }

    #[test]
    fn test_neighbor_mean() {
        let snapshot = vec![10.0, 20.0, 30.0];
        assert_eq!(neighbor_reference(&snapshot, &[1, 2], 0.0), 25.0);
    }
}
