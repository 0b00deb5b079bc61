//! Psychological Cascade Phase
//!
//! Phase 5: responsibility, self-esteem, willpower, ambition, inspiration
//! and action level, each derived from the previous stage starting at this
//! tick's normalized status. Inspiration reads the agent's pre-diffusion
//! competence, matching the reference trajectory of the model.

use bevy_ecs::prelude::*;

use crate::components::{Cascade, Competence, Standing};
use crate::metrics;
use crate::params::Params;

pub fn update_cascade(
    params: Res<Params>,
    mut query: Query<(&Standing, &Competence, &mut Cascade)>,
) {
    for (standing, competence, mut cascade) in &mut query {
        cascade.responsibility = metrics::responsibility(&params, standing.status);
        cascade.self_esteem = metrics::self_esteem(&params, cascade.responsibility);
        cascade.willpower = metrics::willpower(&params, cascade.self_esteem);
        cascade.ambition = metrics::ambition(&params, cascade.willpower);
        cascade.inspiration = metrics::inspiration(&params, competence.value);
        cascade.action_level = metrics::action_level(
            &params,
            cascade.inspiration,
            cascade.willpower,
            cascade.ambition,
        );
    }
}
