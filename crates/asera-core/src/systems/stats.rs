//! Clock, History and Aggregate Statistics
//!
//! The clock advance opens the tick; phases 8 and 9 close it by appending
//! each agent's fixed-schema record and the population aggregates for the
//! completed tick.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{Cascade, Competence, History, RewardState, Standing, TickRecord, Wealth};
use crate::metrics;

/// Resource: monotonically increasing tick counter.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimClock {
    pub tick: u64,
}

/// One aggregate data point per completed tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub tick: u64,
    pub mean_wealth: f64,
    pub gini: f64,
    pub mean_competence: f64,
}

/// Resource: aggregate time series over the run.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }
}

/// First chained system of the tick.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.tick += 1;
}

/// Phase 8: append the tick's record to every agent's history.
pub fn record_history(
    clock: Res<SimClock>,
    mut query: Query<(
        &Wealth,
        &Standing,
        &Cascade,
        &Competence,
        &RewardState,
        &mut History,
    )>,
) {
    for (wealth, standing, cascade, competence, reward, mut history) in &mut query {
        history.push(TickRecord {
            tick: clock.tick,
            wealth: wealth.current,
            tax_paid: wealth.last_tax_paid,
            influence: standing.influence,
            status: standing.status,
            share_factor: standing.share_factor,
            responsibility: cascade.responsibility,
            self_esteem: cascade.self_esteem,
            willpower: cascade.willpower,
            ambition: cascade.ambition,
            competence: competence.value,
            inspiration: cascade.inspiration,
            action_level: cascade.action_level,
            alpha: reward.alpha,
            beta: reward.beta,
            gamma: reward.gamma,
            performance: reward.performance,
        });
    }
}

/// Phase 9: mean wealth, Gini coefficient and mean competence for the tick.
pub fn collect_aggregates(
    clock: Res<SimClock>,
    mut series: ResMut<TimeSeries>,
    query: Query<(&Wealth, &Competence)>,
) {
    let n = query.iter().count();
    if n == 0 {
        return;
    }
    let wealths: Vec<f64> = query.iter().map(|(wealth, _)| wealth.current).collect();
    let mean_wealth = wealths.iter().sum::<f64>() / n as f64;
    let mean_competence = query
        .iter()
        .map(|(_, competence)| competence.value)
        .sum::<f64>()
        / n as f64;
    let gini = metrics::gini(&wealths);

    debug!(
        tick = clock.tick,
        mean_wealth, gini, mean_competence, "tick aggregates"
    );

    series.points.push(SeriesPoint {
        tick: clock.tick,
        mean_wealth,
        gini,
        mean_competence,
    });
}
