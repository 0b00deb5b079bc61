//! Income, Taxation and Redistribution Phases
//!
//! Phases 1-3 of the tick: capture pre-tick extrema for the rate formulas,
//! levy the per-agent tax while crediting income, then return the collected
//! pool to the population under the active policy.

use bevy_ecs::prelude::*;
use tracing::warn;

use crate::components::{Standing, Wealth};
use crate::params::Params;
use crate::policy::{self, TaxPolicy, WealthExtrema};

/// Resource: the currently active tax policy.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ActivePolicy(pub TaxPolicy);

/// Resource: population extrema for the current tick, captured before any
/// wealth is moved.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct TickExtrema(pub WealthExtrema);

/// Resource: tax collected during the current tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct TaxPool(pub f64);

/// Phase 1: capture min/max wealth and max status over the pre-tick
/// population.
pub fn compute_extrema(mut extrema: ResMut<TickExtrema>, query: Query<(&Wealth, &Standing)>) {
    let mut next = WealthExtrema {
        wealth_min: f64::INFINITY,
        wealth_max: f64::NEG_INFINITY,
        status_max: 0.0,
    };
    let mut populated = false;
    for (wealth, standing) in &query {
        populated = true;
        next.wealth_min = next.wealth_min.min(wealth.current);
        next.wealth_max = next.wealth_max.max(wealth.current);
        next.status_max = next.status_max.max(standing.status);
    }
    extrema.0 = if populated {
        next
    } else {
        WealthExtrema::default()
    };
}

/// Phase 2: per-agent income and tax. The levy applies to pre-income
/// holdings; income is credited in the same movement and the result is
/// clamped to [0, ceiling]. Collected tax accumulates into the tick's pool.
pub fn apply_income_and_tax(
    params: Res<Params>,
    policy: Res<ActivePolicy>,
    extrema: Res<TickExtrema>,
    mut pool: ResMut<TaxPool>,
    mut query: Query<(&mut Wealth, &Standing)>,
) {
    pool.0 = 0.0;
    for (mut wealth, standing) in &mut query {
        let rate = policy::tax_rate(policy.0, &params, wealth.current, standing.status, &extrema.0);
        let tax = (rate * wealth.current).max(0.0);
        let mut next = wealth.current + params.income_delta - tax;
        if !next.is_finite() {
            warn!(holdings = wealth.current, "non-finite wealth update, keeping previous holdings");
            next = wealth.current;
        }
        wealth.last_tax_paid = tax;
        wealth.current = next.clamp(0.0, params.wealth_ceiling);
        pool.0 += tax;
    }
}

/// Phase 3: redistribute the pool over the whole population.
pub fn redistribute_taxes(
    params: Res<Params>,
    policy: Res<ActivePolicy>,
    pool: Res<TaxPool>,
    mut query: Query<&mut Wealth>,
) {
    let mut wealths: Vec<f64> = query.iter().map(|wealth| wealth.current).collect();
    policy::redistribute(policy.0, &params, &mut wealths, pool.0);
    for (mut wealth, next) in query.iter_mut().zip(wealths) {
        wealth.current = next;
    }
}
