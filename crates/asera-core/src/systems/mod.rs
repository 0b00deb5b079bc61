//! Tick Pipeline Systems
//!
//! One system per phase of the tick, chained in strict order by the
//! simulation schedule. The chaining is what makes the population-wide
//! barriers structural: every phase finishes over all agents before the next
//! begins, so later phases can safely consume population aggregates computed
//! earlier in the same tick.

pub mod cascade;
pub mod diffusion;
pub mod reward;
pub mod standing;
pub mod stats;
pub mod taxation;

pub use cascade::update_cascade;
pub use diffusion::{diffuse_competence, snapshot_competence, CompetenceSnapshot};
pub use reward::update_rewards;
pub use standing::normalize_standing;
pub use stats::{advance_clock, collect_aggregates, record_history, SeriesPoint, SimClock, TimeSeries};
pub use taxation::{
    apply_income_and_tax, compute_extrema, redistribute_taxes, ActivePolicy, TaxPool, TickExtrema,
};
