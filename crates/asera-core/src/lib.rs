//! ASERA simulation engine
//!
//! An agent-based socio-economic simulation: a population of agents holds
//! wealth, pays taxes under a selectable redistribution policy, and evolves a
//! cascade of derived psychological variables (influence, status,
//! responsibility, self-esteem, willpower, ambition, competence, inspiration,
//! action level). Competence diffuses across a social graph and a per-agent
//! adaptive reward function tunes its own weights online.
//!
//! The per-tick pipeline runs as a chained ECS schedule, so every phase
//! completes over the whole population before the next phase starts.

pub mod components;
pub mod error;
pub mod metrics;
pub mod network;
pub mod params;
pub mod policy;
pub mod setup;
pub mod simulation;
pub mod snapshot;
pub mod systems;

pub use components::{
    AgentId, Cascade, Competence, History, RewardState, Standing, TickRecord, Wealth,
};
pub use error::SimError;
pub use network::SocialGraph;
pub use params::Params;
pub use policy::TaxPolicy;
pub use simulation::{AgentView, RunMode, Simulation};
pub use snapshot::{SimulationSnapshot, SNAPSHOT_VERSION};
pub use systems::stats::{SeriesPoint, TimeSeries};
