//! Simulation Engine
//!
//! The `Simulation` facade owns the ECS world and the chained phase
//! schedule, and exposes the lifecycle state machine, accessors for external
//! consumers (CLI, exporters, dashboards), policy switching, parameter
//! tuning, and snapshot persistence.
//!
//! One call to [`Simulation::step`] or [`Simulation::update`] executes one
//! full tick to completion; mode changes only ever take effect at tick
//! boundaries.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::components::{
    AgentId, Cascade, Competence, History, RewardState, Standing, TickRecord, Wealth,
};
use crate::error::SimError;
use crate::network::SocialGraph;
use crate::params::Params;
use crate::policy::TaxPolicy;
use crate::setup;
use crate::snapshot::{AgentSnapshot, GraphSnapshot, SimulationSnapshot, SNAPSHOT_VERSION};
use crate::systems::{
    advance_clock, apply_income_and_tax, collect_aggregates, compute_extrema, diffuse_competence,
    normalize_standing, record_history, redistribute_taxes, snapshot_competence, update_cascade,
    update_rewards, ActivePolicy, CompetenceSnapshot, SimClock, TaxPool, TickExtrema, TimeSeries,
};

/// Run-state of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Population freshly (re)initialized, no history.
    #[default]
    Stopped,
    /// Population exists, ticks are not advancing.
    Paused,
    /// Ticks advance on every `update` call.
    Running,
}

/// Read-only view of one agent's live state for external consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentView {
    pub id: u32,
    pub wealth: f64,
    pub influence: f64,
    pub status: f64,
    pub self_esteem: f64,
    pub competence: f64,
    pub action_level: f64,
    pub reward_weights: (f64, f64, f64),
}

/// The simulation engine.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    mode: RunMode,
    seed: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("mode", &self.mode)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Build a fresh simulation from `params`, seeded for reproducibility.
    /// An empty configured population is a fatal configuration error.
    pub fn new(params: Params, seed: u64) -> Result<Self, SimError> {
        if params.num_agents == 0 {
            return Err(SimError::EmptyPopulation);
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        let endowments = setup::draw_endowments(&params, &mut rng);
        Self::build(params, seed, &endowments, &mut rng, TaxPolicy::default())
    }

    /// Build a simulation with explicit per-agent endowments instead of a
    /// random draw, for scripted scenarios and tests.
    pub fn with_endowments(params: Params, seed: u64, endowments: &[f64]) -> Result<Self, SimError> {
        if endowments.is_empty() {
            return Err(SimError::EmptyPopulation);
        }
        let mut params = params;
        params.num_agents = endowments.len();
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::build(params, seed, endowments, &mut rng, TaxPolicy::default())
    }

    fn build(
        params: Params,
        seed: u64,
        endowments: &[f64],
        rng: &mut SmallRng,
        policy: TaxPolicy,
    ) -> Result<Self, SimError> {
        let graph = SocialGraph::erdos_renyi(endowments.len(), params.edge_probability, rng);

        let mut world = World::new();
        world.insert_resource(SimClock::default());
        world.insert_resource(TimeSeries::default());
        world.insert_resource(TaxPool::default());
        world.insert_resource(TickExtrema::default());
        world.insert_resource(ActivePolicy(policy));
        world.insert_resource(CompetenceSnapshot::default());
        world.insert_resource(graph);
        setup::spawn_population(&mut world, &params, endowments);
        world.insert_resource(params);

        Ok(Self {
            world,
            schedule: build_schedule(),
            mode: RunMode::Stopped,
            seed,
        })
    }

    // --- Lifecycle -------------------------------------------------------

    /// stopped|paused -> running.
    pub fn start(&mut self) {
        if self.mode != RunMode::Running {
            self.mode = RunMode::Running;
            info!("simulation started");
        }
    }

    /// running -> paused.
    pub fn pause(&mut self) {
        if self.mode == RunMode::Running {
            self.mode = RunMode::Paused;
            info!("simulation paused");
        }
    }

    /// any -> stopped. Discards the population, histories and time series,
    /// and reinitializes from the current parameters, seed and policy.
    pub fn stop(&mut self) {
        let params = self.world.resource::<Params>().clone();
        let policy = self.world.resource::<ActivePolicy>().0;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let endowments = setup::draw_endowments(&params, &mut rng);
        // num_agents >= 1 is invariant for a constructed simulation.
        if let Ok(fresh) = Self::build(params, self.seed, &endowments, &mut rng, policy) {
            *self = fresh;
        }
        self.mode = RunMode::Stopped;
        info!("simulation stopped and reinitialized");
    }

    /// Execute exactly one tick regardless of run mode (single-stepping
    /// while paused or stopped).
    pub fn step(&mut self) {
        self.run_tick();
    }

    /// Execute one tick if the simulation is running; otherwise a no-op.
    pub fn update(&mut self) {
        if self.mode == RunMode::Running {
            self.run_tick();
        }
    }

    fn run_tick(&mut self) {
        self.schedule.run(&mut self.world);
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn tick(&self) -> u64 {
        self.world.resource::<SimClock>().tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // --- Policy and parameters -------------------------------------------

    /// Switch the active tax policy by name. Unknown names are logged and
    /// leave the active policy unchanged.
    pub fn apply_policy(&mut self, name: &str) -> Result<(), SimError> {
        match TaxPolicy::parse(name) {
            Ok(policy) => {
                self.world.resource_mut::<ActivePolicy>().0 = policy;
                info!(policy = policy.name(), "tax policy applied");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "ignoring unknown tax policy");
                Err(err)
            }
        }
    }

    pub fn active_policy(&self) -> TaxPolicy {
        self.world.resource::<ActivePolicy>().0
    }

    /// Tune one named parameter on the engine-owned parameter set. Unknown
    /// names are logged and leave the parameters unchanged.
    pub fn adjust_parameter(&mut self, name: &str, value: f64) -> Result<(), SimError> {
        let result = self.world.resource_mut::<Params>().adjust(name, value);
        match &result {
            Ok(()) => info!(parameter = name, value, "parameter adjusted"),
            Err(err) => warn!(error = %err, "ignoring unknown parameter"),
        }
        result
    }

    pub fn params(&self) -> &Params {
        self.world.resource::<Params>()
    }

    // --- Accessors -------------------------------------------------------

    pub fn agent_count(&mut self) -> usize {
        self.world.query::<&AgentId>().iter(&self.world).count()
    }

    /// Live views of all agents, ordered by id.
    pub fn agents(&mut self) -> Vec<AgentView> {
        let mut views: Vec<AgentView> = self
            .world
            .query::<(
                &AgentId,
                &Wealth,
                &Standing,
                &Cascade,
                &Competence,
                &RewardState,
            )>()
            .iter(&self.world)
            .map(
                |(id, wealth, standing, cascade, competence, reward)| AgentView {
                    id: id.0,
                    wealth: wealth.current,
                    influence: standing.influence,
                    status: standing.status,
                    self_esteem: cascade.self_esteem,
                    competence: competence.value,
                    action_level: cascade.action_level,
                    reward_weights: (reward.alpha, reward.beta, reward.gamma),
                },
            )
            .collect();
        views.sort_by_key(|view| view.id);
        views
    }

    pub fn agent(&mut self, id: u32) -> Option<AgentView> {
        self.agents().into_iter().find(|view| view.id == id)
    }

    /// The recorded history of one agent, one entry per completed tick.
    pub fn agent_history(&mut self, id: u32) -> Option<Vec<TickRecord>> {
        self.world
            .query::<(&AgentId, &History)>()
            .iter(&self.world)
            .find(|(agent_id, _)| agent_id.0 == id)
            .map(|(_, history)| history.records.clone())
    }

    pub fn time_series(&self) -> &TimeSeries {
        self.world.resource::<TimeSeries>()
    }

    pub fn graph(&self) -> &SocialGraph {
        self.world.resource::<SocialGraph>()
    }

    pub fn mean_wealth(&mut self) -> f64 {
        let wealths = self.wealths();
        if wealths.is_empty() {
            return 0.0;
        }
        wealths.iter().sum::<f64>() / wealths.len() as f64
    }

    pub fn gini_coefficient(&mut self) -> f64 {
        crate::metrics::gini(&self.wealths())
    }

    pub fn mean_competence(&mut self) -> f64 {
        let values: Vec<f64> = self
            .world
            .query::<&Competence>()
            .iter(&self.world)
            .map(|competence| competence.value)
            .collect();
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    fn wealths(&mut self) -> Vec<f64> {
        self.world
            .query::<&Wealth>()
            .iter(&self.world)
            .map(|wealth| wealth.current)
            .collect()
    }

    // --- Persistence -----------------------------------------------------

    /// Capture the complete simulation state.
    pub fn snapshot(&mut self) -> SimulationSnapshot {
        let mut agents: Vec<AgentSnapshot> = self
            .world
            .query::<(
                &AgentId,
                &Wealth,
                &Standing,
                &Cascade,
                &Competence,
                &RewardState,
                &History,
            )>()
            .iter(&self.world)
            .map(
                |(id, wealth, standing, cascade, competence, reward, history)| AgentSnapshot {
                    id: id.0,
                    wealth: wealth.clone(),
                    standing: standing.clone(),
                    cascade: cascade.clone(),
                    competence: competence.clone(),
                    reward: reward.clone(),
                    history: history.records.clone(),
                },
            )
            .collect();
        agents.sort_by_key(|agent| agent.id);

        let graph = self.world.resource::<SocialGraph>();
        SimulationSnapshot {
            version: SNAPSHOT_VERSION,
            seed: self.seed,
            tick: self.tick(),
            mode: self.mode,
            policy: self.active_policy(),
            params: self.params().clone(),
            agents,
            graph: GraphSnapshot {
                nodes: graph.node_count(),
                edges: graph.edges(),
            },
            series: self.time_series().points.clone(),
        }
    }

    /// Rebuild a simulation from a snapshot. Fails on version mismatch or an
    /// empty population; never touches any live simulation.
    pub fn restore(snapshot: SimulationSnapshot) -> Result<Self, SimError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SimError::SnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        if snapshot.agents.is_empty() {
            return Err(SimError::EmptyPopulation);
        }

        let mut world = World::new();
        world.insert_resource(SimClock {
            tick: snapshot.tick,
        });
        world.insert_resource(TimeSeries {
            points: snapshot.series,
        });
        world.insert_resource(TaxPool::default());
        world.insert_resource(TickExtrema::default());
        world.insert_resource(ActivePolicy(snapshot.policy));
        world.insert_resource(CompetenceSnapshot::default());
        world.insert_resource(SocialGraph::from_edges(
            snapshot.graph.nodes,
            &snapshot.graph.edges,
        ));

        let mut agents = snapshot.agents;
        agents.sort_by_key(|agent| agent.id);
        for agent in agents {
            world.spawn((
                AgentId(agent.id),
                agent.wealth,
                agent.standing,
                agent.cascade,
                agent.competence,
                agent.reward,
                History {
                    records: agent.history,
                },
            ));
        }
        world.insert_resource(snapshot.params);

        info!(tick = snapshot.tick, "simulation restored from snapshot");
        Ok(Self {
            world,
            schedule: build_schedule(),
            mode: snapshot.mode,
            seed: snapshot.seed,
        })
    }

    /// Write the state to a snapshot file.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), SimError> {
        self.snapshot().write_to(path)
    }

    /// Load a simulation from a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        Self::restore(SimulationSnapshot::read_from(path)?)
    }
}

/// Chain every phase in the order the model requires; later phases consume
/// population-wide aggregates computed by earlier ones.
fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            advance_clock,
            compute_extrema,
            apply_income_and_tax,
            redistribute_taxes,
            normalize_standing,
            update_cascade,
            snapshot_competence,
            diffuse_competence,
            update_rewards,
            record_history,
            collect_aggregates,
        )
            .chain(),
    );
    schedule
}
