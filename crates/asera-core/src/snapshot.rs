//! Snapshot Schema
//!
//! Versioned, self-describing JSON capture of the entire simulation state:
//! parameters, active policy, clock, per-agent state and history, graph
//! topology, and the aggregate series. Restoring a snapshot rebuilds a
//! simulation equivalent to the one that wrote it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::components::{Cascade, Competence, RewardState, Standing, TickRecord, Wealth};
use crate::error::SimError;
use crate::params::Params;
use crate::policy::TaxPolicy;
use crate::simulation::RunMode;
use crate::systems::stats::SeriesPoint;

/// Format version written into every snapshot; loading rejects mismatches
/// instead of guessing at the layout.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: u32,
    pub wealth: Wealth,
    pub standing: Standing,
    pub cascade: Cascade,
    pub competence: Competence,
    pub reward: RewardState,
    pub history: Vec<TickRecord>,
}

/// Social graph topology as an undirected edge list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: usize,
    pub edges: Vec<(u32, u32)>,
}

/// Complete simulation state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub version: u32,
    pub seed: u64,
    pub tick: u64,
    pub mode: RunMode,
    pub policy: TaxPolicy,
    pub params: Params,
    pub agents: Vec<AgentSnapshot>,
    pub graph: GraphSnapshot,
    pub series: Vec<SeriesPoint>,
}

impl SimulationSnapshot {
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SimError> {
        let snapshot: Self = serde_json::from_str(text)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SimError::SnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
