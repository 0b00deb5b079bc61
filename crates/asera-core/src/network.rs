//! Social Graph
//!
//! Undirected Erdos-Renyi graph over agent ids, built once per run from the
//! seeded RNG and read-only afterwards. The diffusion phase only ever asks
//! for neighbor sets; the engine never mutates the topology mid-run.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Adjacency-list social graph keyed by dense agent ids.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialGraph {
    adjacency: Vec<Vec<u32>>,
}

impl SocialGraph {
    /// Empty graph over `n` agents.
    pub fn with_nodes(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
        }
    }

    /// Erdos-Renyi construction: each unordered pair of agents is connected
    /// independently with probability `p`.
    pub fn erdos_renyi(n: usize, p: f64, rng: &mut SmallRng) -> Self {
        let p = p.clamp(0.0, 1.0);
        let mut graph = Self::with_nodes(n);
        for a in 0..n {
            for b in (a + 1)..n {
                if rng.gen_bool(p) {
                    graph.add_edge(a as u32, b as u32);
                }
            }
        }
        graph
    }

    /// Rebuild a graph from a serialized undirected edge list.
    pub fn from_edges(n: usize, edges: &[(u32, u32)]) -> Self {
        let mut graph = Self::with_nodes(n);
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Insert an undirected edge. Self-loops, out-of-range endpoints, and
    /// duplicates are ignored.
    pub fn add_edge(&mut self, a: u32, b: u32) {
        let n = self.adjacency.len();
        if a == b || a as usize >= n || b as usize >= n {
            return;
        }
        if !self.adjacency[a as usize].contains(&b) {
            self.adjacency[a as usize].push(b);
            self.adjacency[b as usize].push(a);
        }
    }

    /// Neighbor ids of `id`; empty for isolated or unknown agents.
    pub fn neighbors(&self, id: u32) -> &[u32] {
        self.adjacency
            .get(id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Undirected edge list with each edge reported once as (low, high),
    /// used by the snapshot format.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (a, neighbors) in self.adjacency.iter().enumerate() {
            for &b in neighbors {
                if (a as u32) < b {
                    edges.push((a as u32, b));
                }
            }
        }
        edges.sort_unstable();
        edges
    }
}
