//! ECS Components
//!
//! All per-agent state for the simulation.

pub mod agent;

pub use agent::*;
