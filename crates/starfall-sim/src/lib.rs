//! Simulation engine for STARFALL.
//!
//! Owns the hecs ECS world, runs the per-frame systems, resolves
//! collisions, and produces `FrameSnapshot`s for the front-end.

pub mod engine;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use starfall_core as core;

#[cfg(test)]
mod tests;
