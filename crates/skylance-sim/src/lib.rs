//! Simulation engine for Skylance.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate with a
//! decoupled frame-rate update, and produces `SimSnapshot`s for a
//! presentation layer.

pub mod aero;
pub mod body;
pub mod engine;
pub mod guidance;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use skylance_core as core;
