//! Core types and definitions for the SKYLANCE flight-combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, configuration, commands, state snapshots, events, and constants.
//! It contains no simulation logic beyond small math helpers.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod math;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
