//! Patrol behaviour for non-player aircraft.
//!
//! Bandits fly closed waypoint loops at a speed that reacts to climbs and
//! dives. Everything here is pure and operates on plain data; the sim crate
//! owns the entities.

pub mod route;
pub mod waypoint;

pub use skylance_core as core;
