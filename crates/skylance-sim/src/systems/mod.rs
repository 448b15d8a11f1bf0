//! ECS systems that operate on the simulation world.
//!
//! Systems are free functions that take `&mut World` (or `&World` for
//! read-only passes). They do not own state; all state lives in components.

pub mod aero_surfaces;
pub mod armament;
pub mod cleanup;
pub mod controls;
pub mod integrator;
pub mod missile_kinematics;
pub mod patrol;
pub mod propulsion;
pub mod radar;
pub mod snapshot;
