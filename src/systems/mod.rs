//! Systems module - all ECS systems for the gunplay simulation.

pub mod debug;
pub mod firing;
