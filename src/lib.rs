mod agent;
mod behaviors;
mod control;
mod navigation;
mod neighbors;
mod parameters;
mod plugin;
pub mod prelude;
mod waypoint;

/// Autopilot mode string that turns the flocking pipeline on.
pub(crate) const SWARM_MODE: &str = "swarm";
