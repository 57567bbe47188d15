use bevy::prelude::*;

use crate::{
    agent::{Autopilot, Peer, SwarmController},
    control::debug_steering_outputs,
    navigation::Navigation,
    neighbors::{Roster, debug_neighborhoods, update_roster},
    waypoint::{Waypoint, debug_waypoints, update_swarm},
};

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SwarmSystemSet;

/// Steers every [SwarmController] once per fixed tick: the roster is
/// captured first, then each agent in swarm mode moves its waypoint.
pub struct SwarmPlugin;

impl Plugin for SwarmPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Roster>()
            .register_type::<SwarmController>()
            .register_type::<Peer>()
            .register_type::<Autopilot>()
            .register_type::<Navigation>()
            .register_type::<Waypoint>();
        let update_systems = (update_roster, update_swarm)
            .chain()
            .in_set(SwarmSystemSet);
        app.add_systems(FixedUpdate, update_systems);
    }
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DebugSwarmSystem;

pub struct DebugSwarmPlugin;

impl Plugin for DebugSwarmPlugin {
    fn build(&self, app: &mut App) {
        let debug_systems = (
            debug_neighborhoods,
            debug_steering_outputs,
            debug_waypoints,
        )
            .in_set(DebugSwarmSystem);
        app.add_systems(Update, debug_systems);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avian3d::prelude::LinearVelocity;
    use bevy::{MinimalPlugins, transform::TransformPlugin};

    #[test]
    fn test_plugin_steers_on_fixed_update() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin, SwarmPlugin));
        let agent = app
            .world_mut()
            .spawn((
                SwarmController::default(),
                Autopilot::swarm(),
                Transform::from_xyz(0.0, 0.0, -100.0),
                LinearVelocity(Vec3::X),
            ))
            .id();
        // Propagate transforms before the tick
        app.update();
        app.world_mut().run_schedule(FixedUpdate);

        let waypoint = app
            .world()
            .get::<SwarmController>(agent)
            .and_then(SwarmController::waypoint)
            .expect("waypoint should exist after one tick");
        let steerpoint = app.world().get::<Waypoint>(waypoint).unwrap();
        assert_eq!(steerpoint.position, Vec3::new(5000.0, 0.0, -100.0));
        assert_eq!(app.world().resource::<Roster>().peers().len(), 1);
    }
}
