use avian3d::prelude::LinearVelocity;
use bevy::{ecs::query::QueryData, prelude::*};

use crate::{
    agent::{AgentState, Autopilot, Peer, SwarmController, SwarmMode},
    control::SteeringOutputs,
    navigation::Navigation,
    neighbors::Roster,
};

/// How far ahead, in seconds, to extrapolate the current heading when no
/// neighbor influences the agent.
const STRAIGHT_AHEAD_HORIZON: f32 = 5000.0;

/// A steerpoint on a [Route](crate::prelude::Route): where to fly and at
/// what altitude.
#[derive(Component, Debug, Default, Copy, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Waypoint {
    pub position: Vec3,
    pub commanded_altitude: f32,
}

impl Waypoint {
    pub(crate) fn reposition(&mut self, target: WaypointTarget) {
        self.position = target.position;
        self.commanded_altitude = target.altitude;
    }
}

impl From<WaypointTarget> for Waypoint {
    fn from(target: WaypointTarget) -> Self {
        Self {
            position: target.position,
            commanded_altitude: target.altitude,
        }
    }
}

/// Where an agent's waypoint should go this tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WaypointTarget {
    pub position: Vec3,
    pub altitude: f32,
}

impl WaypointTarget {
    /// Project the net steering displacement onto an absolute target.
    /// Without any steering the agent flies straight and level.
    pub fn project(agent: &AgentState, net: Vec3) -> Self {
        if net.length() == 0.0 {
            return Self {
                position: agent.position + agent.velocity * STRAIGHT_AHEAD_HORIZON,
                altitude: agent.altitude(),
            };
        }
        let position = agent.position + net;
        Self {
            position,
            altitude: -position.z,
        }
    }
}

#[derive(QueryData)]
#[query_data(mutable)]
pub(crate) struct UpdateSwarmAgentQuery {
    entity: Entity,
    controller: &'static mut SwarmController,
    autopilot: &'static Autopilot,
    peer: &'static Peer,
    transform: &'static GlobalTransform,
    velocity: &'static LinearVelocity,
    outputs: &'static mut SteeringOutputs,
    navigation: Option<&'static mut Navigation>,
}

/// Run the flocking pipeline for every agent in swarm mode and move its
/// waypoint. Navigation, route and waypoint are created the first time
/// an agent needs them.
pub(crate) fn update_swarm(
    mut commands: Commands,
    roster: Res<Roster>,
    mut agent_query: Query<UpdateSwarmAgentQuery>,
    mut waypoint_query: Query<&mut Waypoint>,
) {
    for mut agent in agent_query.iter_mut() {
        if SwarmMode::from(agent.autopilot) == SwarmMode::Inactive {
            // The waypoint stays where it is; only the debug record is cleared.
            agent.outputs.set_if_neq(SteeringOutputs::default());
            continue;
        }
        let state = AgentState {
            entity: agent.entity,
            kind: agent.peer.kind,
            position: agent.transform.translation(),
            velocity: agent.velocity.0,
        };
        let outputs = SteeringOutputs::compute(&state, &roster, &agent.controller.parameters);
        let target = WaypointTarget::project(&state, outputs.net());
        *agent.outputs = outputs;
        trace!("Swarm target of {} is {:?}", agent.entity, target);

        let mut new_navigation = None;
        let navigation = match agent.navigation.as_deref_mut() {
            Some(navigation) => navigation,
            None => new_navigation.insert(Navigation::default()),
        };
        let route = navigation.route_or_default();

        let waypoint = match agent.controller.waypoint {
            Some(waypoint) => {
                let Ok(mut steerpoint) = waypoint_query.get_mut(waypoint) else {
                    warn!(
                        "Swarm waypoint {waypoint} of {} no longer exists",
                        agent.entity
                    );
                    continue;
                };
                steerpoint.reposition(target);
                waypoint
            }
            None => {
                let waypoint = commands
                    .spawn((Waypoint::from(target), Name::new("Swarm waypoint")))
                    .id();
                agent.controller.waypoint = Some(waypoint);
                debug!("Created swarm waypoint {waypoint} for {}", agent.entity);
                waypoint
            }
        };
        // The host may have swapped the route since the last tick.
        route.insert_waypoint(waypoint);
        route.direct_to(waypoint);

        if let Some(navigation) = new_navigation {
            commands.entity(agent.entity).insert(navigation);
        }
    }
}

/// Draw a line from each agent to its waypoint.
pub(crate) fn debug_waypoints(
    mut gizmos: Gizmos,
    agent_query: Query<(&GlobalTransform, &SwarmController)>,
    waypoint_query: Query<&Waypoint>,
) {
    for (transform, controller) in agent_query.iter() {
        let Some(waypoint) = controller
            .waypoint
            .and_then(|entity| waypoint_query.get(entity).ok())
        else {
            continue;
        };
        gizmos.line(
            transform.translation(),
            waypoint.position,
            Color::srgb(1.0, 0.0, 1.0),
        );
    }
}
