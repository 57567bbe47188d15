use avian3d::prelude::LinearVelocity;
use bevy::{
    ecs::{lifecycle::HookContext, world::DeferredWorld},
    prelude::*,
};
use strum::Display;

use crate::{
    SWARM_MODE, control::SteeringOutputs, navigation::Navigation, parameters::SwarmParameters,
};

/// The kind of player an entity is. Agents only flock with peers of
/// their own kind.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Reflect, Display)]
pub enum PeerKind {
    #[default]
    Uav,
    Aircraft,
    GroundVehicle,
}

/// A component that makes an entity visible in the [Roster](crate::prelude::Roster).
/// Every swarm agent is automatically a peer. Other players, e.g. manned
/// aircraft, can be peers too but are ignored by agents of a different kind.
#[derive(Component, Debug, Default, Copy, Clone, Reflect)]
#[reflect(Component)]
pub struct Peer {
    pub kind: PeerKind,
}

impl Peer {
    pub fn new(kind: PeerKind) -> Self {
        Self { kind }
    }
}

/// The autopilot of a player. Only its mode is read here: the swarm
/// controller runs while the mode is exactly `"swarm"`.
#[derive(Component, Debug, Default, Clone, Reflect)]
#[reflect(Component)]
pub struct Autopilot {
    mode: String,
}

impl Autopilot {
    pub fn with_mode(mode: impl Into<String>) -> Self {
        Self { mode: mode.into() }
    }

    pub fn swarm() -> Self {
        Self::with_mode(SWARM_MODE)
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn set_mode(&mut self, mode: impl Into<String>) {
        self.mode = mode.into();
    }
}

/// Whether the flocking pipeline runs this tick. Evaluated fresh every
/// tick from the autopilot mode; nothing carries over between ticks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwarmMode {
    Inactive,
    Active,
}

impl From<&Autopilot> for SwarmMode {
    fn from(autopilot: &Autopilot) -> Self {
        if autopilot.mode() == SWARM_MODE {
            SwarmMode::Active
        } else {
            SwarmMode::Inactive
        }
    }
}

/// A snapshot of one player for the current tick. Positions are in the
/// simulation's north-east-down inertial frame, in meters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AgentState {
    pub entity: Entity,
    pub kind: PeerKind,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl AgentState {
    /// Altitude above the frame origin. Down is +z, so this is -z.
    pub fn altitude(&self) -> f32 {
        -self.position.z
    }
}

/// Steers an agent with Reynolds flocking. While the agent's
/// [Autopilot] is in swarm mode, the controller keeps a single
/// [Waypoint](crate::prelude::Waypoint) on the agent's route and moves it
/// every tick to where separation, alignment and cohesion point.
///
/// The route owns the waypoint. When the controller is removed or
/// replaced, the waypoint is taken off the route and then despawned.
#[derive(Component, Debug, Default, Reflect)]
#[component(on_replace = release_waypoint)]
#[require(Peer, Autopilot, LinearVelocity, Transform, SteeringOutputs)]
#[reflect(Component)]
pub struct SwarmController {
    pub(crate) parameters: SwarmParameters,
    /// Non-owning handle to the waypoint on the agent's route.
    pub(crate) waypoint: Option<Entity>,
}

impl Clone for SwarmController {
    /// A clone shares the parameters but gets its own waypoint.
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters,
            waypoint: None,
        }
    }
}

impl SwarmController {
    pub fn new(parameters: SwarmParameters) -> Self {
        Self {
            parameters,
            waypoint: None,
        }
    }

    pub fn parameters(&self) -> &SwarmParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut SwarmParameters {
        &mut self.parameters
    }

    /// The waypoint this controller steers, once it has been created.
    pub fn waypoint(&self) -> Option<Entity> {
        self.waypoint
    }
}

fn release_waypoint(mut world: DeferredWorld, context: HookContext) {
    let entity = context.entity;
    let Some(waypoint) = world
        .get::<SwarmController>(entity)
        .and_then(|controller| controller.waypoint)
    else {
        return;
    };
    // Deregister from the route first, then release.
    if let Some(mut navigation) = world.get_mut::<Navigation>(entity)
        && let Some(route) = navigation.route_mut()
    {
        route.delete_waypoint(waypoint);
    }
    debug!("Releasing swarm waypoint {waypoint} of {entity}");
    world.commands().entity(waypoint).try_despawn();
}
